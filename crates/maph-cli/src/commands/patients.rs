use crate::app::App;
use anyhow::{Result, bail};
use clap::{Args, Subcommand};
use maph_application::Route;
use maph_application::screens::PatientsScreen;
use maph_core::patient::{PatientField, PatientForm};

#[derive(Subcommand)]
pub enum PatientsAction {
    /// List patients
    List,
    /// Show one patient
    Show { id: String },
    /// Register a patient
    Add(PatientArgs),
    /// Change an existing patient; omitted fields keep their value
    Edit(PatientArgs),
    /// Remove a patient
    Delete { id: String },
}

#[derive(Args)]
pub struct PatientArgs {
    /// Identity number
    #[arg(long)]
    id: String,
    #[arg(long)]
    first_name: Option<String>,
    #[arg(long)]
    last_names: Option<String>,
    #[arg(long)]
    known_as: Option<String>,
    #[arg(long)]
    phone: Option<String>,
    #[arg(long)]
    email: Option<String>,
    #[arg(long)]
    address: Option<String>,
}

impl PatientArgs {
    fn apply(&self, form: &mut PatientForm) {
        form.set(PatientField::Id, &self.id);
        let optional = [
            (PatientField::FirstName, &self.first_name),
            (PatientField::LastNames, &self.last_names),
            (PatientField::KnownAs, &self.known_as),
            (PatientField::Phone, &self.phone),
            (PatientField::Email, &self.email),
            (PatientField::Address, &self.address),
        ];
        for (field, value) in optional {
            if let Some(value) = value {
                form.set(field, value);
            }
        }
    }
}

pub async fn run(app: &App, action: PatientsAction) -> Result<()> {
    let route = match action {
        PatientsAction::Add(_) | PatientsAction::Edit(_) => Route::CreatePatient,
        _ => Route::Patients,
    };
    app.open(route).await?;
    let screen = PatientsScreen::new(app.resources());

    match action {
        PatientsAction::List => {
            let patients = screen.load().await?;
            if patients.is_empty() {
                println!("No patients.");
            }
            for patient in patients {
                println!("  {:<14} {}", patient.id, patient.picker_label());
            }
        }
        PatientsAction::Show { id } => {
            screen.load().await?;
            let Some(patient) = screen.find(&id).await else {
                bail!("patient {} not found", id);
            };
            println!("{}", patient.full_name());
            super::field("Id", &patient.id);
            super::field("Known as", patient.known_as.as_deref().unwrap_or(""));
            super::field("Phone", patient.phone.as_deref().unwrap_or(""));
            super::field("Email", patient.email.as_deref().unwrap_or(""));
            super::field("Address", patient.address.as_deref().unwrap_or(""));
        }
        PatientsAction::Add(args) => {
            let mut form = PatientForm::default();
            args.apply(&mut form);
            let patient = screen.create(&form).await?;
            println!("Patient {} registered.", patient.id);
        }
        PatientsAction::Edit(args) => {
            screen.load().await?;
            let Some(existing) = screen.find(args.id.trim()).await else {
                bail!("patient {} not found", args.id);
            };
            let mut form = PatientForm::from_patient(&existing);
            args.apply(&mut form);
            let patient = screen.update(&form).await?;
            println!("Patient {} updated.", patient.id);
        }
        PatientsAction::Delete { id } => {
            screen.delete(&id).await?;
            println!("Patient {} deleted.", id);
        }
    }
    Ok(())
}
