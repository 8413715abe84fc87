use crate::app::App;
use anyhow::Result;
use clap::{Args, Subcommand};
use maph_application::Route;
use maph_application::screens::ConsultationScreen;
use maph_core::consultation::{ConsultationField, ConsultationMode};

#[derive(Subcommand)]
pub enum ConsultationAction {
    /// Show the open consultation, if any
    Show,
    /// Change fields of the open consultation and save
    Edit(ConsultationArgs),
    /// Close out the open consultation
    Finalize,
    /// Start a new consultation
    Create(ConsultationArgs),
}

#[derive(Args)]
pub struct ConsultationArgs {
    /// Patient id
    #[arg(long)]
    patient: Option<String>,
    /// Consultation type
    #[arg(long = "type")]
    kind: Option<String>,
    #[arg(long)]
    assessment: Option<String>,
    #[arg(long)]
    blood_pressure: Option<String>,
    #[arg(long)]
    heart_rate: Option<String>,
    #[arg(long)]
    oxygen_saturation: Option<String>,
    #[arg(long)]
    glycemia: Option<String>,
    #[arg(long)]
    respiratory_rate: Option<String>,
    #[arg(long)]
    treatment_plan: Option<String>,
    /// YYYY-MM-DD
    #[arg(long)]
    date: Option<String>,
    #[arg(long)]
    amount: Option<String>,
}

impl ConsultationArgs {
    fn fields(&self) -> impl Iterator<Item = (ConsultationField, &str)> {
        [
            (ConsultationField::PatientId, &self.patient),
            (ConsultationField::Kind, &self.kind),
            (ConsultationField::Assessment, &self.assessment),
            (ConsultationField::BloodPressure, &self.blood_pressure),
            (ConsultationField::HeartRate, &self.heart_rate),
            (ConsultationField::OxygenSaturation, &self.oxygen_saturation),
            (ConsultationField::Glycemia, &self.glycemia),
            (ConsultationField::RespiratoryRate, &self.respiratory_rate),
            (ConsultationField::TreatmentPlan, &self.treatment_plan),
            (ConsultationField::Date, &self.date),
            (ConsultationField::Amount, &self.amount),
        ]
        .into_iter()
        .filter_map(|(field, value)| value.as_deref().map(|v| (field, v)))
    }
}

pub async fn run(app: &App, action: ConsultationAction) -> Result<()> {
    let session = app.open(Route::Consultation).await?;
    let screen = ConsultationScreen::new(
        app.resources(),
        session,
        app.config.consultation_save_failure,
    );
    let mode = screen.fetch().await?;

    match action {
        ConsultationAction::Show => show(&screen, mode).await,
        ConsultationAction::Edit(args) => {
            screen.toggle_edit().await?;
            for (field, value) in args.fields() {
                screen.set_field(field, value).await;
            }
            screen.save_edit().await?;
            if screen.mode().await == ConsultationMode::EditingExisting {
                println!("The consultation was not saved.");
            } else {
                println!("Consultation saved.");
            }
        }
        ConsultationAction::Finalize => {
            screen.finalize().await?;
            println!("Consultation finalized.");
        }
        ConsultationAction::Create(args) => {
            for (field, value) in args.fields() {
                screen.set_field(field, value).await;
            }
            screen.create().await?;
            println!("Consultation created.");
        }
    }
    Ok(())
}

async fn show(screen: &ConsultationScreen, mode: ConsultationMode) {
    if mode == ConsultationMode::CreatingNew {
        println!("No open consultation.");
        return;
    }

    let form = screen.form().await;
    println!("Consultation #{}", form.id_consulta);
    super::field("Patient", &form.id_cedula);
    super::field("Type", &form.tipoconsulta);
    super::field("Date", &form.fecha_consulta);
    super::field("Assessment", &form.valoracion);
    super::field("Blood pressure", &form.presion_arterial);
    super::field("Heart rate", &form.frecuencia_cardiaca);
    super::field("O2 saturation", &form.saturacion_oxigeno);
    super::field("Glycemia", &form.glicemia);
    super::field("Respiratory rate", &form.frecuencia_respiratoria);
    super::field("Treatment plan", &form.plan_tratamiento);
    super::field("Amount", &form.monto_consulta);
}
