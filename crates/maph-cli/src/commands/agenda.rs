use crate::app::App;
use anyhow::{Result, anyhow};
use clap::Subcommand;
use maph_application::{AgendaViewModel, Route};
use maph_core::agenda::{CalendarDay, HourSlot};

#[derive(Subcommand)]
pub enum AgendaAction {
    /// Show the days with appointments, or the appointments of one day
    List {
        /// Day to show (YYYY-MM-DD)
        #[arg(long)]
        date: Option<CalendarDay>,
    },
    /// Book an appointment
    Create {
        /// Day of the appointment (YYYY-MM-DD)
        #[arg(long)]
        date: CalendarDay,
        /// Patient id
        #[arg(long)]
        patient: String,
        /// Start hour, 0-23
        #[arg(long)]
        start: u8,
        /// End hour, 0-23
        #[arg(long)]
        end: u8,
    },
    /// Cancel an appointment by its number
    Delete { id: String },
}

pub async fn run(app: &App, action: AgendaAction) -> Result<()> {
    let session = app.open(Route::Agenda).await?;
    let agenda = AgendaViewModel::new(app.resources(), session);
    agenda.mount().await?;

    let outcome = match action {
        AgendaAction::List { date: Some(day) } => list_day(&agenda, day).await,
        AgendaAction::List { date: None } => {
            let days = agenda.read(|s| s.marked_days()).await;
            if days.is_empty() {
                println!("No appointments.");
            }
            for day in days {
                println!("  {}", day);
            }
            Ok(())
        }
        AgendaAction::Create {
            date,
            patient,
            start,
            end,
        } => create(&agenda, date, patient, start, end).await,
        AgendaAction::Delete { id } => {
            agenda.delete_appointment(&id).await?;
            println!("Appointment {} deleted.", id);
            Ok(())
        }
    };

    agenda.unmount();
    outcome
}

async fn list_day(agenda: &AgendaViewModel, day: CalendarDay) -> Result<()> {
    agenda.select_date(day).await;
    let lines = agenda
        .with_day_events(|events| {
            events.is_date_selected().then(|| {
                events
                    .map(|e| format!("  #{:<6} {:<13} {}", e.id, e.time, e.title))
                    .collect::<Vec<_>>()
            })
        })
        .await
        .ok_or_else(|| anyhow!("no day selected"))?;

    if lines.is_empty() {
        println!("No appointments on {}.", day);
    }
    for line in lines {
        println!("{}", line);
    }
    Ok(())
}

async fn create(
    agenda: &AgendaViewModel,
    date: CalendarDay,
    patient: String,
    start: u8,
    end: u8,
) -> Result<()> {
    let start = HourSlot::new(start).ok_or_else(|| anyhow!("start hour must be 0-23"))?;
    let end = HourSlot::new(end).ok_or_else(|| anyhow!("end hour must be 0-23"))?;

    let known = agenda
        .read(|s| s.patients().iter().any(|p| p.id == patient))
        .await;
    if !known {
        tracing::warn!("Patient {} is not in the patient list", patient);
    }

    agenda.select_date(date).await;
    agenda
        .edit_draft(|draft| {
            draft.patient_id = Some(patient);
            draft.start_hour = Some(start);
            draft.end_hour = Some(end);
        })
        .await;
    agenda.create_appointment().await?;

    println!("Appointment booked on {} from {} to {}.", date, start, end);
    Ok(())
}
