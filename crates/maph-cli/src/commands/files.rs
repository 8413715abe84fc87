use crate::app::App;
use anyhow::{Result, bail};
use clap::Subcommand;
use maph_application::Route;
use maph_application::screens::FileUploadScreen;
use maph_core::files::IMAGE_SLOTS;
use maph_infrastructure::attachments::load_attachment;
use std::path::PathBuf;

#[derive(Subcommand)]
pub enum FilesAction {
    /// Upload up to three images to a patient's file
    Upload {
        /// Patient id
        #[arg(long)]
        patient: String,
        /// Date of the documents; digits are masked to YYYY/MM/DD
        #[arg(long)]
        date: String,
        /// What the images contain
        #[arg(long)]
        detail: String,
        /// Image to attach; repeat for more
        #[arg(long = "image")]
        images: Vec<PathBuf>,
    },
}

pub async fn run(app: &App, action: FilesAction) -> Result<()> {
    let session = app.open(Route::Files).await?;
    let screen = FileUploadScreen::new(app.resources(), session);

    match action {
        FilesAction::Upload {
            patient,
            date,
            detail,
            images,
        } => {
            if images.len() > IMAGE_SLOTS {
                bail!("at most {} images can be uploaded at once", IMAGE_SLOTS);
            }

            screen
                .edit(|form| {
                    form.patient_id = Some(patient);
                    form.set_date(&date);
                    form.detail = detail;
                })
                .await;

            for (slot, path) in images.iter().enumerate() {
                let attachment = load_attachment(path).await?;
                screen.attach(slot + 1, attachment).await?;
            }

            screen.submit().await?;
            println!("Uploaded {} image(s).", images.len());
        }
    }
    Ok(())
}
