//! Patient file upload screen.

use crate::guard::SubmitGuard;
use maph_core::files::{Attachment, FileUploadForm};
use maph_core::patient::Patient;
use maph_core::resource::{Resource, ResourceClient, decode_records};
use maph_core::session::Session;
use maph_core::{MaphError, Result};
use std::sync::Arc;
use tokio::sync::RwLock;

pub struct FileUploadScreen {
    client: Arc<dyn ResourceClient>,
    session: Session,
    form: RwLock<FileUploadForm>,
    patients: RwLock<Vec<Patient>>,
    guard: SubmitGuard,
}

impl FileUploadScreen {
    pub fn new(client: Arc<dyn ResourceClient>, session: Session) -> Self {
        Self {
            client,
            session,
            form: RwLock::new(FileUploadForm::default()),
            patients: RwLock::new(Vec::new()),
            guard: SubmitGuard::new(),
        }
    }

    pub async fn load_patients(&self) -> Result<Vec<Patient>> {
        let patients = self
            .client
            .list(Resource::Patients)
            .await
            .and_then(decode_records::<Patient>)
            .map_err(|e| {
                tracing::error!("Failed to load patients: {}", e);
                MaphError::fetch(&e, "Could not load the patient list.")
            })?;
        *self.patients.write().await = patients.clone();
        Ok(patients)
    }

    pub async fn patients(&self) -> Vec<Patient> {
        self.patients.read().await.clone()
    }

    pub async fn form(&self) -> FileUploadForm {
        self.form.read().await.clone()
    }

    pub async fn edit<R>(&self, f: impl FnOnce(&mut FileUploadForm) -> R) -> R {
        f(&mut *self.form.write().await)
    }

    /// Places an image in slot `1..=3`.
    pub async fn attach(&self, slot: usize, attachment: Attachment) -> Result<()> {
        if self.form.write().await.set_image(slot, attachment) {
            Ok(())
        } else {
            Err(MaphError::invalid_state(format!("there is no image slot {}", slot)))
        }
    }

    /// Uploads the form as multipart data and clears it on success.
    pub async fn submit(&self) -> Result<()> {
        let _ticket = self.guard.try_begin()?;

        let submission = self.form.read().await.validate(self.session.company_id())?;
        let file_count = submission.files.len();

        self.client
            .upload(Resource::FileUpload, submission.files, submission.fields)
            .await
            .map_err(|e| {
                tracing::error!("File upload failed: {}", e);
                MaphError::upload(&e, "Could not upload the files.")
            })?;

        tracing::info!("Uploaded {} file(s)", file_count);
        self.form.write().await.reset();
        Ok(())
    }
}
