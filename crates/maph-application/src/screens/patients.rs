//! Patient list and create/edit/delete.

use crate::guard::SubmitGuard;
use maph_core::patient::{Patient, PatientForm};
use maph_core::resource::{Resource, ResourceClient, decode_records};
use maph_core::{MaphError, Result};
use std::sync::Arc;
use tokio::sync::RwLock;

pub struct PatientsScreen {
    client: Arc<dyn ResourceClient>,
    patients: RwLock<Vec<Patient>>,
    guard: SubmitGuard,
}

impl PatientsScreen {
    pub fn new(client: Arc<dyn ResourceClient>) -> Self {
        Self {
            client,
            patients: RwLock::new(Vec::new()),
            guard: SubmitGuard::new(),
        }
    }

    /// Patients from the last successful load.
    pub async fn patients(&self) -> Vec<Patient> {
        self.patients.read().await.clone()
    }

    pub async fn find(&self, id: &str) -> Option<Patient> {
        self.patients.read().await.iter().find(|p| p.id == id).cloned()
    }

    /// Reloads the list. On failure the previous list is kept.
    pub async fn load(&self) -> Result<Vec<Patient>> {
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

    pub async fn create(&self, form: &PatientForm) -> Result<Patient> {
        let _ticket = self.guard.try_begin()?;
        let patient = form.validate()?;

        self.client
            .create(Resource::Patients, serde_json::to_value(&patient)?)
            .await
            .map_err(|e| MaphError::create(&e, "Could not create the patient."))?;

        tracing::info!("Patient {} created", patient.id);
        self.refresh().await;
        Ok(patient)
    }

    /// Saves an edited patient. The id travels in the body.
    pub async fn update(&self, form: &PatientForm) -> Result<Patient> {
        let _ticket = self.guard.try_begin()?;
        let patient = form.validate()?;

        self.client
            .update(Resource::Patients, None, serde_json::to_value(&patient)?)
            .await
            .map_err(|e| MaphError::update(&e, "Could not update the patient."))?;

        tracing::info!("Patient {} updated", patient.id);
        self.refresh().await;
        Ok(patient)
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        let _ticket = self.guard.try_begin()?;

        self.client
            .delete(Resource::Patients, id)
            .await
            .map_err(|e| MaphError::delete(&e, "Could not delete the patient."))?;

        tracing::info!("Patient {} deleted", id);
        self.refresh().await;
        Ok(())
    }

    /// Post-mutation reload; a failure here does not undo the mutation.
    async fn refresh(&self) {
        if let Err(e) = self.load().await {
            tracing::warn!("Patient list refresh failed: {}", e);
        }
    }
}
