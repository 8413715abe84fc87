//! Consultation screen.
//!
//! The screen is in exactly one of three modes. A fetch that finds a record
//! shows it read-only (`ViewExisting`); the user may switch to
//! `EditingExisting` and save, or finalize it, which returns the screen to
//! `CreatingNew`.

use crate::guard::SubmitGuard;
use maph_core::consultation::{
    ConsultationField, ConsultationForm, ConsultationMode, ConsultationRecord,
    FinalizeConsultation, SaveFailurePolicy,
};
use maph_core::patient::Patient;
use maph_core::resource::{Resource, ResourceClient, decode_records};
use maph_core::session::Session;
use maph_core::{MaphError, Result};
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Debug, Clone)]
struct ConsultationState {
    mode: ConsultationMode,
    form: ConsultationForm,
}

impl Default for ConsultationState {
    fn default() -> Self {
        Self {
            mode: ConsultationMode::CreatingNew,
            form: ConsultationForm::default(),
        }
    }
}

pub struct ConsultationScreen {
    client: Arc<dyn ResourceClient>,
    session: Session,
    save_failure: SaveFailurePolicy,
    state: RwLock<ConsultationState>,
    patients: RwLock<Vec<Patient>>,
    guard: SubmitGuard,
}

impl ConsultationScreen {
    pub fn new(
        client: Arc<dyn ResourceClient>,
        session: Session,
        save_failure: SaveFailurePolicy,
    ) -> Self {
        Self {
            client,
            session,
            save_failure,
            state: RwLock::new(ConsultationState::default()),
            patients: RwLock::new(Vec::new()),
            guard: SubmitGuard::new(),
        }
    }

    pub async fn mode(&self) -> ConsultationMode {
        self.state.read().await.mode
    }

    pub async fn form(&self) -> ConsultationForm {
        self.state.read().await.form.clone()
    }

    pub async fn patients(&self) -> Vec<Patient> {
        self.patients.read().await.clone()
    }

    /// Loads the first consultation, if any, and picks the mode from it.
    ///
    /// An envelope rejection (the backend answered, but not with code 200)
    /// means there is no record. Transport and HTTP failures are errors.
    pub async fn fetch(&self) -> Result<ConsultationMode> {
        let records = match self
            .client
            .list(Resource::Consultations)
            .await
            .and_then(decode_records::<ConsultationRecord>)
        {
            Ok(records) => records,
            Err(e) if e.is_rejected() => {
                tracing::debug!("No consultation on record: {}", e);
                Vec::new()
            }
            Err(e) => {
                tracing::error!("Failed to load consultation: {}", e);
                return Err(MaphError::fetch(&e, "Could not load the consultation."));
            }
        };

        let mut state = self.state.write().await;
        state.form = records
            .first()
            .map(ConsultationForm::from_record)
            .unwrap_or_default();
        state.mode = ConsultationMode::after_fetch(!records.is_empty());

        tracing::debug!("Consultation mode after fetch: {:?}", state.mode);
        Ok(state.mode)
    }

    /// Patient picker source for the create form.
    pub async fn load_patients(&self) -> Result<()> {
        let patients = self
            .client
            .list(Resource::Patients)
            .await
            .and_then(decode_records::<Patient>)
            .map_err(|e| MaphError::fetch(&e, "Could not load the patient list."))?;
        *self.patients.write().await = patients;
        Ok(())
    }

    /// Switches between viewing and editing an existing record.
    pub async fn toggle_edit(&self) -> Result<ConsultationMode> {
        let mut state = self.state.write().await;
        state.mode = match state.mode {
            ConsultationMode::ViewExisting => ConsultationMode::EditingExisting,
            ConsultationMode::EditingExisting => ConsultationMode::ViewExisting,
            ConsultationMode::CreatingNew => {
                return Err(MaphError::invalid_state("there is no consultation to edit"));
            }
        };
        Ok(state.mode)
    }

    /// Changes a field. Read-only in `ViewExisting`, where it returns `false`.
    pub async fn set_field(&self, field: ConsultationField, value: &str) -> bool {
        let mut state = self.state.write().await;
        if state.mode == ConsultationMode::ViewExisting {
            return false;
        }
        state.form.set(field, value);
        true
    }

    /// Saves the edited record (`PATCH /consultation`).
    ///
    /// With [`SaveFailurePolicy::Suppress`] a failed save is only logged and
    /// the screen stays in edit mode.
    pub async fn save_edit(&self) -> Result<()> {
        let _ticket = self.guard.try_begin()?;

        let payload = {
            let state = self.state.read().await;
            if state.mode != ConsultationMode::EditingExisting {
                return Err(MaphError::invalid_state("the consultation is not being edited"));
            }
            state.form.validate_update(self.session.company_id())?
        };

        let result = self
            .client
            .update(Resource::Consultations, None, serde_json::to_value(&payload)?)
            .await;

        match result {
            Ok(_) => {
                tracing::info!("Consultation {} saved", payload.id_consulta);
                self.state.write().await.mode = ConsultationMode::ViewExisting;
                Ok(())
            }
            Err(e) => match self.save_failure {
                SaveFailurePolicy::Report => {
                    tracing::error!("Failed to save consultation {}: {}", payload.id_consulta, e);
                    Err(MaphError::update(&e, "Could not save the consultation."))
                }
                SaveFailurePolicy::Suppress => {
                    tracing::warn!(
                        "Suppressed consultation save failure for {}: {}",
                        payload.id_consulta,
                        e
                    );
                    Ok(())
                }
            },
        }
    }

    /// Closes out the current record and resets to an empty create form.
    pub async fn finalize(&self) -> Result<()> {
        let _ticket = self.guard.try_begin()?;

        let id = {
            let state = self.state.read().await;
            if state.mode == ConsultationMode::CreatingNew || !state.form.has_record() {
                return Err(MaphError::invalid_state("there is no consultation to finalize"));
            }
            state.form.id_consulta.trim().to_string()
        };

        self.client
            .update(
                Resource::Consultations,
                Some(&id),
                serde_json::to_value(FinalizeConsultation::default())?,
            )
            .await
            .map_err(|e| {
                tracing::error!("Failed to finalize consultation {}: {}", id, e);
                MaphError::update(&e, "Could not finalize the consultation.")
            })?;

        tracing::info!("Consultation {} finalized", id);
        *self.state.write().await = ConsultationState::default();
        Ok(())
    }

    /// Creates a consultation from the form, then fetches again.
    pub async fn create(&self) -> Result<ConsultationMode> {
        let _ticket = self.guard.try_begin()?;

        let payload = {
            let state = self.state.read().await;
            if state.mode != ConsultationMode::CreatingNew {
                return Err(MaphError::invalid_state("a consultation is already open"));
            }
            state.form.validate_create(self.session.company_id())?
        };

        self.client
            .create(Resource::Consultations, serde_json::to_value(&payload)?)
            .await
            .map_err(|e| {
                tracing::error!("Failed to create consultation: {}", e);
                MaphError::create(&e, "Could not create the consultation. Try again.")
            })?;

        tracing::info!("Consultation created for patient {}", payload.id_cedula);
        self.fetch().await
    }

    /// Discards whatever was typed into the create form.
    pub async fn cancel_create(&self) {
        let mut state = self.state.write().await;
        if state.mode == ConsultationMode::CreatingNew {
            state.form = ConsultationForm::default();
        }
    }
}
