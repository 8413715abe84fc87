//! Agenda view model.
//!
//! Drives an [`AgendaState`] through `Idle → Loading → Ready` and
//! `Ready → Submitting → Ready` against the `/diary` resource. Responses
//! that arrive after [`AgendaViewModel::unmount`] are dropped without
//! touching state.

use crate::guard::SubmitGuard;
use maph_core::agenda::{
    AgendaPhase, AgendaState, AppointmentDraft, AppointmentRecord, CalendarDay, DayEvents, Event,
};
use maph_core::patient::Patient;
use maph_core::resource::{ApiError, Resource, ResourceClient, decode_records};
use maph_core::session::Session;
use maph_core::{MaphError, Result};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;

const FETCH_FAILED: &str = "Could not load the agenda.";
const PATIENTS_FAILED: &str = "Could not load the patient list.";
const CREATE_FAILED: &str = "Could not create the appointment.";
const DELETE_FAILED: &str = "Could not delete the appointment.";

pub struct AgendaViewModel {
    client: Arc<dyn ResourceClient>,
    state: RwLock<AgendaState>,
    guard: SubmitGuard,
    mounted: AtomicBool,
}

impl AgendaViewModel {
    pub fn new(client: Arc<dyn ResourceClient>, session: Session) -> Self {
        Self {
            client,
            state: RwLock::new(AgendaState::new(session)),
            guard: SubmitGuard::new(),
            mounted: AtomicBool::new(true),
        }
    }

    /// Initial fetch of events and the patient picker.
    ///
    /// Both requests are issued; the first failure is returned.
    pub async fn mount(&self) -> Result<()> {
        let events = self.load_events().await;
        let patients = self.load_patients().await;
        events.and(patients)
    }

    /// Marks the screen as gone. In-flight responses will be ignored.
    pub fn unmount(&self) {
        self.mounted.store(false, Ordering::Release);
        tracing::debug!("Agenda unmounted");
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted.load(Ordering::Acquire)
    }

    /// Runs `f` against the current state.
    pub async fn read<R>(&self, f: impl FnOnce(&AgendaState) -> R) -> R {
        f(&*self.state.read().await)
    }

    pub async fn snapshot(&self) -> AgendaState {
        self.state.read().await.clone()
    }

    pub async fn phase(&self) -> AgendaPhase {
        self.state.read().await.phase()
    }

    /// Fetches `/diary` and replaces the event list.
    ///
    /// On failure the previous events are kept.
    pub async fn load_events(&self) -> Result<()> {
        self.transition(AgendaPhase::Loading).await;

        let result = self
            .client
            .list(Resource::Diary)
            .await
            .and_then(project_events);

        if !self.is_mounted() {
            tracing::debug!("Dropping agenda response after unmount");
            return Ok(());
        }

        let mut state = self.state.write().await;
        if state.phase() == AgendaPhase::Loading {
            state.set_phase(AgendaPhase::Ready);
        }

        match result {
            Ok(events) => {
                tracing::info!("Loaded {} appointments", events.len());
                state.replace_events(events);
                Ok(())
            }
            Err(e) => {
                tracing::error!("Failed to load appointments: {}", e);
                Err(MaphError::fetch(&e, FETCH_FAILED))
            }
        }
    }

    /// Fetches `/patient` for the appointment patient picker.
    pub async fn load_patients(&self) -> Result<()> {
        let result = self
            .client
            .list(Resource::Patients)
            .await
            .and_then(decode_records::<Patient>);

        if !self.is_mounted() {
            return Ok(());
        }

        match result {
            Ok(patients) => {
                tracing::debug!("Loaded {} patients", patients.len());
                self.state.write().await.replace_patients(patients);
                Ok(())
            }
            Err(e) => {
                tracing::error!("Failed to load patients: {}", e);
                Err(MaphError::fetch(&e, PATIENTS_FAILED))
            }
        }
    }

    /// Selects a calendar day. No network.
    pub async fn select_date(&self, day: CalendarDay) {
        self.state.write().await.select_date(day);
    }

    /// Events on the selected day, in backend order.
    pub async fn events_for_selected_date(&self) -> Vec<Event> {
        self.state
            .read()
            .await
            .events_for_selected_date()
            .cloned()
            .collect()
    }

    /// Runs `f` over the selected day's events without copying them.
    ///
    /// Unlike [`Self::events_for_selected_date`], `f` can ask
    /// [`DayEvents::is_date_selected`] to tell "no day picked" from
    /// "nothing booked that day".
    pub async fn with_day_events<R>(&self, f: impl FnOnce(DayEvents<'_>) -> R) -> R {
        f(self.state.read().await.events_for_selected_date())
    }

    /// Edits the appointment draft in place.
    pub async fn edit_draft<R>(&self, f: impl FnOnce(&mut AppointmentDraft) -> R) -> R {
        f(self.state.write().await.draft_mut())
    }

    /// Submits the draft as a new appointment.
    ///
    /// Validation failures make no request. On success the draft is cleared
    /// (keeping the selected day) and the events are reloaded; on failure the
    /// draft is left as entered.
    pub async fn create_appointment(&self) -> Result<()> {
        let _ticket = self.guard.try_begin()?;

        let payload = {
            let state = self.state.read().await;
            state.draft().validate()?
        };
        let body = serde_json::to_value(&payload)?;

        self.transition(AgendaPhase::Submitting).await;
        tracing::debug!(
            "Creating appointment for patient {} on {}",
            payload.patient_id,
            payload.date
        );
        let result = self.client.create(Resource::Diary, body).await;

        if !self.is_mounted() {
            return Ok(());
        }

        match result {
            Ok(_) => {
                tracing::info!("Appointment created on {}", payload.date);
                self.state.write().await.reset_draft();
                self.reload_after_submit().await
            }
            Err(e) => {
                tracing::error!("Failed to create appointment: {}", e);
                self.transition(AgendaPhase::Ready).await;
                Err(MaphError::create(&e, CREATE_FAILED))
            }
        }
    }

    /// Deletes an appointment by id, then reloads. Events are untouched on failure.
    pub async fn delete_appointment(&self, id: &str) -> Result<()> {
        let _ticket = self.guard.try_begin()?;

        self.transition(AgendaPhase::Submitting).await;
        let result = self.client.delete(Resource::Diary, id).await;

        if !self.is_mounted() {
            return Ok(());
        }

        match result {
            Ok(()) => {
                tracing::info!("Appointment {} deleted", id);
                self.reload_after_submit().await
            }
            Err(e) => {
                tracing::error!("Failed to delete appointment {}: {}", id, e);
                self.transition(AgendaPhase::Ready).await;
                Err(MaphError::delete(&e, DELETE_FAILED))
            }
        }
    }

    async fn reload_after_submit(&self) -> Result<()> {
        let reloaded = self.load_events().await;
        self.transition(AgendaPhase::Ready).await;
        reloaded
    }

    /// Applies a phase change if it is legal from the current phase.
    ///
    /// `Loading` never overrides `Submitting`; a reload issued during a
    /// submission keeps the screen in `Submitting` until it finishes.
    async fn transition(&self, next: AgendaPhase) {
        if !self.is_mounted() {
            return;
        }
        let mut state = self.state.write().await;
        let current = state.phase();
        let allowed = match next {
            AgendaPhase::Loading => current != AgendaPhase::Submitting,
            _ => true,
        };
        if allowed && current != next {
            tracing::trace!("Agenda phase {:?} -> {:?}", current, next);
            state.set_phase(next);
        }
    }
}

fn project_events(records: Vec<serde_json::Value>) -> std::result::Result<Vec<Event>, ApiError> {
    decode_records::<AppointmentRecord>(records)?
        .iter()
        .map(Event::from_record)
        .collect()
}
