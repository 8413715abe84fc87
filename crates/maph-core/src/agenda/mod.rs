//! Agenda (appointment scheduling) domain module.
//!
//! # Module Structure
//!
//! - `model`: Calendar days, hour slots, appointments and their `Event` projection
//! - `state`: Synchronous agenda state (selection, event index, draft, phase)
//!
//! The async orchestration against the backend lives in
//! `maph_application::agenda::AgendaViewModel`.

mod model;
mod state;

// Re-export public API
pub use model::{AppointmentDraft, AppointmentRecord, CalendarDay, Event, HourSlot, NewAppointment};
pub use state::{AgendaPhase, AgendaState, DayEvents};
