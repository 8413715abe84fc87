//! Synchronous agenda state.
//!
//! `AgendaState` holds everything the agenda screen renders. It performs no
//! I/O; the view model feeds it fetch results and drives phase changes.

use super::model::{AppointmentDraft, CalendarDay, Event};
use crate::patient::Patient;
use crate::session::Session;
use std::collections::BTreeSet;
use std::slice;

/// Lifecycle of one agenda screen instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AgendaPhase {
    /// Mounted, nothing fetched yet
    #[default]
    Idle,
    /// Fetching events
    Loading,
    /// Interactive
    Ready,
    /// A create or delete is in flight
    Submitting,
}

#[derive(Debug, Clone)]
pub struct AgendaState {
    phase: AgendaPhase,
    selected_date: Option<CalendarDay>,
    events: Vec<Event>,
    patients: Vec<Patient>,
    draft: AppointmentDraft,
    session: Session,
}

impl AgendaState {
    pub fn new(session: Session) -> Self {
        Self {
            phase: AgendaPhase::Idle,
            selected_date: None,
            events: Vec::new(),
            patients: Vec::new(),
            draft: AppointmentDraft::seeded(&session),
            session,
        }
    }

    pub fn phase(&self) -> AgendaPhase {
        self.phase
    }

    pub fn set_phase(&mut self, phase: AgendaPhase) {
        self.phase = phase;
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn selected_date(&self) -> Option<CalendarDay> {
        self.selected_date
    }

    /// All events, in the order the backend returned them.
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn patients(&self) -> &[Patient] {
        &self.patients
    }

    pub fn draft(&self) -> &AppointmentDraft {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut AppointmentDraft {
        &mut self.draft
    }

    /// Selects a day and seeds the draft's date with it.
    pub fn select_date(&mut self, day: CalendarDay) {
        self.selected_date = Some(day);
        self.draft.date = Some(day);
    }

    /// Events on the selected day, in `events` order.
    pub fn events_for_selected_date(&self) -> DayEvents<'_> {
        DayEvents {
            day: self.selected_date,
            inner: self.events.iter(),
        }
    }

    /// Days that have at least one event, for calendar markers.
    pub fn marked_days(&self) -> BTreeSet<CalendarDay> {
        self.events.iter().map(|e| e.date).collect()
    }

    pub fn replace_events(&mut self, events: Vec<Event>) {
        self.events = events;
    }

    pub fn replace_patients(&mut self, patients: Vec<Patient>) {
        self.patients = patients;
    }

    /// Clears user-entered draft fields. The date is re-seeded from the
    /// current selection.
    pub fn reset_draft(&mut self) {
        self.draft = AppointmentDraft::seeded(&self.session);
        self.draft.date = self.selected_date;
    }
}

/// Lazy, restartable view over the events of the selected day.
///
/// Clone it to iterate again. Yields nothing when no date is selected;
/// [`DayEvents::is_date_selected`] lets the view tell that case apart from
/// "a date with no events".
#[derive(Debug, Clone)]
pub struct DayEvents<'a> {
    day: Option<CalendarDay>,
    inner: slice::Iter<'a, Event>,
}

impl DayEvents<'_> {
    pub fn is_date_selected(&self) -> bool {
        self.day.is_some()
    }

    pub fn day(&self) -> Option<CalendarDay> {
        self.day
    }
}

impl<'a> Iterator for DayEvents<'a> {
    type Item = &'a Event;

    fn next(&mut self) -> Option<Self::Item> {
        let day = self.day?;
        self.inner.by_ref().find(|event| event.date == day)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::SessionUser;

    fn session() -> Session {
        Session::new(
            SessionUser {
                user_id: "101".into(),
                company_id: "7".into(),
                first_name: "Ana".into(),
                last_names: "Mora".into(),
                role: None,
                phone: None,
                email: None,
            },
            "token",
        )
    }

    fn event(id: &str, date: &str) -> Event {
        Event {
            id: id.into(),
            date: date.parse().unwrap(),
            title: format!("Ana - patient {}", id),
            time: "8:00 - 9:00".into(),
        }
    }

    #[test]
    fn test_no_selection_yields_nothing() {
        let mut state = AgendaState::new(session());
        state.replace_events(vec![event("1", "2024-06-01")]);

        let day_events = state.events_for_selected_date();
        assert!(!day_events.is_date_selected());
        assert_eq!(day_events.count(), 0);
    }

    #[test]
    fn test_selected_day_filter_preserves_order() {
        let mut state = AgendaState::new(session());
        state.replace_events(vec![
            event("3", "2024-06-01"),
            event("1", "2024-06-02"),
            event("2", "2024-06-01"),
        ]);
        state.select_date("2024-06-01".parse().unwrap());

        let ids: Vec<&str> = state
            .events_for_selected_date()
            .map(|e| e.id.as_str())
            .collect();
        assert_eq!(ids, vec!["3", "2"]);
    }

    #[test]
    fn test_day_events_is_restartable() {
        let mut state = AgendaState::new(session());
        state.replace_events(vec![event("1", "2024-06-01"), event("2", "2024-06-01")]);
        state.select_date("2024-06-01".parse().unwrap());

        let day_events = state.events_for_selected_date();
        assert_eq!(day_events.clone().count(), 2);
        assert_eq!(day_events.count(), 2);
    }

    #[test]
    fn test_selected_day_without_events() {
        let mut state = AgendaState::new(session());
        state.replace_events(vec![event("1", "2024-06-01")]);
        state.select_date("2024-07-01".parse().unwrap());

        let day_events = state.events_for_selected_date();
        assert!(day_events.is_date_selected());
        assert_eq!(day_events.count(), 0);
    }

    #[test]
    fn test_select_date_seeds_draft() {
        let mut state = AgendaState::new(session());
        let day = "2024-06-01".parse().unwrap();
        state.select_date(day);
        assert_eq!(state.draft().date, Some(day));
        assert_eq!(state.draft().company_id, "7");
        assert_eq!(state.draft().staff_user_id, "101");
    }

    #[test]
    fn test_reset_draft_keeps_selected_day() {
        let mut state = AgendaState::new(session());
        let day = "2024-06-01".parse().unwrap();
        state.select_date(day);
        state.draft_mut().patient_id = Some("202".into());

        state.reset_draft();
        assert!(state.draft().patient_id.is_none());
        assert_eq!(state.draft().date, Some(day));
    }

    #[test]
    fn test_marked_days() {
        let mut state = AgendaState::new(session());
        state.replace_events(vec![
            event("1", "2024-06-02"),
            event("2", "2024-06-01"),
            event("3", "2024-06-02"),
        ]);
        let days: Vec<String> = state.marked_days().iter().map(|d| d.to_string()).collect();
        assert_eq!(days, vec!["2024-06-01", "2024-06-02"]);
    }
}
