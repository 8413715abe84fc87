//! Appointment and event models.

use crate::error::ValidationError;
use crate::resource::ApiError;
use crate::session::Session;
use crate::wire::{null_as_empty, opt_string_or_number, string_or_number};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

const DAY_FORMAT: &str = "%Y-%m-%d";

/// A calendar day with no time-of-day and no timezone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CalendarDay(NaiveDate);

impl CalendarDay {
    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    /// Parses the date portion of a combined date-time string such as
    /// `2024-06-01T00:00:00.000Z`, discarding everything after the `T`.
    pub fn from_date_time(value: &str) -> Result<Self, chrono::ParseError> {
        let date_part = value.split('T').next().unwrap_or(value);
        date_part.trim().parse()
    }

    pub fn as_naive(&self) -> NaiveDate {
        self.0
    }
}

impl FromStr for CalendarDay {
    type Err = chrono::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaiveDate::parse_from_str(s, DAY_FORMAT).map(Self)
    }
}

impl fmt::Display for CalendarDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(DAY_FORMAT))
    }
}

impl Serialize for CalendarDay {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A whole-hour slot in `0..=23`, rendered as `H:00`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HourSlot(u8);

impl HourSlot {
    pub const LAST: u8 = 23;

    pub fn new(hour: u8) -> Option<Self> {
        (hour <= Self::LAST).then_some(Self(hour))
    }

    pub fn hour(&self) -> u8 {
        self.0
    }

    /// Every selectable slot, in order.
    pub fn all() -> impl Iterator<Item = HourSlot> {
        (0..=Self::LAST).map(HourSlot)
    }
}

impl fmt::Display for HourSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:00", self.0)
    }
}

impl FromStr for HourSlot {
    type Err = ValidationError;

    /// Accepts `9`, `9:00`, `09:00` and `09:00:00`. Minutes must be zero.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ValidationError::malformed("hour", format!("'{}' is not a whole hour", s));
        let mut parts = s.trim().split(':');
        let hour: u8 = parts
            .next()
            .and_then(|h| h.parse().ok())
            .ok_or_else(invalid)?;
        if parts.any(|rest| rest.parse::<u8>().map(|m| m != 0).unwrap_or(true)) {
            return Err(invalid());
        }
        HourSlot::new(hour).ok_or_else(invalid)
    }
}

impl Serialize for HourSlot {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// An appointment as listed by `GET /diary`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AppointmentRecord {
    #[serde(rename = "numero_cita", deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(rename = "id_empresa", default, deserialize_with = "opt_string_or_number")]
    pub company_id: Option<String>,
    #[serde(rename = "id_cedula_usuario", default, deserialize_with = "opt_string_or_number")]
    pub staff_user_id: Option<String>,
    #[serde(rename = "id_cedula_paciente", default, deserialize_with = "opt_string_or_number")]
    pub patient_id: Option<String>,
    /// Combined date-time string, e.g. `2024-06-01T00:00:00.000Z`
    #[serde(rename = "fecha")]
    pub date: String,
    #[serde(rename = "hora_inicio", deserialize_with = "string_or_number")]
    pub start_hour: String,
    #[serde(rename = "hora_final", deserialize_with = "string_or_number")]
    pub end_hour: String,
    #[serde(rename = "nombre_usuario", default, deserialize_with = "null_as_empty")]
    pub staff_name: String,
    #[serde(rename = "nombre_paciente", default, deserialize_with = "null_as_empty")]
    pub patient_name: String,
}

/// Render-time projection of an appointment for a calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Event {
    pub id: String,
    pub date: CalendarDay,
    /// `"staff - patient"`
    pub title: String,
    /// `"start - end"`
    pub time: String,
}

impl Event {
    const SEPARATOR: &'static str = " - ";

    /// Projects a listed appointment. Fails only when the date is unreadable.
    pub fn from_record(record: &AppointmentRecord) -> Result<Self, ApiError> {
        let date = CalendarDay::from_date_time(&record.date).map_err(|e| {
            ApiError::Decode(format!(
                "appointment {} has an unreadable date '{}': {}",
                record.id, record.date, e
            ))
        })?;

        Ok(Self {
            id: record.id.clone(),
            date,
            title: format!("{}{}{}", record.staff_name, Self::SEPARATOR, record.patient_name),
            time: format!("{}{}{}", record.start_hour, Self::SEPARATOR, record.end_hour),
        })
    }

    /// Staff member part of the title.
    pub fn assignee(&self) -> &str {
        self.title
            .split_once(Self::SEPARATOR)
            .map(|(staff, _)| staff)
            .unwrap_or(&self.title)
    }

    /// Patient part of the title.
    pub fn patient(&self) -> &str {
        self.title
            .split_once(Self::SEPARATOR)
            .map(|(_, patient)| patient)
            .unwrap_or("")
    }
}

/// In-progress appointment being filled in by the user.
///
/// `company_id` and `staff_user_id` come from the session; the rest is
/// user-entered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppointmentDraft {
    pub company_id: String,
    pub staff_user_id: String,
    pub patient_id: Option<String>,
    pub date: Option<CalendarDay>,
    pub start_hour: Option<HourSlot>,
    pub end_hour: Option<HourSlot>,
}

impl AppointmentDraft {
    pub fn seeded(session: &Session) -> Self {
        Self {
            company_id: session.company_id().to_string(),
            staff_user_id: session.user_id().to_string(),
            patient_id: None,
            date: None,
            start_hour: None,
            end_hour: None,
        }
    }

    /// Checks presence of patient, date, start hour and end hour (in that order).
    ///
    /// The hour range is deliberately not checked: an end hour at or before
    /// the start hour is submitted as entered.
    pub fn validate(&self) -> Result<NewAppointment, ValidationError> {
        let patient_id = self
            .patient_id
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .ok_or_else(|| ValidationError::missing("patient"))?;
        let date = self.date.ok_or_else(|| ValidationError::missing("date"))?;
        let start_hour = self
            .start_hour
            .ok_or_else(|| ValidationError::missing("start hour"))?;
        let end_hour = self
            .end_hour
            .ok_or_else(|| ValidationError::missing("end hour"))?;

        Ok(NewAppointment {
            company_id: self.company_id.clone(),
            staff_user_id: self.staff_user_id.clone(),
            patient_id: patient_id.to_string(),
            date,
            start_hour,
            end_hour,
        })
    }
}

/// `POST /diary` payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewAppointment {
    #[serde(rename = "id_empresa")]
    pub company_id: String,
    #[serde(rename = "id_cedula_usuario")]
    pub staff_user_id: String,
    #[serde(rename = "id_cedula_paciente")]
    pub patient_id: String,
    #[serde(rename = "fecha")]
    pub date: CalendarDay,
    #[serde(rename = "hora_inicio")]
    pub start_hour: HourSlot,
    #[serde(rename = "hora_final")]
    pub end_hour: HourSlot,
}
