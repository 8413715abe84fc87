//! Consultation models.

use crate::agenda::CalendarDay;
use crate::error::ValidationError;
use crate::validation::require;
use crate::wire::{opt_string_or_number, string_or_number};
use serde::{Deserialize, Serialize};

/// Status value the backend uses for an active/closed-out consultation.
const ACTIVE_STATE: u8 = 1;

/// Amount sent when the user leaves it blank while editing.
const DEFAULT_AMOUNT: &str = "0.00";

/// A consultation as returned by `GET /consultation`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ConsultationRecord {
    #[serde(deserialize_with = "string_or_number")]
    pub id_consulta: String,
    #[serde(deserialize_with = "string_or_number")]
    pub id_cedula: String,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub id_empresa: Option<String>,
    #[serde(default)]
    pub tipoconsulta: Option<String>,
    #[serde(default)]
    pub valoracion: Option<String>,
    #[serde(default)]
    pub presion_arterial: Option<String>,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub frecuencia_cardiaca: Option<String>,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub saturacion_oxigeno: Option<String>,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub glicemia: Option<String>,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub frecuencia_respiratoria: Option<String>,
    #[serde(default)]
    pub plan_tratamiento: Option<String>,
    #[serde(default)]
    pub fecha_consulta: Option<String>,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub monto_consulta: Option<String>,
}

/// Which of the three mutually exclusive consultation views is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsultationMode {
    /// A record exists and is shown read-only
    ViewExisting,
    /// A record exists and its fields are editable
    EditingExisting,
    /// No record exists; only creation is offered
    CreatingNew,
}

impl ConsultationMode {
    /// Mode right after a fetch.
    pub fn after_fetch(found: bool) -> Self {
        if found {
            Self::ViewExisting
        } else {
            Self::CreatingNew
        }
    }
}

/// What to do when saving an edited consultation fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SaveFailurePolicy {
    /// Return the error to the caller for display
    #[default]
    Report,
    /// Log the failure and return success, keeping the screen in edit mode
    Suppress,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsultationField {
    PatientId,
    Kind,
    Assessment,
    BloodPressure,
    HeartRate,
    OxygenSaturation,
    Glycemia,
    RespiratoryRate,
    TreatmentPlan,
    Date,
    Amount,
}

/// Local form state of the consultation screen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConsultationForm {
    pub id_consulta: String,
    pub id_cedula: String,
    pub tipoconsulta: String,
    pub valoracion: String,
    pub presion_arterial: String,
    pub frecuencia_cardiaca: String,
    pub saturacion_oxigeno: String,
    pub glicemia: String,
    pub frecuencia_respiratoria: String,
    pub plan_tratamiento: String,
    /// `YYYY-MM-DD`
    pub fecha_consulta: String,
    pub monto_consulta: String,
}

impl ConsultationForm {
    pub fn from_record(record: &ConsultationRecord) -> Self {
        let text = |v: &Option<String>| v.clone().unwrap_or_default();
        let date = record
            .fecha_consulta
            .as_deref()
            .map(|d| d.split('T').next().unwrap_or(d).to_string())
            .unwrap_or_default();

        Self {
            id_consulta: record.id_consulta.clone(),
            id_cedula: record.id_cedula.clone(),
            tipoconsulta: text(&record.tipoconsulta),
            valoracion: text(&record.valoracion),
            presion_arterial: text(&record.presion_arterial),
            frecuencia_cardiaca: text(&record.frecuencia_cardiaca),
            saturacion_oxigeno: text(&record.saturacion_oxigeno),
            glicemia: text(&record.glicemia),
            frecuencia_respiratoria: text(&record.frecuencia_respiratoria),
            plan_tratamiento: text(&record.plan_tratamiento),
            fecha_consulta: date,
            monto_consulta: text(&record.monto_consulta),
        }
    }

    pub fn has_record(&self) -> bool {
        !self.id_consulta.trim().is_empty()
    }

    pub fn set(&mut self, field: ConsultationField, value: &str) {
        let value = value.to_string();
        match field {
            ConsultationField::PatientId => self.id_cedula = value,
            ConsultationField::Kind => self.tipoconsulta = value,
            ConsultationField::Assessment => self.valoracion = value,
            ConsultationField::BloodPressure => self.presion_arterial = value,
            ConsultationField::HeartRate => self.frecuencia_cardiaca = value,
            ConsultationField::OxygenSaturation => self.saturacion_oxigeno = value,
            ConsultationField::Glycemia => self.glicemia = value,
            ConsultationField::RespiratoryRate => self.frecuencia_respiratoria = value,
            ConsultationField::TreatmentPlan => self.plan_tratamiento = value,
            ConsultationField::Date => self.fecha_consulta = value,
            ConsultationField::Amount => self.monto_consulta = value,
        }
    }

    /// Builds the `PATCH /consultation` payload for an edited record.
    ///
    /// Requires id, patient, type, treatment plan and date.
    pub fn validate_update(&self, company_id: &str) -> Result<ConsultationUpdate, ValidationError> {
        let id = require("consultation", &self.id_consulta)?;
        let patient = require("patient", &self.id_cedula)?;
        let kind = require("consultation type", &self.tipoconsulta)?;
        let plan = require("treatment plan", &self.plan_tratamiento)?;
        let date = parse_day(require("consultation date", &self.fecha_consulta)?)?;

        let id_consulta = id
            .parse::<i64>()
            .map_err(|_| ValidationError::malformed("consultation", "id is not numeric"))?;

        let amount = self.monto_consulta.trim();

        Ok(ConsultationUpdate {
            id_consulta,
            id_cedula: patient.to_string(),
            id_empresa: company_id.to_string(),
            tipoconsulta: kind.to_string(),
            valoracion: self.valoracion.trim().to_string(),
            presion_arterial: self.presion_arterial.trim().to_string(),
            frecuencia_cardiaca: self.frecuencia_cardiaca.trim().to_string(),
            saturacion_oxigeno: self.saturacion_oxigeno.trim().to_string(),
            glicemia: self.glicemia.trim().to_string(),
            frecuencia_respiratoria: self.frecuencia_respiratoria.trim().to_string(),
            plan_tratamiento: plan.to_string(),
            fecha_consulta: format!("{}T00:00:00.000Z", date),
            monto_consulta: if amount.is_empty() {
                DEFAULT_AMOUNT.to_string()
            } else {
                amount.to_string()
            },
            estado: ACTIVE_STATE,
        })
    }

    /// Builds the `POST /consultation` payload.
    ///
    /// Requires type, assessment, treatment plan, date and amount.
    pub fn validate_create(&self, company_id: &str) -> Result<NewConsultation, ValidationError> {
        let kind = require("consultation type", &self.tipoconsulta)?;
        let assessment = require("assessment", &self.valoracion)?;
        let plan = require("treatment plan", &self.plan_tratamiento)?;
        let date = parse_day(require("consultation date", &self.fecha_consulta)?)?;
        let amount = require("amount", &self.monto_consulta)?;

        Ok(NewConsultation {
            id_cedula: self.id_cedula.trim().to_string(),
            id_empresa: company_id.to_string(),
            tipoconsulta: kind.to_string(),
            valoracion: assessment.to_string(),
            presion_arterial: self.presion_arterial.trim().to_string(),
            frecuencia_cardiaca: self.frecuencia_cardiaca.trim().to_string(),
            saturacion_oxigeno: self.saturacion_oxigeno.trim().to_string(),
            glicemia: self.glicemia.trim().to_string(),
            frecuencia_respiratoria: self.frecuencia_respiratoria.trim().to_string(),
            plan_tratamiento: plan.to_string(),
            fecha_consulta: date,
            monto_consulta: amount.to_string(),
        })
    }
}

fn parse_day(value: &str) -> Result<CalendarDay, ValidationError> {
    value
        .parse()
        .map_err(|_| ValidationError::malformed("consultation date", "expected YYYY-MM-DD"))
}

/// `PATCH /consultation` payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConsultationUpdate {
    pub id_consulta: i64,
    pub id_cedula: String,
    pub id_empresa: String,
    pub tipoconsulta: String,
    pub valoracion: String,
    pub presion_arterial: String,
    pub frecuencia_cardiaca: String,
    pub saturacion_oxigeno: String,
    pub glicemia: String,
    pub frecuencia_respiratoria: String,
    pub plan_tratamiento: String,
    pub fecha_consulta: String,
    pub monto_consulta: String,
    pub estado: u8,
}

/// `POST /consultation` payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewConsultation {
    pub id_cedula: String,
    pub id_empresa: String,
    pub tipoconsulta: String,
    pub valoracion: String,
    pub presion_arterial: String,
    pub frecuencia_cardiaca: String,
    pub saturacion_oxigeno: String,
    pub glicemia: String,
    pub frecuencia_respiratoria: String,
    pub plan_tratamiento: String,
    pub fecha_consulta: CalendarDay,
    pub monto_consulta: String,
}

/// `PATCH /consultation/{id}` payload closing out a consultation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FinalizeConsultation {
    pub estado: u8,
}

impl Default for FinalizeConsultation {
    fn default() -> Self {
        Self {
            estado: ACTIVE_STATE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record() -> ConsultationRecord {
        serde_json::from_value(json!({
            "id_consulta": 5,
            "id_cedula": "303330333",
            "id_empresa": 7,
            "tipoconsulta": "General",
            "valoracion": "Stable",
            "presion_arterial": null,
            "glicemia": 95,
            "plan_tratamiento": "Rest",
            "fecha_consulta": "2024-06-01T00:00:00.000Z",
            "monto_consulta": "25000.00"
        }))
        .unwrap()
    }

    #[test]
    fn test_form_from_record() {
        let form = ConsultationForm::from_record(&record());
        assert_eq!(form.id_consulta, "5");
        assert_eq!(form.fecha_consulta, "2024-06-01");
        assert_eq!(form.glicemia, "95");
        assert_eq!(form.presion_arterial, "");
        assert!(form.has_record());
    }

    #[test]
    fn test_update_payload_shape() {
        let mut form = ConsultationForm::from_record(&record());
        form.set(ConsultationField::Amount, " ");

        let payload = serde_json::to_value(form.validate_update("7").unwrap()).unwrap();
        assert_eq!(payload["id_consulta"], json!(5));
        assert_eq!(payload["fecha_consulta"], json!("2024-06-01T00:00:00.000Z"));
        assert_eq!(payload["monto_consulta"], json!("0.00"));
        assert_eq!(payload["presion_arterial"], json!(""));
        assert_eq!(payload["estado"], json!(1));
    }

    #[test]
    fn test_update_requires_plan() {
        let mut form = ConsultationForm::from_record(&record());
        form.set(ConsultationField::TreatmentPlan, "");
        assert_eq!(form.validate_update("7").unwrap_err().field(), "treatment plan");
    }

    #[test]
    fn test_create_requires_amount() {
        let mut form = ConsultationForm::default();
        form.set(ConsultationField::Kind, "Control");
        form.set(ConsultationField::Assessment, "OK");
        form.set(ConsultationField::TreatmentPlan, "None");
        form.set(ConsultationField::Date, "2024-06-01");
        assert_eq!(form.validate_create("7").unwrap_err().field(), "amount");

        form.set(ConsultationField::Amount, "15000");
        let payload = serde_json::to_value(form.validate_create("7").unwrap()).unwrap();
        assert_eq!(payload["fecha_consulta"], json!("2024-06-01"));
        assert_eq!(payload["id_empresa"], json!("7"));
    }

    #[test]
    fn test_bad_date_is_malformed() {
        let mut form = ConsultationForm::from_record(&record());
        form.set(ConsultationField::Date, "01/06/2024");
        assert!(matches!(
            form.validate_update("7"),
            Err(ValidationError::Malformed { field: "consultation date", .. })
        ));
    }

    #[test]
    fn test_mode_after_fetch() {
        assert_eq!(ConsultationMode::after_fetch(true), ConsultationMode::ViewExisting);
        assert_eq!(ConsultationMode::after_fetch(false), ConsultationMode::CreatingNew);
    }
}
