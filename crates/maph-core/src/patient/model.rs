//! Patient record and form.

use crate::error::ValidationError;
use crate::validation::{digits_only, require, without_digits};
use crate::wire::{null_as_empty, opt_string_or_number, string_or_number};
use serde::{Deserialize, Serialize};

/// A patient as stored by the backend (`/patient`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Patient {
    #[serde(rename = "id_cedula", deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(rename = "nombre", default, deserialize_with = "null_as_empty")]
    pub first_name: String,
    #[serde(rename = "apellidos", default, deserialize_with = "null_as_empty")]
    pub last_names: String,
    #[serde(rename = "conocido_como", default, skip_serializing_if = "Option::is_none")]
    pub known_as: Option<String>,
    #[serde(
        rename = "telefono",
        default,
        deserialize_with = "opt_string_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub phone: Option<String>,
    #[serde(rename = "correo", default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(rename = "direccion", default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

impl Patient {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_names)
            .trim()
            .to_string()
    }

    /// Label used by patient pickers: full name plus the nickname when known.
    pub fn picker_label(&self) -> String {
        match self.known_as.as_deref().map(str::trim) {
            Some(alias) if !alias.is_empty() => format!("{} (known as {})", self.full_name(), alias),
            _ => self.full_name(),
        }
    }
}

/// Editable fields of the patient form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatientField {
    Id,
    FirstName,
    LastNames,
    KnownAs,
    Phone,
    Email,
    Address,
}

/// Local state of the create/edit patient form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatientForm {
    pub id: String,
    pub first_name: String,
    pub last_names: String,
    pub known_as: String,
    pub phone: String,
    pub email: String,
    pub address: String,
}

impl PatientForm {
    /// Pre-fills the form for editing an existing patient.
    pub fn from_patient(patient: &Patient) -> Self {
        Self {
            id: patient.id.clone(),
            first_name: patient.first_name.clone(),
            last_names: patient.last_names.clone(),
            known_as: patient.known_as.clone().unwrap_or_default(),
            phone: patient.phone.clone().unwrap_or_default(),
            email: patient.email.clone().unwrap_or_default(),
            address: patient.address.clone().unwrap_or_default(),
        }
    }

    /// Applies keystroke filtering: digits only for id and phone, no digits
    /// in names.
    pub fn set(&mut self, field: PatientField, value: &str) {
        match field {
            PatientField::Id => self.id = digits_only(value),
            PatientField::Phone => self.phone = digits_only(value),
            PatientField::FirstName => self.first_name = without_digits(value),
            PatientField::LastNames => self.last_names = without_digits(value),
            PatientField::KnownAs => self.known_as = value.to_string(),
            PatientField::Email => self.email = value.to_string(),
            PatientField::Address => self.address = value.to_string(),
        }
    }

    /// Requires id, first name and last names; the rest is optional.
    pub fn validate(&self) -> Result<Patient, ValidationError> {
        let id = require("id", &self.id)?;
        let first_name = require("first name", &self.first_name)?;
        let last_names = require("last names", &self.last_names)?;

        let optional = |value: &str| {
            let value = value.trim();
            (!value.is_empty()).then(|| value.to_string())
        };

        Ok(Patient {
            id: id.to_string(),
            first_name: first_name.to_string(),
            last_names: last_names.to_string(),
            known_as: optional(&self.known_as),
            phone: optional(&self.phone),
            email: optional(&self.email),
            address: optional(&self.address),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_picker_label() {
        let patient: Patient = serde_json::from_value(json!({
            "id_cedula": 303330333,
            "nombre": "Carlos",
            "apellidos": "Rojas",
            "conocido_como": "Charlie"
        }))
        .unwrap();
        assert_eq!(patient.id, "303330333");
        assert_eq!(patient.picker_label(), "Carlos Rojas (known as Charlie)");
    }

    #[test]
    fn test_null_names_read_as_empty() {
        let patient: Patient = serde_json::from_value(json!({
            "id_cedula": "202",
            "nombre": null,
            "apellidos": "Rojas"
        }))
        .unwrap();
        assert_eq!(patient.first_name, "");
        assert_eq!(patient.last_names, "Rojas");
    }

    #[test]
    fn test_form_filters_input() {
        let mut form = PatientForm::default();
        form.set(PatientField::Id, "3-0333-0333");
        form.set(PatientField::FirstName, "Carl0s");
        form.set(PatientField::Phone, "(506) 8888 9999");
        assert_eq!(form.id, "303330333");
        assert_eq!(form.first_name, "Carls");
        assert_eq!(form.phone, "50688889999");
    }

    #[test]
    fn test_form_validation() {
        let mut form = PatientForm::default();
        assert_eq!(form.validate().unwrap_err().field(), "id");
        form.set(PatientField::Id, "1");
        form.set(PatientField::FirstName, "Eva");
        assert_eq!(form.validate().unwrap_err().field(), "last names");
        form.set(PatientField::LastNames, "Soto");

        let patient = form.validate().unwrap();
        assert_eq!(patient.full_name(), "Eva Soto");
        assert!(patient.phone.is_none());
        let payload = serde_json::to_value(&patient).unwrap();
        assert_eq!(payload, json!({"id_cedula": "1", "nombre": "Eva", "apellidos": "Soto"}));
    }
}
