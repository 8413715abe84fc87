//! Session domain model.

use crate::wire::{null_as_empty, opt_string_or_number, string_or_number};
use serde::{Deserialize, Serialize};

/// Role code the backend uses for dependent staff members.
const DEPENDENT_ROLE: &str = "D";

/// The authenticated user as returned by `/auth/login`.
///
/// Field names follow the backend's wire format so the record can be sent
/// back unchanged to `PATCH /user`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    /// National-id-like identifier, also the login identifier
    #[serde(rename = "id_cedula", deserialize_with = "string_or_number")]
    pub user_id: String,
    /// Practice (company) the user belongs to
    #[serde(rename = "id_empresa", deserialize_with = "string_or_number")]
    pub company_id: String,
    #[serde(rename = "nombre", default, deserialize_with = "null_as_empty")]
    pub first_name: String,
    #[serde(rename = "apellidos", default, deserialize_with = "null_as_empty")]
    pub last_names: String,
    #[serde(rename = "rol", default)]
    pub role: Option<String>,
    #[serde(
        rename = "telefono",
        default,
        deserialize_with = "opt_string_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub phone: Option<String>,
    #[serde(rename = "correo", default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl SessionUser {
    /// "First Last", trimmed when either part is empty.
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_names)
            .trim()
            .to_string()
    }

    /// Dependent staff have a restricted menu.
    pub fn is_dependent(&self) -> bool {
        self.role
            .as_deref()
            .map(|r| r.trim().eq_ignore_ascii_case(DEPENDENT_ROLE))
            .unwrap_or(false)
    }
}

/// An authenticated session: the user plus the opaque backend token.
///
/// Screens receive a `Session` (or a clone of it) at construction time;
/// there is no process-wide session global.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user: SessionUser,
    pub token: String,
}

impl Session {
    pub fn new(user: SessionUser, token: impl Into<String>) -> Self {
        Self {
            user,
            token: token.into(),
        }
    }

    pub fn user_id(&self) -> &str {
        &self.user.user_id
    }

    pub fn company_id(&self) -> &str {
        &self.user.company_id
    }

    pub fn display_name(&self) -> String {
        self.user.display_name()
    }

    pub fn role(&self) -> Option<&str> {
        self.user.role.as_deref()
    }

    pub fn is_dependent(&self) -> bool {
        self.user.is_dependent()
    }
}
