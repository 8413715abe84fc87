//! Profile form for the signed-in user.

use crate::error::ValidationError;
use crate::session::SessionUser;
use crate::validation::{digits_only, require, without_digits};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileField {
    FirstName,
    LastNames,
    Phone,
    Email,
}

/// Editable copy of the session user's profile.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileForm {
    pub first_name: String,
    pub last_names: String,
    pub phone: String,
    pub email: String,
}

impl ProfileForm {
    pub fn from_user(user: &SessionUser) -> Self {
        Self {
            first_name: user.first_name.clone(),
            last_names: user.last_names.clone(),
            phone: user.phone.clone().unwrap_or_default(),
            email: user.email.clone().unwrap_or_default(),
        }
    }

    pub fn set(&mut self, field: ProfileField, value: &str) {
        match field {
            ProfileField::FirstName => self.first_name = without_digits(value),
            ProfileField::LastNames => self.last_names = without_digits(value),
            ProfileField::Phone => self.phone = digits_only(value),
            ProfileField::Email => self.email = value.to_string(),
        }
    }

    /// Produces the updated user record sent to `PATCH /user`.
    ///
    /// Identity fields (id, company, role) are carried over from `current`.
    pub fn apply_to(&self, current: &SessionUser) -> Result<SessionUser, ValidationError> {
        let first_name = require("first name", &self.first_name)?;
        let last_names = require("last names", &self.last_names)?;
        let optional = |value: &str| {
            let value = value.trim();
            (!value.is_empty()).then(|| value.to_string())
        };

        Ok(SessionUser {
            first_name: first_name.to_string(),
            last_names: last_names.to_string(),
            phone: optional(&self.phone),
            email: optional(&self.email),
            ..current.clone()
        })
    }
}
