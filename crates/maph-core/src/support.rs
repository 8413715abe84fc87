//! Account request forms that are delivered to support by mail.

use crate::error::ValidationError;
use crate::validation::{digits_only, require, without_digits};
use serde::Serialize;
use std::fmt::Write as _;

/// Mailbox that receives account requests unless configured otherwise.
pub const DEFAULT_SUPPORT_EMAIL: &str = "SOPORTEMAPH@GMAIL.COM";

/// Body posted to the `/sendEmail/*` endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SupportMail {
    pub email: String,
    pub reason: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequesterField {
    Id,
    FirstName,
    LastNames,
    Phone,
    Email,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompanyField {
    Name,
    Id,
    Phone,
    Email,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompanyDetails {
    pub name: String,
    pub id: String,
    pub phone: String,
    pub email: String,
}

/// "Request a new account" form shown before login.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateUserRequestForm {
    pub id: String,
    pub first_name: String,
    pub last_names: String,
    pub phone: String,
    pub email: String,
    /// Present when the "registered company" switch is on
    pub company: Option<CompanyDetails>,
}

impl CreateUserRequestForm {
    pub fn set(&mut self, field: RequesterField, value: &str) {
        match field {
            RequesterField::Id => self.id = digits_only(value),
            RequesterField::Phone => self.phone = digits_only(value),
            RequesterField::FirstName => self.first_name = without_digits(value),
            RequesterField::LastNames => self.last_names = without_digits(value),
            RequesterField::Email => self.email = value.to_string(),
        }
    }

    /// Turns the company block on or off. Turning it off discards its fields.
    pub fn set_has_company(&mut self, enabled: bool) {
        match (enabled, self.company.is_some()) {
            (true, false) => self.company = Some(CompanyDetails::default()),
            (false, _) => self.company = None,
            _ => {}
        }
    }

    /// Edits the company block. Ignored while the block is off.
    pub fn set_company(&mut self, field: CompanyField, value: &str) {
        let Some(company) = self.company.as_mut() else {
            return;
        };
        match field {
            CompanyField::Name => company.name = without_digits(value),
            CompanyField::Id => company.id = digits_only(value),
            CompanyField::Phone => company.phone = digits_only(value),
            CompanyField::Email => company.email = value.to_string(),
        }
    }

    /// Every requester field is required, and every company field when the
    /// block is on.
    pub fn to_mail(&self, support_email: &str) -> Result<SupportMail, ValidationError> {
        let id = require("id", &self.id)?;
        let first_name = require("first name", &self.first_name)?;
        let last_names = require("last names", &self.last_names)?;
        let phone = require("phone", &self.phone)?;
        let email = require("email", &self.email)?;

        let mut reason = String::from("New user account request\n\n");
        let _ = writeln!(reason, "- Id: {}", id);
        let _ = writeln!(reason, "- Name: {} {}", first_name, last_names);
        let _ = writeln!(reason, "- Phone: {}", phone);
        let _ = writeln!(reason, "- Email: {}", email);

        if let Some(company) = &self.company {
            let name = require("company name", &company.name)?;
            let company_id = require("company id", &company.id)?;
            let company_phone = require("company phone", &company.phone)?;
            let company_email = require("company email", &company.email)?;

            reason.push_str("\nCompany information:\n");
            let _ = writeln!(reason, "- Name: {}", name);
            let _ = writeln!(reason, "- Company id: {}", company_id);
            let _ = writeln!(reason, "- Phone: {}", company_phone);
            let _ = writeln!(reason, "- Email: {}", company_email);
        }

        Ok(SupportMail {
            email: support_email.to_string(),
            reason,
        })
    }
}

/// Password recovery request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ForgotPasswordForm {
    pub email: String,
    pub reason: String,
}

impl ForgotPasswordForm {
    pub fn to_mail(&self) -> Result<SupportMail, ValidationError> {
        let email = require("email", &self.email)?;
        let reason = require("reason", &self.reason)?;
        Ok(SupportMail {
            email: email.to_string(),
            reason: reason.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled() -> CreateUserRequestForm {
        let mut form = CreateUserRequestForm::default();
        form.set(RequesterField::Id, "1-1111-1111");
        form.set(RequesterField::FirstName, "Luis");
        form.set(RequesterField::LastNames, "Vargas");
        form.set(RequesterField::Phone, "8888 1111");
        form.set(RequesterField::Email, "luis@example.com");
        form
    }

    #[test]
    fn test_mail_without_company() {
        let mail = filled().to_mail(DEFAULT_SUPPORT_EMAIL).unwrap();
        assert_eq!(mail.email, "SOPORTEMAPH@GMAIL.COM");
        assert!(mail.reason.contains("- Id: 111111111"));
        assert!(mail.reason.contains("- Name: Luis Vargas"));
        assert!(!mail.reason.contains("Company information"));
    }

    #[test]
    fn test_company_block_required_when_enabled() {
        let mut form = filled();
        form.set_has_company(true);
        form.set_company(CompanyField::Name, "Clinica 2000");
        assert_eq!(form.company.as_ref().unwrap().name, "Clinica ");
        assert_eq!(form.to_mail("x").unwrap_err().field(), "company id");

        form.set_company(CompanyField::Id, "3101");
        form.set_company(CompanyField::Phone, "2222");
        form.set_company(CompanyField::Email, "info@clinica.cr");
        let mail = form.to_mail("x").unwrap();
        assert!(mail.reason.contains("Company information"));
        assert!(mail.reason.contains("- Company id: 3101"));

        form.set_has_company(false);
        assert!(form.company.is_none());
    }

    #[test]
    fn test_requester_fields_required() {
        let mut form = filled();
        form.set(RequesterField::Phone, "abc");
        assert_eq!(form.to_mail("x").unwrap_err().field(), "phone");
    }

    #[test]
    fn test_forgot_password() {
        let mut form = ForgotPasswordForm::default();
        assert_eq!(form.to_mail().unwrap_err().field(), "email");
        form.email = "ana@example.com".into();
        assert_eq!(form.to_mail().unwrap_err().field(), "reason");
        form.reason = "Lost it".into();
        assert_eq!(form.to_mail().unwrap().reason, "Lost it");
    }
}
