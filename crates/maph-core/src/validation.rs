//! Input filters and presence checks shared by the form screens.

use crate::error::ValidationError;

/// Keeps only ASCII digits (phone numbers, national ids).
pub fn digits_only(input: &str) -> String {
    input.chars().filter(char::is_ascii_digit).collect()
}

/// Drops every digit (person and company names).
pub fn without_digits(input: &str) -> String {
    input.chars().filter(|c| !c.is_ascii_digit()).collect()
}

/// Returns the trimmed value, or `Missing` when it is blank.
pub fn require<'a>(field: &'static str, value: &'a str) -> Result<&'a str, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(ValidationError::missing(field))
    } else {
        Ok(trimmed)
    }
}
