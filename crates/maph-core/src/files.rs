//! Patient file upload form.

use crate::error::ValidationError;
use crate::resource::UploadFile;
use crate::validation::{digits_only, require};

/// Number of image slots on the upload form.
pub const IMAGE_SLOTS: usize = 3;

/// An image picked for one of the upload slots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

/// Formats free input against the `YYYY/MM/DD` mask.
///
/// Non-digits are dropped, at most eight digits are kept and the slashes are
/// inserted as the digits arrive.
pub fn apply_date_mask(input: &str) -> String {
    let digits: String = digits_only(input).chars().take(8).collect();
    let mut masked = String::with_capacity(10);
    for (i, c) in digits.chars().enumerate() {
        if i == 4 || i == 6 {
            masked.push('/');
        }
        masked.push(c);
    }
    masked
}

/// Validated multipart submission for `/api/files/upload`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSubmission {
    pub files: Vec<UploadFile>,
    pub fields: Vec<(String, String)>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileUploadForm {
    pub patient_id: Option<String>,
    date: String,
    pub detail: String,
    images: [Option<Attachment>; IMAGE_SLOTS],
}

impl FileUploadForm {
    pub fn date(&self) -> &str {
        &self.date
    }

    /// Sets the date through the `YYYY/MM/DD` mask.
    pub fn set_date(&mut self, input: &str) {
        self.date = apply_date_mask(input);
    }

    /// Places an image in slot `1..=3`. Returns `false` for an unknown slot.
    pub fn set_image(&mut self, slot: usize, attachment: Attachment) -> bool {
        match slot.checked_sub(1).and_then(|i| self.images.get_mut(i)) {
            Some(entry) => {
                *entry = Some(attachment);
                true
            }
            None => false,
        }
    }

    pub fn clear_image(&mut self, slot: usize) {
        if let Some(entry) = slot.checked_sub(1).and_then(|i| self.images.get_mut(i)) {
            *entry = None;
        }
    }

    pub fn image(&self, slot: usize) -> Option<&Attachment> {
        slot.checked_sub(1)
            .and_then(|i| self.images.get(i))
            .and_then(Option::as_ref)
    }

    pub fn image_count(&self) -> usize {
        self.images.iter().flatten().count()
    }

    /// Checks patient, date, detail and at least one image, in that order.
    pub fn validate(&self, company_id: &str) -> Result<FileSubmission, ValidationError> {
        let patient = require("patient", self.patient_id.as_deref().unwrap_or(""))?;
        let date = require("date", &self.date)?;
        let detail = require("detail", &self.detail)?;
        if self.image_count() == 0 {
            return Err(ValidationError::missing("image"));
        }

        let files = self
            .images
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| {
                slot.as_ref().map(|a| {
                    UploadFile::new(
                        format!("image{}", i + 1),
                        a.file_name.clone(),
                        a.mime_type.clone(),
                        a.bytes.clone(),
                    )
                })
            })
            .collect();

        let fields = vec![
            ("id_empresa".to_string(), company_id.to_string()),
            ("id_cedula".to_string(), patient.to_string()),
            ("fecha".to_string(), date.to_string()),
            ("detalle".to_string(), detail.to_string()),
        ];

        Ok(FileSubmission { files, fields })
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
