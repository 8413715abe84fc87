//! Patient domain module.
//!
//! - `model`: Patient record and the create/edit form

mod model;

// Re-export public API
pub use model::{Patient, PatientField, PatientForm};
