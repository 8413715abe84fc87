//! Consultation domain module.
//!
//! - `model`: Consultation record, form, payloads and screen mode

mod model;

// Re-export public API
pub use model::{
    ConsultationField, ConsultationForm, ConsultationMode, ConsultationRecord, ConsultationUpdate,
    FinalizeConsultation, NewConsultation, SaveFailurePolicy,
};
