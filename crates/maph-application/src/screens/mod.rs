//! Form screens.
//!
//! Thin bindings: field state, local validation, one backend call, outcome.

pub mod account_requests;
pub mod consultation;
pub mod file_upload;
pub mod patients;
pub mod profile;

pub use account_requests::AccountRequestsScreen;
pub use consultation::ConsultationScreen;
pub use file_upload::FileUploadScreen;
pub use patients::PatientsScreen;
pub use profile::ProfileScreen;
