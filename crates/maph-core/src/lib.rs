//! Domain layer for the MAPH practice-management client.
//!
//! This crate holds the records exchanged with the backend, the pure state
//! behind each screen, and the traits (`ResourceClient`, `AuthGateway`,
//! `KeyValueStore`) that the infrastructure layer implements.

pub mod agenda;
pub mod config;
pub mod consultation;
pub mod error;
pub mod files;
pub mod patient;
pub mod resource;
pub mod session;
pub mod support;
pub mod user;
pub mod validation;

mod wire;

// Re-export common error types
pub use error::{AuthError, MaphError, RemoteFailure, Result, ValidationError};
