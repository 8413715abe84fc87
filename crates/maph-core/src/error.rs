//! Error types for the MAPH client.

use crate::resource::ApiError;
use std::fmt;
use thiserror::Error;

/// A shared error type for the entire MAPH client.
///
/// Every remote operation has its own variant so a screen can tell the user
/// *which* action failed, and each of those carries a [`RemoteFailure`] with
/// the server-provided message (when there was one) and a generic fallback.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MaphError {
    /// A required field is missing or malformed. Never reaches the network.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Login failed
    #[error("Authentication error: {0}")]
    Auth(#[from] AuthError),

    /// Listing or reading a remote resource failed
    #[error("Fetch failed: {0}")]
    Fetch(RemoteFailure),

    /// Creating a remote record failed
    #[error("Create failed: {0}")]
    Create(RemoteFailure),

    /// Updating a remote record failed
    #[error("Update failed: {0}")]
    Update(RemoteFailure),

    /// Deleting a remote record failed
    #[error("Delete failed: {0}")]
    Delete(RemoteFailure),

    /// Multipart upload failed
    #[error("Upload failed: {0}")]
    Upload(RemoteFailure),

    /// A submission is already in flight on this screen
    #[error("Another submission is still in progress")]
    Busy,

    /// The requested screen needs a signed-in user
    #[error("Not signed in")]
    NotAuthenticated,

    /// The action is not available in the screen's current mode
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Local key-value storage error
    #[error("Storage error: {0}")]
    Storage(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization { format: String, message: String },

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl MaphError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates a Fetch error from a transport-level failure.
    pub fn fetch(err: &ApiError, fallback: &'static str) -> Self {
        Self::Fetch(RemoteFailure::from_api(err, fallback))
    }

    /// Creates a Create error from a transport-level failure.
    pub fn create(err: &ApiError, fallback: &'static str) -> Self {
        Self::Create(RemoteFailure::from_api(err, fallback))
    }

    /// Creates an Update error from a transport-level failure.
    pub fn update(err: &ApiError, fallback: &'static str) -> Self {
        Self::Update(RemoteFailure::from_api(err, fallback))
    }

    /// Creates a Delete error from a transport-level failure.
    pub fn delete(err: &ApiError, fallback: &'static str) -> Self {
        Self::Delete(RemoteFailure::from_api(err, fallback))
    }

    /// Creates an Upload error from a transport-level failure.
    pub fn upload(err: &ApiError, fallback: &'static str) -> Self {
        Self::Upload(RemoteFailure::from_api(err, fallback))
    }

    /// Creates a Storage error
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage(message.into())
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates an InvalidState error
    pub fn invalid_state(message: impl Into<String>) -> Self {
        Self::InvalidState(message.into())
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Check if this error came back from a remote call
    pub fn is_remote(&self) -> bool {
        self.remote_failure().is_some()
    }

    /// Returns the remote failure details for remote-operation errors.
    pub fn remote_failure(&self) -> Option<&RemoteFailure> {
        match self {
            Self::Fetch(f) | Self::Create(f) | Self::Update(f) | Self::Delete(f) | Self::Upload(f) => {
                Some(f)
            }
            _ => None,
        }
    }

    /// Text suitable for a blocking notification.
    ///
    /// Remote failures show the server message when the backend sent one,
    /// otherwise the screen-specific fallback.
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(err) => err.to_string(),
            Self::Auth(err) => err.user_message().to_string(),
            Self::Fetch(f) | Self::Create(f) | Self::Update(f) | Self::Delete(f) | Self::Upload(f) => {
                f.message().to_string()
            }
            other => other.to_string(),
        }
    }
}

/// Details of a failed remote operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteFailure {
    /// Message supplied by the backend, if any
    pub server_message: Option<String>,
    /// Generic message shown when the backend gave none
    pub fallback: &'static str,
}

impl RemoteFailure {
    pub fn new(server_message: Option<String>, fallback: &'static str) -> Self {
        Self {
            server_message,
            fallback,
        }
    }

    pub fn from_api(err: &ApiError, fallback: &'static str) -> Self {
        Self::new(err.server_message().map(str::to_string), fallback)
    }

    /// The message to display: server text first, fallback otherwise.
    pub fn message(&self) -> &str {
        self.server_message.as_deref().unwrap_or(self.fallback)
    }
}

impl fmt::Display for RemoteFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Local input validation failure.
///
/// `field` names the field class (e.g. `"patient"`, `"start hour"`) so the
/// view can point at the offending input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{field} is required")]
    Missing { field: &'static str },

    #[error("{field} is invalid: {reason}")]
    Malformed { field: &'static str, reason: String },
}

impl ValidationError {
    pub fn missing(field: &'static str) -> Self {
        Self::Missing { field }
    }

    pub fn malformed(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Malformed {
            field,
            reason: reason.into(),
        }
    }

    /// The field class this error refers to.
    pub fn field(&self) -> &'static str {
        match self {
            Self::Missing { field } | Self::Malformed { field, .. } => field,
        }
    }
}

/// Login failures. Each variant maps to its own user-visible message.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Wrong identifier or secret (or any non-success, non-conflict reply)
    #[error("invalid credentials")]
    InvalidCredentials,

    /// The backend already holds an active session for this identifier
    #[error("an active session already exists for this user")]
    SessionConflict,

    /// The backend could not be reached
    #[error("network error: {0}")]
    NetworkError(String),
}

impl AuthError {
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::InvalidCredentials => "Incorrect credentials.",
            Self::SessionConflict => {
                "There is already an active session. Log out before signing in again."
            }
            Self::NetworkError(_) => "Could not reach the server. Try again later.",
        }
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for MaphError {
    fn from(err: std::io::Error) -> Self {
        Self::Storage(format!("{} (kind: {:?})", err, err.kind()))
    }
}

impl From<serde_json::Error> for MaphError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for MaphError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::ser::Error> for MaphError {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

/// A type alias for `Result<T, MaphError>`.
pub type Result<T> = std::result::Result<T, MaphError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_failure_prefers_server_message() {
        let err = ApiError::Status {
            status: 400,
            message: Some("patient not found".to_string()),
        };
        let failure = MaphError::create(&err, "Could not create the appointment.");
        assert_eq!(failure.user_message(), "patient not found");
    }

    #[test]
    fn test_remote_failure_falls_back() {
        let err = ApiError::Transport("connection refused".to_string());
        let failure = MaphError::delete(&err, "Could not delete the appointment.");
        assert_eq!(failure.user_message(), "Could not delete the appointment.");
        assert!(failure.is_remote());
    }

    #[test]
    fn test_auth_messages_are_distinct() {
        let invalid = AuthError::InvalidCredentials.user_message();
        let conflict = AuthError::SessionConflict.user_message();
        let network = AuthError::NetworkError("timeout".into()).user_message();
        assert_ne!(invalid, conflict);
        assert_ne!(invalid, network);
        assert_ne!(conflict, network);
    }

    #[test]
    fn test_validation_field() {
        let err: MaphError = ValidationError::missing("patient").into();
        assert!(err.is_validation());
        assert_eq!(err.user_message(), "patient is required");
    }
}
