//! Remote resource client contract.
//!
//! Every screen talks to the backend through [`ResourceClient`]. The backend
//! wraps payloads in an envelope `{ code, data }` whose `code` is sometimes
//! the string `"200"` and sometimes the number `200`; [`normalize_response`]
//! folds both encodings (plus the HTTP status) into a single `Result` so no
//! caller ever branches on raw status values.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

/// Backend resources the client knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Login,
    Patients,
    Diary,
    Consultations,
    FileUpload,
    Users,
    CreateUserMail,
    ForgotPasswordMail,
}

impl Resource {
    /// Collection path relative to the API base URL.
    pub fn path(self) -> &'static str {
        match self {
            Resource::Login => "/auth/login",
            Resource::Patients => "/patient",
            Resource::Diary => "/diary",
            Resource::Consultations => "/consultation",
            Resource::FileUpload => "/api/files/upload",
            Resource::Users => "/user",
            Resource::CreateUserMail => "/sendEmail/createUser",
            Resource::ForgotPasswordMail => "/sendEmail/forgotPassword",
        }
    }

    /// Path of a single record, or the collection path when `id` is `None`.
    pub fn item_path(self, id: Option<&str>) -> String {
        match id {
            Some(id) => format!("{}/{}", self.path(), id),
            None => self.path().to_string(),
        }
    }
}

/// A file attached to a multipart submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    /// Multipart field name (`image1`, `image2`, ...)
    pub field_name: String,
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    pub fn new(
        field_name: impl Into<String>,
        file_name: impl Into<String>,
        mime_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            field_name: field_name.into(),
            file_name: file_name.into(),
            mime_type: mime_type.into(),
            bytes,
        }
    }
}

/// Transport-level failure of a single request.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Connection refused, DNS failure, broken pipe...
    #[error("network error: {0}")]
    Transport(String),

    /// The request exceeded the configured timeout
    #[error("request timed out")]
    Timeout,

    /// The backend answered with a non-success HTTP status
    #[error("server responded with status {status}")]
    Status { status: u16, message: Option<String> },

    /// HTTP succeeded but the envelope carried a non-success `code`
    #[error("server rejected the request with code {code}")]
    Rejected { code: u16, message: Option<String> },

    /// The response body did not have the expected shape
    #[error("unexpected response body: {0}")]
    Decode(String),
}

impl ApiError {
    /// Message supplied by the backend, if any.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiError::Status { message, .. } | ApiError::Rejected { message, .. } => {
                message.as_deref()
            }
            _ => None,
        }
    }

    /// HTTP status (or envelope code) for status failures.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            ApiError::Rejected { code, .. } => Some(*code),
            _ => None,
        }
    }

    /// True when the HTTP exchange succeeded and only the envelope code
    /// reported a failure.
    pub fn is_rejected(&self) -> bool {
        matches!(self, ApiError::Rejected { .. })
    }

    /// True when no response was received at all.
    pub fn is_transport(&self) -> bool {
        matches!(self, ApiError::Transport(_) | ApiError::Timeout)
    }
}

/// Generic CRUD access to backend resources.
///
/// Implementations issue exactly one request per call and never retry.
#[async_trait]
pub trait ResourceClient: Send + Sync {
    /// Lists every record of a resource in backend order.
    async fn list(&self, resource: Resource) -> Result<Vec<Value>, ApiError>;

    /// Creates a record. Returns the envelope `data` (may be `Null`).
    async fn create(&self, resource: Resource, payload: Value) -> Result<Value, ApiError>;

    /// Partially updates a record. Some endpoints take the id in the body,
    /// in which case `id` is `None`.
    async fn update(
        &self,
        resource: Resource,
        id: Option<&str>,
        partial: Value,
    ) -> Result<Value, ApiError>;

    /// Deletes a record by id.
    async fn delete(&self, resource: Resource, id: &str) -> Result<(), ApiError>;

    /// Multipart submission of files plus text fields.
    async fn upload(
        &self,
        resource: Resource,
        files: Vec<UploadFile>,
        fields: Vec<(String, String)>,
    ) -> Result<(), ApiError>;
}

/// Decodes a list of loosely-typed records into a typed collection.
pub fn decode_records<T: DeserializeOwned>(records: Vec<Value>) -> Result<Vec<T>, ApiError> {
    records
        .into_iter()
        .map(|record| serde_json::from_value(record).map_err(|e| ApiError::Decode(e.to_string())))
        .collect()
}

/// Reads an envelope `code` that may be a number or a numeric string.
pub fn envelope_code(body: &Value) -> Option<u16> {
    match body.get("code")? {
        Value::Number(n) => n.as_u64().and_then(|c| u16::try_from(c).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn is_success(code: u16) -> bool {
    (200..300).contains(&code)
}

fn server_message(body: &Value) -> Option<String> {
    ["message", "error"].iter().find_map(|key| match body.get(*key) {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s.clone()),
        _ => None,
    })
}

/// Normalizes an HTTP response into the envelope `data` or a typed error.
///
/// A response is successful when the HTTP status is 2xx **and** the envelope
/// code, when present, is 2xx. JSON bodies without `code`/`data` keys are
/// returned whole; an empty 2xx body yields `Null`.
pub fn normalize_response(http_status: u16, body: &[u8]) -> Result<Value, ApiError> {
    let text = String::from_utf8_lossy(body);
    let trimmed = text.trim();

    let parsed: Option<Value> = if trimmed.is_empty() {
        None
    } else {
        serde_json::from_str(trimmed).ok()
    };

    let is_envelope = parsed
        .as_ref()
        .map(|v| v.get("code").is_some() || v.get("data").is_some())
        .unwrap_or(false);

    if !is_success(http_status) {
        let message = match &parsed {
            Some(value) => server_message(value),
            None if !trimmed.is_empty() => Some(trimmed.to_string()),
            None => None,
        };
        return Err(ApiError::Status {
            status: http_status,
            message,
        });
    }

    match parsed {
        Some(value) if is_envelope => {
            if let Some(code) = envelope_code(&value)
                && !is_success(code)
            {
                return Err(ApiError::Rejected {
                    code,
                    message: server_message(&value),
                });
            }
            Ok(value.get("data").cloned().unwrap_or(Value::Null))
        }
        Some(value) => Ok(value),
        None if trimmed.is_empty() => Ok(Value::Null),
        None => Ok(Value::String(trimmed.to_string())),
    }
}

/// Interprets envelope `data` as a list of records.
pub fn expect_list(data: Value) -> Result<Vec<Value>, ApiError> {
    match data {
        Value::Array(items) => Ok(items),
        Value::Null => Ok(Vec::new()),
        other => Err(ApiError::Decode(format!(
            "expected a list of records, got {}",
            kind_of(&other)
        ))),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
