//! Login gateway.

use super::model::SessionUser;
use crate::error::{AuthError, ValidationError};
use crate::resource::envelope_code;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// HTTP status the backend uses to signal an already-active session.
const SESSION_CONFLICT_STATUS: u16 = 403;

/// Identifier/secret pair entered on the login screen.
#[derive(Clone, Serialize)]
pub struct Credentials {
    #[serde(rename = "id_cedula")]
    pub identifier: String,
    #[serde(rename = "contrasena")]
    pub secret: String,
}

impl Credentials {
    /// Builds credentials after checking both fields are filled in.
    pub fn new(identifier: &str, secret: &str) -> Result<Self, ValidationError> {
        let identifier = identifier.trim();
        if identifier.is_empty() {
            return Err(ValidationError::missing("user"));
        }
        if secret.trim().is_empty() {
            return Err(ValidationError::missing("password"));
        }
        Ok(Self {
            identifier: identifier.to_string(),
            secret: secret.to_string(),
        })
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("identifier", &self.identifier)
            .field("secret", &"<redacted>")
            .finish()
    }
}

/// Payload of a successful login (`data` of the envelope).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginGrant {
    pub user: SessionUser,
    pub token: String,
}

/// Performs the login round-trip against the backend.
#[async_trait]
pub trait AuthGateway: Send + Sync {
    async fn login(&self, credentials: &Credentials) -> Result<LoginGrant, AuthError>;
}

/// Maps a received `/auth/login` response onto a grant or an [`AuthError`].
///
/// - HTTP 403 is a session conflict.
/// - HTTP 2xx with envelope code 200 (string or number) is a success.
/// - A 2xx body that is not JSON, or whose `data` does not decode, is a
///   [`AuthError::NetworkError`].
/// - Anything else that arrived from the server is invalid credentials.
///
/// Transport failures never reach this function; gateways map them to
/// [`AuthError::NetworkError`] themselves.
pub fn classify_login_response(http_status: u16, body: &[u8]) -> Result<LoginGrant, AuthError> {
    if http_status == SESSION_CONFLICT_STATUS {
        return Err(AuthError::SessionConflict);
    }
    if !(200..300).contains(&http_status) {
        return Err(AuthError::InvalidCredentials);
    }

    let value: Value = match serde_json::from_slice(body) {
        Ok(value) => value,
        Err(e) => {
            return Err(AuthError::NetworkError(format!(
                "unreadable login response: {}",
                e
            )));
        }
    };

    if envelope_code(&value) != Some(200) {
        return Err(AuthError::InvalidCredentials);
    }

    let data = value.get("data").cloned().unwrap_or(Value::Null);
    serde_json::from_value(data)
        .map_err(|e| AuthError::NetworkError(format!("unexpected login response: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    const OK_BODY: &[u8] = br#"{"code":200,"data":{"token":"t0k","user":{"id_cedula":"1","id_empresa":2,"nombre":"Ana","apellidos":"Mora","rol":"A"}}}"#;

    #[test]
    fn test_success_with_numeric_code() {
        let grant = classify_login_response(200, OK_BODY).unwrap();
        assert_eq!(grant.token, "t0k");
        assert_eq!(grant.user.company_id, "2");
    }

    #[test]
    fn test_success_with_string_code() {
        let body = br#"{"code":"200","data":{"token":"x","user":{"id_cedula":"1","id_empresa":"2"}}}"#;
        assert!(classify_login_response(200, body).is_ok());
    }

    #[test]
    fn test_forbidden_is_session_conflict() {
        assert_eq!(
            classify_login_response(403, b"{}").unwrap_err(),
            AuthError::SessionConflict
        );
    }

    #[test]
    fn test_other_statuses_are_invalid_credentials() {
        for status in [400, 401, 404, 500, 503] {
            assert_eq!(
                classify_login_response(status, b"").unwrap_err(),
                AuthError::InvalidCredentials,
                "status {}",
                status
            );
        }
    }

    #[test]
    fn test_envelope_failure_code_is_invalid_credentials() {
        let body = br#"{"code":401,"message":"bad password"}"#;
        assert_eq!(
            classify_login_response(200, body).unwrap_err(),
            AuthError::InvalidCredentials
        );
    }

    #[test]
    fn test_unreadable_success_body_is_network_error() {
        let err = classify_login_response(200, b"<html>gateway</html>").unwrap_err();
        assert!(matches!(err, AuthError::NetworkError(_)), "{:?}", err);

        let err = classify_login_response(200, b"").unwrap_err();
        assert!(matches!(err, AuthError::NetworkError(_)), "{:?}", err);

        // a non-2xx status wins over the body
        assert_eq!(
            classify_login_response(401, b"<html>").unwrap_err(),
            AuthError::InvalidCredentials
        );
    }

    #[test]
    fn test_credentials_require_both_fields() {
        assert_eq!(Credentials::new("  ", "pw").unwrap_err().field(), "user");
        assert_eq!(Credentials::new("101", " ").unwrap_err().field(), "password");
        let creds = Credentials::new(" 101 ", "pw").unwrap();
        assert_eq!(creds.identifier, "101");
        assert!(!format!("{:?}", creds).contains("pw"));
    }
}
