//! reqwest-backed implementation of the backend contracts.

use async_trait::async_trait;
use maph_core::config::ClientConfig;
use maph_core::resource::{
    ApiError, Resource, ResourceClient, UploadFile, expect_list, normalize_response,
};
use maph_core::session::{AuthGateway, Credentials, LoginGrant, classify_login_response};
use maph_core::{AuthError, MaphError};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder};
use serde_json::Value;

/// HTTP client for the MAPH backend.
///
/// One request per call, bounded by the configured timeout. No retries.
#[derive(Debug, Clone)]
pub struct HttpApiClient {
    client: Client,
    base_url: String,
}

impl HttpApiClient {
    pub fn new(config: &ClientConfig) -> Result<Self, MaphError> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| MaphError::config(format!("cannot build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url().to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Sends the request and returns the raw status and body.
    async fn send(&self, request: RequestBuilder) -> Result<(u16, Vec<u8>), ApiError> {
        let response = request.send().await.map_err(transport_error)?;
        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(transport_error)?;
        Ok((status, body.to_vec()))
    }

    async fn call(&self, method: &str, request: RequestBuilder, path: &str) -> Result<Value, ApiError> {
        tracing::debug!("{} {}", method, path);
        let (status, body) = self.send(request).await?;
        let result = normalize_response(status, &body);
        if let Err(e) = &result {
            tracing::warn!("{} {} failed: {}", method, path, e);
        }
        result
    }
}

fn transport_error(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        ApiError::Timeout
    } else {
        ApiError::Transport(err.to_string())
    }
}

fn file_part(file: UploadFile) -> Result<Part, ApiError> {
    let UploadFile {
        file_name,
        mime_type,
        bytes,
        ..
    } = file;
    Part::bytes(bytes)
        .file_name(file_name.clone())
        .mime_str(&mime_type)
        .map_err(|e| ApiError::Transport(format!("cannot attach {} as {}: {}", file_name, mime_type, e)))
}

#[async_trait]
impl ResourceClient for HttpApiClient {
    async fn list(&self, resource: Resource) -> Result<Vec<Value>, ApiError> {
        let path = resource.path();
        let data = self.call("GET", self.client.get(self.url(path)), path).await?;
        expect_list(data)
    }

    async fn create(&self, resource: Resource, payload: Value) -> Result<Value, ApiError> {
        let path = resource.path();
        let request = self.client.post(self.url(path)).json(&payload);
        self.call("POST", request, path).await
    }

    async fn update(
        &self,
        resource: Resource,
        id: Option<&str>,
        partial: Value,
    ) -> Result<Value, ApiError> {
        let path = resource.item_path(id);
        let request = self.client.patch(self.url(&path)).json(&partial);
        self.call("PATCH", request, &path).await
    }

    async fn delete(&self, resource: Resource, id: &str) -> Result<(), ApiError> {
        let path = resource.item_path(Some(id));
        let request = self.client.delete(self.url(&path));
        self.call("DELETE", request, &path).await.map(|_| ())
    }

    async fn upload(
        &self,
        resource: Resource,
        files: Vec<UploadFile>,
        fields: Vec<(String, String)>,
    ) -> Result<(), ApiError> {
        let path = resource.path();
        let mut form = Form::new();
        for file in files {
            let name = file.field_name.clone();
            form = form.part(name, file_part(file)?);
        }
        for (key, value) in fields {
            form = form.text(key, value);
        }

        let request = self.client.post(self.url(path)).multipart(form);
        self.call("POST", request, path).await.map(|_| ())
    }
}

#[async_trait]
impl AuthGateway for HttpApiClient {
    async fn login(&self, credentials: &Credentials) -> Result<LoginGrant, AuthError> {
        let path = Resource::Login.path();
        tracing::debug!("POST {} as {}", path, credentials.identifier);

        let request = self.client.post(self.url(path)).json(credentials);
        let (status, body) = self
            .send(request)
            .await
            .map_err(|e| AuthError::NetworkError(e.to_string()))?;

        classify_login_response(status, &body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serves one canned HTTP response and returns the base URL.
    async fn serve_once(status_line: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = vec![0u8; 8192];
            let _ = socket.read(&mut buf).await;
            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;
        });
        format!("http://{}", addr)
    }

    fn client_for(base: String) -> HttpApiClient {
        let config = ClientConfig {
            api_base_url: base,
            request_timeout_secs: 5,
            ..ClientConfig::default()
        };
        HttpApiClient::new(&config).unwrap()
    }

    #[test]
    fn test_trailing_slash_is_dropped() {
        let client = client_for("http://localhost:3001/".into());
        assert_eq!(client.url("/diary"), "http://localhost:3001/diary");
    }

    #[tokio::test]
    async fn test_list_unwraps_string_code_envelope() {
        let base = serve_once("200 OK", r#"{"code":"200","data":[{"numero_cita":1}]}"#).await;
        let records = client_for(base).list(Resource::Diary).await.unwrap();
        assert_eq!(records.len(), 1);
    }

    #[tokio::test]
    async fn test_error_status_carries_server_message() {
        let base = serve_once("400 Bad Request", r#"{"message":"slot taken"}"#).await;
        let err = client_for(base)
            .create(Resource::Diary, serde_json::json!({}))
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(400));
        assert_eq!(err.server_message(), Some("slot taken"));
    }

    #[tokio::test]
    async fn test_login_forbidden_is_session_conflict() {
        let base = serve_once("403 Forbidden", "{}").await;
        let creds = Credentials::new("101", "secret").unwrap();
        let err = client_for(base).login(&creds).await.unwrap_err();
        assert_eq!(err, AuthError::SessionConflict);
    }

    #[tokio::test]
    async fn test_unreachable_server_is_network_error() {
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let client = client_for(format!("http://127.0.0.1:{}", port));

        let creds = Credentials::new("101", "secret").unwrap();
        assert!(matches!(
            client.login(&creds).await.unwrap_err(),
            AuthError::NetworkError(_)
        ));
        assert!(client.list(Resource::Patients).await.unwrap_err().is_transport());
    }
}
