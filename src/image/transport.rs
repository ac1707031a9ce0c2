//! The network seam.

use crate::config::{non_blank_env, ApiKey, BASE_URL_ENV, DEFAULT_BASE_URL};
use crate::error::sanitize_error_message;
use crate::image::prompt::ModelRequest;
use crate::image::wire::GenerateContentResponse;
use async_trait::async_trait;

/// A failure raised below the interpreter: network, HTTP status or decode.
///
/// Carries only a message; callers classify it with
/// [`VintifyError::classify`](crate::VintifyError::classify).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct TransportError {
    /// Raw error text, status code included when there was one.
    pub message: String,
}

impl TransportError {
    /// Creates a transport error from any message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        Self::new(err.to_string())
    }
}

/// Sends a built request to the generation service.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Performs one `generateContent` call.
    async fn generate_content(
        &self,
        api_key: &ApiKey,
        request: &ModelRequest,
    ) -> std::result::Result<GenerateContentResponse, TransportError>;
}

/// HTTP transport against the Gemini Developer API.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

impl HttpTransport {
    /// Creates a transport for the given API base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Uses `VINTIFY_BASE_URL` if set, else the public endpoint.
    pub fn from_env() -> Self {
        non_blank_env(BASE_URL_ENV)
            .map(Self::new)
            .unwrap_or_default()
    }

    /// The API base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, model: &str) -> String {
        format!("{}/models/{}:generateContent", self.base_url, model)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn generate_content(
        &self,
        api_key: &ApiKey,
        request: &ModelRequest,
    ) -> std::result::Result<GenerateContentResponse, TransportError> {
        let url = self.endpoint(request.model());
        tracing::debug!(model = request.model(), "sending generateContent request");

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", api_key.expose())
            .header("Content-Type", "application/json")
            .json(request.body())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(TransportError::new(format!(
                "{}: {}",
                status,
                sanitize_error_message(&text)
            )));
        }

        let body: GenerateContentResponse = response.json().await?;
        tracing::debug!(
            candidates = body.candidates.len(),
            "received generateContent response"
        );
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_format() {
        let transport = HttpTransport::new("https://example.test/v1beta/");
        assert_eq!(transport.base_url(), "https://example.test/v1beta");
        assert_eq!(
            transport.endpoint("gemini-2.5-flash-image"),
            "https://example.test/v1beta/models/gemini-2.5-flash-image:generateContent"
        );
    }

    #[test]
    fn test_default_base_url() {
        assert_eq!(HttpTransport::default().base_url(), DEFAULT_BASE_URL);
    }

    #[test]
    fn test_transport_error_display() {
        let err = TransportError::new("503 Service Unavailable: overloaded");
        assert_eq!(err.to_string(), "503 Service Unavailable: overloaded");
    }
}
