//! Hansard API client.
//!
//! Owns the base URL and the HTTP adapter, and knows the backend's
//! endpoints: the streaming debate endpoint and the health check. Generic
//! over [`HttpClient`] so the whole pipeline runs against a mock in tests.

use tokio_util::sync::CancellationToken;

use crate::adapters::ReqwestHttpClient;
use crate::config::ClientConfig;
use crate::models::DebateRequest;
use crate::session::{SessionOutcome, StreamSession};
use crate::traits::{ByteStream, Headers, HttpClient, HttpError, SessionObserver};

/// Client for the debate backend.
pub struct HansardClient<C = ReqwestHttpClient> {
    config: ClientConfig,
    http: C,
}

impl HansardClient<ReqwestHttpClient> {
    /// Create a client with default configuration and the production
    /// HTTP adapter.
    pub fn new() -> Self {
        Self::with_config(ClientConfig::default())
    }

    /// Create a client with the given configuration.
    pub fn with_config(config: ClientConfig) -> Self {
        Self {
            config,
            http: ReqwestHttpClient::new(),
        }
    }

    /// Create a client pointed at a custom base URL.
    pub fn with_base_url(url: impl Into<String>) -> Self {
        Self::with_config(ClientConfig::default().with_base_url(url))
    }
}

impl Default for HansardClient<ReqwestHttpClient> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: HttpClient> HansardClient<C> {
    /// Create a client with a custom HTTP adapter.
    pub fn with_http_client(config: ClientConfig, http: C) -> Self {
        Self { config, http }
    }

    /// The configuration in use.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Open the streaming debate request and return the response body.
    ///
    /// A non-success status fails here with [`HttpError::Status`]; the body
    /// stream is never handed out in that case.
    pub(crate) async fn open_stream(
        &self,
        request: &DebateRequest,
    ) -> Result<ByteStream, HttpError> {
        let url = format!("{}/api/full_debate", self.config.base_url);
        let body =
            serde_json::to_string(request).map_err(|err| HttpError::Other(err.to_string()))?;

        let mut headers = Headers::new();
        headers.insert("Content-Type".to_string(), "application/json".to_string());
        headers.insert("Accept".to_string(), "text/event-stream".to_string());

        self.http.post_stream(&url, &body, &headers).await
    }

    /// Stream one full debate, reporting through the observer.
    ///
    /// Convenience wrapper that builds the session with this client's
    /// resolver mode. The caller keeps the token to cancel mid-flight.
    pub async fn stream_full_debate<O: SessionObserver>(
        &self,
        request: DebateRequest,
        observer: &mut O,
        cancel: CancellationToken,
    ) -> SessionOutcome {
        StreamSession::new(request)
            .with_resolver_mode(self.config.resolver_mode)
            .with_cancellation_token(cancel)
            .run(self, observer)
            .await
    }

    /// Check whether the backend is reachable and healthy.
    pub async fn health_check(&self) -> Result<bool, HttpError> {
        let url = format!("{}/api/health", self.config.base_url);
        let response = self.http.get(&url, &Headers::new()).await?;
        Ok(response.is_success())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::mock::{MockHttpClient, MockResponse};
    use crate::traits::Response;
    use bytes::Bytes;

    #[test]
    fn test_new_uses_default_base_url() {
        let client = HansardClient::new();
        assert_eq!(client.config().base_url, crate::config::DEFAULT_BASE_URL);
    }

    #[test]
    fn test_with_base_url() {
        let client = HansardClient::with_base_url("http://10.0.0.5:8000/");
        assert_eq!(client.config().base_url, "http://10.0.0.5:8000");
    }

    #[tokio::test]
    async fn test_open_stream_posts_request_body() {
        let mock = MockHttpClient::new();
        mock.set_default_stream(vec![]);
        let client = HansardClient::with_http_client(ClientConfig::default(), mock.clone());

        let request = DebateRequest::new("1st July 2025").with_topic("Budget");
        client.open_stream(&request).await.unwrap();

        let recorded = mock.requests();
        assert_eq!(recorded.len(), 1);
        assert!(recorded[0].url.ends_with("/api/full_debate"));
        assert_eq!(
            recorded[0].headers.get("Accept").map(String::as_str),
            Some("text/event-stream")
        );
        let body: serde_json::Value =
            serde_json::from_str(recorded[0].body.as_deref().unwrap()).unwrap();
        assert_eq!(body["date"], "1st July 2025");
        assert_eq!(body["topic"], "Budget");
    }

    #[tokio::test]
    async fn test_health_check_true_on_success() {
        let mock = MockHttpClient::new();
        mock.set_default_response(MockResponse::Success(Response::new(200, Bytes::new())));
        let client = HansardClient::with_http_client(ClientConfig::default(), mock);
        assert!(client.health_check().await.unwrap());
    }

    #[tokio::test]
    async fn test_health_check_false_on_error_status() {
        let mock = MockHttpClient::new();
        mock.set_default_response(MockResponse::Success(Response::new(500, Bytes::new())));
        let client = HansardClient::with_http_client(ClientConfig::default(), mock);
        assert!(!client.health_check().await.unwrap());
    }
}
