//! Gateway client struct and builder.

use std::time::Duration;

use crate::error::{GatewayError, map_http_status, map_reqwest_error};
use crate::streaming::{ChunkStream, stream_completion};
use crate::types::{ChatCompletion, ChatRequest};

/// Default gateway base URL.
const DEFAULT_BASE_URL: &str = "http://localhost:8080";

/// Default model requested when a request leaves the model empty.
const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

/// Default timeout for non-streaming requests.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default timeout covering an entire streaming response.
const DEFAULT_STREAM_TIMEOUT: Duration = Duration::from_secs(60);

/// Client for the gateway's chat-completion endpoint.
///
/// Base URL and API key are explicit configuration, not process-wide
/// constants, so independent clients can point at different gateways.
///
/// # Example
///
/// ```no_run
/// use thinkcheck_client::GatewayClient;
///
/// let client = GatewayClient::new()
///     .base_url("http://localhost:8080")
///     .api_key("ak_0123456789");
/// ```
pub struct GatewayClient {
    /// Gateway base URL, without a trailing slash.
    pub(crate) base_url: String,
    /// API key sent as a bearer token. No auth header when unset.
    pub(crate) api_key: Option<String>,
    /// Model used when the request does not name one.
    pub(crate) model: String,
    /// Timeout for non-streaming requests.
    pub(crate) timeout: Duration,
    /// Timeout covering an entire streaming response.
    pub(crate) stream_timeout: Duration,
    /// Shared HTTP client.
    pub(crate) http: reqwest::Client,
}

impl GatewayClient {
    /// Create a new client with sensible defaults.
    ///
    /// Default base URL: `http://localhost:8080`. Default model:
    /// `gpt-3.5-turbo`. No API key until [`GatewayClient::api_key`] is set.
    #[must_use]
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.into(),
            api_key: None,
            model: DEFAULT_MODEL.into(),
            timeout: DEFAULT_TIMEOUT,
            stream_timeout: DEFAULT_STREAM_TIMEOUT,
            http: reqwest::Client::new(),
        }
    }

    /// Override the gateway base URL.
    #[must_use]
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the API key sent as `Authorization: Bearer <key>`.
    #[must_use]
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Override the default model.
    ///
    /// This is used when [`ChatRequest::model`] is left empty.
    #[must_use]
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Override the non-streaming request timeout.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Override the timeout covering an entire streaming response.
    #[must_use]
    pub fn stream_timeout(mut self, timeout: Duration) -> Self {
        self.stream_timeout = timeout;
        self
    }

    /// Build the chat-completion endpoint URL.
    pub(crate) fn chat_url(&self) -> String {
        format!("{}/v1/chat/completions", self.base_url)
    }

    /// Build the health endpoint URL.
    pub(crate) fn health_url(&self) -> String {
        format!("{}/health", self.base_url)
    }

    /// POST builder for a chat request with auth and content-type headers.
    pub(crate) fn chat_builder(
        &self,
        request: &ChatRequest,
        timeout: Duration,
    ) -> reqwest::RequestBuilder {
        let mut builder = self
            .http
            .post(self.chat_url())
            .header("content-type", "application/json")
            .timeout(timeout)
            .json(request);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }
        builder
    }

    /// Fill in client defaults and the stream flag.
    fn prepare(&self, mut request: ChatRequest, stream: bool) -> ChatRequest {
        if request.model.is_empty() {
            request.model = self.model.clone();
        }
        request.stream = stream;
        request
    }

    /// Send a non-streaming chat completion.
    ///
    /// Non-2xx statuses map through the error taxonomy (401/403 become
    /// [`GatewayError::Authentication`]); a body that does not decode as a
    /// [`ChatCompletion`] becomes [`GatewayError::InvalidResponse`].
    pub async fn complete(&self, request: ChatRequest) -> Result<ChatCompletion, GatewayError> {
        let request = self.prepare(request, false);

        tracing::debug!(url = %self.chat_url(), model = %request.model, "sending chat completion request");

        let response = self
            .chat_builder(&request, self.timeout)
            .send()
            .await
            .map_err(|e| map_reqwest_error(e, self.timeout))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| map_reqwest_error(e, self.timeout))?;

        if !status.is_success() {
            return Err(map_http_status(status, &body));
        }

        serde_json::from_str(&body)
            .map_err(|e| GatewayError::InvalidResponse(format!("invalid JSON response: {e}")))
    }

    /// Send a streaming chat completion.
    ///
    /// Forces `stream: true` on the request. Non-2xx statuses are mapped
    /// before any frame is read; afterwards the returned [`ChunkStream`]
    /// carries classified frames until `[DONE]`, end of body, or a transport
    /// error.
    pub async fn complete_stream(&self, request: ChatRequest) -> Result<ChunkStream, GatewayError> {
        let request = self.prepare(request, true);

        tracing::debug!(url = %self.chat_url(), model = %request.model, "sending streaming chat completion request");

        let response = self
            .chat_builder(&request, self.stream_timeout)
            .send()
            .await
            .map_err(|e| map_reqwest_error(e, self.stream_timeout))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .map_err(|e| map_reqwest_error(e, self.stream_timeout))?;
            return Err(map_http_status(status, &body));
        }

        Ok(stream_completion(response))
    }
}

impl Default for GatewayClient {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_set() {
        let client = GatewayClient::new();
        assert_eq!(client.base_url, DEFAULT_BASE_URL);
        assert_eq!(client.model, DEFAULT_MODEL);
        assert!(client.api_key.is_none());
        assert_eq!(client.timeout, DEFAULT_TIMEOUT);
        assert_eq!(client.stream_timeout, DEFAULT_STREAM_TIMEOUT);
    }

    #[test]
    fn builder_overrides() {
        let client = GatewayClient::new()
            .base_url("http://gateway:9000")
            .api_key("ak_test")
            .model("gpt-4")
            .timeout(Duration::from_secs(5))
            .stream_timeout(Duration::from_secs(10));
        assert_eq!(client.base_url, "http://gateway:9000");
        assert_eq!(client.api_key.as_deref(), Some("ak_test"));
        assert_eq!(client.model, "gpt-4");
        assert_eq!(client.timeout, Duration::from_secs(5));
        assert_eq!(client.stream_timeout, Duration::from_secs(10));
    }

    #[test]
    fn chat_url_includes_path() {
        let client = GatewayClient::new().base_url("http://localhost:9999");
        assert_eq!(client.chat_url(), "http://localhost:9999/v1/chat/completions");
    }

    #[test]
    fn health_url_includes_path() {
        let client = GatewayClient::new().base_url("http://localhost:9999");
        assert_eq!(client.health_url(), "http://localhost:9999/health");
    }

    #[test]
    fn prepare_fills_default_model() {
        let client = GatewayClient::new().model("gpt-4");
        let request = client.prepare(crate::types::ChatRequest::user("hi"), false);
        assert_eq!(request.model, "gpt-4");
        assert!(!request.stream);
    }

    #[test]
    fn prepare_keeps_explicit_model() {
        let client = GatewayClient::new();
        let request = crate::types::ChatRequest::user("hi").model("mistral");
        let request = client.prepare(request, true);
        assert_eq!(request.model, "mistral");
        assert!(request.stream);
    }

    #[test]
    fn default_impl_matches_new() {
        let client = GatewayClient::default();
        assert_eq!(client.base_url, DEFAULT_BASE_URL);
    }
}
