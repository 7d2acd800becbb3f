//! Error types for gateway operations.

use std::time::Duration;

/// Errors from gateway chat-completion operations.
///
/// Transport failures ([`GatewayError::Network`], [`GatewayError::Timeout`])
/// abort the current operation; everything else describes an answer the
/// gateway actually gave.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    // Transport failures
    /// Network-level error (connection refused, DNS failure, reset).
    #[error("network error: {0}")]
    Network(#[source] Box<dyn std::error::Error + Send + Sync>),
    /// Request timed out.
    #[error("timeout after {0:?}")]
    Timeout(Duration),

    // Gateway answers
    /// Authentication/authorization failure (HTTP 401/403).
    #[error("authentication failed: {0}")]
    Authentication(String),
    /// Any other non-2xx response.
    #[error("HTTP {status}: {body}")]
    Http {
        /// Response status code.
        status: u16,
        /// Response body text.
        body: String,
    },
    /// Response body did not decode as the expected shape.
    #[error("invalid response: {0}")]
    InvalidResponse(String),
    /// The streaming read loop failed.
    #[error("stream error: {0}")]
    Stream(#[from] StreamError),
}

impl GatewayError {
    /// Whether this is a transport failure rather than a gateway answer.
    #[must_use]
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Network(_) | Self::Timeout(_))
    }

    /// Whether this error is likely transient and a fresh request may succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network(_) | Self::Timeout(_) => true,
            Self::Http { status, .. } => (500..=599).contains(status),
            Self::Stream(e) => e.is_retryable,
            Self::Authentication(_) | Self::InvalidResponse(_) => false,
        }
    }
}

/// Failure while reading a streaming response body.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{message}")]
pub struct StreamError {
    /// Human-readable description.
    pub message: String,
    /// Whether a fresh request might succeed.
    pub is_retryable: bool,
}

impl StreamError {
    /// A transient failure (connection reset, read timeout).
    #[must_use]
    pub fn retryable(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            is_retryable: true,
        }
    }

    /// A permanent failure.
    #[must_use]
    pub fn non_retryable(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            is_retryable: false,
        }
    }
}

/// Map a [`reqwest::Error`] to a [`GatewayError`].
pub(crate) fn map_reqwest_error(err: reqwest::Error, timeout: Duration) -> GatewayError {
    if err.is_timeout() {
        GatewayError::Timeout(timeout)
    } else {
        GatewayError::Network(Box::new(err))
    }
}

/// Map a non-2xx status (and its body) to a [`GatewayError`].
pub(crate) fn map_http_status(status: reqwest::StatusCode, body: &str) -> GatewayError {
    match status.as_u16() {
        401 | 403 => GatewayError::Authentication(body.to_string()),
        code => GatewayError::Http {
            status: code,
            body: body.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_401_maps_to_authentication() {
        let err = map_http_status(reqwest::StatusCode::UNAUTHORIZED, "bad key");
        assert!(matches!(err, GatewayError::Authentication(msg) if msg == "bad key"));
    }

    #[test]
    fn status_403_maps_to_authentication() {
        let err = map_http_status(reqwest::StatusCode::FORBIDDEN, "forbidden");
        assert!(matches!(err, GatewayError::Authentication(msg) if msg == "forbidden"));
    }

    #[test]
    fn status_500_maps_to_http_with_status_and_body() {
        let err = map_http_status(reqwest::StatusCode::INTERNAL_SERVER_ERROR, "boom");
        match err {
            GatewayError::Http { status, body } => {
                assert_eq!(status, 500);
                assert_eq!(body, "boom");
            }
            other => panic!("expected Http, got: {other:?}"),
        }
    }

    #[test]
    fn status_5xx_is_retryable() {
        let err = map_http_status(reqwest::StatusCode::BAD_GATEWAY, "bad gateway");
        assert!(err.is_retryable());
    }

    #[test]
    fn status_400_is_not_retryable() {
        let err = map_http_status(reqwest::StatusCode::BAD_REQUEST, "bad body");
        assert!(!err.is_retryable());
    }

    #[test]
    fn authentication_is_not_retryable() {
        let err = map_http_status(reqwest::StatusCode::UNAUTHORIZED, "bad key");
        assert!(!err.is_retryable());
    }

    #[test]
    fn transport_errors_are_transport_and_retryable() {
        let err = GatewayError::Timeout(Duration::from_secs(30));
        assert!(err.is_transport());
        assert!(err.is_retryable());
    }

    #[test]
    fn http_answers_are_not_transport() {
        let err = map_http_status(reqwest::StatusCode::INTERNAL_SERVER_ERROR, "boom");
        assert!(!err.is_transport());
    }

    #[test]
    fn stream_error_constructors() {
        let transient = StreamError::retryable("connection reset");
        assert!(transient.is_retryable);
        assert_eq!(transient.message, "connection reset");

        let terminal = StreamError::non_retryable("bad frame encoding");
        assert!(!terminal.is_retryable);
    }

    #[test]
    fn stream_error_display_shows_message() {
        let err = StreamError::retryable("unexpected EOF");
        assert_eq!(format!("{err}"), "unexpected EOF");
    }

    #[test]
    fn stream_error_wraps_into_gateway_error() {
        let err = GatewayError::from(StreamError::retryable("reset"));
        assert!(err.is_retryable());
        assert!(matches!(err, GatewayError::Stream(_)));
    }

    #[test]
    fn empty_body_preserved_in_error() {
        let err = map_http_status(reqwest::StatusCode::BAD_REQUEST, "");
        assert!(matches!(err, GatewayError::Http { body, .. } if body.is_empty()));
    }
}
