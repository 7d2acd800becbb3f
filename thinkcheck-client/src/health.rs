//! Best-effort liveness probe for the gateway.
//!
//! Two steps: a dedicated `GET /health` endpoint first, then a minimal chat
//! request for gateways that do not expose one. The probe reports, it never
//! fails — every failure mode folds into a [`ServiceHealth`] variant.

use std::time::Duration;

use crate::client::GatewayClient;
use crate::types::ChatRequest;

/// Timeout for the dedicated health endpoint.
const HEALTH_TIMEOUT: Duration = Duration::from_secs(5);

/// Timeout for the fallback chat probe.
const PROBE_TIMEOUT: Duration = Duration::from_secs(10);

/// Token cap for the fallback chat probe.
const PROBE_MAX_TOKENS: u32 = 10;

/// Outcome of a liveness probe.
///
/// Liveness and credential validity are separate signals: a gateway that
/// rejects the API key is alive. [`ServiceHealth::AuthRejected`] counts as
/// reachable but is never reported as healthy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceHealth {
    /// The gateway answered 2xx on `/health` or the chat probe.
    Healthy,
    /// The gateway is running but rejected the credentials (HTTP 401/403).
    AuthRejected,
    /// The gateway answered the chat probe with an unexpected status.
    Unhealthy {
        /// The status code it answered with.
        status: u16,
    },
    /// No answer at all (connection refused, DNS failure, timeout).
    Unreachable {
        /// Transport-level failure description.
        reason: String,
    },
}

impl ServiceHealth {
    /// Whether the gateway is accepting connections at all.
    #[must_use]
    pub fn is_reachable(&self) -> bool {
        matches!(self, Self::Healthy | Self::AuthRejected)
    }
}

/// Probe the gateway.
///
/// Tries `GET /health` first; when that endpoint is missing or broken, a
/// one-message chat request with a tiny token cap takes its place.
pub async fn probe(client: &GatewayClient) -> ServiceHealth {
    match client
        .http
        .get(client.health_url())
        .timeout(HEALTH_TIMEOUT)
        .send()
        .await
    {
        Ok(response) if response.status().is_success() => return ServiceHealth::Healthy,
        Ok(response) => {
            tracing::debug!(status = %response.status(), "health endpoint unusable, falling back to chat probe");
        }
        Err(e) => {
            tracing::debug!(error = %e, "health endpoint unreachable, falling back to chat probe");
        }
    }

    let request = ChatRequest::user("hello")
        .model(client.model.clone())
        .max_tokens(PROBE_MAX_TOKENS);

    match client.chat_builder(&request, PROBE_TIMEOUT).send().await {
        Ok(response) => {
            let status = response.status();
            if status.is_success() {
                ServiceHealth::Healthy
            } else {
                match status.as_u16() {
                    401 | 403 => ServiceHealth::AuthRejected,
                    code => ServiceHealth::Unhealthy { status: code },
                }
            }
        }
        Err(e) => ServiceHealth::Unreachable {
            reason: e.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn healthy_and_auth_rejected_are_reachable() {
        assert!(ServiceHealth::Healthy.is_reachable());
        assert!(ServiceHealth::AuthRejected.is_reachable());
    }

    #[test]
    fn unhealthy_and_unreachable_are_not() {
        assert!(!ServiceHealth::Unhealthy { status: 500 }.is_reachable());
        assert!(
            !ServiceHealth::Unreachable {
                reason: "connection refused".into()
            }
            .is_reachable()
        );
    }

    #[test]
    fn auth_rejected_is_not_healthy() {
        assert_ne!(ServiceHealth::AuthRejected, ServiceHealth::Healthy);
    }
}
