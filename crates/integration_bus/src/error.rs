//! Provider error types
//!
//! Every adapter classifies its authority's error payloads into these
//! variants at its boundary; nothing above this crate sees provider codes.

use thiserror::Error;

/// Errors that can occur while talking to a bus route provider
#[derive(Debug, Error)]
pub enum BusApiError {
    /// The provider rejected the service key
    #[error("Service key rejected: {0}")]
    AuthKey(String),

    /// Unexpected payload shape or non-success result code (provider message verbatim)
    #[error("Remote protocol error: {0}")]
    RemoteProtocol(String),

    /// The provider answered with an explicit "service unavailable" body
    #[error("Upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    /// Connection to the provider failed
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// HTTP request failed (non-success status or unreadable body)
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// Request timeout
    #[error("Request timed out after {timeout_secs} seconds")]
    Timeout {
        /// The timeout duration in seconds
        timeout_secs: u64,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigurationError(String),
}

impl BusApiError {
    /// Returns true if the whole call may be retried
    ///
    /// Only the explicit unavailable marker qualifies; key rejections and
    /// protocol errors would fail the same way again.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::UpstreamUnavailable(_))
    }

    /// Returns true if the provider rejected the credential
    #[must_use]
    pub const fn is_auth_error(&self) -> bool {
        matches!(self, Self::AuthKey(_))
    }

    /// Map a reqwest send error, distinguishing timeouts
    pub(crate) fn from_send(err: &reqwest::Error, timeout_secs: u64) -> Self {
        if err.is_timeout() {
            Self::Timeout { timeout_secs }
        } else {
            Self::ConnectionFailed(err.to_string())
        }
    }
}
