//! Application-level errors

use domain::{DomainError, Provider};
use thiserror::Error;

/// Errors that can occur in the application layer
///
/// Provider failures keep the provider they came from, so that a caller
/// showing "the last error" can say which service produced it.
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// Domain-level error (malformed route identifiers among others)
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// The provider rejected the service key
    #[error("{provider} rejected the service key: {message}")]
    AuthKey {
        /// Provider that rejected the key
        provider: Provider,
        /// Provider message
        message: String,
    },

    /// Unexpected payload or non-success result code
    #[error("{provider} protocol error: {message}")]
    RemoteProtocol {
        /// Provider that answered
        provider: Provider,
        /// Provider message, verbatim
        message: String,
    },

    /// The provider reported itself unavailable
    #[error("{provider} unavailable: {message}")]
    UpstreamUnavailable {
        /// Provider that is unavailable
        provider: Provider,
        /// Detail
        message: String,
    },

    /// Connection, timeout or HTTP status failure
    #[error("{provider} transport error: {message}")]
    Transport {
        /// Provider that could not be reached
        provider: Provider,
        /// Detail
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApplicationError {
    /// Check if the service key was rejected
    pub const fn is_auth_error(&self) -> bool {
        matches!(self, Self::AuthKey { .. })
    }

    /// Check if this error is retryable
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::UpstreamUnavailable { .. })
    }

    /// Check if a route identifier could not be decoded
    pub const fn is_malformed_identifier(&self) -> bool {
        matches!(self, Self::Domain(e) if e.is_malformed_identifier())
    }

    /// Provider the error came from, if it came from one
    pub const fn provider(&self) -> Option<Provider> {
        match self {
            Self::AuthKey { provider, .. }
            | Self::RemoteProtocol { provider, .. }
            | Self::UpstreamUnavailable { provider, .. }
            | Self::Transport { provider, .. } => Some(*provider),
            Self::Domain(_) | Self::Configuration(_) | Self::Internal(_) => None,
        }
    }
}
