//! Domain-level errors

use thiserror::Error;

/// Errors that can occur in the domain layer
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// Route identifier could not be decoded
    #[error("Malformed route identifier: {0}")]
    MalformedIdentifier(String),

    /// Identifier codec was configured with an unusable tag/delimiter pair
    #[error("Invalid identifier codec: {0}")]
    InvalidCodec(String),

    /// Validation failed
    #[error("Validation failed: {0}")]
    ValidationError(String),
}

impl DomainError {
    /// Create a malformed identifier error
    pub fn malformed(id: impl Into<String>) -> Self {
        Self::MalformedIdentifier(id.into())
    }

    /// Returns true if this error was caused by a bad route identifier
    #[must_use]
    pub const fn is_malformed_identifier(&self) -> bool {
        matches!(self, Self::MalformedIdentifier(_))
    }
}
