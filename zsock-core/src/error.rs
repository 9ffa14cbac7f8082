//! zsock Error Types
//!
//! Every failure a factory operation can report. Errors are returned
//! synchronously to the caller; nothing here is retried internally.

use thiserror::Error;

use crate::engine::TransportError;

/// Main error type for socket resolution and construction
#[derive(Error, Debug)]
pub enum ZsockError {
    /// Identifier did not resolve to one of the fixed patterns
    #[error("Unknown socket pattern: {0}")]
    UnknownPattern(String),

    /// Identifier was neither an integer code nor a symbolic name
    #[error("Invalid socket identifier: {0:?} (expected an integer code or a pattern name)")]
    InvalidIdentifierType(String),

    /// Endpoint token had no address component
    #[error("Malformed endpoint: {0:?}")]
    MalformedEndpoint(String),

    /// Failure reported by the transport engine, passed through unchanged
    #[error("Transport failure: {0}")]
    TransportFailure(#[from] TransportError),
}

/// Result type alias for zsock operations
pub type Result<T> = std::result::Result<T, ZsockError>;

impl ZsockError {
    /// Create an unknown pattern error
    pub fn unknown_pattern(identifier: impl ToString) -> Self {
        Self::UnknownPattern(identifier.to_string())
    }

    /// Create a malformed endpoint error
    pub fn malformed_endpoint(token: impl Into<String>) -> Self {
        Self::MalformedEndpoint(token.into())
    }

    /// Check if this error came from identifier resolution
    #[must_use]
    pub const fn is_resolution_error(&self) -> bool {
        matches!(
            self,
            Self::UnknownPattern(_) | Self::InvalidIdentifierType(_)
        )
    }

    /// Check if this error was surfaced by the transport engine
    #[must_use]
    pub const fn is_transport_error(&self) -> bool {
        matches!(self, Self::TransportFailure(_))
    }

    /// The underlying engine error, if any
    #[must_use]
    pub fn transport_error(&self) -> Option<&TransportError> {
        match self {
            Self::TransportFailure(e) => Some(e),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_classification() {
        assert!(ZsockError::unknown_pattern(42).is_resolution_error());
        assert!(ZsockError::InvalidIdentifierType("3.5".into()).is_resolution_error());
        assert!(!ZsockError::malformed_endpoint("@").is_resolution_error());

        let err = ZsockError::from(TransportError::AddressInUse("inproc://a".into()));
        assert!(err.is_transport_error());
        assert!(matches!(
            err.transport_error(),
            Some(TransportError::AddressInUse(addr)) if addr == "inproc://a"
        ));
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            ZsockError::unknown_pattern("FOO").to_string(),
            "Unknown socket pattern: FOO"
        );
        assert_eq!(
            ZsockError::malformed_endpoint(">").to_string(),
            "Malformed endpoint: \">\""
        );
    }
}
