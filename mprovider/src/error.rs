//! Provider-layer errors and classification.

use std::error::Error;
use std::fmt::{Display, Formatter};

/// What went wrong while talking to a backend.
///
/// `MalformedResponse` covers replies the adapter could not decode at
/// all; field-level defects in an otherwise parseable reply are repaired
/// further up the stack instead of surfacing here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderErrorKind {
    Authentication,
    RateLimited,
    InvalidRequest,
    Timeout,
    Transport,
    MalformedResponse,
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderError {
    pub kind: ProviderErrorKind,
    pub message: String,
    /// Whether a caller could reasonably retry the same request.
    /// Adapters only classify; nothing in this crate retries.
    pub retryable: bool,
}

impl ProviderError {
    pub fn new(kind: ProviderErrorKind, message: impl Into<String>, retryable: bool) -> Self {
        Self {
            kind,
            message: message.into(),
            retryable,
        }
    }

    pub fn authentication(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::Authentication, message, false)
    }

    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::RateLimited, message, true)
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::InvalidRequest, message, false)
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::Timeout, message, true)
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::Transport, message, true)
    }

    pub fn malformed_response(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::MalformedResponse, message, false)
    }

    pub fn other(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::Other, message, false)
    }
}

impl Display for ProviderError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}

impl Error for ProviderError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors_assign_expected_retryability() {
        assert!(ProviderError::rate_limited("slow down").retryable);
        assert!(ProviderError::timeout("too slow").retryable);
        assert!(ProviderError::transport("connection reset").retryable);
        assert!(!ProviderError::authentication("bad key").retryable);
        assert!(!ProviderError::invalid_request("empty model").retryable);
        assert!(!ProviderError::malformed_response("not json").retryable);
    }

    #[test]
    fn display_includes_kind_and_message() {
        let error = ProviderError::timeout("call exceeded budget");
        assert_eq!(error.to_string(), "Timeout: call exceeded budget");
    }
}
