//! Client-level error types and conversions from provider failures.
//!
//! ```rust
//! use mclient::{ClientError, ClientErrorKind};
//!
//! let err = ClientError::missing_credential("OPENAI_API_KEY is required");
//! assert_eq!(err.kind, ClientErrorKind::MissingCredential);
//! assert!(err.is_configuration());
//! ```

use std::error::Error;
use std::fmt::{Display, Formatter};

use mprovider::{ProviderError, ProviderErrorKind, ProviderId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientErrorKind {
    MissingCredential,
    InvalidProvider,
    InvalidValue,
    Authentication,
    Network,
    RateLimited,
    Timeout,
    MalformedResponse,
}

/// A failure surfaced to callers of the client facade.
///
/// Configuration kinds are raised before any network activity; the rest
/// describe a single failed call. Messages never carry credential values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientError {
    pub kind: ClientErrorKind,
    pub message: String,
}

impl ClientError {
    pub fn new(kind: ClientErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn missing_credential(message: impl Into<String>) -> Self {
        Self::new(ClientErrorKind::MissingCredential, message)
    }

    pub fn invalid_provider(message: impl Into<String>) -> Self {
        Self::new(ClientErrorKind::InvalidProvider, message)
    }

    pub fn invalid_value(message: impl Into<String>) -> Self {
        Self::new(ClientErrorKind::InvalidValue, message)
    }

    pub fn authentication(message: impl Into<String>) -> Self {
        Self::new(ClientErrorKind::Authentication, message)
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(ClientErrorKind::Network, message)
    }

    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self::new(ClientErrorKind::RateLimited, message)
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(ClientErrorKind::Timeout, message)
    }

    pub fn malformed_response(message: impl Into<String>) -> Self {
        Self::new(ClientErrorKind::MalformedResponse, message)
    }

    /// True for failures raised by the configuration resolver.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self.kind,
            ClientErrorKind::MissingCredential
                | ClientErrorKind::InvalidProvider
                | ClientErrorKind::InvalidValue
        )
    }

    /// Prefixes the message with the provider that produced the failure.
    pub fn for_provider(mut self, provider: ProviderId) -> Self {
        self.message = format!("{provider}: {}", self.message);
        self
    }
}

impl Display for ClientError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}

impl Error for ClientError {}

impl From<ProviderError> for ClientError {
    fn from(value: ProviderError) -> Self {
        let kind = match value.kind {
            ProviderErrorKind::Authentication => ClientErrorKind::Authentication,
            ProviderErrorKind::RateLimited => ClientErrorKind::RateLimited,
            ProviderErrorKind::Timeout => ClientErrorKind::Timeout,
            ProviderErrorKind::MalformedResponse => ClientErrorKind::MalformedResponse,
            ProviderErrorKind::InvalidRequest
            | ProviderErrorKind::Transport
            | ProviderErrorKind::Other => ClientErrorKind::Network,
        };
        ClientError::new(kind, value.message)
    }
}

#[cfg(test)]
mod tests {
    use mprovider::{ProviderError, ProviderId};

    use super::{ClientError, ClientErrorKind};

    #[test]
    fn configuration_kinds_are_flagged() {
        assert!(ClientError::missing_credential("k").is_configuration());
        assert!(ClientError::invalid_provider("p").is_configuration());
        assert!(ClientError::invalid_value("v").is_configuration());
        assert!(!ClientError::timeout("t").is_configuration());
    }

    #[test]
    fn provider_failures_map_kind_for_kind() {
        let err = ClientError::from(ProviderError::rate_limited("busy"));
        assert_eq!(err.kind, ClientErrorKind::RateLimited);

        let err = ClientError::from(ProviderError::authentication("denied"));
        assert_eq!(err.kind, ClientErrorKind::Authentication);

        let err = ClientError::from(ProviderError::malformed_response("bad body"));
        assert_eq!(err.kind, ClientErrorKind::MalformedResponse);
    }

    #[test]
    fn transport_failures_surface_as_network() {
        let err = ClientError::from(ProviderError::transport("connection refused"));
        assert_eq!(err.kind, ClientErrorKind::Network);

        let err = ClientError::from(ProviderError::invalid_request("bad shape"));
        assert_eq!(err.kind, ClientErrorKind::Network);
    }

    #[test]
    fn display_names_the_kind_and_provider_context() {
        let err = ClientError::timeout("no reply within 30s").for_provider(ProviderId::Gemini);
        let rendered = err.to_string();
        assert!(rendered.contains("Timeout"));
        assert!(rendered.contains("gemini"));
    }
}
