use std::error::Error;
use std::fmt;

/// Broad classification of an avatar host failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StageErrorKind {
    /// The socket could not be opened or dropped mid-exchange.
    Connect,
    /// The host replied with something the protocol does not allow.
    Protocol,
    /// The host refused to authenticate the plugin.
    Rejected,
    /// Reading or writing the cached session token failed.
    Io,
}

/// Error raised by the stage client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageError {
    pub kind: StageErrorKind,
    pub message: String,
}

impl StageError {
    pub fn new(kind: StageErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn connect(message: impl Into<String>) -> Self {
        Self::new(StageErrorKind::Connect, message)
    }

    pub fn protocol(message: impl Into<String>) -> Self {
        Self::new(StageErrorKind::Protocol, message)
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self::new(StageErrorKind::Rejected, message)
    }

    pub fn io(message: impl Into<String>) -> Self {
        Self::new(StageErrorKind::Io, message)
    }
}

impl fmt::Display for StageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}

impl Error for StageError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_kind_and_message() {
        let error = StageError::rejected("plugin was denied");
        assert_eq!(error.to_string(), "Rejected: plugin was denied");
    }

    #[test]
    fn constructors_tag_the_kind() {
        assert_eq!(StageError::connect("x").kind, StageErrorKind::Connect);
        assert_eq!(StageError::protocol("x").kind, StageErrorKind::Protocol);
        assert_eq!(StageError::io("x").kind, StageErrorKind::Io);
    }
}
