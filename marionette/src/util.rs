//! Small convenience constructors for common types.

use crate::{Message, ProviderId};

pub fn system_message(content: impl Into<String>) -> Message {
    Message::system(content)
}

pub fn user_message(content: impl Into<String>) -> Message {
    Message::user(content)
}

pub fn assistant_message(content: impl Into<String>) -> Message {
    Message::assistant(content)
}

/// Option-returning provider lookup for flag parsing; accepts the same
/// aliases as the configuration layer.
pub fn parse_provider_id(value: &str) -> Option<ProviderId> {
    mclient::parse_provider(value).ok()
}

#[cfg(test)]
mod tests {
    use crate::{ProviderId, Role};

    use super::{parse_provider_id, system_message, user_message};

    #[test]
    fn parse_provider_id_supports_aliases() {
        assert_eq!(parse_provider_id("ollama"), Some(ProviderId::Ollama));
        assert_eq!(parse_provider_id("local"), Some(ProviderId::Ollama));
        assert_eq!(parse_provider_id("google"), Some(ProviderId::Gemini));
        assert_eq!(parse_provider_id("Claude"), Some(ProviderId::Anthropic));
        assert_eq!(parse_provider_id("unknown"), None);
    }

    #[test]
    fn message_helpers_apply_expected_roles() {
        assert_eq!(system_message("be brief").role, Role::System);
        assert_eq!(user_message("hello").role, Role::User);
    }
}
