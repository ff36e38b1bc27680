//! Unified facade over the marionette workspace crates.
//!
//! This crate is designed to be the single dependency for most applications.
//! It re-exports the core marionette crates and provides convenience
//! utilities and macros for common setup and request-building flows.

mod macros;

pub mod legacy;
pub mod prelude;
pub mod providers;
pub mod util;
pub mod wiring;

pub use mclient;
pub use mcommon;
pub use mexpress;
pub use mobserve;
pub use mprovider;
pub use mstage;

pub use mclient::{
    CHAT_TOKEN_BUDGET, CallHooks, CallReply, ClientError, ClientErrorKind, ClientSession,
    ConfigWarning, DEFAULT_TEMPERATURE, DEFAULT_TIMEOUT_SECS, EMOTION_TOKEN_BUDGET,
    NoopCallHooks, PromptLibrary, ProviderProfile, RESPONSE_BUDGET, Reaction, ResolvedConfig,
    ResponseTimer, Settings, extract_emotion, parse_provider, profile,
};
pub use mcommon::{BoxFuture, GenerationOptions};
pub use mexpress::{
    AvatarRig, DEFAULT_INTENSITY, Emotion, EmotionResult, Expression, ParamRange, chino11,
    expression_catalog,
};
pub use mobserve::{MetricsCallHooks, SafeCallHooks, TracingCallHooks};
pub use mprovider::{
    CredentialStore, Message, ModelProvider, ModelReply, ModelRequest, ModelRequestBuilder,
    OutputItem, ProviderError, ProviderErrorKind, ProviderFuture, ProviderId, Role, SecretString,
    StopReason, TokenUsage, ToolCall, ToolDefinition,
};
pub use mstage::{
    DEFAULT_STAGE_URL, FileTokenStore, InMemoryTokenStore, StageClient, StageConfig, StageError,
    StageErrorKind, StageParameter, TokenStore,
};

pub use providers::build_provider;
pub use util::{assistant_message, parse_provider_id, system_message, user_message};
pub use wiring::{connect, connect_with_hooks};

#[cfg(test)]
mod tests {
    use crate::Role;

    #[test]
    fn mn_msg_macro_creates_expected_message() {
        let message = crate::mn_msg!(user => "hello");
        assert_eq!(message.role, Role::User);
        assert_eq!(message.content, "hello");
    }

    #[test]
    fn mn_messages_macro_builds_message_vector() {
        let messages = crate::mn_messages![
            system => "You are a cheerful avatar.",
            user => "Wave at chat",
        ];

        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, Role::System);
        assert_eq!(messages[1].role, Role::User);
    }

    #[test]
    fn mn_messages_macro_accepts_an_empty_invocation() {
        let messages = crate::mn_messages![];
        assert!(messages.is_empty());
    }
}
