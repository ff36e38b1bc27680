//! Common imports for most marionette applications.

pub use crate::{
    assistant_message, build_provider, connect, connect_with_hooks, parse_provider_id,
    system_message, user_message,
};
pub use crate::{mn_messages, mn_msg};
pub use crate::{
    AvatarRig, BoxFuture, CallHooks, CallReply, ClientError, ClientErrorKind, ClientSession,
    ConfigWarning, Emotion, EmotionResult, Expression, FileTokenStore, Message,
    MetricsCallHooks, ModelProvider, ModelRequest, ModelRequestBuilder, NoopCallHooks,
    PromptLibrary, ProviderError, ProviderId, Reaction, ResolvedConfig, ResponseTimer, Role,
    Settings, StageClient, StageConfig, StageError, TokenStore, ToolCall, ToolDefinition,
    TracingCallHooks, chino11, expression_catalog,
};
