//! Model provider abstraction for the marionette avatar controller.
//!
//! Everything the controller knows about a language-model backend lives
//! behind the [`ModelProvider`] trait. One adapter per backend lives in
//! [`adapters`]; the rest of this crate is the request and reply
//! vocabulary those adapters share.
//!
//! ```rust
//! use mprovider::{Message, ModelRequest};
//!
//! let request = ModelRequest::builder("llama3")
//!     .message(Message::user("wave hello"))
//!     .temperature(0.0)
//!     .build();
//! assert!(request.validate().is_ok());
//! ```

pub mod adapters;
mod credentials;
mod error;
mod model;
mod provider;

pub mod prelude {
    #[cfg(feature = "provider-anthropic")]
    pub use crate::adapters::anthropic::AnthropicProvider;
    #[cfg(feature = "provider-gemini")]
    pub use crate::adapters::gemini::GeminiProvider;
    #[cfg(feature = "provider-ollama")]
    pub use crate::adapters::ollama::OllamaProvider;
    #[cfg(feature = "provider-openai")]
    pub use crate::adapters::openai::OpenAiProvider;
    pub use crate::{
        CredentialStore, Message, ModelProvider, ModelReply, ModelRequest, OutputItem,
        ProviderError, ProviderErrorKind, ProviderFuture, ProviderId, Role, SecretString,
        StopReason, TokenUsage, ToolCall, ToolDefinition,
    };
}

pub use credentials::{CredentialStore, SecretString};
pub use error::{ProviderError, ProviderErrorKind};
pub use model::{
    Message, ModelReply, ModelRequest, ModelRequestBuilder, OutputItem, ProviderId, Role,
    StopReason, TokenUsage, ToolCall, ToolDefinition,
};
pub use provider::{ModelProvider, ProviderFuture};
