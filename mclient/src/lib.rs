//! Unified LLM client facade for the avatar controller.
//!
//! One session speaks to one provider for its whole lifetime. The
//! resolver validates configuration before any network call, the session
//! times and bounds every call, and the normalizer turns noisy replies
//! into rig-ready emotion readings.
//!
//! ```rust
//! use mclient::Settings;
//!
//! let config = Settings::new().resolve().expect("defaults need no credentials");
//! assert_eq!(config.model, "llama3");
//! assert_eq!(config.timeout.as_secs(), 30);
//! ```

mod config;
mod error;
mod extract;
mod hooks;
mod perf;
mod prompt;
mod session;

pub mod prelude {
    pub use crate::{
        CallHooks, CallReply, ClientError, ClientErrorKind, ClientSession, ConfigWarning,
        NoopCallHooks, PromptLibrary, Reaction, ResolvedConfig, ResponseTimer, Settings,
        extract_emotion,
    };
}

pub use config::{
    ConfigWarning, DEFAULT_TEMPERATURE, DEFAULT_TIMEOUT_SECS, ENV_ANTHROPIC_API_KEY,
    ENV_GOOGLE_API_KEY, ENV_MODEL, ENV_OLLAMA_BASE_URL, ENV_OPENAI_API_KEY, ENV_PROVIDER,
    ENV_TEMPERATURE, ENV_TIMEOUT, ProviderProfile, ResolvedConfig, Settings, parse_provider,
    profile,
};
pub use error::{ClientError, ClientErrorKind};
pub use extract::extract_emotion;
pub use hooks::{CallHooks, NoopCallHooks};
pub use perf::{RESPONSE_BUDGET, ResponseTimer};
pub use prompt::PromptLibrary;
pub use session::{
    CHAT_TOKEN_BUDGET, CallReply, ClientSession, EMOTION_TOKEN_BUDGET, Reaction,
};
