//! Compatibility entry points kept from the controller's original
//! free-function surface. New code should build a [`ClientSession`] through
//! [`crate::connect`] instead.

use mclient::{ClientError, ClientSession, Settings};
use mexpress::EmotionResult;
use mprovider::ProviderId;
use tokio::sync::{Mutex, OnceCell};

pub use mclient::extract_emotion as extract_emotion_from_text;

static DEFAULT_SESSION: OnceCell<Mutex<ClientSession>> = OnceCell::const_new();

/// Classifies `text` through a process-wide default session, constructed
/// from environment settings on first use.
pub async fn get_emotion_for_text(text: &str) -> Result<EmotionResult, ClientError> {
    let session = DEFAULT_SESSION
        .get_or_try_init(|| async { crate::connect(Settings::from_env()).map(Mutex::new) })
        .await?;
    session.lock().await.classify_emotion(text).await
}

/// Providers the controller can talk to, in canonical order.
pub fn supported_providers() -> [ProviderId; 4] {
    ProviderId::ALL
}

/// Default model used for `provider` when no override is configured.
pub fn default_model_for(provider: ProviderId) -> &'static str {
    mclient::profile(provider).default_model
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn supported_providers_cover_the_closed_set() {
        let providers = supported_providers();
        assert_eq!(providers.len(), 4);
        assert_eq!(providers[0], ProviderId::Ollama);
        assert!(providers.contains(&ProviderId::Gemini));
    }

    #[test]
    fn default_models_match_the_profiles() {
        assert_eq!(default_model_for(ProviderId::Ollama), "llama3");
        assert_eq!(default_model_for(ProviderId::Gemini), "gemini-1.5-flash");
        assert_eq!(default_model_for(ProviderId::OpenAi), "gpt-4o-mini");
        assert_eq!(default_model_for(ProviderId::Anthropic), "claude-3-haiku");
    }
}
