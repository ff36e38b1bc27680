//! Stable provider construction surface for facade consumers.

use std::sync::Arc;

use reqwest::Client;

use mclient::{ClientError, ResolvedConfig, profile};
use mprovider::{CredentialStore, ModelProvider, ProviderId};

/// Builds the provider adapter a resolved configuration describes. The
/// credential resolved for hosted providers is moved into a fresh store; the
/// local provider needs none.
pub fn build_provider(config: &ResolvedConfig) -> Result<Arc<dyn ModelProvider>, ClientError> {
    if profile(config.provider).credential_env.is_some() && config.credential.is_none() {
        return Err(ClientError::missing_credential(format!(
            "no credential resolved for the {} provider",
            config.provider
        )));
    }

    let http = Client::builder()
        .timeout(config.timeout)
        .build()
        .map_err(|err| ClientError::network(format!("http client construction failed: {err}")))?;

    let credentials = Arc::new(CredentialStore::new());
    if let Some(credential) = config.credential.as_ref() {
        credentials.set_key(config.provider, credential.expose())?;
    }

    match config.provider {
        ProviderId::Ollama => build_ollama_provider(config, http),
        ProviderId::Gemini => build_gemini_provider(credentials, config, http),
        ProviderId::OpenAi => build_openai_provider(credentials, config, http),
        ProviderId::Anthropic => build_anthropic_provider(credentials, config, http),
    }
}

#[cfg(feature = "provider-ollama")]
fn build_ollama_provider(
    config: &ResolvedConfig,
    http: Client,
) -> Result<Arc<dyn ModelProvider>, ClientError> {
    use mprovider::adapters::ollama::OllamaProvider;

    let transport = match config.endpoint.as_deref() {
        Some(host) => OllamaProvider::http_transport_for_host(http, host),
        None => OllamaProvider::default_http_transport(http),
    };
    Ok(Arc::new(
        OllamaProvider::new(Arc::new(transport)).with_fallback_model(config.model.as_str()),
    ))
}

#[cfg(not(feature = "provider-ollama"))]
fn build_ollama_provider(
    _config: &ResolvedConfig,
    _http: Client,
) -> Result<Arc<dyn ModelProvider>, ClientError> {
    Err(ClientError::invalid_provider(
        "provider-ollama feature is not enabled on marionette",
    ))
}

#[cfg(feature = "provider-gemini")]
fn build_gemini_provider(
    credentials: Arc<CredentialStore>,
    config: &ResolvedConfig,
    http: Client,
) -> Result<Arc<dyn ModelProvider>, ClientError> {
    use mprovider::adapters::gemini::GeminiProvider;

    let transport = Arc::new(GeminiProvider::default_http_transport(http));
    Ok(Arc::new(
        GeminiProvider::new(credentials, transport).with_fallback_model(config.model.as_str()),
    ))
}

#[cfg(not(feature = "provider-gemini"))]
fn build_gemini_provider(
    _credentials: Arc<CredentialStore>,
    _config: &ResolvedConfig,
    _http: Client,
) -> Result<Arc<dyn ModelProvider>, ClientError> {
    Err(ClientError::invalid_provider(
        "provider-gemini feature is not enabled on marionette",
    ))
}

#[cfg(feature = "provider-openai")]
fn build_openai_provider(
    credentials: Arc<CredentialStore>,
    config: &ResolvedConfig,
    http: Client,
) -> Result<Arc<dyn ModelProvider>, ClientError> {
    use mprovider::adapters::openai::OpenAiProvider;

    let transport = Arc::new(OpenAiProvider::default_http_transport(http));
    Ok(Arc::new(
        OpenAiProvider::new(credentials, transport).with_fallback_model(config.model.as_str()),
    ))
}

#[cfg(not(feature = "provider-openai"))]
fn build_openai_provider(
    _credentials: Arc<CredentialStore>,
    _config: &ResolvedConfig,
    _http: Client,
) -> Result<Arc<dyn ModelProvider>, ClientError> {
    Err(ClientError::invalid_provider(
        "provider-openai feature is not enabled on marionette",
    ))
}

#[cfg(feature = "provider-anthropic")]
fn build_anthropic_provider(
    credentials: Arc<CredentialStore>,
    config: &ResolvedConfig,
    http: Client,
) -> Result<Arc<dyn ModelProvider>, ClientError> {
    use mprovider::adapters::anthropic::AnthropicProvider;

    let transport = Arc::new(AnthropicProvider::default_http_transport(http));
    Ok(Arc::new(
        AnthropicProvider::new(credentials, transport).with_fallback_model(config.model.as_str()),
    ))
}

#[cfg(not(feature = "provider-anthropic"))]
fn build_anthropic_provider(
    _credentials: Arc<CredentialStore>,
    _config: &ResolvedConfig,
    _http: Client,
) -> Result<Arc<dyn ModelProvider>, ClientError> {
    Err(ClientError::invalid_provider(
        "provider-anthropic feature is not enabled on marionette",
    ))
}
