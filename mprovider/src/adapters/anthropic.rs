//! Anthropic adapter over the shared chat transport.
//!
//! Anthropic exposes an OpenAI-compatible chat completions surface; the
//! only differences from the OpenAI adapter are the base URL and the
//! `x-api-key` auth scheme.

use std::sync::Arc;

use reqwest::Client;

use crate::adapters::chat::{
    ChatAuth, ChatHttpTransport, ChatTransport, build_chat_request, convert_chat_response,
};
use crate::credentials::{CredentialStore, SecretString};
use crate::error::ProviderError;
use crate::model::{ModelReply, ModelRequest, ProviderId};
use crate::provider::{ModelProvider, ProviderFuture};

pub const ANTHROPIC_BASE_URL: &str = "https://api.anthropic.com/v1";
pub const ANTHROPIC_DEFAULT_MODEL: &str = "claude-3-haiku";

#[derive(Clone)]
pub struct AnthropicProvider {
    credentials: Arc<CredentialStore>,
    transport: Arc<dyn ChatTransport>,
    fallback_model: String,
}

impl AnthropicProvider {
    pub fn new(credentials: Arc<CredentialStore>, transport: Arc<dyn ChatTransport>) -> Self {
        Self {
            credentials,
            transport,
            fallback_model: ANTHROPIC_DEFAULT_MODEL.to_string(),
        }
    }

    pub fn with_fallback_model(mut self, model: impl Into<String>) -> Self {
        self.fallback_model = model.into();
        self
    }

    pub fn default_http_transport(client: Client) -> ChatHttpTransport {
        ChatHttpTransport::new(client, ANTHROPIC_BASE_URL)
    }

    fn resolve_auth(&self) -> Result<ChatAuth, ProviderError> {
        let key = self
            .credentials
            .with_key(ProviderId::Anthropic, |key| SecretString::new(key))?
            .ok_or_else(|| ProviderError::authentication("no Anthropic API key configured"))?;
        Ok(ChatAuth::AnthropicKey(key))
    }
}

impl ModelProvider for AnthropicProvider {
    fn id(&self) -> ProviderId {
        ProviderId::Anthropic
    }

    fn complete<'a>(
        &'a self,
        request: ModelRequest,
    ) -> ProviderFuture<'a, Result<ModelReply, ProviderError>> {
        Box::pin(async move {
            request.validate()?;
            let auth = self.resolve_auth()?;
            let chat_request = build_chat_request(request, &self.fallback_model);
            let response = self.transport.complete(chat_request, auth).await?;
            Ok(convert_chat_response(response, ProviderId::Anthropic))
        })
    }
}
