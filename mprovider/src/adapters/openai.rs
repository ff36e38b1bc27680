//! OpenAI adapter over the shared chat transport.

use std::sync::Arc;

use reqwest::Client;

use crate::adapters::chat::{
    ChatAuth, ChatHttpTransport, ChatTransport, build_chat_request, convert_chat_response,
};
use crate::credentials::{CredentialStore, SecretString};
use crate::error::ProviderError;
use crate::model::{ModelReply, ModelRequest, ProviderId};
use crate::provider::{ModelProvider, ProviderFuture};

pub const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const OPENAI_DEFAULT_MODEL: &str = "gpt-4o-mini";

#[derive(Clone)]
pub struct OpenAiProvider {
    credentials: Arc<CredentialStore>,
    transport: Arc<dyn ChatTransport>,
    fallback_model: String,
}

impl OpenAiProvider {
    pub fn new(credentials: Arc<CredentialStore>, transport: Arc<dyn ChatTransport>) -> Self {
        Self {
            credentials,
            transport,
            fallback_model: OPENAI_DEFAULT_MODEL.to_string(),
        }
    }

    pub fn with_fallback_model(mut self, model: impl Into<String>) -> Self {
        self.fallback_model = model.into();
        self
    }

    pub fn default_http_transport(client: Client) -> ChatHttpTransport {
        ChatHttpTransport::new(client, OPENAI_BASE_URL)
    }

    fn resolve_auth(&self) -> Result<ChatAuth, ProviderError> {
        let key = self
            .credentials
            .with_key(ProviderId::OpenAi, |key| SecretString::new(key))?
            .ok_or_else(|| ProviderError::authentication("no OpenAI API key configured"))?;
        Ok(ChatAuth::Bearer(key))
    }
}

impl ModelProvider for OpenAiProvider {
    fn id(&self) -> ProviderId {
        ProviderId::OpenAi
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
            Ok(convert_chat_response(response, ProviderId::OpenAi))
        })
    }
}
