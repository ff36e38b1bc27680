//! Local Ollama adapter.
//!
//! Ollama exposes an OpenAI-compatible surface under `/v1` and takes no
//! real credential; a placeholder bearer token satisfies the header
//! requirement. This is the only adapter that works out of the box with
//! nothing configured.

use std::sync::Arc;

use reqwest::Client;
use serde::Deserialize;

use crate::adapters::chat::{
    ChatAuth, ChatHttpTransport, ChatTransport, build_chat_request, convert_chat_response,
    truncate,
};
use crate::credentials::SecretString;
use crate::error::ProviderError;
use crate::model::{ModelReply, ModelRequest, ProviderId};
use crate::provider::{ModelProvider, ProviderFuture};

pub const OLLAMA_HOST_URL: &str = "http://localhost:11434";
pub const OLLAMA_BASE_URL: &str = "http://localhost:11434/v1";
pub const OLLAMA_DEFAULT_MODEL: &str = "llama3";

#[derive(Clone)]
pub struct OllamaProvider {
    transport: Arc<dyn ChatTransport>,
    fallback_model: String,
}

impl OllamaProvider {
    pub fn new(transport: Arc<dyn ChatTransport>) -> Self {
        Self {
            transport,
            fallback_model: OLLAMA_DEFAULT_MODEL.to_string(),
        }
    }

    pub fn with_fallback_model(mut self, model: impl Into<String>) -> Self {
        self.fallback_model = model.into();
        self
    }

    pub fn default_http_transport(client: Client) -> ChatHttpTransport {
        ChatHttpTransport::new(client, OLLAMA_BASE_URL)
    }

    /// Transport for a non-default host, e.g. an Ollama box on the LAN.
    pub fn http_transport_for_host(client: Client, host_url: &str) -> ChatHttpTransport {
        let base = format!("{}/v1", host_url.trim_end_matches('/'));
        ChatHttpTransport::new(client, base)
    }

    fn auth_placeholder() -> ChatAuth {
        ChatAuth::Bearer(SecretString::new("ollama-local"))
    }
}

impl ModelProvider for OllamaProvider {
    fn id(&self) -> ProviderId {
        ProviderId::Ollama
    }

    fn complete<'a>(
        &'a self,
        request: ModelRequest,
    ) -> ProviderFuture<'a, Result<ModelReply, ProviderError>> {
        Box::pin(async move {
            request.validate()?;
            let chat_request = build_chat_request(request, &self.fallback_model);
            let response = self
                .transport
                .complete(chat_request, Self::auth_placeholder())
                .await?;
            Ok(convert_chat_response(response, ProviderId::Ollama))
        })
    }
}

/// Lists the models installed on the default local Ollama host.
pub async fn list_installed_models() -> Result<Vec<String>, ProviderError> {
    list_installed_models_at(OLLAMA_HOST_URL).await
}

/// Lists the models installed on the Ollama host at `host_url`.
pub async fn list_installed_models_at(host_url: &str) -> Result<Vec<String>, ProviderError> {
    let endpoint = format!("{}/api/tags", host_url.trim_end_matches('/'));
    let client = Client::new();
    let response = client.get(&endpoint).send().await.map_err(|err| {
        if err.is_timeout() {
            ProviderError::timeout(err.to_string())
        } else {
            ProviderError::transport(err.to_string())
        }
    })?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(ProviderError::transport(format!(
            "model listing failed with status {status}: {}",
            truncate(&body, 4096)
        )));
    }

    let tags: OllamaTagsResponse = response.json().await.map_err(|err| {
        ProviderError::malformed_response(format!("undecodable tags response: {err}"))
    })?;

    let mut ids = tags
        .models
        .into_iter()
        .map(|model| model.name)
        .collect::<Vec<_>>();
    ids.sort();
    Ok(ids)
}

#[derive(Debug, Deserialize)]
struct OllamaTagsResponse {
    #[serde(default)]
    models: Vec<OllamaModelTag>,
}

#[derive(Debug, Deserialize)]
struct OllamaModelTag {
    name: String,
}
