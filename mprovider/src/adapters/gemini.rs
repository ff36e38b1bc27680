//! Google Gemini adapter.
//!
//! Gemini does not offer the OpenAI-compatible surface the other three
//! backends share, so this adapter speaks the native `generateContent`
//! wire format: system prompts travel as `systemInstruction`, assistant
//! turns use the `model` role, and tool definitions become
//! `functionDeclarations`.

use std::sync::Arc;

use reqwest::{Client, Response, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::credentials::{CredentialStore, SecretString};
use crate::error::ProviderError;
use crate::model::{
    Message, ModelReply, ModelRequest, OutputItem, ProviderId, Role, StopReason, TokenUsage,
    ToolCall,
};
use crate::provider::{ModelProvider, ProviderFuture};

pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const GEMINI_DEFAULT_MODEL: &str = "gemini-1.5-flash";

pub trait GeminiTransport: Send + Sync + std::fmt::Debug {
    fn generate<'a>(
        &'a self,
        model: String,
        request: GeminiRequest,
        key: SecretString,
    ) -> ProviderFuture<'a, Result<GeminiResponse, ProviderError>>;
}

#[derive(Clone)]
pub struct GeminiProvider {
    credentials: Arc<CredentialStore>,
    transport: Arc<dyn GeminiTransport>,
    fallback_model: String,
}

impl GeminiProvider {
    pub fn new(credentials: Arc<CredentialStore>, transport: Arc<dyn GeminiTransport>) -> Self {
        Self {
            credentials,
            transport,
            fallback_model: GEMINI_DEFAULT_MODEL.to_string(),
        }
    }

    pub fn with_fallback_model(mut self, model: impl Into<String>) -> Self {
        self.fallback_model = model.into();
        self
    }

    pub fn default_http_transport(client: Client) -> GeminiHttpTransport {
        GeminiHttpTransport::new(client)
    }

    fn resolve_key(&self) -> Result<SecretString, ProviderError> {
        self.credentials
            .with_key(ProviderId::Gemini, |key| SecretString::new(key))?
            .ok_or_else(|| ProviderError::authentication("no Gemini API key configured"))
    }

    fn build_request(
        &self,
        request: ModelRequest,
    ) -> Result<(String, GeminiRequest), ProviderError> {
        let model = if request.model.trim().is_empty() {
            self.fallback_model.clone()
        } else {
            request.model
        };

        let mut contents = Vec::new();
        let mut system_parts = Vec::new();
        for message in request.messages {
            match message.role {
                Role::System => system_parts.push(message.content),
                Role::User => contents.push(GeminiContent::text("user", message.content)),
                Role::Assistant => contents.push(GeminiContent::text("model", message.content)),
            }
        }

        let system_instruction = if system_parts.is_empty() {
            None
        } else {
            Some(GeminiContent {
                role: None,
                parts: vec![GeminiPart::text(system_parts.join("\n\n"))],
            })
        };

        let tools = if request.tools.is_empty() {
            None
        } else {
            let declarations = request
                .tools
                .into_iter()
                .map(|tool| {
                    let parameters =
                        serde_json::from_str::<Value>(&tool.input_schema).map_err(|_| {
                            ProviderError::invalid_request(format!(
                                "tool schema for '{}' must be valid JSON",
                                tool.name
                            ))
                        })?;
                    Ok(GeminiFunctionDeclaration {
                        name: tool.name,
                        description: tool.description,
                        parameters,
                    })
                })
                .collect::<Result<Vec<_>, ProviderError>>()?;
            Some(vec![GeminiTool {
                function_declarations: declarations,
            }])
        };

        let generation_config = if request.options.temperature.is_none()
            && request.options.max_tokens.is_none()
        {
            None
        } else {
            Some(GeminiGenerationConfig {
                temperature: request.options.temperature,
                max_output_tokens: request.options.max_tokens,
            })
        };

        Ok((
            model,
            GeminiRequest {
                contents,
                system_instruction,
                tools,
                generation_config,
            },
        ))
    }

    fn convert_response(
        model: String,
        response: GeminiResponse,
    ) -> Result<ModelReply, ProviderError> {
        let usage = response
            .usage_metadata
            .map(TokenUsage::from)
            .unwrap_or_default();
        let candidate = response.candidates.into_iter().next().ok_or_else(|| {
            ProviderError::malformed_response("Gemini response did not include candidates")
        })?;

        let mut text = String::new();
        let mut function_call = None;
        if let Some(content) = candidate.content {
            for part in content.parts {
                if let Some(fragment) = part.text {
                    text.push_str(&fragment);
                }
                // only the first reported call survives; the avatar acts
                // on a single cue per turn
                if let Some(call) = part.function_call
                    && function_call.is_none()
                {
                    function_call = Some(call);
                }
            }
        }

        let mut output = Vec::new();
        if !text.is_empty() {
            output.push(OutputItem::Message(Message::new(Role::Assistant, text)));
        }

        let stop_reason = if function_call.is_some() {
            StopReason::ToolUse
        } else {
            parse_finish_reason(candidate.finish_reason.as_deref())
        };

        if let Some(call) = function_call {
            output.push(OutputItem::ToolCall(ToolCall {
                id: format!("fc-{}", call.name),
                name: call.name,
                arguments: call.args.to_string(),
            }));
        }

        Ok(ModelReply {
            provider: ProviderId::Gemini,
            model,
            output,
            stop_reason,
            usage,
        })
    }
}

impl ModelProvider for GeminiProvider {
    fn id(&self) -> ProviderId {
        ProviderId::Gemini
    }

    fn complete<'a>(
        &'a self,
        request: ModelRequest,
    ) -> ProviderFuture<'a, Result<ModelReply, ProviderError>> {
        Box::pin(async move {
            request.validate()?;
            let key = self.resolve_key()?;
            let (model, gemini_request) = self.build_request(request)?;
            let response = self
                .transport
                .generate(model.clone(), gemini_request, key)
                .await?;
            Self::convert_response(model, response)
        })
    }
}

fn parse_finish_reason(value: Option<&str>) -> StopReason {
    match value {
        Some("STOP") => StopReason::EndTurn,
        Some("MAX_TOKENS") => StopReason::MaxTokens,
        _ => StopReason::Other,
    }
}

#[derive(Debug, Clone)]
pub struct GeminiHttpTransport {
    client: Client,
    base_url: String,
}

impl GeminiHttpTransport {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            base_url: GEMINI_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn endpoint(&self, model: &str) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            model
        )
    }

    async fn parse_error(response: Response) -> ProviderError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let message = extract_error_message(&body)
            .unwrap_or_else(|| format!("Gemini request failed with status {status}"));

        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                ProviderError::authentication(message)
            }
            StatusCode::TOO_MANY_REQUESTS => ProviderError::rate_limited(message),
            StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
                ProviderError::timeout(message)
            }
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
                ProviderError::invalid_request(message)
            }
            _ => ProviderError::transport(message),
        }
    }
}

impl GeminiTransport for GeminiHttpTransport {
    fn generate<'a>(
        &'a self,
        model: String,
        request: GeminiRequest,
        key: SecretString,
    ) -> ProviderFuture<'a, Result<GeminiResponse, ProviderError>> {
        Box::pin(async move {
            let url = self.endpoint(&model);
            let response = self
                .client
                .post(url)
                .header("x-goog-api-key", key.expose())
                .json(&request)
                .send()
                .await
                .map_err(|err| {
                    if err.is_timeout() {
                        ProviderError::timeout(err.to_string())
                    } else {
                        ProviderError::transport(err.to_string())
                    }
                })?;

            if !response.status().is_success() {
                return Err(Self::parse_error(response).await);
            }

            response.json::<GeminiResponse>().await.map_err(|err| {
                ProviderError::malformed_response(format!("undecodable Gemini response: {err}"))
            })
        })
    }
}

fn extract_error_message(body: &str) -> Option<String> {
    serde_json::from_str::<GeminiErrorEnvelope>(body)
        .ok()
        .map(|envelope| envelope.error.message)
}

#[derive(Debug, Deserialize)]
struct GeminiErrorEnvelope {
    error: GeminiApiError,
}

#[derive(Debug, Deserialize)]
struct GeminiApiError {
    message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiRequest {
    pub contents: Vec<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<GeminiTool>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GeminiGenerationConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeminiContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<GeminiPart>,
}

impl GeminiContent {
    fn text(role: &str, content: String) -> Self {
        Self {
            role: Some(role.to_string()),
            parts: vec![GeminiPart::text(content)],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiPart {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function_call: Option<GeminiFunctionCall>,
}

impl GeminiPart {
    fn text(content: String) -> Self {
        Self {
            text: Some(content),
            function_call: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeminiFunctionCall {
    pub name: String,
    #[serde(default = "empty_args")]
    pub args: Value,
}

fn empty_args() -> Value {
    Value::Object(serde_json::Map::new())
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiTool {
    pub function_declarations: Vec<GeminiFunctionDeclaration>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeminiFunctionDeclaration {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiGenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiResponse {
    #[serde(default)]
    pub candidates: Vec<GeminiCandidate>,
    #[serde(default)]
    pub usage_metadata: Option<GeminiUsageMetadata>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiCandidate {
    #[serde(default)]
    pub content: Option<GeminiContent>,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiUsageMetadata {
    #[serde(default)]
    pub prompt_token_count: u32,
    #[serde(default)]
    pub candidates_token_count: u32,
    #[serde(default)]
    pub total_token_count: u32,
}

impl From<GeminiUsageMetadata> for TokenUsage {
    fn from(value: GeminiUsageMetadata) -> Self {
        Self {
            input_tokens: value.prompt_token_count,
            output_tokens: value.candidates_token_count,
            total_tokens: value.total_token_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ToolDefinition;
    use serde_json::json;

    #[derive(Debug, Default)]
    struct NoopTransport;

    impl GeminiTransport for NoopTransport {
        fn generate<'a>(
            &'a self,
            _model: String,
            _request: GeminiRequest,
            _key: SecretString,
        ) -> ProviderFuture<'a, Result<GeminiResponse, ProviderError>> {
            Box::pin(async move {
                Err(ProviderError::transport("noop transport"))
            })
        }
    }

    fn provider() -> GeminiProvider {
        GeminiProvider::new(
            Arc::new(CredentialStore::new()),
            Arc::new(NoopTransport),
        )
    }

    #[test]
    fn build_request_moves_system_messages_into_system_instruction() {
        let request = ModelRequest::builder("gemini-1.5-flash")
            .message(Message::system("stay cheerful"))
            .message(Message::user("hello"))
            .message(Message::assistant("hi!"))
            .message(Message::user("wave"))
            .build();

        let (model, wire) = provider().build_request(request).expect("request builds");
        assert_eq!(model, "gemini-1.5-flash");

        let instruction = wire.system_instruction.expect("system instruction present");
        assert_eq!(instruction.parts[0].text.as_deref(), Some("stay cheerful"));

        let roles = wire
            .contents
            .iter()
            .map(|content| content.role.as_deref().unwrap_or_default())
            .collect::<Vec<_>>();
        assert_eq!(roles, vec!["user", "model", "user"]);
    }

    #[test]
    fn build_request_serializes_in_gemini_wire_shape() {
        let request = ModelRequest::builder("gemini-1.5-flash")
            .message(Message::system("be brief"))
            .message(Message::user("hello"))
            .tool(ToolDefinition::new(
                "smile",
                "smile warmly",
                r#"{"type":"object","properties":{}}"#,
            ))
            .temperature(0.0)
            .max_tokens(150)
            .build();

        let (_, wire) = provider().build_request(request).expect("request builds");
        let serialized = serde_json::to_value(&wire).expect("serializes");

        assert!(serialized.get("systemInstruction").is_some());
        assert_eq!(
            serialized["tools"][0]["functionDeclarations"][0]["name"],
            json!("smile")
        );
        assert_eq!(serialized["generationConfig"]["maxOutputTokens"], json!(150));
        assert_eq!(serialized["contents"][0]["role"], json!("user"));
    }

    #[test]
    fn build_request_rejects_invalid_tool_schema() {
        let request = ModelRequest::builder("gemini-1.5-flash")
            .message(Message::user("hello"))
            .tool(ToolDefinition::new("smile", "smile warmly", "not json"))
            .build();

        let error = provider()
            .build_request(request)
            .expect_err("schema should be rejected");
        assert_eq!(error.kind, crate::ProviderErrorKind::InvalidRequest);
    }

    #[test]
    fn convert_response_keeps_only_the_first_function_call() {
        let response = GeminiResponse {
            candidates: vec![GeminiCandidate {
                content: Some(GeminiContent {
                    role: Some("model".to_string()),
                    parts: vec![
                        GeminiPart::text("sure!".to_string()),
                        GeminiPart {
                            text: None,
                            function_call: Some(GeminiFunctionCall {
                                name: "smile".to_string(),
                                args: empty_args(),
                            }),
                        },
                        GeminiPart {
                            text: None,
                            function_call: Some(GeminiFunctionCall {
                                name: "laugh".to_string(),
                                args: empty_args(),
                            }),
                        },
                    ],
                }),
                finish_reason: Some("STOP".to_string()),
            }],
            usage_metadata: Some(GeminiUsageMetadata {
                prompt_token_count: 5,
                candidates_token_count: 3,
                total_token_count: 8,
            }),
        };

        let reply = GeminiProvider::convert_response("gemini-1.5-flash".to_string(), response)
            .expect("response converts");
        assert_eq!(reply.provider, ProviderId::Gemini);
        assert_eq!(reply.stop_reason, StopReason::ToolUse);
        assert_eq!(reply.usage.total_tokens, 8);

        let calls = reply
            .output
            .iter()
            .filter_map(|item| match item {
                OutputItem::ToolCall(call) => Some(call.name.as_str()),
                OutputItem::Message(_) => None,
            })
            .collect::<Vec<_>>();
        assert_eq!(calls, vec!["smile"]);
    }

    #[test]
    fn convert_response_requires_a_candidate() {
        let response = GeminiResponse {
            candidates: Vec::new(),
            usage_metadata: None,
        };
        let error = GeminiProvider::convert_response("gemini-1.5-flash".to_string(), response)
            .expect_err("empty candidates should fail");
        assert_eq!(error.kind, crate::ProviderErrorKind::MalformedResponse);
    }

    #[test]
    fn finish_reasons_map_onto_stop_reasons() {
        assert_eq!(parse_finish_reason(Some("STOP")), StopReason::EndTurn);
        assert_eq!(parse_finish_reason(Some("MAX_TOKENS")), StopReason::MaxTokens);
        assert_eq!(parse_finish_reason(Some("SAFETY")), StopReason::Other);
        assert_eq!(parse_finish_reason(None), StopReason::Other);
    }

    #[test]
    fn function_call_args_default_to_an_empty_object() {
        let call: GeminiFunctionCall =
            serde_json::from_str(r#"{"name":"smile"}"#).expect("parses without args");
        assert_eq!(call.args, json!({}));
    }
}
