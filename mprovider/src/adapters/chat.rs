//! OpenAI-compatible chat completions transport.
//!
//! Three of the four adapters differ only in base URL and auth header;
//! this module holds the request and reply shapes they share plus the
//! HTTP transport that speaks the wire format. [`ChatTransport`] is the
//! seam tests replace with a fake.

use std::fmt::Formatter;

use reqwest::{Client, Response, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::credentials::SecretString;
use crate::error::ProviderError;
use crate::model::{
    Message, ModelReply, ModelRequest, OutputItem, ProviderId, Role, StopReason, TokenUsage,
    ToolCall, ToolDefinition,
};
use crate::provider::ProviderFuture;

/// Protocol revision sent with every Anthropic request.
pub const ANTHROPIC_API_VERSION: &str = "2023-06-01";

pub trait ChatTransport: Send + Sync + std::fmt::Debug {
    fn complete<'a>(
        &'a self,
        request: ChatRequest,
        auth: ChatAuth,
    ) -> ProviderFuture<'a, Result<ChatResponse, ProviderError>>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub tools: Vec<ChatTool>,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl From<Message> for ChatMessage {
    fn from(value: Message) -> Self {
        Self {
            role: value.role.into(),
            content: value.content,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

impl ChatRole {
    fn as_str(self) -> &'static str {
        match self {
            Self::System => "system",
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

impl From<Role> for ChatRole {
    fn from(value: Role) -> Self {
        match value {
            Role::System => Self::System,
            Role::User => Self::User,
            Role::Assistant => Self::Assistant,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatTool {
    pub name: String,
    pub description: String,
    pub input_schema: String,
}

impl From<ToolDefinition> for ChatTool {
    fn from(value: ToolDefinition) -> Self {
        Self {
            name: value.name,
            description: value.description,
            input_schema: value.input_schema,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatResponse {
    pub model: String,
    pub message: ChatAssistantMessage,
    pub finish_reason: ChatFinishReason,
    pub usage: ChatUsage,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatAssistantMessage {
    pub content: String,
    pub tool_calls: Vec<ChatToolCall>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatToolCall {
    pub id: String,
    pub name: String,
    pub arguments: String,
}

impl From<ChatToolCall> for ToolCall {
    fn from(value: ChatToolCall) -> Self {
        Self {
            id: value.id,
            name: value.name,
            arguments: value.arguments,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatFinishReason {
    Stop,
    Length,
    ToolCalls,
    Other,
}

impl From<ChatFinishReason> for StopReason {
    fn from(value: ChatFinishReason) -> Self {
        match value {
            ChatFinishReason::Stop => Self::EndTurn,
            ChatFinishReason::Length => Self::MaxTokens,
            ChatFinishReason::ToolCalls => Self::ToolUse,
            ChatFinishReason::Other => Self::Other,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChatUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

impl From<ChatUsage> for TokenUsage {
    fn from(value: ChatUsage) -> Self {
        Self {
            input_tokens: value.prompt_tokens,
            output_tokens: value.completion_tokens,
            total_tokens: value.total_tokens,
        }
    }
}

#[derive(Clone, PartialEq, Eq)]
pub enum ChatAuth {
    /// `Authorization: Bearer <key>`, used by OpenAI and Ollama.
    Bearer(SecretString),
    /// `x-api-key: <key>` plus the `anthropic-version` header.
    AnthropicKey(SecretString),
}

impl std::fmt::Debug for ChatAuth {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bearer(_) => f.write_str("ChatAuth::Bearer([REDACTED])"),
            Self::AnthropicKey(_) => f.write_str("ChatAuth::AnthropicKey([REDACTED])"),
        }
    }
}

/// Maps a [`ModelRequest`] onto the shared chat request shape.
pub fn build_chat_request(request: ModelRequest, fallback_model: &str) -> ChatRequest {
    let model = if request.model.trim().is_empty() {
        fallback_model.to_string()
    } else {
        request.model
    };

    let messages = request
        .messages
        .into_iter()
        .map(ChatMessage::from)
        .collect::<Vec<_>>();
    let tools = request
        .tools
        .into_iter()
        .map(ChatTool::from)
        .collect::<Vec<_>>();

    ChatRequest {
        model,
        messages,
        tools,
        temperature: request.options.temperature,
        max_tokens: request.options.max_tokens,
    }
}

/// Collapses a chat response into the provider-neutral reply shape.
///
/// At most one tool call survives; the avatar acts on a single cue per
/// turn, so anything past the first reported call is dropped.
pub fn convert_chat_response(response: ChatResponse, provider: ProviderId) -> ModelReply {
    let mut output = Vec::new();
    if !response.message.content.is_empty() {
        output.push(OutputItem::Message(Message::new(
            Role::Assistant,
            response.message.content,
        )));
    }

    if let Some(tool_call) = response.message.tool_calls.into_iter().next() {
        output.push(OutputItem::ToolCall(ToolCall::from(tool_call)));
    }

    ModelReply {
        provider,
        model: response.model,
        output,
        stop_reason: response.finish_reason.into(),
        usage: response.usage.into(),
    }
}

#[derive(Debug, Clone)]
pub struct ChatHttpTransport {
    client: Client,
    base_url: String,
}

impl ChatHttpTransport {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path)
    }

    fn build_api_request(request: ChatRequest) -> Result<ChatApiRequest, ProviderError> {
        let messages = request
            .messages
            .into_iter()
            .map(ChatApiMessage::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        if messages.is_empty() {
            return Err(ProviderError::invalid_request(
                "chat request requires at least one message",
            ));
        }

        let tools = if request.tools.is_empty() {
            None
        } else {
            Some(
                request
                    .tools
                    .into_iter()
                    .map(ChatApiTool::try_from)
                    .collect::<Result<Vec<_>, _>>()?,
            )
        };

        Ok(ChatApiRequest {
            model: request.model,
            messages,
            tools,
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        })
    }

    fn apply_auth(
        &self,
        builder: reqwest::RequestBuilder,
        auth: &ChatAuth,
    ) -> reqwest::RequestBuilder {
        match auth {
            ChatAuth::Bearer(key) => builder.bearer_auth(key.expose()),
            ChatAuth::AnthropicKey(key) => builder
                .header("x-api-key", key.expose())
                .header("anthropic-version", ANTHROPIC_API_VERSION),
        }
    }

    async fn parse_error(response: Response) -> ProviderError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let message = extract_error_message(&body)
            .unwrap_or_else(|| format!("chat request failed with status {status}"));

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

    fn parse_finish_reason(value: Option<&str>) -> ChatFinishReason {
        match value {
            Some("stop") => ChatFinishReason::Stop,
            Some("length") => ChatFinishReason::Length,
            Some("tool_calls") => ChatFinishReason::ToolCalls,
            _ => ChatFinishReason::Other,
        }
    }
}

impl ChatTransport for ChatHttpTransport {
    fn complete<'a>(
        &'a self,
        request: ChatRequest,
        auth: ChatAuth,
    ) -> ProviderFuture<'a, Result<ChatResponse, ProviderError>> {
        Box::pin(async move {
            let api_request = Self::build_api_request(request)?;
            let url = self.endpoint("chat/completions");
            let builder = self.client.post(url).json(&api_request);
            let response = self.apply_auth(builder, &auth).send().await.map_err(|err| {
                if err.is_timeout() {
                    ProviderError::timeout(err.to_string())
                } else {
                    ProviderError::transport(err.to_string())
                }
            })?;

            if !response.status().is_success() {
                return Err(Self::parse_error(response).await);
            }

            let parsed: ChatApiResponse = response.json().await.map_err(|err| {
                ProviderError::malformed_response(format!("undecodable chat response: {err}"))
            })?;

            ChatResponse::try_from(parsed)
        })
    }
}

fn extract_error_message(body: &str) -> Option<String> {
    serde_json::from_str::<ChatApiErrorEnvelope>(body)
        .ok()
        .map(|envelope| envelope.error.message)
}

pub(crate) fn truncate(text: &str, limit: usize) -> String {
    if text.len() <= limit {
        return text.to_string();
    }
    let mut cut = limit;
    while !text.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}...", &text[..cut])
}

#[derive(Debug, Deserialize)]
struct ChatApiErrorEnvelope {
    error: ChatApiError,
}

#[derive(Debug, Deserialize)]
struct ChatApiError {
    message: String,
}

#[derive(Debug, Serialize)]
struct ChatApiRequest {
    model: String,
    messages: Vec<ChatApiMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<Vec<ChatApiTool>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Debug, Serialize)]
struct ChatApiMessage {
    role: String,
    content: String,
}

impl TryFrom<ChatMessage> for ChatApiMessage {
    type Error = ProviderError;

    fn try_from(value: ChatMessage) -> Result<Self, Self::Error> {
        if value.content.trim().is_empty() && value.role != ChatRole::Assistant {
            return Err(ProviderError::invalid_request(
                "chat message content must not be empty",
            ));
        }

        Ok(Self {
            role: value.role.as_str().to_string(),
            content: value.content,
        })
    }
}

#[derive(Debug, Serialize)]
struct ChatApiTool {
    r#type: String,
    function: ChatApiFunction,
}

impl TryFrom<ChatTool> for ChatApiTool {
    type Error = ProviderError;

    fn try_from(value: ChatTool) -> Result<Self, Self::Error> {
        let parameters = serde_json::from_str::<Value>(&value.input_schema).map_err(|_| {
            ProviderError::invalid_request(format!(
                "tool schema for '{}' must be valid JSON",
                value.name
            ))
        })?;

        Ok(Self {
            r#type: "function".to_string(),
            function: ChatApiFunction {
                name: value.name,
                description: value.description,
                parameters,
            },
        })
    }
}

#[derive(Debug, Serialize)]
struct ChatApiFunction {
    name: String,
    description: String,
    parameters: Value,
}

#[derive(Debug, Deserialize)]
struct ChatApiResponse {
    model: String,
    choices: Vec<ChatApiChoice>,
    usage: Option<ChatApiUsage>,
}

#[derive(Debug, Deserialize)]
struct ChatApiChoice {
    message: ChatApiAssistantMessage,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatApiAssistantMessage {
    content: Option<String>,
    tool_calls: Option<Vec<ChatApiToolCall>>,
}

#[derive(Debug, Deserialize)]
struct ChatApiToolCall {
    id: String,
    function: ChatApiToolFunction,
}

#[derive(Debug, Deserialize)]
struct ChatApiToolFunction {
    name: String,
    arguments: String,
}

#[derive(Debug, Deserialize)]
struct ChatApiUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
    total_tokens: u32,
}

impl TryFrom<ChatApiResponse> for ChatResponse {
    type Error = ProviderError;

    fn try_from(value: ChatApiResponse) -> Result<Self, Self::Error> {
        let choice = value.choices.into_iter().next().ok_or_else(|| {
            ProviderError::malformed_response("chat response did not include choices")
        })?;

        let tool_calls = choice
            .message
            .tool_calls
            .unwrap_or_default()
            .into_iter()
            .map(|call| ChatToolCall {
                id: call.id,
                name: call.function.name,
                arguments: call.function.arguments,
            })
            .collect::<Vec<_>>();

        let usage = value.usage.unwrap_or(ChatApiUsage {
            prompt_tokens: 0,
            completion_tokens: 0,
            total_tokens: 0,
        });

        Ok(Self {
            model: value.model,
            message: ChatAssistantMessage {
                content: choice.message.content.unwrap_or_default(),
                tool_calls,
            },
            finish_reason: ChatHttpTransport::parse_finish_reason(choice.finish_reason.as_deref()),
            usage: ChatUsage {
                prompt_tokens: usage.prompt_tokens,
                completion_tokens: usage.completion_tokens,
                total_tokens: usage.total_tokens,
            },
        })
    }
}
