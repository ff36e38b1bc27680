//! Request and reply types shared by every provider adapter.
//!
//! ```rust
//! use mprovider::{Message, ModelRequest};
//!
//! let request = ModelRequest::new("gemini-1.5-flash", vec![Message::user("hello")]);
//! assert!(request.validate().is_ok());
//! ```

use std::fmt::{Display, Formatter};

use mcommon::GenerationOptions;

use crate::error::ProviderError;

/// The closed set of supported backends.
///
/// Adding a backend means adding a variant here and an adapter under
/// [`crate::adapters`]; every dispatch over providers is an exhaustive
/// match, so the compiler walks you to each site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderId {
    Ollama,
    OpenAi,
    Anthropic,
    Gemini,
}

impl ProviderId {
    pub const ALL: [ProviderId; 4] = [
        ProviderId::Ollama,
        ProviderId::OpenAi,
        ProviderId::Anthropic,
        ProviderId::Gemini,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ollama => "ollama",
            Self::OpenAi => "openai",
            Self::Anthropic => "anthropic",
            Self::Gemini => "gemini",
        }
    }
}

impl Display for ProviderId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::System => "system",
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }
}

/// A capability the model may invoke by name.
///
/// `input_schema` is a JSON Schema document as text; adapters check it
/// parses before putting it on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub input_schema: String,
}

impl ToolDefinition {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        input_schema: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            input_schema: input_schema.into(),
        }
    }
}

/// A capability invocation reported by the model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCall {
    pub id: String,
    pub name: String,
    pub arguments: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputItem {
    Message(Message),
    ToolCall(ToolCall),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    EndTurn,
    MaxTokens,
    ToolUse,
    Other,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TokenUsage {
    pub input_tokens: u32,
    pub output_tokens: u32,
    pub total_tokens: u32,
}

/// A normalized reply, the same shape no matter which backend produced it.
///
/// Adapters surface at most one [`OutputItem::ToolCall`] per reply; the
/// avatar acts on a single cue per turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelReply {
    pub provider: ProviderId,
    pub model: String,
    pub output: Vec<OutputItem>,
    pub stop_reason: StopReason,
    pub usage: TokenUsage,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ModelRequest {
    pub model: String,
    pub messages: Vec<Message>,
    pub tools: Vec<ToolDefinition>,
    pub options: GenerationOptions,
}

impl ModelRequest {
    pub fn new(model: impl Into<String>, messages: Vec<Message>) -> Self {
        Self {
            model: model.into(),
            messages,
            tools: Vec::new(),
            options: GenerationOptions::default(),
        }
    }

    pub fn new_validated(
        model: impl Into<String>,
        messages: Vec<Message>,
    ) -> Result<Self, ProviderError> {
        let request = Self::new(model, messages);
        request.validate()?;
        Ok(request)
    }

    pub fn builder(model: impl Into<String>) -> ModelRequestBuilder {
        ModelRequestBuilder {
            request: Self::new(model, Vec::new()),
        }
    }

    pub fn validate(&self) -> Result<(), ProviderError> {
        if self.model.trim().is_empty() {
            return Err(ProviderError::invalid_request("model id must not be empty"));
        }
        if self.messages.is_empty() {
            return Err(ProviderError::invalid_request(
                "request must contain at least one message",
            ));
        }
        if let Some(temperature) = self.options.temperature
            && !(0.0..=2.0).contains(&temperature)
        {
            return Err(ProviderError::invalid_request(format!(
                "temperature must be within 0.0..=2.0, got {temperature}"
            )));
        }
        if let Some(max_tokens) = self.options.max_tokens
            && max_tokens == 0
        {
            return Err(ProviderError::invalid_request(
                "max_tokens must be greater than zero",
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct ModelRequestBuilder {
    request: ModelRequest,
}

impl ModelRequestBuilder {
    pub fn message(mut self, message: Message) -> Self {
        self.request.messages.push(message);
        self
    }

    pub fn messages(mut self, messages: Vec<Message>) -> Self {
        self.request.messages = messages;
        self
    }

    pub fn tool(mut self, tool: ToolDefinition) -> Self {
        self.request.tools.push(tool);
        self
    }

    pub fn tools(mut self, tools: Vec<ToolDefinition>) -> Self {
        self.request.tools = tools;
        self
    }

    pub fn options(mut self, options: GenerationOptions) -> Self {
        self.request.options = options;
        self
    }

    pub fn temperature(mut self, temperature: f32) -> Self {
        self.request.options.temperature = Some(temperature);
        self
    }

    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.request.options.max_tokens = Some(max_tokens);
        self
    }

    pub fn build(self) -> ModelRequest {
        self.request
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_ids_display_as_lowercase_names() {
        assert_eq!(ProviderId::Ollama.to_string(), "ollama");
        assert_eq!(ProviderId::OpenAi.to_string(), "openai");
        assert_eq!(ProviderId::Anthropic.to_string(), "anthropic");
        assert_eq!(ProviderId::Gemini.to_string(), "gemini");
    }

    #[test]
    fn builder_assembles_request() {
        let request = ModelRequest::builder("llama3")
            .message(Message::system("stay cheerful"))
            .message(Message::user("hello"))
            .tool(ToolDefinition::new("smile", "smile warmly", "{}"))
            .temperature(0.0)
            .max_tokens(150)
            .build();

        assert_eq!(request.model, "llama3");
        assert_eq!(request.messages.len(), 2);
        assert_eq!(request.tools.len(), 1);
        assert_eq!(request.options.temperature, Some(0.0));
        assert_eq!(request.options.max_tokens, Some(150));
        assert!(request.validate().is_ok());
    }

    #[test]
    fn validate_rejects_empty_model_and_messages() {
        let no_model = ModelRequest::new("  ", vec![Message::user("hi")]);
        assert!(no_model.validate().is_err());

        let no_messages = ModelRequest::new("llama3", Vec::new());
        assert!(no_messages.validate().is_err());
    }

    #[test]
    fn validate_rejects_out_of_range_options() {
        let hot = ModelRequest::builder("llama3")
            .message(Message::user("hi"))
            .temperature(9.5)
            .build();
        assert!(hot.validate().is_err());

        let empty_budget = ModelRequest::builder("llama3")
            .message(Message::user("hi"))
            .max_tokens(0)
            .build();
        assert!(empty_budget.validate().is_err());
    }
}
