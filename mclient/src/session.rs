//! The unified client session: one provider, one call at a time.

use std::sync::Arc;
use std::time::{Duration, Instant};

use mexpress::{EmotionResult, Expression, expression_catalog};
use mprovider::{Message, ModelProvider, ModelReply, ModelRequest, OutputItem, ProviderId, ToolDefinition};

use crate::config::ResolvedConfig;
use crate::error::ClientError;
use crate::extract::extract_emotion;
use crate::hooks::{CallHooks, NoopCallHooks};
use crate::perf::ResponseTimer;
use crate::prompt::PromptLibrary;

/// Token budget for free-form chat replies.
pub const CHAT_TOKEN_BUDGET: u32 = 300;
/// Token budget for classification replies, which are a single small
/// JSON object.
pub const EMOTION_TOKEN_BUDGET: u32 = 150;

/// How the model chose to react, beyond its text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Reaction {
    /// The model invoked an expression cue natively.
    Expression(Expression),
    /// An emotion reading extracted from the reply text.
    Emotion(EmotionResult),
}

impl Reaction {
    /// Resolves the reaction to a rig-ready emotion reading.
    pub fn emotion(&self) -> EmotionResult {
        match self {
            Reaction::Expression(expression) => expression.emotion(),
            Reaction::Emotion(result) => *result,
        }
    }
}

/// A normalized reply from one call.
#[derive(Debug, Clone, PartialEq)]
pub struct CallReply {
    pub text: String,
    pub reaction: Option<Reaction>,
    pub elapsed: Duration,
}

/// The live client: a fixed provider, resolved configuration, and the
/// latency of the most recent call.
///
/// The provider never changes for the session's lifetime, and `call`
/// takes `&mut self`, so a session is single-flight by construction.
/// Callers that want concurrency build independent sessions.
pub struct ClientSession {
    provider: Arc<dyn ModelProvider>,
    config: ResolvedConfig,
    prompts: PromptLibrary,
    catalog: Vec<ToolDefinition>,
    hooks: Arc<dyn CallHooks>,
    perf: ResponseTimer,
}

impl std::fmt::Debug for ClientSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientSession")
            .field("config", &self.config)
            .field("prompts", &self.prompts)
            .field("catalog", &self.catalog)
            .field("perf", &self.perf)
            .finish_non_exhaustive()
    }
}

impl ClientSession {
    /// Wires a session from an already-built provider and configuration.
    /// The expression catalog is attached by default so capable backends
    /// can react natively.
    pub fn new(provider: Arc<dyn ModelProvider>, config: ResolvedConfig) -> Self {
        Self {
            provider,
            config,
            prompts: PromptLibrary::builtin(),
            catalog: expression_catalog(),
            hooks: Arc::new(NoopCallHooks),
            perf: ResponseTimer::new(),
        }
    }

    pub fn with_hooks(mut self, hooks: Arc<dyn CallHooks>) -> Self {
        self.hooks = hooks;
        self
    }

    pub fn with_prompts(mut self, prompts: PromptLibrary) -> Self {
        self.prompts = prompts;
        self
    }

    pub fn with_catalog(mut self, catalog: Vec<ToolDefinition>) -> Self {
        self.catalog = catalog;
        self
    }

    pub fn config(&self) -> &ResolvedConfig {
        &self.config
    }

    pub fn provider_id(&self) -> ProviderId {
        self.config.provider
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    pub fn last_response_time(&self) -> Option<Duration> {
        self.perf.last_response_time()
    }

    /// True iff the latest call completed within the real-time budget.
    /// False before any call.
    pub fn is_performance_acceptable(&self) -> bool {
        self.perf.is_acceptable()
    }

    /// Sends one prompt and normalizes the reply.
    ///
    /// A native expression invocation becomes the reaction when the
    /// backend reports one; otherwise the reply text is scanned for an
    /// emotion object. A chat reply with neither is not an error, it
    /// simply carries no reaction.
    pub async fn call(
        &mut self,
        user_prompt: &str,
        system_prompt: Option<&str>,
    ) -> Result<CallReply, ClientError> {
        let mut messages = Vec::new();
        if let Some(system) = system_prompt {
            messages.push(Message::system(system));
        }
        messages.push(Message::user(user_prompt));

        let (reply, elapsed) = self.dispatch(messages, CHAT_TOKEN_BUDGET).await?;
        Ok(normalize_reply(reply, elapsed))
    }

    /// Renders a template pair from the prompt library and sends it.
    pub async fn call_with_template(
        &mut self,
        name: &str,
        vars: &[(&str, &str)],
    ) -> Result<CallReply, ClientError> {
        let (system, user) = self.prompts.render_pair(name, vars)?;
        let messages = vec![Message::system(system), Message::user(user)];

        let (reply, elapsed) = self.dispatch(messages, EMOTION_TOKEN_BUDGET).await?;
        Ok(normalize_reply(reply, elapsed))
    }

    /// Classifies the emotional tone of `text` using the emotion
    /// template pair.
    ///
    /// Unlike `call`, this is strict: a native cue invocation wins, a
    /// text reply must carry a parseable emotion object, and anything
    /// else is a malformed-response error.
    pub async fn classify_emotion(&mut self, text: &str) -> Result<EmotionResult, ClientError> {
        let (system, user) = self.prompts.render_pair("emotion", &[("text", text)])?;
        let messages = vec![Message::system(system), Message::user(user)];

        let (reply, _elapsed) = self.dispatch(messages, EMOTION_TOKEN_BUDGET).await?;

        for item in &reply.output {
            if let OutputItem::ToolCall(call) = item
                && let Some(expression) = Expression::from_name(&call.name)
            {
                return Ok(expression.emotion());
            }
        }

        extract_emotion(&collect_text(&reply))
            .map_err(|err| err.for_provider(self.config.provider))
    }

    /// One timed, timeout-bounded provider round trip. Latency is
    /// recorded whether the call succeeds or fails.
    async fn dispatch(
        &mut self,
        messages: Vec<Message>,
        max_tokens: u32,
    ) -> Result<(ModelReply, Duration), ClientError> {
        let request = ModelRequest::builder(self.config.model.clone())
            .messages(messages)
            .tools(self.catalog.clone())
            .temperature(self.config.temperature)
            .max_tokens(max_tokens)
            .build();

        self.hooks.on_call_start(self.config.provider, &self.config.model);
        let started = Instant::now();
        let outcome = tokio::time::timeout(self.config.timeout, self.provider.complete(request)).await;
        let elapsed = started.elapsed();
        self.perf.record(elapsed);

        let result = match outcome {
            Err(_) => Err(ClientError::timeout(format!(
                "no reply within the configured {}s timeout",
                self.config.timeout.as_secs()
            ))
            .for_provider(self.config.provider)),
            Ok(Err(err)) => Err(ClientError::from(err).for_provider(self.config.provider)),
            Ok(Ok(reply)) => Ok((reply, elapsed)),
        };

        match &result {
            Ok(_) => self
                .hooks
                .on_call_success(self.config.provider, &self.config.model, elapsed),
            Err(error) => {
                self.hooks
                    .on_call_failure(self.config.provider, &self.config.model, error, elapsed)
            }
        }
        result
    }
}

fn collect_text(reply: &ModelReply) -> String {
    let parts: Vec<&str> = reply
        .output
        .iter()
        .filter_map(|item| match item {
            OutputItem::Message(message) => Some(message.content.as_str()),
            OutputItem::ToolCall(_) => None,
        })
        .collect();
    parts.join("\n")
}

fn normalize_reply(reply: ModelReply, elapsed: Duration) -> CallReply {
    let text = collect_text(&reply);

    let mut reaction = None;
    for item in &reply.output {
        if let OutputItem::ToolCall(call) = item {
            reaction = Expression::from_name(&call.name).map(Reaction::Expression);
            break;
        }
    }
    if reaction.is_none()
        && let Ok(result) = extract_emotion(&text)
    {
        reaction = Some(Reaction::Emotion(result));
    }

    CallReply {
        text,
        reaction,
        elapsed,
    }
}
