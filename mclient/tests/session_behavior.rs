use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use mclient::{
    CallHooks, ClientErrorKind, ClientSession, Reaction, ResolvedConfig, Settings,
};
use mexpress::{Emotion, Expression};
use mprovider::{
    Message, ModelProvider, ModelReply, ModelRequest, OutputItem, ProviderError, ProviderFuture,
    ProviderId, Role, StopReason, TokenUsage, ToolCall,
};

#[derive(Debug, Default)]
struct FakeProvider {
    reply: Mutex<Option<Result<ModelReply, ProviderError>>>,
    captured: Mutex<Option<ModelRequest>>,
    delay: Option<Duration>,
}

impl FakeProvider {
    fn with_reply(reply: Result<ModelReply, ProviderError>) -> Self {
        Self {
            reply: Mutex::new(Some(reply)),
            captured: Mutex::new(None),
            delay: None,
        }
    }

    fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

impl ModelProvider for FakeProvider {
    fn id(&self) -> ProviderId {
        ProviderId::Ollama
    }

    fn complete<'a>(
        &'a self,
        request: ModelRequest,
    ) -> ProviderFuture<'a, Result<ModelReply, ProviderError>> {
        Box::pin(async move {
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            *self.captured.lock().expect("captured lock") = Some(request);
            self.reply
                .lock()
                .expect("reply lock")
                .take()
                .expect("a canned reply should be queued")
        })
    }
}

#[derive(Debug, Default)]
struct CountingHooks {
    started: AtomicUsize,
    succeeded: AtomicUsize,
    failed: AtomicUsize,
}

impl CallHooks for CountingHooks {
    fn on_call_start(&self, _provider: ProviderId, _model: &str) {
        self.started.fetch_add(1, Ordering::SeqCst);
    }

    fn on_call_success(&self, _provider: ProviderId, _model: &str, _elapsed: Duration) {
        self.succeeded.fetch_add(1, Ordering::SeqCst);
    }

    fn on_call_failure(
        &self,
        _provider: ProviderId,
        _model: &str,
        _error: &mclient::ClientError,
        _elapsed: Duration,
    ) {
        self.failed.fetch_add(1, Ordering::SeqCst);
    }
}

fn text_reply(content: &str) -> ModelReply {
    ModelReply {
        provider: ProviderId::Ollama,
        model: "llama3".to_string(),
        output: vec![OutputItem::Message(Message::assistant(content))],
        stop_reason: StopReason::EndTurn,
        usage: TokenUsage::default(),
    }
}

fn cue_reply(name: &str) -> ModelReply {
    ModelReply {
        provider: ProviderId::Ollama,
        model: "llama3".to_string(),
        output: vec![OutputItem::ToolCall(ToolCall {
            id: "call-1".to_string(),
            name: name.to_string(),
            arguments: "{}".to_string(),
        })],
        stop_reason: StopReason::ToolUse,
        usage: TokenUsage::default(),
    }
}

fn local_config(timeout: Duration) -> ResolvedConfig {
    ResolvedConfig {
        provider: ProviderId::Ollama,
        model: "llama3".to_string(),
        timeout,
        temperature: 0.0,
        endpoint: None,
        credential: None,
        warnings: Vec::new(),
    }
}

#[test]
fn missing_credential_is_rejected_before_any_network_activity() {
    let err = Settings::new()
        .with_provider("gemini")
        .resolve()
        .expect_err("hosted provider needs a key");

    assert_eq!(err.kind, ClientErrorKind::MissingCredential);
    assert!(err.is_configuration());
    assert!(err.message.contains("GOOGLE_API_KEY"));
    assert!(err.message.contains("gemini"));
}

#[tokio::test]
async fn call_surfaces_native_cues_and_records_latency() {
    let provider = Arc::new(FakeProvider::with_reply(Ok(cue_reply("laugh"))));
    let mut session =
        ClientSession::new(provider.clone(), local_config(Duration::from_secs(5)));

    assert_eq!(session.last_response_time(), None);
    assert!(!session.is_performance_acceptable());

    let reply = session
        .call("tell me a joke", Some("you are a playful avatar"))
        .await
        .expect("call succeeds");

    assert_eq!(reply.reaction, Some(Reaction::Expression(Expression::Laugh)));
    assert!(session.last_response_time().is_some());
    assert!(session.is_performance_acceptable());

    let request = provider
        .captured
        .lock()
        .expect("captured lock")
        .take()
        .expect("request was sent");
    assert_eq!(request.model, "llama3");
    assert_eq!(request.messages.len(), 2);
    assert_eq!(request.messages[0].role, Role::System);
    assert_eq!(request.options.temperature, Some(0.0));
    assert_eq!(request.options.max_tokens, Some(300));
    assert_eq!(request.tools.len(), 11);
}

#[tokio::test]
async fn call_extracts_and_clamps_an_embedded_emotion_object() {
    let provider = Arc::new(FakeProvider::with_reply(Ok(text_reply(
        r#"Sure! {"emotion": "happy", "intensity": 1.4} Have a nice day"#,
    ))));
    let mut session = ClientSession::new(provider, local_config(Duration::from_secs(5)));

    let reply = session.call("how are you?", None).await.expect("call succeeds");

    match reply.reaction {
        Some(Reaction::Emotion(result)) => {
            assert_eq!(result.emotion, Emotion::Happy);
            assert_eq!(result.intensity, 1.0);
        }
        other => panic!("expected an extracted emotion, got {other:?}"),
    }
    assert!(reply.text.contains("Have a nice day"));
}

#[tokio::test]
async fn slow_provider_times_out_and_latency_is_still_recorded() {
    let provider = Arc::new(
        FakeProvider::with_reply(Ok(text_reply("late"))).with_delay(Duration::from_millis(200)),
    );
    let mut session = ClientSession::new(provider, local_config(Duration::from_millis(20)));

    let err = session.call("hello", None).await.expect_err("times out");

    assert_eq!(err.kind, ClientErrorKind::Timeout);
    assert!(err.message.contains("ollama"));
    let elapsed = session
        .last_response_time()
        .expect("latency recorded on failure");
    assert!(elapsed >= Duration::from_millis(20));
}

#[tokio::test]
async fn provider_failures_map_to_client_kinds_and_fire_hooks() {
    let hooks = Arc::new(CountingHooks::default());
    let provider = Arc::new(FakeProvider::with_reply(Err(ProviderError::rate_limited(
        "busy backend",
    ))));
    let mut session = ClientSession::new(provider, local_config(Duration::from_secs(5)))
        .with_hooks(hooks.clone());

    let err = session.call("hello", None).await.expect_err("fails");

    assert_eq!(err.kind, ClientErrorKind::RateLimited);
    assert!(err.message.contains("ollama"));
    assert_eq!(hooks.started.load(Ordering::SeqCst), 1);
    assert_eq!(hooks.failed.load(Ordering::SeqCst), 1);
    assert_eq!(hooks.succeeded.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn classify_emotion_prefers_native_cues_and_renders_the_template() {
    let provider = Arc::new(FakeProvider::with_reply(Ok(cue_reply("sad"))));
    let mut session =
        ClientSession::new(provider.clone(), local_config(Duration::from_secs(5)));

    let result = session
        .classify_emotion("rainy monday")
        .await
        .expect("cue maps to an emotion");

    assert_eq!(result.emotion, Emotion::Sad);
    assert!((result.intensity - 0.7).abs() < 1e-6);

    let request = provider
        .captured
        .lock()
        .expect("captured lock")
        .take()
        .expect("request was sent");
    assert_eq!(request.options.max_tokens, Some(150));
    assert_eq!(request.messages.len(), 2);
    assert!(request.messages[0].content.contains("neutral, happy, sad"));
    assert!(request.messages[1].content.contains("rainy monday"));
}

#[tokio::test]
async fn classify_emotion_repairs_unknown_labels_to_neutral() {
    let provider = Arc::new(FakeProvider::with_reply(Ok(text_reply(
        r#"{"emotion": "zen", "intensity": 0.9}"#,
    ))));
    let mut session = ClientSession::new(provider, local_config(Duration::from_secs(5)));

    let result = session.classify_emotion("om").await.expect("repairable");

    assert_eq!(result.emotion, Emotion::Neutral);
    assert!((result.intensity - 0.9).abs() < 1e-6);
}

#[tokio::test]
async fn classify_emotion_rejects_prose_only_replies() {
    let provider = Arc::new(FakeProvider::with_reply(Ok(text_reply(
        "feels pretty upbeat to me",
    ))));
    let mut session = ClientSession::new(provider, local_config(Duration::from_secs(5)));

    let err = session
        .classify_emotion("what a day")
        .await
        .expect_err("prose has no object");

    assert_eq!(err.kind, ClientErrorKind::MalformedResponse);
    assert!(err.message.contains("ollama"));
}
