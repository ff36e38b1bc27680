#![cfg(feature = "provider-ollama")]

use std::sync::{Arc, Mutex};

use mprovider::adapters::chat::{
    ChatAssistantMessage, ChatAuth, ChatFinishReason, ChatRequest, ChatResponse, ChatToolCall,
    ChatTransport, ChatUsage,
};
use mprovider::adapters::ollama::OllamaProvider;
use mprovider::{
    Message, ModelProvider, ModelRequest, OutputItem, ProviderError, ProviderFuture, ProviderId,
    Role, StopReason,
};

#[derive(Debug, Clone, PartialEq, Eq)]
struct CapturedAuth(String);

#[derive(Debug, Default)]
struct FakeTransport {
    captured_auth: Mutex<Option<CapturedAuth>>,
    captured_request: Mutex<Option<ChatRequest>>,
}

impl ChatTransport for FakeTransport {
    fn complete<'a>(
        &'a self,
        request: ChatRequest,
        auth: ChatAuth,
    ) -> ProviderFuture<'a, Result<ChatResponse, ProviderError>> {
        Box::pin(async move {
            *self.captured_request.lock().expect("request lock") = Some(request);
            *self.captured_auth.lock().expect("auth lock") = Some(match auth {
                ChatAuth::Bearer(key) => CapturedAuth(key.expose().to_string()),
                ChatAuth::AnthropicKey(key) => CapturedAuth(key.expose().to_string()),
            });

            Ok(ChatResponse {
                model: "llama3".to_string(),
                message: ChatAssistantMessage {
                    content: "ollama-ok".to_string(),
                    tool_calls: vec![ChatToolCall {
                        id: "call_1".to_string(),
                        name: "smile".to_string(),
                        arguments: "{}".to_string(),
                    }],
                },
                finish_reason: ChatFinishReason::ToolCalls,
                usage: ChatUsage {
                    prompt_tokens: 2,
                    completion_tokens: 3,
                    total_tokens: 5,
                },
            })
        })
    }
}

#[tokio::test]
async fn complete_maps_to_ollama_provider_id_and_uses_placeholder_auth() {
    let transport = Arc::new(FakeTransport::default());
    let provider = OllamaProvider::new(transport.clone());
    let request = ModelRequest::new("llama3", vec![Message::new(Role::User, "hi")]);

    let reply = provider
        .complete(request)
        .await
        .expect("complete should succeed");
    assert_eq!(reply.provider, ProviderId::Ollama);
    assert_eq!(reply.model, "llama3");
    assert_eq!(reply.stop_reason, StopReason::ToolUse);

    let auth = transport
        .captured_auth
        .lock()
        .expect("auth lock")
        .clone()
        .expect("auth should be captured");
    assert_eq!(auth, CapturedAuth("ollama-local".to_string()));
}

#[tokio::test]
async fn complete_surfaces_text_and_a_single_tool_call() {
    let transport = Arc::new(FakeTransport::default());
    let provider = OllamaProvider::new(transport);
    let request = ModelRequest::new("llama3", vec![Message::new(Role::User, "smile for me")]);

    let reply = provider
        .complete(request)
        .await
        .expect("complete should succeed");
    assert_eq!(reply.output.len(), 2);
    assert!(matches!(
        &reply.output[0],
        OutputItem::Message(message) if message.content == "ollama-ok"
    ));
    assert!(matches!(
        &reply.output[1],
        OutputItem::ToolCall(call) if call.name == "smile"
    ));
}

#[tokio::test]
async fn invalid_requests_fail_before_reaching_the_transport() {
    let transport = Arc::new(FakeTransport::default());
    let provider = OllamaProvider::new(transport.clone());
    let request = ModelRequest::new("llama3", Vec::new());

    let error = provider
        .complete(request)
        .await
        .expect_err("empty requests should fail");
    assert_eq!(error.kind, mprovider::ProviderErrorKind::InvalidRequest);
    assert!(
        transport
            .captured_request
            .lock()
            .expect("request lock")
            .is_none()
    );
}
