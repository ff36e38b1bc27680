use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tokio_tungstenite::accept_async;
use tokio_tungstenite::tungstenite::Message as WsMessage;

use mstage::{InMemoryTokenStore, StageClient, StageConfig, StageErrorKind, TokenStore};

/// Spawns a single-connection avatar host that answers each request with the
/// frames produced by `script` and returns every request it captured.
async fn spawn_stage(script: fn(&Value) -> Vec<Value>) -> (String, JoinHandle<Vec<Value>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let mut socket = accept_async(stream).await.unwrap();
        let mut seen = Vec::new();
        while let Some(Ok(message)) = socket.next().await {
            let WsMessage::Text(raw) = message else {
                continue;
            };
            let request: Value = serde_json::from_str(raw.as_str()).unwrap();
            let replies = script(&request);
            seen.push(request);
            for reply in replies {
                socket.send(WsMessage::text(reply.to_string())).await.unwrap();
            }
        }
        seen
    });
    (format!("ws://{addr}"), handle)
}

fn reply_to(request: &Value, message_type: &str, data: Value) -> Value {
    json!({
        "apiName": "VTubeStudioPublicAPI",
        "apiVersion": "1.0",
        "requestID": request["requestID"],
        "messageType": message_type,
        "data": data,
    })
}

fn approving_host(request: &Value) -> Vec<Value> {
    match request["messageType"].as_str() {
        Some("AuthenticationTokenRequest") => vec![reply_to(
            request,
            "AuthenticationTokenResponse",
            json!({"authenticationToken": "tok-fresh"}),
        )],
        Some("AuthenticationRequest") => vec![reply_to(
            request,
            "AuthenticationResponse",
            json!({"authenticated": true}),
        )],
        _ => vec![reply_to(request, "Unexpected", json!({}))],
    }
}

#[tokio::test]
async fn first_run_requests_and_caches_a_token() {
    let (url, host) = spawn_stage(approving_host).await;
    let mut stage = StageClient::connect(StageConfig::new().with_url(url))
        .await
        .unwrap();
    let store = InMemoryTokenStore::new();

    stage.authenticate(&store).await.unwrap();
    assert_eq!(store.load().unwrap(), Some("tok-fresh".to_string()));
    stage.close().await.unwrap();

    let seen = host.await.unwrap();
    assert_eq!(seen.len(), 2);
    assert_eq!(seen[0]["messageType"], "AuthenticationTokenRequest");
    assert_eq!(seen[0]["data"]["pluginName"], "Marionette Avatar Controller");
    assert_eq!(seen[0]["data"]["pluginDeveloper"], "marionette-live");
    assert_eq!(seen[1]["messageType"], "AuthenticationRequest");
    assert_eq!(seen[1]["data"]["authenticationToken"], "tok-fresh");
}

#[tokio::test]
async fn later_runs_reuse_the_cached_token() {
    let (url, host) = spawn_stage(approving_host).await;
    let mut stage = StageClient::connect(StageConfig::new().with_url(url))
        .await
        .unwrap();
    let store = InMemoryTokenStore::with_token("tok-cached");

    stage.authenticate(&store).await.unwrap();
    stage.close().await.unwrap();

    let seen = host.await.unwrap();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0]["messageType"], "AuthenticationRequest");
    assert_eq!(seen[0]["data"]["authenticationToken"], "tok-cached");
}

#[tokio::test]
async fn refused_authentication_is_an_error_and_not_retried() {
    fn refusing_host(request: &Value) -> Vec<Value> {
        vec![reply_to(
            request,
            "AuthenticationResponse",
            json!({"authenticated": false, "reason": "user denied the plugin"}),
        )]
    }

    let (url, host) = spawn_stage(refusing_host).await;
    let mut stage = StageClient::connect(StageConfig::new().with_url(url))
        .await
        .unwrap();
    let store = InMemoryTokenStore::with_token("tok-stale");

    let error = stage.authenticate(&store).await.unwrap_err();
    assert_eq!(error.kind, StageErrorKind::Rejected);
    assert!(error.message.contains("user denied the plugin"));
    stage.close().await.unwrap();

    assert_eq!(host.await.unwrap().len(), 1);
}

#[tokio::test]
async fn inject_sends_the_set_payload_and_skips_empty_batches() {
    fn inject_host(request: &Value) -> Vec<Value> {
        vec![reply_to(request, "InjectParameterDataResponse", json!({}))]
    }

    let (url, host) = spawn_stage(inject_host).await;
    let mut stage = StageClient::connect(StageConfig::new().with_url(url))
        .await
        .unwrap();

    stage
        .inject_parameters(&[
            ("PARAM_ANGLE_X".to_string(), 3.0),
            ("PARAM_MOUTH_OPEN_Y".to_string(), 0.3),
        ])
        .await
        .unwrap();
    stage.inject_parameters(&[]).await.unwrap();
    stage.close().await.unwrap();

    let seen = host.await.unwrap();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0]["messageType"], "InjectParameterDataRequest");
    assert_eq!(seen[0]["data"]["faceFound"], true);
    assert_eq!(seen[0]["data"]["mode"], "set");
    assert_eq!(seen[0]["data"]["parameterValues"][0]["id"], "PARAM_ANGLE_X");
    assert_eq!(seen[0]["data"]["parameterValues"][0]["value"], 3.0);
    assert_eq!(
        seen[0]["data"]["parameterValues"][1]["id"],
        "PARAM_MOUTH_OPEN_Y"
    );
}

#[tokio::test]
async fn host_errors_surface_as_protocol_failures() {
    fn erroring_host(request: &Value) -> Vec<Value> {
        vec![reply_to(
            request,
            "APIError",
            json!({"errorID": 50, "message": "session not authenticated"}),
        )]
    }

    let (url, _host) = spawn_stage(erroring_host).await;
    let mut stage = StageClient::connect(StageConfig::new().with_url(url))
        .await
        .unwrap();

    let error = stage
        .inject_parameters(&[("PARAM_BREATH".to_string(), 0.5)])
        .await
        .unwrap_err();
    assert_eq!(error.kind, StageErrorKind::Protocol);
    assert!(error.message.contains("error 50"));
    assert!(error.message.contains("session not authenticated"));
}

#[tokio::test]
async fn parameter_list_request_omits_data_and_merges_both_sections() {
    fn listing_host(request: &Value) -> Vec<Value> {
        vec![reply_to(
            request,
            "InputParameterListResponse",
            json!({
                "defaultParameters": [
                    {"name": "FaceAngleX", "value": 0.0, "min": -30.0, "max": 30.0, "defaultValue": 0.0}
                ],
                "customParameters": [
                    {"name": "TailWag", "value": 0.0, "min": 0.0, "max": 1.0, "defaultValue": 0.0}
                ]
            }),
        )]
    }

    let (url, host) = spawn_stage(listing_host).await;
    let mut stage = StageClient::connect(StageConfig::new().with_url(url))
        .await
        .unwrap();

    let parameters = stage.list_parameters().await.unwrap();
    assert_eq!(parameters.len(), 2);
    assert_eq!(parameters[0].name, "FaceAngleX");
    assert_eq!(parameters[1].name, "TailWag");
    stage.close().await.unwrap();

    let seen = host.await.unwrap();
    assert_eq!(seen[0]["messageType"], "InputParameterListRequest");
    assert!(seen[0].get("data").is_none());
}

#[tokio::test]
async fn unrelated_frames_are_skipped_until_the_reply_arrives() {
    fn noisy_host(request: &Value) -> Vec<Value> {
        vec![
            json!({
                "apiName": "VTubeStudioPublicAPI",
                "apiVersion": "1.0",
                "requestID": "evt-1",
                "messageType": "ModelMovedEvent",
                "data": {},
            }),
            reply_to(request, "InjectParameterDataResponse", json!({})),
        ]
    }

    let (url, _host) = spawn_stage(noisy_host).await;
    let mut stage = StageClient::connect(StageConfig::new().with_url(url))
        .await
        .unwrap();

    stage
        .inject_parameters(&[("PARAM_BREATH".to_string(), 1.0)])
        .await
        .unwrap();
    stage.close().await.unwrap();
}

#[tokio::test]
async fn connect_times_out_against_a_silent_endpoint() {
    // Accepts the TCP connection but never completes the WebSocket handshake.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let _guard = tokio::spawn(async move {
        let _held = listener.accept().await;
        tokio::time::sleep(Duration::from_secs(5)).await;
    });

    let config = StageConfig::new()
        .with_url(format!("ws://{addr}"))
        .with_connect_timeout(Duration::from_millis(100));
    let error = StageClient::connect(config).await.unwrap_err();
    assert_eq!(error.kind, StageErrorKind::Connect);
    assert!(error.message.contains("did not answer"));
}
