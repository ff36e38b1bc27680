use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use serde_json::Value;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message as WsMessage;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};

use crate::error::StageError;
use crate::protocol::{
    AuthenticationRequest, AuthenticationTokenRequest, DEFAULT_STAGE_URL,
    InjectParameterDataRequest, ParameterListData, ParameterValue, RequestEnvelope,
    ResponseEnvelope, StageParameter,
};
use crate::token::TokenStore;

const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Connection settings for the avatar host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageConfig {
    pub url: String,
    pub plugin_name: String,
    pub plugin_developer: String,
    pub connect_timeout: Duration,
}

impl StageConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    pub fn with_plugin_identity(
        mut self,
        name: impl Into<String>,
        developer: impl Into<String>,
    ) -> Self {
        self.plugin_name = name.into();
        self.plugin_developer = developer.into();
        self
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }
}

impl Default for StageConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_STAGE_URL.to_string(),
            plugin_name: "Marionette Avatar Controller".to_string(),
            plugin_developer: "marionette-live".to_string(),
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
        }
    }
}

/// WebSocket session with the avatar host.
///
/// The client sends one request at a time and waits for the matching reply,
/// skipping unrelated frames such as event broadcasts. Authentication is a
/// two-step exchange: the host issues a session token once the user approves
/// the plugin on screen, and the token is cached through a [`TokenStore`] so
/// later sessions skip the prompt.
#[derive(Debug)]
pub struct StageClient {
    socket: WebSocketStream<MaybeTlsStream<TcpStream>>,
    config: StageConfig,
    next_request_id: u64,
}

impl StageClient {
    /// Opens the WebSocket connection within the configured timeout.
    pub async fn connect(config: StageConfig) -> Result<Self, StageError> {
        let (socket, _) = tokio::time::timeout(config.connect_timeout, connect_async(&config.url))
            .await
            .map_err(|_| {
                StageError::connect(format!(
                    "avatar host at {} did not answer within {}s",
                    config.url,
                    config.connect_timeout.as_secs()
                ))
            })?
            .map_err(|err| {
                StageError::connect(format!("avatar host at {} is unreachable: {err}", config.url))
            })?;
        Ok(Self {
            socket,
            config,
            next_request_id: 0,
        })
    }

    pub fn config(&self) -> &StageConfig {
        &self.config
    }

    /// Authenticates the plugin, requesting and caching a session token on
    /// the first run. A refusal is surfaced as an error and never retried,
    /// since retrying would re-prompt the user on screen.
    pub async fn authenticate(&mut self, store: &dyn TokenStore) -> Result<(), StageError> {
        let token = match store.load()? {
            Some(token) => token,
            None => {
                let token = self.request_token().await?;
                store.save(&token)?;
                token
            }
        };
        let payload = AuthenticationRequest {
            plugin_name: self.config.plugin_name.clone(),
            plugin_developer: self.config.plugin_developer.clone(),
            authentication_token: token,
        };
        let data = serde_json::to_value(&payload)
            .map_err(|err| StageError::protocol(format!("request is not serializable: {err}")))?;
        let reply = self.request("AuthenticationRequest", Some(data)).await?;
        let authenticated = reply
            .data
            .get("authenticated")
            .and_then(Value::as_bool)
            .unwrap_or(false);
        if !authenticated {
            let reason = reply
                .data
                .get("reason")
                .and_then(Value::as_str)
                .unwrap_or("no reason given");
            return Err(StageError::rejected(format!(
                "avatar host refused the session: {reason}"
            )));
        }
        Ok(())
    }

    /// Pushes a batch of `(parameter id, value)` pairs into the running
    /// model. An empty batch is a no-op.
    pub async fn inject_parameters(&mut self, values: &[(String, f32)]) -> Result<(), StageError> {
        if values.is_empty() {
            return Ok(());
        }
        let payload = InjectParameterDataRequest::set(
            values
                .iter()
                .map(|(id, value)| ParameterValue {
                    id: id.clone(),
                    value: *value,
                })
                .collect(),
        );
        let data = serde_json::to_value(&payload)
            .map_err(|err| StageError::protocol(format!("request is not serializable: {err}")))?;
        self.request("InjectParameterDataRequest", Some(data))
            .await?;
        Ok(())
    }

    /// Lists every parameter the host tracks, built-in and plugin-created.
    pub async fn list_parameters(&mut self) -> Result<Vec<StageParameter>, StageError> {
        let reply = self.request("InputParameterListRequest", None).await?;
        let data: ParameterListData = serde_json::from_value(reply.data).map_err(|err| {
            StageError::protocol(format!("parameter list reply is not decodable: {err}"))
        })?;
        let mut parameters = data.default_parameters;
        parameters.extend(data.custom_parameters);
        Ok(parameters)
    }

    /// Closes the connection cleanly.
    pub async fn close(mut self) -> Result<(), StageError> {
        self.socket.close(None).await.map_err(|err| {
            StageError::connect(format!("avatar host socket did not close cleanly: {err}"))
        })
    }

    async fn request_token(&mut self) -> Result<String, StageError> {
        let payload = AuthenticationTokenRequest {
            plugin_name: self.config.plugin_name.clone(),
            plugin_developer: self.config.plugin_developer.clone(),
        };
        let data = serde_json::to_value(&payload)
            .map_err(|err| StageError::protocol(format!("request is not serializable: {err}")))?;
        let reply = self.request("AuthenticationTokenRequest", Some(data)).await?;
        reply
            .data
            .get("authenticationToken")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| StageError::protocol("token reply carries no authenticationToken"))
    }

    async fn request(
        &mut self,
        message_type: &str,
        data: Option<Value>,
    ) -> Result<ResponseEnvelope, StageError> {
        self.next_request_id += 1;
        let request_id = format!("req-{}", self.next_request_id);
        let envelope = RequestEnvelope::new(request_id.clone(), message_type, data);
        let payload = serde_json::to_string(&envelope)
            .map_err(|err| StageError::protocol(format!("request is not serializable: {err}")))?;
        self.socket
            .send(WsMessage::text(payload))
            .await
            .map_err(|err| {
                StageError::connect(format!(
                    "avatar host dropped the connection while sending: {err}"
                ))
            })?;

        loop {
            let frame = match self.socket.next().await {
                None => return Err(StageError::connect("avatar host closed the connection")),
                Some(Err(err)) => {
                    return Err(StageError::connect(format!(
                        "avatar host connection failed: {err}"
                    )));
                }
                Some(Ok(frame)) => frame,
            };
            let raw = match frame {
                WsMessage::Text(raw) => raw,
                WsMessage::Close(_) => {
                    return Err(StageError::connect("avatar host closed the connection"));
                }
                _ => continue,
            };
            let reply: ResponseEnvelope = serde_json::from_str(raw.as_str()).map_err(|err| {
                StageError::protocol(format!("avatar host sent an undecodable reply: {err}"))
            })?;
            if reply.request_id != request_id {
                continue;
            }
            if reply.message_type == "APIError" {
                return Err(Self::api_error(&reply.data));
            }
            return Ok(reply);
        }
    }

    fn api_error(data: &Value) -> StageError {
        let error_id = data.get("errorID").and_then(Value::as_i64).unwrap_or(-1);
        let message = data
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("unknown error");
        StageError::protocol(format!("avatar host error {error_id}: {message}"))
    }
}
