//! Wire types for the avatar host protocol.
//!
//! The host speaks JSON over a WebSocket. Every message travels inside a
//! shared envelope; the `data` field carries the per-message payload and is
//! omitted entirely for requests that take none.

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const STAGE_API_NAME: &str = "VTubeStudioPublicAPI";
pub const STAGE_API_VERSION: &str = "1.0";
pub const DEFAULT_STAGE_URL: &str = "ws://localhost:8001";

/// Envelope wrapped around every request sent to the host.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestEnvelope {
    pub api_name: &'static str,
    pub api_version: &'static str,
    #[serde(rename = "requestID")]
    pub request_id: String,
    pub message_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl RequestEnvelope {
    pub fn new(request_id: impl Into<String>, message_type: impl Into<String>, data: Option<Value>) -> Self {
        Self {
            api_name: STAGE_API_NAME,
            api_version: STAGE_API_VERSION,
            request_id: request_id.into(),
            message_type: message_type.into(),
            data,
        }
    }
}

/// Envelope wrapped around every reply the host sends back.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseEnvelope {
    #[serde(default, rename = "requestID")]
    pub request_id: String,
    pub message_type: String,
    #[serde(default)]
    pub data: Value,
}

/// Asks the host to issue a session token. The user approves the plugin
/// on screen before the host replies.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticationTokenRequest {
    pub plugin_name: String,
    pub plugin_developer: String,
}

/// Presents a previously issued token to open an authenticated session.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticationRequest {
    pub plugin_name: String,
    pub plugin_developer: String,
    pub authentication_token: String,
}

/// One tracked parameter write.
#[derive(Debug, Clone, Serialize)]
pub struct ParameterValue {
    pub id: String,
    pub value: f32,
}

/// Pushes a batch of parameter values into the running model.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InjectParameterDataRequest {
    pub face_found: bool,
    pub mode: String,
    pub parameter_values: Vec<ParameterValue>,
}

impl InjectParameterDataRequest {
    /// Builds the standard "set" injection the controller uses. `face_found`
    /// stays true so the host keeps applying injected values while tracking
    /// is lost.
    pub fn set(values: Vec<ParameterValue>) -> Self {
        Self {
            face_found: true,
            mode: "set".to_string(),
            parameter_values: values,
        }
    }
}

/// One parameter as reported by the host.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageParameter {
    pub name: String,
    #[serde(default)]
    pub value: f32,
    #[serde(default)]
    pub min: f32,
    #[serde(default)]
    pub max: f32,
    #[serde(default)]
    pub default_value: f32,
}

/// Payload of the parameter list reply. The host splits the list between
/// built-in and plugin-created parameters.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterListData {
    #[serde(default)]
    pub default_parameters: Vec<StageParameter>,
    #[serde(default)]
    pub custom_parameters: Vec<StageParameter>,
}
