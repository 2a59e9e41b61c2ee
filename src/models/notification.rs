use serde::{Deserialize, Serialize};

/// Body of `POST /api/alert/trigger` and `POST /api/sms/send`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MessageRequest {
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ChannelResult {
    pub sent: bool,
    pub error: Option<String>,
}

impl ChannelResult {
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            sent: false,
            error: Some(error.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TriggerResults {
    pub sms: ChannelResult,
    pub push: ChannelResult,
}

/// Response of `POST /api/alert/trigger`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TriggerResponse {
    pub success: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub results: Option<TriggerResults>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Response of `GET /api/vapid-public-key`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VapidKeyResponse {
    pub success: bool,

    #[serde(default, rename = "publicKey", skip_serializing_if = "Option::is_none")]
    pub public_key: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Body of `POST /api/push/send`.
#[derive(Debug, Clone, Deserialize)]
pub struct PushSendRequest {
    #[serde(default = "default_push_title")]
    pub title: String,
    #[serde(default)]
    pub body: String,
    #[serde(default = "default_push_url")]
    pub url: String,
}

pub fn default_push_title() -> String {
    "StockVision Alert".to_string()
}

pub fn default_push_url() -> String {
    "/dashboard".to_string()
}

/// What a push message carries to the service worker.
#[derive(Debug, Clone, Serialize)]
pub struct PushPayload {
    pub title: String,
    pub body: String,
    pub url: String,
}
