use async_trait::async_trait;
use reqwest::{header, Client, Response};
use serde_json::json;

use crate::{
    error::GatewayError,
    models::{TriggerResponse, VapidKeyResponse},
};

/// The one gateway operation the dispatcher depends on.
#[async_trait]
pub trait TriggerGateway: Send + Sync {
    async fn trigger(&self, message: &str) -> Result<TriggerResponse, GatewayError>;
}

/// HTTP client for the notification gateway, authenticated with the session cookie.
#[derive(Clone)]
pub struct GatewayClient {
    http: Client,
    base_url: String,
    cookie: Option<String>,
}

impl GatewayClient {
    pub fn new(base_url: &str, cookie_name: &str, session_token: Option<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            cookie: session_token.map(|t| format!("{cookie_name}={t}")),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn with_session(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.cookie {
            Some(c) => req.header(header::COOKIE, c),
            None => req,
        }
    }

    pub async fn vapid_public_key(&self) -> Result<String, GatewayError> {
        let res = self
            .with_session(self.http.get(self.url("/api/vapid-public-key")))
            .send()
            .await?;

        let body: VapidKeyResponse = read_json(res).await?;
        match body.public_key {
            Some(k) if body.success => Ok(k),
            _ => Err(GatewayError::Rejected(
                body.error.unwrap_or_else(|| "no public key".to_string()),
            )),
        }
    }

    pub async fn push_subscribe(&self, subscription: &serde_json::Value) -> Result<(), GatewayError> {
        let res = self
            .with_session(self.http.post(self.url("/api/push/subscribe")))
            .json(subscription)
            .send()
            .await?;

        let body: serde_json::Value = read_json(res).await?;
        if body.get("success").and_then(|v| v.as_bool()) == Some(true) {
            Ok(())
        } else {
            Err(GatewayError::Rejected(error_text(&body)))
        }
    }
}

#[async_trait]
impl TriggerGateway for GatewayClient {
    async fn trigger(&self, message: &str) -> Result<TriggerResponse, GatewayError> {
        let res = self
            .with_session(self.http.post(self.url("/api/alert/trigger")))
            .json(&json!({ "message": message }))
            .send()
            .await?;

        let body: TriggerResponse = read_json(res).await?;
        if !body.success {
            return Err(GatewayError::Rejected(
                body.error.unwrap_or_else(|| "trigger failed".to_string()),
            ));
        }

        Ok(body)
    }
}

// Non-2xx bodies still carry `{success:false, error}` when the gateway produced them.
async fn read_json<T: serde::de::DeserializeOwned>(res: Response) -> Result<T, GatewayError> {
    let status = res.status();
    let text = res.text().await?;

    if !status.is_success() {
        let reason = serde_json::from_str::<serde_json::Value>(&text)
            .ok()
            .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(str::to_string));

        return Err(match reason {
            Some(r) => GatewayError::Rejected(r),
            None => GatewayError::Status {
                status: status.as_u16(),
                body: text,
            },
        });
    }

    serde_json::from_str(&text).map_err(|e| GatewayError::Rejected(format!("bad response: {e}")))
}

fn error_text(body: &serde_json::Value) -> String {
    body.get("error")
        .and_then(|e| e.as_str())
        .unwrap_or("request failed")
        .to_string()
}
