use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::{config::TwilioSettings, error::GatewayError};

#[async_trait]
pub trait SmsSender: Send + Sync {
    /// Sends `body` to `to` (E.164) and returns the provider's message id.
    async fn send_sms(&self, to: &str, body: &str) -> Result<String, GatewayError>;
}

#[derive(Clone)]
pub struct TwilioClient {
    http: Client,
    account_sid: String,
    auth_token: String,
    from: String,
    api_base: String,
}

#[derive(Debug, Deserialize)]
struct MessageCreated {
    sid: String,
}

#[derive(Debug, Deserialize)]
struct TwilioErrorBody {
    #[serde(default)]
    code: Option<i64>,
    #[serde(default)]
    message: Option<String>,
}

impl TwilioClient {
    pub fn new(account_sid: String, auth_token: String, from: String) -> Self {
        Self {
            http: Client::new(),
            account_sid,
            auth_token,
            from,
            api_base: "https://api.twilio.com".to_string(),
        }
    }

    /// `None` unless SID, token and sender number are all set.
    pub fn from_settings(s: &TwilioSettings) -> Option<Self> {
        Some(Self::new(
            s.account_sid.clone()?,
            s.auth_token.clone()?,
            s.phone_number.clone()?,
        ))
    }

    pub fn with_api_base(mut self, api_base: &str) -> Self {
        self.api_base = api_base.trim_end_matches('/').to_string();
        self
    }
}

#[async_trait]
impl SmsSender for TwilioClient {
    async fn send_sms(&self, to: &str, body: &str) -> Result<String, GatewayError> {
        let url = format!(
            "{}/2010-04-01/Accounts/{}/Messages.json",
            self.api_base, self.account_sid
        );

        let res = self
            .http
            .post(url)
            .basic_auth(&self.account_sid, Some(&self.auth_token))
            .form(&[("To", to), ("From", self.from.as_str()), ("Body", body)])
            .send()
            .await?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_default();

            return Err(match serde_json::from_str::<TwilioErrorBody>(&text) {
                Ok(TwilioErrorBody { code, message: Some(m) }) => GatewayError::Rejected(match code {
                    Some(c) => format!("Twilio error: {m} ({c})"),
                    None => format!("Twilio error: {m}"),
                }),
                _ => GatewayError::Status {
                    status: status.as_u16(),
                    body: text,
                },
            });
        }

        let created = res.json::<MessageCreated>().await?;
        tracing::info!("[sms] sent to {}: SID {}", to, created.sid);

        Ok(created.sid)
    }
}
