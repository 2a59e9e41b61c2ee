use std::sync::Arc;

use async_trait::async_trait;
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use reqwest::{header, Client, Url};
use serde::Serialize;

use crate::{
    config::VapidSettings,
    error::GatewayError,
    models::{PushPayload, PushSubscription},
};

/// Seconds a push service may hold an undelivered message.
pub const PUSH_TTL_SECS: u32 = 60;

#[async_trait]
pub trait PushSender: Send + Sync {
    async fn send(&self, subscription: &PushSubscription, payload: &PushPayload) -> Result<(), GatewayError>;
}

#[derive(Serialize)]
struct VapidClaims {
    aud: String,
    exp: usize,
    sub: String,
}

/// VAPID-authenticated Web Push sender. Payloads are aes128gcm encrypted
/// for the subscription's `p256dh` / `auth` keys.
#[derive(Clone)]
pub struct WebPushClient {
    http: Client,
    public_key: String,
    signing_key: Arc<EncodingKey>,
    subject: String,
}

impl WebPushClient {
    pub fn new(public_key: String, private_key_pem: &str, subject: String) -> Result<Self, GatewayError> {
        let signing_key = EncodingKey::from_ec_pem(private_key_pem.as_bytes())?;

        Ok(Self {
            http: Client::new(),
            public_key,
            signing_key: Arc::new(signing_key),
            subject,
        })
    }

    /// `None` when keys are missing or the private key does not parse.
    pub fn from_settings(s: &VapidSettings) -> Option<Self> {
        let (public_key, private_key) = (s.public_key.clone()?, s.private_key.as_deref()?);

        match Self::new(public_key, private_key, s.claims_email.clone()) {
            Ok(c) => Some(c),
            Err(e) => {
                tracing::error!("[push] VAPID private key rejected: {}", e);
                None
            }
        }
    }

    fn authorization(&self, endpoint: &str) -> Result<String, GatewayError> {
        let url = Url::parse(endpoint).map_err(|e| GatewayError::InvalidEndpoint(e.to_string()))?;

        let claims = VapidClaims {
            aud: url.origin().ascii_serialization(),
            exp: (Utc::now() + Duration::hours(12)).timestamp() as usize,
            sub: self.subject.clone(),
        };

        let token = encode(&Header::new(Algorithm::ES256), &claims, &self.signing_key)?;
        Ok(format!("vapid t={}, k={}", token, self.public_key))
    }
}

// Browsers hand out base64url keys, sometimes padded.
fn decode_key(field: &str, value: &str) -> Result<Vec<u8>, GatewayError> {
    URL_SAFE_NO_PAD
        .decode(value.trim().trim_end_matches('='))
        .map_err(|e| GatewayError::Encryption(format!("bad {field} key: {e}")))
}

/// Encrypts the JSON payload for one subscription.
pub fn encrypt_payload(subscription: &PushSubscription, payload: &PushPayload) -> Result<Vec<u8>, GatewayError> {
    let p256dh = decode_key("p256dh", &subscription.keys.p256dh)?;
    let auth = decode_key("auth", &subscription.keys.auth)?;
    let plain = serde_json::to_vec(payload).map_err(|e| GatewayError::Encryption(e.to_string()))?;

    ece::encrypt(&p256dh, &auth, &plain).map_err(|e| GatewayError::Encryption(e.to_string()))
}

#[async_trait]
impl PushSender for WebPushClient {
    async fn send(&self, subscription: &PushSubscription, payload: &PushPayload) -> Result<(), GatewayError> {
        let auth = self.authorization(&subscription.endpoint)?;
        let body = encrypt_payload(subscription, payload)?;

        let res = self
            .http
            .post(&subscription.endpoint)
            .header(header::AUTHORIZATION, auth)
            .header("TTL", PUSH_TTL_SECS.to_string())
            .header(header::CONTENT_ENCODING, "aes128gcm")
            .header(header::CONTENT_TYPE, "application/octet-stream")
            .body(body)
            .send()
            .await?;

        if !res.status().is_success() {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            return Err(GatewayError::Status {
                status: status.as_u16(),
                body,
            });
        }

        tracing::debug!("[push] delivered '{}' to {}", payload.title, subscription.endpoint);
        Ok(())
    }
}
