use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum AlertError {
    #[error("symbol is required")]
    MissingSymbol,

    #[error("set at least one of high or low")]
    NoThreshold,

    #[error("invalid threshold: {0}")]
    InvalidThreshold(f64),
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Failures talking to the notification gateway or the vendors behind it.
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{status} {body}")]
    Status { status: u16, body: String },

    #[error("{0}")]
    Rejected(String),

    #[error("VAPID signing failed: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),

    #[error("push encryption failed: {0}")]
    Encryption(String),

    #[error("invalid endpoint: {0}")]
    InvalidEndpoint(String),

    #[error("db error: {0}")]
    Db(#[from] mongodb::error::Error),
}

impl GatewayError {
    /// Push services answer 404/410 for subscriptions that no longer exist.
    pub fn is_gone(&self) -> bool {
        matches!(self, GatewayError::Status { status, .. } if *status == 404 || *status == 410)
    }
}
