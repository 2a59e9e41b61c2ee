use std::env;

#[derive(Debug, Clone)]
pub struct Settings {
    pub mongodb_uri: String,
    pub mongodb_db: String,
    pub host: String,
    pub port: u16,

    pub jwt_secret: String,
    pub jwt_cookie_name: String,

    pub twilio: TwilioSettings,
    pub vapid: VapidSettings,
}

#[derive(Debug, Clone, Default)]
pub struct TwilioSettings {
    pub account_sid: Option<String>,
    pub auth_token: Option<String>,
    pub phone_number: Option<String>,
}

impl TwilioSettings {
    pub fn is_configured(&self) -> bool {
        self.account_sid.is_some() && self.auth_token.is_some() && self.phone_number.is_some()
    }
}

#[derive(Debug, Clone, Default)]
pub struct VapidSettings {
    pub public_key: Option<String>,
    /// PEM encoded P-256 private key.
    pub private_key: Option<String>,
    pub claims_email: String,
}

impl VapidSettings {
    pub fn is_configured(&self) -> bool {
        self.public_key.is_some() && self.private_key.is_some()
    }
}

/// Settings for the `alert_watcher` client.
#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub gateway_url: String,
    pub session_token: Option<String>,
    pub jwt_cookie_name: String,
    pub alert_store_path: String,
    pub interval_secs: u64,
    pub notification_permission: String,
}

// Empty values count as unset, same as a missing variable.
fn non_empty(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub fn load() -> Settings {
    // Loads .env if present (no crash if missing)
    dotenvy::dotenv().ok();

    let mongodb_uri = env::var("MONGODB_URI")
        .unwrap_or_else(|_| "mongodb://localhost:27017".to_string());

    let mongodb_db = env::var("MONGODB_DB")
        .unwrap_or_else(|_| "stockvision".to_string());

    let host = env::var("HOST")
        .unwrap_or_else(|_| "127.0.0.1".to_string());

    let port = env::var("PORT")
        .ok()
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(5000);

    let jwt_secret = env::var("JWT_SECRET").unwrap_or_else(|_| "change-me-dev-secret".to_string());
    let jwt_cookie_name = env::var("JWT_COOKIE_NAME").unwrap_or_else(|_| "auth".to_string());

    let twilio = TwilioSettings {
        account_sid: non_empty("TWILIO_ACCOUNT_SID"),
        auth_token: non_empty("TWILIO_AUTH_TOKEN"),
        phone_number: non_empty("TWILIO_PHONE_NUMBER"),
    };

    let vapid = VapidSettings {
        public_key: non_empty("VAPID_PUBLIC_KEY"),
        private_key: non_empty("VAPID_PRIVATE_KEY").map(|k| k.replace("\\n", "\n")),
        claims_email: non_empty("VAPID_CLAIMS_EMAIL")
            .unwrap_or_else(|| "mailto:admin@stockvision.ai".to_string()),
    };

    Settings {
        mongodb_uri,
        mongodb_db,
        host,
        port,
        jwt_secret,
        jwt_cookie_name,
        twilio,
        vapid,
    }
}

pub fn load_client() -> ClientSettings {
    dotenvy::dotenv().ok();

    let gateway_url = env::var("GATEWAY_URL")
        .unwrap_or_else(|_| "http://127.0.0.1:5000".to_string());

    let alert_store_path = env::var("ALERT_STORE_PATH")
        .unwrap_or_else(|_| "stockAlerts.json".to_string());

    let interval_secs = env::var("ALERT_INTERVAL_SECS")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .filter(|s| *s > 0)
        .unwrap_or(5);

    let notification_permission = env::var("NOTIFICATION_PERMISSION")
        .unwrap_or_else(|_| "default".to_string());

    ClientSettings {
        gateway_url,
        session_token: non_empty("SESSION_TOKEN"),
        jwt_cookie_name: env::var("JWT_COOKIE_NAME").unwrap_or_else(|_| "auth".to_string()),
        alert_store_path,
        interval_secs,
        notification_permission,
    }
}
