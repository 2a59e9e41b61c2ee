//! Library entrypoint for StockVision alerts.
//!
//! The gateway server (`src/main.rs`) and the `alert_watcher` client both build
//! on this crate; integration tests under `tests/` import it directly.

use std::sync::Arc;

pub mod config;
pub mod error;
pub mod models;

#[path = "middleware/auth.rs"]
pub mod auth;

pub mod services;

pub mod controllers;
pub mod routes;

use services::{
    subscriptions_service::{MongoSubscriptionRepo, SubscriptionRepo},
    twilio::{SmsSender, TwilioClient},
    web_push::{PushSender, WebPushClient},
};

#[derive(Clone)]
pub struct AppState {
    pub db: mongodb::Database,
    pub settings: config::Settings,
    pub subscriptions: Arc<dyn SubscriptionRepo>,
    /// `None` when Twilio credentials are incomplete.
    pub sms: Option<Arc<dyn SmsSender>>,
    /// `None` when VAPID keys are missing.
    pub push: Option<Arc<dyn PushSender>>,
}

impl AppState {
    pub fn new(db: mongodb::Database, settings: config::Settings) -> Self {
        let sms = TwilioClient::from_settings(&settings.twilio)
            .map(|c| Arc::new(c) as Arc<dyn SmsSender>);
        let push = WebPushClient::from_settings(&settings.vapid)
            .map(|c| Arc::new(c) as Arc<dyn PushSender>);

        Self {
            subscriptions: Arc::new(MongoSubscriptionRepo::new(db.clone())),
            db,
            settings,
            sms,
            push,
        }
    }
}
