pub mod db_init;

// client side: local alerts, simulated prices, notification dispatch
pub mod alert_store;
pub mod price_simulator;
pub mod threshold_evaluator;
pub mod recent_cache;
pub mod gateway_client;
pub mod dispatcher;
pub mod alert_monitor;

// gateway side: delivery channels
pub mod twilio;
pub mod web_push;
pub mod subscriptions_service;
pub mod notification_service;
