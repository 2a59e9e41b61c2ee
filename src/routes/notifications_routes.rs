use axum::{Router, routing::{get, post}};
use crate::{AppState, controllers::notifications_controller};

pub fn add_routes(router: Router<AppState>) -> Router<AppState> {
    router
        .route("/api/vapid-public-key", get(notifications_controller::get_vapid_public_key))
        .route("/api/push/subscribe", post(notifications_controller::post_push_subscribe))
        .route("/api/push/unsubscribe", post(notifications_controller::post_push_unsubscribe))
        .route("/api/push/send", post(notifications_controller::post_push_send))
        .route("/api/sms/send", post(notifications_controller::post_sms_send))
        .route("/api/alert/trigger", post(notifications_controller::post_alert_trigger))
}
