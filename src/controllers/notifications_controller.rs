use axum::{
    extract::{Extension, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::{json, Value};

use crate::{
    auth,
    models::{CurrentUser, MessageRequest, PushPayload, PushSendRequest, SubscriptionKeys},
    services::notification_service,
    AppState,
};

fn fail(status: StatusCode, error: impl Into<String>) -> Response {
    (status, Json(json!({ "success": false, "error": error.into() }))).into_response()
}

// Blank messages are rejected, others are forwarded as sent.
fn message_of(body: Option<Json<MessageRequest>>) -> Option<String> {
    body.map(|Json(b)| b.message)
        .filter(|m| !m.trim().is_empty())
}

// GET /api/vapid-public-key
pub async fn get_vapid_public_key(State(state): State<AppState>) -> Response {
    match state.settings.vapid.public_key.as_ref() {
        Some(k) => (StatusCode::OK, Json(json!({ "success": true, "publicKey": k }))).into_response(),
        None => fail(StatusCode::INTERNAL_SERVER_ERROR, "VAPID keys not configured"),
    }
}

// POST /api/push/subscribe
pub async fn post_push_subscribe(
    State(state): State<AppState>,
    user: Option<Extension<CurrentUser>>,
    body: Option<Json<Value>>,
) -> Response {
    let Some(Extension(u)) = user else {
        return auth::unauthorized();
    };

    let Some(Json(data)) = body else {
        return fail(StatusCode::BAD_REQUEST, "Invalid subscription data");
    };

    let endpoint = data
        .get("endpoint")
        .and_then(|v| v.as_str())
        .map(str::trim)
        .unwrap_or_default();

    let keys = data
        .get("keys")
        .cloned()
        .and_then(|k| serde_json::from_value::<SubscriptionKeys>(k).ok());

    let Some(keys) = keys.filter(|_| !endpoint.is_empty()) else {
        return fail(StatusCode::BAD_REQUEST, "Invalid subscription data");
    };

    if let Err(e) = state.subscriptions.upsert(u.id, endpoint, keys).await {
        return fail(StatusCode::INTERNAL_SERVER_ERROR, e.to_string());
    }

    (
        StatusCode::OK,
        Json(json!({ "success": true, "message": "Push subscription saved" })),
    )
        .into_response()
}

// POST /api/push/unsubscribe
pub async fn post_push_unsubscribe(
    State(state): State<AppState>,
    user: Option<Extension<CurrentUser>>,
    body: Option<Json<Value>>,
) -> Response {
    let Some(Extension(u)) = user else {
        return auth::unauthorized();
    };

    let endpoint = body
        .as_ref()
        .and_then(|Json(d)| d.get("endpoint"))
        .and_then(|v| v.as_str())
        .map(str::trim)
        .unwrap_or_default()
        .to_string();

    if endpoint.is_empty() {
        return fail(StatusCode::BAD_REQUEST, "Endpoint is required");
    }

    if let Err(e) = state.subscriptions.remove(u.id, &endpoint).await {
        return fail(StatusCode::INTERNAL_SERVER_ERROR, e.to_string());
    }

    (
        StatusCode::OK,
        Json(json!({ "success": true, "message": "Unsubscribed from push notifications" })),
    )
        .into_response()
}

// POST /api/push/send
pub async fn post_push_send(
    State(state): State<AppState>,
    user: Option<Extension<CurrentUser>>,
    body: Option<Json<PushSendRequest>>,
) -> Response {
    let Some(Extension(u)) = user else {
        return auth::unauthorized();
    };

    if state.push.is_none() {
        return fail(StatusCode::INTERNAL_SERVER_ERROR, "VAPID keys not configured");
    }

    let Some(Json(req)) = body.filter(|Json(b)| !b.body.trim().is_empty()) else {
        return fail(StatusCode::BAD_REQUEST, "Body is required");
    };

    let payload = PushPayload {
        title: req.title,
        body: req.body,
        url: req.url,
    };

    match notification_service::deliver_push(&state, u.id, &payload).await {
        Ok(report) if report.attempted == 0 => fail(
            StatusCode::BAD_REQUEST,
            "No push subscriptions found. Please enable push notifications.",
        ),
        Ok(report) => {
            let errors = if report.errors.is_empty() {
                Value::Null
            } else {
                json!(report.errors)
            };

            (
                StatusCode::OK,
                Json(json!({ "success": true, "sent": report.sent, "errors": errors })),
            )
                .into_response()
        }
        Err(e) => fail(StatusCode::INTERNAL_SERVER_ERROR, e),
    }
}

// POST /api/sms/send
pub async fn post_sms_send(
    State(state): State<AppState>,
    user: Option<Extension<CurrentUser>>,
    body: Option<Json<MessageRequest>>,
) -> Response {
    let Some(Extension(u)) = user else {
        return auth::unauthorized();
    };

    let Some(sms) = state.sms.clone() else {
        return fail(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Twilio credentials not configured. Set TWILIO_ACCOUNT_SID, TWILIO_AUTH_TOKEN, and TWILIO_PHONE_NUMBER environment variables.",
        );
    };

    let Some(message) = message_of(body) else {
        return fail(StatusCode::BAD_REQUEST, "Message is required");
    };

    let Some(phone) = u.phone_number.as_deref() else {
        return fail(
            StatusCode::BAD_REQUEST,
            "No phone number on file. Please update your profile.",
        );
    };

    match sms.send_sms(phone, &message).await {
        Ok(sid) => (
            StatusCode::OK,
            Json(json!({ "success": true, "message": "SMS sent successfully", "sid": sid })),
        )
            .into_response(),
        Err(e) => fail(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
    }
}

// POST /api/alert/trigger
pub async fn post_alert_trigger(
    State(state): State<AppState>,
    user: Option<Extension<CurrentUser>>,
    body: Option<Json<MessageRequest>>,
) -> Response {
    let Some(Extension(u)) = user else {
        return auth::unauthorized();
    };

    let Some(message) = message_of(body) else {
        return fail(StatusCode::BAD_REQUEST, "Message is required");
    };

    let results = notification_service::trigger_alert(&state, &u, &message).await;
    tracing::info!(
        "[trigger] {} -> sms={} push={}",
        u.email,
        results.sms.sent,
        results.push.sent
    );

    (
        StatusCode::OK,
        Json(json!({ "success": true, "results": results })),
    )
        .into_response()
}
