use std::sync::Arc;

use axum::{
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use parking_lot::Mutex;
use serde_json::{json, Value};
use stockvision::{
    error::GatewayError,
    services::{
        dispatcher::{ConsoleNotifier, Dispatcher, Permission, RemoteOutcome},
        gateway_client::{GatewayClient, TriggerGateway},
        recent_cache::RecentMessageCache,
    },
};

type Seen = Arc<Mutex<Vec<(Option<String>, Value)>>>;

/// Serves a fake gateway on an ephemeral port and returns its base URL.
async fn spawn_gateway(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    format!("http://{addr}")
}

fn recording_trigger(seen: Seen, reply: Value, status: StatusCode) -> Router {
    Router::new().route(
        "/api/alert/trigger",
        post(move |headers: HeaderMap, Json(body): Json<Value>| {
            let seen = seen.clone();
            let reply = reply.clone();
            async move {
                let cookie = headers
                    .get(header::COOKIE)
                    .and_then(|v| v.to_str().ok())
                    .map(str::to_string);
                seen.lock().push((cookie, body));
                (status, Json(reply)).into_response()
            }
        }),
    )
}

#[tokio::test]
async fn trigger_posts_message_with_session_cookie() {
    let seen: Seen = Arc::default();
    let reply = json!({
        "success": true,
        "results": {
            "sms": { "sent": true, "error": null },
            "push": { "sent": false, "error": "No subscriptions" }
        }
    });
    let base = spawn_gateway(recording_trigger(seen.clone(), reply, StatusCode::OK)).await;

    let client = GatewayClient::new(&base, "auth", Some("tok123".to_string()));
    let res = client.trigger("RELIANCE crossed above ₹3000.00 (now ₹3050.00)").await.unwrap();

    let results = res.results.unwrap();
    assert!(results.sms.sent);
    assert_eq!(results.push.error.as_deref(), Some("No subscriptions"));

    let seen = seen.lock().clone();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].0.as_deref(), Some("auth=tok123"));
    assert_eq!(seen[0].1["message"], "RELIANCE crossed above ₹3000.00 (now ₹3050.00)");
}

#[tokio::test]
async fn trigger_maps_unsuccessful_body_to_rejected() {
    let seen: Seen = Arc::default();
    let reply = json!({ "success": false, "error": "Twilio credentials not configured" });
    let base = spawn_gateway(recording_trigger(seen, reply, StatusCode::INTERNAL_SERVER_ERROR)).await;

    let client = GatewayClient::new(&base, "auth", None);
    let err = client.trigger("x").await.unwrap_err();

    match err {
        GatewayError::Rejected(msg) => assert_eq!(msg, "Twilio credentials not configured"),
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn trigger_surfaces_plain_http_status() {
    let router = Router::new().route(
        "/api/alert/trigger",
        post(|| async { (StatusCode::BAD_GATEWAY, "upstream down") }),
    );
    let base = spawn_gateway(router).await;

    let client = GatewayClient::new(&base, "auth", None);
    let err = client.trigger("x").await.unwrap_err();

    assert!(matches!(err, GatewayError::Status { status: 502, .. }));
}

#[tokio::test]
async fn unreachable_gateway_is_a_transport_error() {
    // bind then drop to get a port nobody listens on
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = GatewayClient::new(&format!("http://{addr}"), "auth", None);
    assert!(matches!(client.trigger("x").await, Err(GatewayError::Http(_))));
}

#[tokio::test]
async fn vapid_public_key_is_read_from_gateway() {
    let router = Router::new().route(
        "/api/vapid-public-key",
        get(|| async { Json(json!({ "success": true, "publicKey": "BKey" })) }),
    );
    let base = spawn_gateway(router).await;

    let client = GatewayClient::new(&base, "auth", None);
    assert_eq!(client.vapid_public_key().await.unwrap(), "BKey");
}

#[tokio::test]
async fn push_subscribe_reports_rejection() {
    let router = Router::new().route(
        "/api/push/subscribe",
        post(|| async {
            (
                StatusCode::BAD_REQUEST,
                Json(json!({ "success": false, "error": "Invalid subscription data" })),
            )
        }),
    );
    let base = spawn_gateway(router).await;

    let client = GatewayClient::new(&base, "auth", None);
    let err = client.push_subscribe(&json!({ "endpoint": "" })).await.unwrap_err();
    assert_eq!(err.to_string(), "Invalid subscription data");
}

#[tokio::test]
async fn dispatcher_logs_and_captures_gateway_failure() {
    let seen: Seen = Arc::default();
    let reply = json!({ "success": false, "error": "Twilio credentials not configured" });
    let base = spawn_gateway(recording_trigger(seen.clone(), reply, StatusCode::OK)).await;

    let dispatcher = Dispatcher::new(
        RecentMessageCache::default(),
        Arc::new(ConsoleNotifier::new(Permission::Granted)),
        Arc::new(GatewayClient::new(&base, "auth", None)),
    );

    let outcome = dispatcher.dispatch("RELIANCE crossed above ₹3000.00 (now ₹3050.00)");
    let remote = outcome.remote_outcome().await;

    assert_eq!(
        remote,
        Some(RemoteOutcome::Failed("Twilio credentials not configured".to_string()))
    );
    assert_eq!(seen.lock().len(), 1);

    // still inside the window: no second request
    assert!(dispatcher.dispatch("RELIANCE crossed above ₹3000.00 (now ₹3050.00)").is_suppressed());
    assert_eq!(seen.lock().len(), 1);
}
