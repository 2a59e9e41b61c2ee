use std::net::SocketAddr;

use mongodb::Client;

use stockvision::{config, routes, services, AppState};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let settings = config::load();

    // Mongo connection
    let client = Client::with_uri_str(&settings.mongodb_uri)
        .await
        .expect("Failed to connect to MongoDB");
    let db = client.database(&settings.mongodb_db);

    if let Err(e) = services::db_init::ensure_indexes(&db).await {
        tracing::warn!("index setup failed: {}", e);
    }

    let state = AppState::new(db, settings.clone());

    if state.sms.is_none() {
        tracing::warn!("Twilio not configured, SMS alerts disabled");
    }
    if state.push.is_none() {
        tracing::warn!("VAPID not configured, push alerts disabled");
    }

    let app = routes::app(state);

    let ip = settings
        .host
        .parse::<std::net::IpAddr>()
        .expect("HOST must be an IP address");
    let addr = SocketAddr::from((ip, settings.port));
    tracing::info!("listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.expect("bind failed");
    axum::serve(listener, app).await.expect("server error");
}
