//! Local price alerts: manage thresholds and watch them against a simulated feed.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};

use stockvision::{
    config,
    models::Alert,
    services::{
        alert_monitor::{self, AlertMonitor},
        alert_store::{AlertStore, LocalAlertStore, SharedAlertStore},
        dispatcher::{ConsoleNotifier, Dispatcher, Permission},
        gateway_client::GatewayClient,
        recent_cache::RecentMessageCache,
    },
};

#[derive(Parser)]
#[command(name = "alert_watcher", about = "StockVision price alerts")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Store a new alert
    Add {
        #[arg(long)]
        symbol: String,
        #[arg(long)]
        high: Option<f64>,
        #[arg(long)]
        low: Option<f64>,
    },
    /// Delete an alert by id
    Remove {
        #[arg(long)]
        id: i64,
    },
    /// Print stored alerts
    List,
    /// Register a browser push subscription (JSON file) with the gateway
    Subscribe {
        #[arg(long)]
        file: PathBuf,
    },
    /// Run the simulated feed and dispatch notifications
    Watch,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let settings = config::load_client();
    let store: SharedAlertStore = Arc::new(LocalAlertStore::new(&settings.alert_store_path));

    match cli.command {
        Command::Add { symbol, high, low } => match Alert::create(&symbol, high, low) {
            Ok(alert) => {
                println!("added alert {} for {}", alert.id, alert.symbol);
                store.add(alert);
            }
            Err(e) => {
                eprintln!("cannot add alert: {e}");
                std::process::exit(2);
            }
        },
        Command::Remove { id } => {
            store.remove(id);
            println!("removed alert {id}");
        }
        Command::List => print_alerts(&store.list()),
        Command::Subscribe { file } => {
            if let Err(e) = subscribe(&settings, &file).await {
                eprintln!("cannot register subscription: {e}");
                std::process::exit(1);
            }
            println!("push subscription registered");
        }
        Command::Watch => watch(settings, store).await,
    }
}

fn gateway_client(settings: &config::ClientSettings) -> GatewayClient {
    GatewayClient::new(
        &settings.gateway_url,
        &settings.jwt_cookie_name,
        settings.session_token.clone(),
    )
}

async fn subscribe(settings: &config::ClientSettings, file: &Path) -> Result<(), String> {
    let raw = std::fs::read_to_string(file).map_err(|e| e.to_string())?;
    let subscription: serde_json::Value = serde_json::from_str(&raw).map_err(|e| e.to_string())?;

    gateway_client(settings)
        .push_subscribe(&subscription)
        .await
        .map_err(|e| e.to_string())
}

fn print_alerts(alerts: &[Alert]) {
    if alerts.is_empty() {
        println!("no alerts");
        return;
    }

    for a in alerts {
        let high = a.high.map(|v| format!("{v:.2}")).unwrap_or_else(|| "-".to_string());
        let low = a.low.map(|v| format!("{v:.2}")).unwrap_or_else(|| "-".to_string());
        println!("{:>15}  {:<12} high {:>10}  low {:>10}", a.id, a.symbol, high, low);
    }
}

async fn watch(settings: config::ClientSettings, store: SharedAlertStore) {
    let permission = settings
        .notification_permission
        .parse::<Permission>()
        .unwrap_or_else(|e| {
            tracing::warn!("{}, treating as default", e);
            Permission::Default
        });

    let gateway = gateway_client(&settings);

    match gateway.vapid_public_key().await {
        Ok(key) => tracing::info!("gateway push enabled (key {}…)", key.chars().take(12).collect::<String>()),
        Err(e) => tracing::info!("gateway push unavailable: {}", e),
    }

    let dispatcher = Dispatcher::new(
        RecentMessageCache::default(),
        Arc::new(ConsoleNotifier::new(permission)),
        Arc::new(gateway),
    );

    let every = Duration::from_secs(settings.interval_secs);
    tracing::info!(
        "watching {} alert(s) every {:?} from {}",
        store.list().len(),
        every,
        settings.alert_store_path
    );

    let monitor = AlertMonitor::new(store, dispatcher);
    let handle = alert_monitor::spawn_price_alert_monitor(monitor, every);

    tokio::select! {
        _ = handle => tracing::error!("alert monitor stopped"),
        _ = tokio::signal::ctrl_c() => tracing::info!("shutting down"),
    }
}
