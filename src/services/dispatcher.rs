use std::{str::FromStr, sync::Arc};

use tokio::task::JoinHandle;

use crate::{
    models::TriggerResults,
    services::{gateway_client::TriggerGateway, recent_cache::RecentMessageCache},
};

pub const LOCAL_TITLE: &str = "StockVision Alert";

/// Local notification permission, as the browser reports it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    Granted,
    Denied,
    Default,
}

impl FromStr for Permission {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "granted" => Ok(Permission::Granted),
            "denied" => Ok(Permission::Denied),
            "default" | "" => Ok(Permission::Default),
            other => Err(format!("unknown notification permission: {other}")),
        }
    }
}

/// In-process notification surface. `show` is fire-and-forget.
pub trait LocalNotifier: Send + Sync {
    fn permission(&self) -> Permission;
    fn show(&self, title: &str, body: &str);
}

/// Prints notifications to the terminal.
pub struct ConsoleNotifier {
    permission: Permission,
}

impl ConsoleNotifier {
    pub fn new(permission: Permission) -> Self {
        Self { permission }
    }
}

impl LocalNotifier for ConsoleNotifier {
    fn permission(&self) -> Permission {
        self.permission
    }

    fn show(&self, title: &str, body: &str) {
        println!("🔔 {title}: {body}");
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RemoteOutcome {
    Delivered(Option<TriggerResults>),
    Failed(String),
}

#[derive(Debug)]
pub enum DispatchOutcome {
    /// Same text as the cached message, nothing happened.
    Suppressed,
    Dispatched {
        shown_locally: bool,
        permission: Permission,
        remote: JoinHandle<RemoteOutcome>,
    },
}

impl DispatchOutcome {
    pub fn is_suppressed(&self) -> bool {
        matches!(self, DispatchOutcome::Suppressed)
    }

    /// Waits for the remote leg, if one was started.
    pub async fn remote_outcome(self) -> Option<RemoteOutcome> {
        match self {
            DispatchOutcome::Suppressed => None,
            DispatchOutcome::Dispatched { remote, .. } => Some(
                remote
                    .await
                    .unwrap_or_else(|e| RemoteOutcome::Failed(format!("task failed: {e}"))),
            ),
        }
    }
}

/// Debounces breach messages and fans them out to the local notifier and the gateway.
#[derive(Clone)]
pub struct Dispatcher {
    cache: RecentMessageCache,
    notifier: Arc<dyn LocalNotifier>,
    gateway: Arc<dyn TriggerGateway>,
}

impl Dispatcher {
    pub fn new(
        cache: RecentMessageCache,
        notifier: Arc<dyn LocalNotifier>,
        gateway: Arc<dyn TriggerGateway>,
    ) -> Self {
        Self {
            cache,
            notifier,
            gateway,
        }
    }

    pub fn cache(&self) -> &RecentMessageCache {
        &self.cache
    }

    /// Must be called inside a tokio runtime; the remote leg runs as a spawned task.
    pub fn dispatch(&self, message: &str) -> DispatchOutcome {
        if !self.cache.claim(message) {
            tracing::debug!("[dispatch] suppressed duplicate: {}", message);
            return DispatchOutcome::Suppressed;
        }

        let permission = self.notifier.permission();
        let shown_locally = permission == Permission::Granted;
        if shown_locally {
            self.notifier.show(LOCAL_TITLE, message);
        } else {
            tracing::info!("[dispatch] local notification skipped (permission {:?})", permission);
        }

        let gateway = self.gateway.clone();
        let msg = message.to_string();
        let remote = tokio::spawn(async move {
            match gateway.trigger(&msg).await {
                Ok(res) => {
                    tracing::info!("[dispatch] remote alert sent: {:?}", res.results);
                    RemoteOutcome::Delivered(res.results)
                }
                Err(e) => {
                    tracing::warn!("[dispatch] remote alert failed: {}", e);
                    RemoteOutcome::Failed(e.to_string())
                }
            }
        });

        DispatchOutcome::Dispatched {
            shown_locally,
            permission,
            remote,
        }
    }
}
