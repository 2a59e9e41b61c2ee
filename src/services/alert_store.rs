use std::{
    fs,
    io::ErrorKind,
    path::PathBuf,
    sync::Arc,
};

use parking_lot::{Mutex, RwLock};

use crate::{error::StoreError, models::Alert};

/// Ordered, client-local persistence of price alerts.
///
/// Reads never fail: missing or malformed storage is an empty list.
/// Writes that fail are logged and dropped.
pub trait AlertStore: Send + Sync {
    fn list(&self) -> Vec<Alert>;
    fn add(&self, alert: Alert);
    fn remove(&self, id: i64);
}

pub type SharedAlertStore = Arc<dyn AlertStore>;

/// Parses a stored alert array. Entries without any threshold are dropped.
pub fn parse_alerts(raw: &str) -> Vec<Alert> {
    match serde_json::from_str::<Vec<Alert>>(raw) {
        Ok(items) => items
            .into_iter()
            .filter(|a| a.high.is_some() || a.low.is_some())
            .collect(),
        Err(e) => {
            tracing::warn!("[alert-store] ignoring malformed alert list: {}", e);
            Vec::new()
        }
    }
}

/// File-backed store, the counterpart of the browser's `stockAlerts` local storage key.
pub struct LocalAlertStore {
    path: PathBuf,
    // serializes read-modify-write cycles
    write_lock: Mutex<()>,
}

impl LocalAlertStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    fn read(&self) -> Vec<Alert> {
        match fs::read_to_string(&self.path) {
            Ok(raw) if raw.trim().is_empty() => Vec::new(),
            Ok(raw) => parse_alerts(&raw),
            Err(e) if e.kind() == ErrorKind::NotFound => Vec::new(),
            Err(e) => {
                tracing::warn!("[alert-store] cannot read {}: {}", self.path.display(), e);
                Vec::new()
            }
        }
    }

    fn write(&self, alerts: &[Alert]) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(alerts)?;
        fs::write(&self.path, json)?;
        Ok(())
    }

    fn mutate(&self, f: impl FnOnce(&mut Vec<Alert>)) {
        let _guard = self.write_lock.lock();

        let mut alerts = self.read();
        f(&mut alerts);

        if let Err(e) = self.write(&alerts) {
            tracing::warn!("[alert-store] cannot persist alerts: {}", e);
        }
    }
}

impl AlertStore for LocalAlertStore {
    fn list(&self) -> Vec<Alert> {
        self.read()
    }

    fn add(&self, alert: Alert) {
        self.mutate(|alerts| alerts.push(alert));
    }

    fn remove(&self, id: i64) {
        self.mutate(|alerts| alerts.retain(|a| a.id != id));
    }
}

#[derive(Default)]
pub struct MemoryAlertStore {
    alerts: RwLock<Vec<Alert>>,
}

impl MemoryAlertStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_alerts(alerts: Vec<Alert>) -> Self {
        Self {
            alerts: RwLock::new(alerts),
        }
    }
}

impl AlertStore for MemoryAlertStore {
    fn list(&self) -> Vec<Alert> {
        self.alerts.read().clone()
    }

    fn add(&self, alert: Alert) {
        self.alerts.write().push(alert);
    }

    fn remove(&self, id: i64) {
        self.alerts.write().retain(|a| a.id != id);
    }
}
