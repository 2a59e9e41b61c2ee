use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::error::AlertError;

/// A user-defined price threshold kept in the client's local store.
///
/// At least one of `high` / `low` is always set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    /// Creation timestamp in milliseconds, doubles as identity.
    pub id: i64,
    pub symbol: String,

    #[serde(default)]
    pub high: Option<f64>,
    #[serde(default)]
    pub low: Option<f64>,
}

impl Alert {
    pub fn new(id: i64, symbol: &str, high: Option<f64>, low: Option<f64>) -> Result<Self, AlertError> {
        let sym = symbol.trim().to_uppercase();
        if sym.is_empty() {
            return Err(AlertError::MissingSymbol);
        }

        if high.is_none() && low.is_none() {
            return Err(AlertError::NoThreshold);
        }

        for v in [high, low].into_iter().flatten() {
            if !v.is_finite() || v <= 0.0 {
                return Err(AlertError::InvalidThreshold(v));
            }
        }

        Ok(Self {
            id,
            symbol: sym,
            high,
            low,
        })
    }

    /// Builds an alert stamped with the current time as its id.
    pub fn create(symbol: &str, high: Option<f64>, low: Option<f64>) -> Result<Self, AlertError> {
        Self::new(Utc::now().timestamp_millis(), symbol, high, low)
    }

    pub fn matches_symbol(&self, symbol: &str) -> bool {
        self.symbol.eq_ignore_ascii_case(symbol.trim())
    }
}
