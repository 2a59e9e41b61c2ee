use crate::{
    models::{Alert, BreachEvent, BreachKind},
    services::alert_store::AlertStore,
};

/// Breaches of a single alert. Strict inequality on both sides.
pub fn breaches(alert: &Alert, price: f64) -> Vec<BreachEvent> {
    let mut out = Vec::new();

    if let Some(high) = alert.high {
        if price > high {
            out.push(event(alert, BreachKind::High, high, price));
        }
    }

    if let Some(low) = alert.low {
        if price < low {
            out.push(event(alert, BreachKind::Low, low, price));
        }
    }

    out
}

/// Checks `price` against every stored alert for `symbol`.
pub fn evaluate(store: &dyn AlertStore, symbol: &str, price: f64) -> Vec<BreachEvent> {
    store
        .list()
        .iter()
        .filter(|a| a.matches_symbol(symbol))
        .flat_map(|a| breaches(a, price))
        .collect()
}

fn event(alert: &Alert, kind: BreachKind, threshold: f64, price: f64) -> BreachEvent {
    BreachEvent {
        alert_id: alert.id,
        symbol: alert.symbol.clone(),
        kind,
        threshold,
        price,
    }
}
