use rand::{seq::SliceRandom, Rng};

use crate::{models::Alert, services::alert_store::AlertStore};

/// Used when an alert somehow carries no threshold at all.
pub const DEFAULT_REFERENCE_PRICE: f64 = 3000.0;

/// Width of the uniform swing around the reference price (±5%).
pub const SWING: f64 = 0.10;

pub fn reference_price(alert: &Alert) -> f64 {
    alert.high.or(alert.low).unwrap_or(DEFAULT_REFERENCE_PRICE)
}

/// Draws a price uniformly inside `[0.95 * reference, 1.05 * reference]`.
pub fn simulate_price<R: Rng + ?Sized>(reference: f64, rng: &mut R) -> f64 {
    let u: f64 = rng.gen_range(0.0..1.0);
    reference * (1.0 + (u - 0.5) * SWING)
}

pub fn pick_alert<'a, R: Rng + ?Sized>(alerts: &'a [Alert], rng: &mut R) -> Option<&'a Alert> {
    alerts.choose(rng)
}

#[derive(Debug, Clone, PartialEq)]
pub struct PriceSample {
    pub alert: Alert,
    pub price: f64,
}

/// One simulator tick: picks a stored alert and prices it. `None` for an empty store.
pub fn sample<R: Rng + ?Sized>(store: &dyn AlertStore, rng: &mut R) -> Option<PriceSample> {
    let alerts = store.list();
    let alert = pick_alert(&alerts, rng)?.clone();
    let price = simulate_price(reference_price(&alert), rng);

    Some(PriceSample { alert, price })
}
