use std::time::Duration;

use rand::{rngs::StdRng, Rng, SeedableRng};
use tokio::{task::JoinHandle, time};

use crate::{
    models::BreachEvent,
    services::{
        alert_store::SharedAlertStore,
        dispatcher::{DispatchOutcome, Dispatcher},
        price_simulator::{self, PriceSample},
        threshold_evaluator,
    },
};

/// What one tick did. `sample` is `None` when the store was empty.
#[derive(Debug, Default)]
pub struct TickReport {
    pub sample: Option<PriceSample>,
    pub breaches: Vec<BreachEvent>,
    pub outcomes: Vec<DispatchOutcome>,
}

/// Simulated price feed over the stored alerts.
pub struct AlertMonitor<R = StdRng> {
    store: SharedAlertStore,
    dispatcher: Dispatcher,
    rng: R,
}

impl AlertMonitor<StdRng> {
    pub fn new(store: SharedAlertStore, dispatcher: Dispatcher) -> Self {
        Self::with_rng(store, dispatcher, StdRng::from_entropy())
    }
}

impl<R: Rng> AlertMonitor<R> {
    pub fn with_rng(store: SharedAlertStore, dispatcher: Dispatcher, rng: R) -> Self {
        Self {
            store,
            dispatcher,
            rng,
        }
    }

    pub fn run_tick(&mut self) -> TickReport {
        let Some(sample) = price_simulator::sample(self.store.as_ref(), &mut self.rng) else {
            return TickReport::default();
        };

        tracing::debug!(
            "[alert-monitor] {} simulated at {:.2}",
            sample.alert.symbol,
            sample.price
        );

        // re-read: an alert removed since selection simply yields nothing
        let breaches =
            threshold_evaluator::evaluate(self.store.as_ref(), &sample.alert.symbol, sample.price);

        let outcomes = breaches
            .iter()
            .map(|b| self.dispatcher.dispatch(&b.message()))
            .collect();

        TickReport {
            sample: Some(sample),
            breaches,
            outcomes,
        }
    }
}

pub fn spawn_price_alert_monitor<R>(mut monitor: AlertMonitor<R>, every: Duration) -> JoinHandle<()>
where
    R: Rng + Send + 'static,
{
    tokio::spawn(async move {
        // first tick one full period after start, like setInterval
        let mut interval = time::interval_at(time::Instant::now() + every, every);
        interval.set_missed_tick_behavior(time::MissedTickBehavior::Delay);

        loop {
            interval.tick().await;

            let report = monitor.run_tick();
            if !report.breaches.is_empty() {
                tracing::info!("[alert-monitor] {} breach(es) this tick", report.breaches.len());
            }
        }
    })
}
