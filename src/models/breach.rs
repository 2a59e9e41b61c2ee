use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BreachKind {
    High,
    Low,
}

/// A stored threshold crossed by a simulated price.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BreachEvent {
    pub alert_id: i64,
    pub symbol: String,
    pub kind: BreachKind,
    pub threshold: f64,
    pub price: f64,
}

impl BreachEvent {
    pub fn message(&self) -> String {
        let direction = match self.kind {
            BreachKind::High => "above",
            BreachKind::Low => "below",
        };

        format!(
            "{} crossed {} ₹{:.2} (now ₹{:.2})",
            self.symbol, direction, self.threshold, self.price
        )
    }
}
