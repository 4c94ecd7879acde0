use serde::{Deserialize, Serialize};

/// Trade signal attached to a forecast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TradeSignal {
    StrongBuy,
    Buy,
    Hold,
    Sell,
    StrongSell,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PredictionMetrics {
    #[serde(default)]
    pub accuracy: f64,
    #[serde(default)]
    pub rmse: f64,
}

/// Model-generated multi-day forecast from `/api/predict/{symbol}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub symbol: String,
    pub current_price: f64,
    pub expected_price: f64,
    pub predictions: Vec<f64>,
    pub predicted_change: f64,
    pub support: f64,
    pub resistance: f64,
    pub signal: TradeSignal,
    #[serde(default)]
    pub signal_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    #[serde(default)]
    pub confidence: f64,
    pub days: u32,
    #[serde(default)]
    pub metrics: PredictionMetrics,
}

impl Prediction {
    /// `Day 1`..`Day N` labels for the forecast chart.
    pub fn day_labels(&self) -> Vec<String> {
        (1..=self.days).map(|day| format!("Day {}", day)).collect()
    }
}
