use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// OHLC sample for one kline interval, as returned by `/api/klines`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    #[serde(default)]
    pub volume: f64,
}

impl Candle {
    pub fn new(
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: f64,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            timestamp,
            open,
            high,
            low,
            close,
            volume,
        }
    }
}

/// Support/resistance bands derived from the trailing close window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Levels {
    pub support2: f64,
    pub support: f64,
    pub midline: f64,
    pub resistance: f64,
    pub resistance2: f64,
}

/// One row of the levels panel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LevelRow {
    pub label: &'static str,
    pub price: f64,
}

impl LevelRow {
    pub fn distance_pct(&self, current_price: f64) -> Option<f64> {
        Levels::distance_pct(self.price, current_price)
    }
}

impl Levels {
    /// Spread between resistance and support.
    pub fn spread(&self) -> f64 {
        self.resistance - self.support
    }

    /// Signed distance of `level` from `current_price`, in percent.
    ///
    /// Returns `None` when the current price is not a positive finite number.
    pub fn distance_pct(level: f64, current_price: f64) -> Option<f64> {
        if !current_price.is_finite() || current_price <= 0.0 {
            return None;
        }
        Some((level - current_price) / current_price * 100.0)
    }

    /// Panel rows from top to bottom: R2, R, S, S2.
    pub fn rows(&self) -> [LevelRow; 4] {
        [
            LevelRow {
                label: "R2",
                price: self.resistance2,
            },
            LevelRow {
                label: "R",
                price: self.resistance,
            },
            LevelRow {
                label: "S",
                price: self.support,
            },
            LevelRow {
                label: "S2",
                price: self.support2,
            },
        ]
    }
}

/// Technical indicators computed by the backend. Display only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Indicators {
    pub rsi: f64,
    pub ma_7: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ma_25: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ma_50: Option<f64>,
    pub volatility: f64,
    pub trend_strength: f64,
}
