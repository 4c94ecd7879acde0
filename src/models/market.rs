//! Response payloads of the dashboard backend.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::indicators::Indicators;

/// Envelope shared by every backend response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiEnvelope<T> {
    pub success: bool,
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ticker {
    pub price: f64,
    #[serde(default)]
    pub change_24h: f64,
    pub high_24h: f64,
    pub low_24h: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume_24h: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub turnover_24h: Option<f64>,
}

/// Close prices with their epoch-millisecond timestamps, oldest first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceHistory {
    pub prices: Vec<f64>,
    pub timestamps: Vec<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PricePoint {
    pub timestamp: DateTime<Utc>,
    pub price: f64,
}

impl PriceHistory {
    /// Pairs prices with timestamps, dropping entries whose timestamp is out of range.
    pub fn points(&self) -> Vec<PricePoint> {
        self.prices
            .iter()
            .zip(&self.timestamps)
            .filter_map(|(&price, &ms)| {
                DateTime::from_timestamp_millis(ms).map(|timestamp| PricePoint { timestamp, price })
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.prices.len().min(self.timestamps.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Full `/api/crypto/{symbol}` payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CryptoSnapshot {
    pub symbol: String,
    pub current: Ticker,
    #[serde(default)]
    pub history: PriceHistory,
    pub indicators: Indicators,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub symbol: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pair: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CryptoListing {
    pub symbol: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emoji: Option<String>,
}

impl CryptoListing {
    pub fn title(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.symbol)
    }

    pub fn emoji_or_default(&self) -> &str {
        self.emoji.as_deref().unwrap_or("💰")
    }
}
