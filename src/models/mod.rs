//! Shared data models spanning the client layers.

pub mod indicators;
pub mod market;
pub mod prediction;

pub use indicators::{Candle, Indicators, LevelRow, Levels};
pub use market::{
    ApiEnvelope, CryptoListing, CryptoSnapshot, PriceHistory, PricePoint, SearchHit, Ticker,
};
pub use prediction::{Prediction, PredictionMetrics, TradeSignal};
