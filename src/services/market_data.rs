//! Dashboard backend interface.

use async_trait::async_trait;

use crate::models::{Candle, CryptoListing, CryptoSnapshot, Prediction, SearchHit};
use crate::services::error::ApiError;

/// The five backend endpoints the dashboard consumes.
#[async_trait]
pub trait DashboardApi {
    /// Ticker, price history and backend indicators for a symbol.
    async fn get_crypto(&self, symbol: &str) -> Result<CryptoSnapshot, ApiError>;

    /// OHLC candles, oldest first.
    async fn get_klines(
        &self,
        symbol: &str,
        interval: &str,
        limit: u32,
    ) -> Result<Vec<Candle>, ApiError>;

    async fn search(&self, query: &str) -> Result<Vec<SearchHit>, ApiError>;

    /// Listing shown in the home grid.
    async fn list_all(&self) -> Result<Vec<CryptoListing>, ApiError>;

    /// Ask the backend for a multi-day forecast. Can take several seconds.
    async fn predict(&self, symbol: &str) -> Result<Prediction, ApiError>;
}
