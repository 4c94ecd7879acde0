//! reqwest-backed client for the dashboard REST API

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

use crate::config::DashboardConfig;
use crate::models::{
    ApiEnvelope, Candle, CryptoListing, CryptoSnapshot, Prediction, SearchHit,
};
use crate::services::error::ApiError;
use crate::services::market_data::DashboardApi;

pub struct DashboardClient {
    base_url: Url,
    http: reqwest::Client,
}

impl DashboardClient {
    /// Build a client with its own connection pool and the configured timeout.
    pub fn from_config(config: &DashboardConfig) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(config.http_timeout)
            .build()?;
        Self::with_client(config.api_url.as_str(), http)
    }

    /// Use an existing `reqwest::Client` against `base_url`.
    pub fn with_client(base_url: impl AsRef<str>, http: reqwest::Client) -> Result<Self, ApiError> {
        let base_url = Url::parse(base_url.as_ref())
            .map_err(|e| ApiError::InvalidUrl(e.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidUrl(format!(
                "'{}' cannot be used as a base URL",
                base_url
            )));
        }
        Ok(Self { base_url, http })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// `{base}/api/{segments...}`, each segment percent-encoded.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .push("api")
            .extend(segments);
        Ok(url)
    }

    async fn fetch<T: DeserializeOwned>(&self, request: reqwest::RequestBuilder) -> Result<T, ApiError> {
        let response = request.send().await?;
        read_envelope(response).await
    }
}

/// Decode a backend response into its payload.
///
/// Non-2xx statuses keep the envelope's `error` text when the body has one.
pub async fn read_envelope<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
    let status = response.status();
    let url = response.url().clone();
    let body = response.bytes().await?;

    if !status.is_success() {
        let message = serde_json::from_slice::<ApiEnvelope<serde_json::Value>>(&body)
            .ok()
            .and_then(|envelope| envelope.error)
            .unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("request failed")
                    .to_string()
            });
        warn!(url = %url, status = status.as_u16(), error = %message, "Dashboard API request failed");
        return Err(ApiError::Status {
            status: status.as_u16(),
            message,
        });
    }

    let envelope: ApiEnvelope<T> = serde_json::from_slice(&body)?;
    debug!(url = %url, success = envelope.success, "Dashboard API response");
    unwrap_envelope(envelope)
}

pub fn unwrap_envelope<T>(envelope: ApiEnvelope<T>) -> Result<T, ApiError> {
    if !envelope.success {
        return Err(ApiError::Backend(
            envelope
                .error
                .unwrap_or_else(|| "unknown error".to_string()),
        ));
    }
    envelope.data.ok_or(ApiError::MissingData)
}

#[async_trait]
impl DashboardApi for DashboardClient {
    async fn get_crypto(&self, symbol: &str) -> Result<CryptoSnapshot, ApiError> {
        let url = self.endpoint(&["crypto", symbol])?;
        self.fetch(self.http.get(url)).await
    }

    async fn get_klines(
        &self,
        symbol: &str,
        interval: &str,
        limit: u32,
    ) -> Result<Vec<Candle>, ApiError> {
        let mut url = self.endpoint(&["klines", symbol])?;
        url.query_pairs_mut()
            .append_pair("interval", interval)
            .append_pair("limit", &limit.to_string());
        self.fetch(self.http.get(url)).await
    }

    async fn search(&self, query: &str) -> Result<Vec<SearchHit>, ApiError> {
        let mut url = self.endpoint(&["search"])?;
        url.query_pairs_mut().append_pair("q", query);
        self.fetch(self.http.get(url)).await
    }

    async fn list_all(&self) -> Result<Vec<CryptoListing>, ApiError> {
        let url = self.endpoint(&["cryptos", "all"])?;
        self.fetch(self.http.get(url)).await
    }

    async fn predict(&self, symbol: &str) -> Result<Prediction, ApiError> {
        let url = self.endpoint(&["predict", symbol])?;
        let request = self
            .http
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .body("{}");
        self.fetch(request).await
    }
}
