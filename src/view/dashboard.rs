//! Dashboard view state and the selection lifecycle

use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::time::Duration;
use tracing::{debug, info, warn};

use crate::config::DashboardConfig;
use crate::core::debounce::{SearchDebouncer, SearchOutcome, SearchUpdate};
use crate::core::refresher::{PriceRefresher, RefreshUpdate};
use crate::indicators::structure::compute_levels;
use crate::models::{Candle, CryptoListing, CryptoSnapshot, LevelRow, Levels, Prediction, PricePoint};
use crate::notify::Notifier;
use crate::services::error::ApiError;
use crate::services::market_data::DashboardApi;

/// Cards shown in the home grid.
pub const GRID_SIZE: usize = 6;
/// Points kept on the history chart when a refresh replaces its data.
pub const MAX_REALTIME_POINTS: usize = 90;

const REFRESH_CHANNEL_CAPACITY: usize = 16;

#[derive(Debug, Clone)]
pub struct ViewSettings {
    pub kline_interval: String,
    pub kline_limit: u32,
    pub refresh_interval: Duration,
    pub search_debounce: Duration,
}

impl From<&DashboardConfig> for ViewSettings {
    fn from(config: &DashboardConfig) -> Self {
        Self {
            kline_interval: config.kline_interval.clone(),
            kline_limit: config.kline_limit,
            refresh_interval: config.refresh_interval,
            search_debounce: config.search_debounce,
        }
    }
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self::from(&DashboardConfig::default())
    }
}

/// What the price chart shows for the current selection.
#[derive(Debug, Clone, PartialEq)]
pub enum PriceChart {
    /// Candle closes annotated with support/resistance bands.
    WithLevels { candles: Vec<Candle>, levels: Levels },
    /// Plain close history, used when no candles were available.
    History { points: Vec<PricePoint> },
}

impl PriceChart {
    pub fn levels(&self) -> Option<&Levels> {
        match self {
            PriceChart::WithLevels { levels, .. } => Some(levels),
            PriceChart::History { .. } => None,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            PriceChart::WithLevels { candles, .. } => candles.len(),
            PriceChart::History { points } => points.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Ticket for one selection. Results carrying an older generation are stale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub symbol: String,
    pub generation: u64,
}

/// Responses gathered for a selection, not yet applied to the view.
#[derive(Debug)]
pub struct SelectionLoad {
    pub selection: Selection,
    pub snapshot: Result<CryptoSnapshot, ApiError>,
    pub klines: Result<Vec<Candle>, ApiError>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionStatus {
    Applied,
    /// Another symbol was selected while this one was loading.
    Stale,
    Failed,
}

/// A level row with its distance from the live price.
#[derive(Debug, Clone, PartialEq)]
pub struct LevelRowView {
    pub row: LevelRow,
    pub distance_pct: Option<f64>,
}

pub struct DashboardView {
    api: Arc<dyn DashboardApi + Send + Sync>,
    notifier: Arc<dyn Notifier + Send + Sync>,
    settings: ViewSettings,
    selected: Option<String>,
    generation: u64,
    snapshot: Option<CryptoSnapshot>,
    chart: Option<PriceChart>,
    prediction: Option<Prediction>,
    refresher: Option<PriceRefresher>,
    refresh_tx: mpsc::Sender<RefreshUpdate>,
    refresh_rx: mpsc::Receiver<RefreshUpdate>,
    search: SearchDebouncer,
    search_rx: mpsc::UnboundedReceiver<SearchUpdate>,
}

impl DashboardView {
    pub fn new(
        api: Arc<dyn DashboardApi + Send + Sync>,
        notifier: Arc<dyn Notifier + Send + Sync>,
        settings: ViewSettings,
    ) -> Self {
        let (refresh_tx, refresh_rx) = mpsc::channel(REFRESH_CHANNEL_CAPACITY);
        let (search, search_rx) = SearchDebouncer::new(api.clone(), settings.search_debounce);
        Self {
            api,
            notifier,
            settings,
            selected: None,
            generation: 0,
            snapshot: None,
            chart: None,
            prediction: None,
            refresher: None,
            refresh_tx,
            refresh_rx,
            search,
            search_rx,
        }
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn snapshot(&self) -> Option<&CryptoSnapshot> {
        self.snapshot.as_ref()
    }

    pub fn chart(&self) -> Option<&PriceChart> {
        self.chart.as_ref()
    }

    pub fn prediction(&self) -> Option<&Prediction> {
        self.prediction.as_ref()
    }

    /// The forecast button is only offered once data for the selection loaded.
    pub fn can_predict(&self) -> bool {
        self.selected.is_some() && self.snapshot.is_some()
    }

    pub fn is_refreshing(&self) -> bool {
        self.refresher
            .as_ref()
            .map(PriceRefresher::is_running)
            .unwrap_or(false)
    }

    pub fn is_searching(&self) -> bool {
        self.search.has_pending()
    }

    /// First [`GRID_SIZE`] listings. Failures leave the grid empty.
    pub async fn load_grid(&self) -> Vec<CryptoListing> {
        match self.api.list_all().await {
            Ok(mut listings) => {
                listings.truncate(GRID_SIZE);
                listings
            }
            Err(e) => {
                warn!(error = %e, "Failed to load crypto grid");
                Vec::new()
            }
        }
    }

    /// Select `symbol`, load its data and restart price polling.
    pub async fn select_symbol(&mut self, symbol: &str) -> SelectionStatus {
        let selection = self.begin_selection(symbol);
        let load = Self::fetch_selection(self.api.as_ref(), &self.settings, selection).await;
        self.apply_selection(load)
    }

    /// Pick a search result: clear the search box, then select `symbol`.
    pub async fn select_from_search(&mut self, symbol: &str) -> SelectionStatus {
        self.search.input("");
        self.select_symbol(symbol).await
    }

    /// Feed the search box. Only the last input within the debounce window is searched.
    pub fn search_input(&mut self, raw: &str) {
        self.search.input(raw);
    }

    /// Next search outcome for the latest input. Superseded outcomes are skipped.
    pub async fn next_search_outcome(&mut self) -> Option<SearchOutcome> {
        while let Some(update) = self.search_rx.recv().await {
            if self.search.is_current(&update) {
                return Some(update.outcome);
            }
            debug!(
                sequence = update.sequence,
                current = self.search.sequence(),
                "Discarding stale search outcome"
            );
        }
        None
    }

    /// Switch the view to `symbol` without loading anything yet.
    ///
    /// Stops polling for the previous symbol and hides its forecast.
    pub fn begin_selection(&mut self, symbol: &str) -> Selection {
        self.stop_refresher();
        self.hide_prediction();

        self.generation += 1;
        self.selected = Some(symbol.to_string());

        info!(symbol = %symbol, generation = self.generation, "Selecting {}", symbol);

        Selection {
            symbol: symbol.to_string(),
            generation: self.generation,
        }
    }

    /// Fetch snapshot and candles concurrently. Does not touch the view.
    pub async fn fetch_selection(
        api: &(dyn DashboardApi + Send + Sync),
        settings: &ViewSettings,
        selection: Selection,
    ) -> SelectionLoad {
        let (snapshot, klines) = tokio::join!(
            api.get_crypto(&selection.symbol),
            api.get_klines(
                &selection.symbol,
                &settings.kline_interval,
                settings.kline_limit
            ),
        );
        SelectionLoad {
            selection,
            snapshot,
            klines,
        }
    }

    /// Apply loaded data if it still belongs to the current selection.
    pub fn apply_selection(&mut self, load: SelectionLoad) -> SelectionStatus {
        let SelectionLoad {
            selection,
            snapshot,
            klines,
        } = load;

        if selection.generation != self.generation {
            debug!(
                symbol = %selection.symbol,
                generation = selection.generation,
                current = self.generation,
                "Discarding stale selection load"
            );
            return SelectionStatus::Stale;
        }

        let snapshot = match snapshot {
            Ok(snapshot) => snapshot,
            Err(e) => {
                self.snapshot = None;
                self.chart = None;
                self.notifier
                    .notify_error(&format!("Failed to load {}: {}", selection.symbol, e));
                return SelectionStatus::Failed;
            }
        };

        let candles = match klines {
            Ok(candles) => candles,
            Err(e) => {
                warn!(symbol = %selection.symbol, error = %e, "Klines unavailable, using price history");
                Vec::new()
            }
        };

        self.chart = Some(build_chart(candles, &snapshot));
        self.snapshot = Some(snapshot);

        self.refresher = Some(PriceRefresher::start(
            self.api.clone(),
            selection.symbol.clone(),
            selection.generation,
            self.settings.refresh_interval,
            self.refresh_tx.clone(),
        ));

        SelectionStatus::Applied
    }

    /// Wait for the next refresh tick of the current refresher.
    pub async fn next_refresh(&mut self) -> Option<RefreshUpdate> {
        self.refresh_rx.recv().await
    }

    /// Apply a polled snapshot. Returns `false` when it belongs to an older selection.
    pub fn apply_refresh(&mut self, update: RefreshUpdate) -> bool {
        if update.generation != self.generation || self.selected.is_none() {
            debug!(
                symbol = %update.snapshot.symbol,
                generation = update.generation,
                "Discarding stale refresh"
            );
            return false;
        }

        if let Some(PriceChart::History { points }) = self.chart.as_mut() {
            let fresh = update.snapshot.history.points();
            let start = fresh.len().saturating_sub(MAX_REALTIME_POINTS);
            *points = fresh[start..].to_vec();
        }

        self.snapshot = Some(update.snapshot);
        true
    }

    /// Ask the backend for a forecast of the selected symbol.
    pub async fn request_prediction(&mut self) -> Option<&Prediction> {
        let Some(symbol) = self.selected.clone() else {
            self.notifier
                .notify_error("Select a cryptocurrency first");
            return None;
        };

        info!(symbol = %symbol, "Requesting forecast for {}", symbol);
        match self.api.predict(&symbol).await {
            Ok(prediction) => {
                self.prediction = Some(prediction);
                self.prediction.as_ref()
            }
            Err(e) => {
                self.notifier
                    .notify_error(&format!("Forecast failed for {}: {}", symbol, e));
                None
            }
        }
    }

    pub fn hide_prediction(&mut self) {
        self.prediction = None;
    }

    /// Levels panel rows for the current chart, with distances from the live price.
    pub fn level_rows(&self) -> Option<Vec<LevelRowView>> {
        let levels = self.chart.as_ref()?.levels()?;
        let current_price = self.snapshot.as_ref().map(|s| s.current.price);
        Some(
            levels
                .rows()
                .into_iter()
                .map(|row| LevelRowView {
                    distance_pct: current_price.and_then(|price| row.distance_pct(price)),
                    row,
                })
                .collect(),
        )
    }

    /// Stop polling, drop any pending search and forget the selection.
    pub fn teardown(&mut self) {
        self.stop_refresher();
        self.search.cancel();
        self.selected = None;
        self.snapshot = None;
        self.chart = None;
        self.prediction = None;
        self.generation += 1;
    }

    fn stop_refresher(&mut self) {
        if let Some(mut refresher) = self.refresher.take() {
            debug!(
                symbol = %refresher.symbol(),
                generation = refresher.generation(),
                "Stopping price refresh"
            );
            refresher.stop();
        }
    }
}

fn build_chart(candles: Vec<Candle>, snapshot: &CryptoSnapshot) -> PriceChart {
    if !candles.is_empty() {
        match compute_levels(&candles) {
            Ok(levels) => return PriceChart::WithLevels { candles, levels },
            Err(e) => {
                warn!(symbol = %snapshot.symbol, error = %e, "Cannot compute levels, using price history");
            }
        }
    }
    PriceChart::History {
        points: snapshot.history.points(),
    }
}
