//! Fixed-interval price refresh for the selected symbol

use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Duration, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::models::CryptoSnapshot;
use crate::services::market_data::DashboardApi;

/// Snapshot fetched by a refresh tick, tagged with the selection it belongs to.
#[derive(Debug, Clone)]
pub struct RefreshUpdate {
    pub generation: u64,
    pub snapshot: CryptoSnapshot,
}

/// Owns the polling task for one symbol. Dropping the handle stops polling.
pub struct PriceRefresher {
    symbol: String,
    generation: u64,
    handle: Option<JoinHandle<()>>,
}

impl PriceRefresher {
    /// Start polling `symbol` every `period`.
    ///
    /// The first fetch happens one full period after start; the caller is
    /// expected to have just loaded the snapshot. Failed ticks are logged and
    /// skipped. Polling ends when `updates` is closed.
    pub fn start(
        api: Arc<dyn DashboardApi + Send + Sync>,
        symbol: impl Into<String>,
        generation: u64,
        period: Duration,
        updates: mpsc::Sender<RefreshUpdate>,
    ) -> Self {
        let symbol = symbol.into();
        let task_symbol = symbol.clone();

        let handle = tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;
                match api.get_crypto(&task_symbol).await {
                    Ok(snapshot) => {
                        debug!(symbol = %task_symbol, price = snapshot.current.price, "PriceRefresher: tick");
                        let update = RefreshUpdate {
                            generation,
                            snapshot,
                        };
                        if updates.send(update).await.is_err() {
                            debug!(symbol = %task_symbol, "PriceRefresher: receiver closed, stopping");
                            break;
                        }
                    }
                    Err(e) => {
                        warn!(symbol = %task_symbol, error = %e, "PriceRefresher: refresh failed");
                    }
                }
            }
        });

        info!(
            symbol = %symbol,
            interval_secs = period.as_secs_f64(),
            "PriceRefresher: started for {}",
            symbol
        );

        Self {
            symbol,
            generation,
            handle: Some(handle),
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Abort the polling task. Safe to call more than once.
    pub fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
            info!(symbol = %self.symbol, "PriceRefresher: stopped");
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle
            .as_ref()
            .map(|handle| !handle.is_finished())
            .unwrap_or(false)
    }
}

impl Drop for PriceRefresher {
    fn drop(&mut self) {
        self.stop();
    }
}
