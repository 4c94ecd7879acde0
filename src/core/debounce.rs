//! Search-as-you-type debouncing

use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{sleep, Duration};
use tracing::{debug, warn};

use crate::models::SearchHit;
use crate::services::market_data::DashboardApi;

#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    /// Query was emptied; hide the results dropdown.
    Cleared,
    /// A search is scheduled for this query.
    Pending { query: String },
    Results { query: String, hits: Vec<SearchHit> },
    NoMatches { query: String },
    Failed { query: String, message: String },
}

/// An outcome tagged with the input it answers.
///
/// Aborting a search that is already polling cannot stop its send, so a
/// superseded search may still deliver. Compare `sequence` against
/// [`SearchDebouncer::sequence`] before acting on it.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchUpdate {
    pub sequence: u64,
    pub outcome: SearchOutcome,
}

/// Delays searches until the user stops typing for `delay`.
///
/// Only the last query typed within the window reaches the backend.
pub struct SearchDebouncer {
    api: Arc<dyn DashboardApi + Send + Sync>,
    delay: Duration,
    outcomes: mpsc::UnboundedSender<SearchUpdate>,
    pending: Option<JoinHandle<()>>,
    sequence: u64,
}

impl SearchDebouncer {
    pub fn new(
        api: Arc<dyn DashboardApi + Send + Sync>,
        delay: Duration,
    ) -> (Self, mpsc::UnboundedReceiver<SearchUpdate>) {
        let (outcomes, receiver) = mpsc::unbounded_channel();
        let debouncer = Self {
            api,
            delay,
            outcomes,
            pending: None,
            sequence: 0,
        };
        (debouncer, receiver)
    }

    /// Feed the current contents of the search box.
    pub fn input(&mut self, raw: &str) {
        self.cancel();

        let sequence = self.sequence;
        let query = raw.trim().to_string();
        if query.is_empty() {
            let _ = self.outcomes.send(SearchUpdate {
                sequence,
                outcome: SearchOutcome::Cleared,
            });
            return;
        }

        let _ = self.outcomes.send(SearchUpdate {
            sequence,
            outcome: SearchOutcome::Pending {
                query: query.clone(),
            },
        });

        let api = self.api.clone();
        let outcomes = self.outcomes.clone();
        let delay = self.delay;
        self.pending = Some(tokio::spawn(async move {
            sleep(delay).await;
            debug!(query = %query, sequence, "SearchDebouncer: searching");

            let outcome = match api.search(&query).await {
                Ok(hits) if hits.is_empty() => SearchOutcome::NoMatches { query },
                Ok(hits) => SearchOutcome::Results { query, hits },
                Err(e) => {
                    warn!(query = %query, error = %e, "SearchDebouncer: search failed");
                    SearchOutcome::Failed {
                        query,
                        message: e.to_string(),
                    }
                }
            };
            let _ = outcomes.send(SearchUpdate { sequence, outcome });
        }));
    }

    /// Drop the scheduled search, if any. Anything it still delivers is stale.
    pub fn cancel(&mut self) {
        self.sequence += 1;
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }

    /// Sequence of the latest input. Older updates are stale.
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    pub fn is_current(&self, update: &SearchUpdate) -> bool {
        update.sequence == self.sequence
    }

    pub fn has_pending(&self) -> bool {
        self.pending
            .as_ref()
            .map(|handle| !handle.is_finished())
            .unwrap_or(false)
    }
}

impl Drop for SearchDebouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}
