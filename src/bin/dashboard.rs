//! Cryptodash terminal dashboard
//!
//! Loads one symbol from the dashboard backend, prints its price card,
//! indicator cards and support/resistance levels, then follows the live
//! price until Ctrl-C. A command-line argument is resolved through the
//! backend search first, so `dashboard sol` selects `SOLUSDT`.

use cryptodash::config::{get_environment, DashboardConfig};
use cryptodash::display::{format_change, format_price, format_signed_pct, indicator_cards};
use cryptodash::logging;
use cryptodash::notify::LogNotifier;
use cryptodash::services::DashboardClient;
use cryptodash::core::SearchOutcome;
use cryptodash::view::{DashboardView, SelectionStatus, ViewSettings};
use dotenvy::dotenv;
use std::env;
use std::sync::Arc;
use tokio::signal;
use tracing::{info, warn};

const DEFAULT_SYMBOL: &str = "BTCUSDT";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env if present
    dotenv().ok();

    logging::init_logging();

    let config = DashboardConfig::from_env()?;
    let query = env::args().nth(1);

    info!(environment = %get_environment(), "Starting Cryptodash");
    info!(api_url = %config.api_url, "Dashboard API: {}", config.api_url);

    let client = Arc::new(DashboardClient::from_config(&config)?);
    let mut view = DashboardView::new(
        client,
        Arc::new(LogNotifier),
        ViewSettings::from(&config),
    );

    let grid = view.load_grid().await;
    if !grid.is_empty() {
        let titles: Vec<String> = grid
            .iter()
            .map(|listing| format!("{} {}", listing.emoji_or_default(), listing.title()))
            .collect();
        println!("{}", titles.join("   "));
    }

    let (symbol, status) = match query {
        Some(query) => {
            let symbol = resolve_symbol(&mut view, &query).await;
            let status = view.select_from_search(&symbol).await;
            (symbol, status)
        }
        None => {
            let symbol = env::var("DASHBOARD_SYMBOL")
                .unwrap_or_else(|_| DEFAULT_SYMBOL.to_string())
                .to_uppercase();
            let status = view.select_symbol(&symbol).await;
            (symbol, status)
        }
    };

    if status != SelectionStatus::Applied {
        return Err(format!("could not load {}", symbol).into());
    }
    print_selection(&view);

    info!(
        interval_secs = config.refresh_interval.as_secs(),
        "Following {}, press Ctrl-C to stop", symbol
    );

    loop {
        tokio::select! {
            _ = signal::ctrl_c() => {
                info!("Shutting down...");
                break;
            }
            update = view.next_refresh() => {
                let Some(update) = update else { break };
                if view.apply_refresh(update) {
                    print_price_line(&view);
                }
            }
        }
    }

    view.teardown();
    Ok(())
}

/// Search for `query` and pick the best hit. Falls back to the query itself.
async fn resolve_symbol(view: &mut DashboardView, query: &str) -> String {
    let fallback = query.trim().to_uppercase();
    view.search_input(query);

    while let Some(outcome) = view.next_search_outcome().await {
        match outcome {
            SearchOutcome::Pending { .. } => continue,
            SearchOutcome::Results { hits, .. } => {
                let exact = hits.iter().find(|hit| {
                    hit.symbol.eq_ignore_ascii_case(&fallback)
                        || hit.symbol.eq_ignore_ascii_case(&format!("{}USDT", fallback))
                });
                if let Some(hit) = exact.or_else(|| hits.first()) {
                    info!(query = %query, symbol = %hit.symbol, "Resolved {} to {}", query, hit.symbol);
                    return hit.symbol.clone();
                }
                break;
            }
            SearchOutcome::NoMatches { .. } | SearchOutcome::Cleared => break,
            SearchOutcome::Failed { message, .. } => {
                warn!(query = %query, error = %message, "Search failed, using query as symbol");
                break;
            }
        }
    }
    fallback
}

fn print_selection(view: &DashboardView) {
    let Some(snapshot) = view.snapshot() else {
        return;
    };

    println!();
    println!("{}", snapshot.symbol);
    print_price_line(view);
    println!(
        "  24h high ${}   24h low ${}",
        format_price(snapshot.current.high_24h),
        format_price(snapshot.current.low_24h)
    );

    for card in indicator_cards(&snapshot.indicators) {
        println!("  {:<12} {}", card.label, card.value);
    }

    if let Some(rows) = view.level_rows() {
        println!("  Levels:");
        for row in rows {
            let distance = row
                .distance_pct
                .map(format_signed_pct)
                .unwrap_or_else(|| "-".to_string());
            println!(
                "    {:<3} ${:>14}  {}",
                row.row.label,
                format_price(row.row.price),
                distance
            );
        }
    }
}

fn print_price_line(view: &DashboardView) {
    if let Some(snapshot) = view.snapshot() {
        println!(
            "  ${}  {}",
            format_price(snapshot.current.price),
            format_change(snapshot.current.change_24h)
        );
    }
}
