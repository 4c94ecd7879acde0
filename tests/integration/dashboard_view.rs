use std::sync::Arc;
use std::time::Duration;

use cryptodash::core::RefreshUpdate;
use cryptodash::core::SearchOutcome;
use cryptodash::models::{CryptoListing, SearchHit};
use cryptodash::notify::RecordingNotifier;
use cryptodash::view::{
    DashboardView, PriceChart, SelectionStatus, ViewSettings, MAX_REALTIME_POINTS,
};

use crate::fake_api::{candles_from_closes, snapshot, FakeApi};
use crate::test_utils::*;

fn settings() -> ViewSettings {
    ViewSettings {
        kline_interval: "240".to_string(),
        kline_limit: 100,
        refresh_interval: Duration::from_secs(10),
        search_debounce: Duration::from_millis(300),
    }
}

fn view_with(api: FakeApi) -> (DashboardView, Arc<FakeApi>, Arc<RecordingNotifier>) {
    let api = Arc::new(api);
    let notifier = Arc::new(RecordingNotifier::new());
    let view = DashboardView::new(api.clone(), notifier.clone(), settings());
    (view, api, notifier)
}

fn hit(symbol: &str) -> SearchHit {
    SearchHit {
        symbol: symbol.to_string(),
        name: symbol.to_string(),
        pair: None,
    }
}

fn listing(symbol: &str) -> CryptoListing {
    CryptoListing {
        symbol: symbol.to_string(),
        display_name: None,
        emoji: None,
    }
}

#[tokio::test]
async fn test_select_over_http_builds_levels_chart() {
    let backend = TestBackend::new().await;
    mock_crypto(&backend.server, "BTCUSDT", 104.0).await;
    mock_klines(&backend.server, "BTCUSDT", &[100.0, 105.0, 98.0, 102.0, 110.0]).await;

    let notifier = Arc::new(RecordingNotifier::new());
    let mut view = DashboardView::new(Arc::new(backend.client), notifier.clone(), settings());

    let status = view.select_symbol("BTCUSDT").await;

    assert_eq!(status, SelectionStatus::Applied);
    let levels = view.chart().and_then(PriceChart::levels).unwrap();
    assert_eq!(levels.resistance, 110.0);
    assert_eq!(levels.support, 98.0);
    assert_eq!(levels.midline, 104.0);
    assert!(view.is_refreshing());
    assert!(view.can_predict());
    assert!(notifier.messages().is_empty());

    view.teardown();
}

#[tokio::test]
async fn test_klines_failure_falls_back_to_history() {
    let backend = TestBackend::new().await;
    mock_crypto(&backend.server, "ETHUSDT", 2000.0).await;
    mock_klines_failure(&backend.server, "ETHUSDT").await;

    let notifier = Arc::new(RecordingNotifier::new());
    let mut view = DashboardView::new(Arc::new(backend.client), notifier.clone(), settings());

    let status = view.select_symbol("ETHUSDT").await;

    assert_eq!(status, SelectionStatus::Applied);
    match view.chart() {
        Some(PriceChart::History { points }) => assert_eq!(points.len(), 3),
        other => panic!("expected history chart, got {:?}", other),
    }
    assert!(view.level_rows().is_none());
    assert!(notifier.messages().is_empty());
}

#[tokio::test]
async fn test_empty_klines_fall_back_to_history() {
    let (mut view, _, _) = view_with(
        FakeApi::new()
            .with_snapshot(snapshot("SOLUSDT", 150.0, 30))
            .with_klines("SOLUSDT", Vec::new()),
    );

    assert_eq!(view.select_symbol("SOLUSDT").await, SelectionStatus::Applied);
    assert!(matches!(view.chart(), Some(PriceChart::History { points }) if points.len() == 30));
}

#[tokio::test]
async fn test_snapshot_failure_notifies_user() {
    let (mut view, _, notifier) = view_with(FakeApi::new());

    let status = view.select_symbol("NOPEUSDT").await;

    assert_eq!(status, SelectionStatus::Failed);
    assert!(view.snapshot().is_none());
    assert!(view.chart().is_none());
    assert!(!view.is_refreshing());
    assert!(!view.can_predict());
    assert_eq!(
        notifier.take(),
        vec!["Failed to load NOPEUSDT: HTTP 404: Failed to get data for NOPEUSDT".to_string()]
    );
}

#[tokio::test]
async fn test_stale_selection_is_discarded() {
    let (mut view, api, _) = view_with(
        FakeApi::new()
            .with_snapshot(snapshot("BTCUSDT", 100.0, 5))
            .with_klines("BTCUSDT", candles_from_closes(&[90.0, 100.0]))
            .with_snapshot(snapshot("ETHUSDT", 50.0, 5))
            .with_klines("ETHUSDT", candles_from_closes(&[40.0, 60.0])),
    );

    let first = view.begin_selection("BTCUSDT");
    let second = view.begin_selection("ETHUSDT");
    assert!(second.generation > first.generation);

    let api_ref = api.as_ref();
    let late = DashboardView::fetch_selection(api_ref, &settings(), first).await;
    let current = DashboardView::fetch_selection(api_ref, &settings(), second).await;

    assert_eq!(view.apply_selection(current), SelectionStatus::Applied);
    assert_eq!(view.apply_selection(late), SelectionStatus::Stale);

    assert_eq!(view.selected(), Some("ETHUSDT"));
    assert_eq!(view.snapshot().unwrap().symbol, "ETHUSDT");
    assert_eq!(view.chart().and_then(PriceChart::levels).unwrap().resistance, 60.0);
}

#[tokio::test(start_paused = true)]
async fn test_refresh_updates_snapshot() {
    let (mut view, api, _) = view_with(
        FakeApi::new()
            .with_snapshot(snapshot("BTCUSDT", 100.0, 5))
            .with_klines("BTCUSDT", candles_from_closes(&[95.0, 100.0, 105.0])),
    );
    view.select_symbol("BTCUSDT").await;
    let before = view.chart().cloned();

    api.snapshots
        .lock()
        .unwrap()
        .insert("BTCUSDT".to_string(), snapshot("BTCUSDT", 101.0, 5));

    let update = view.next_refresh().await.unwrap();
    assert!(view.apply_refresh(update));

    assert_eq!(view.snapshot().unwrap().current.price, 101.0);
    assert_eq!(view.chart().cloned(), before);
    assert_eq!(api.crypto_calls(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_refresh_trims_history_chart() {
    let (mut view, api, _) = view_with(
        FakeApi::new()
            .with_snapshot(snapshot("BTCUSDT", 100.0, 20))
            .with_klines("BTCUSDT", Vec::new()),
    );
    view.select_symbol("BTCUSDT").await;

    api.snapshots
        .lock()
        .unwrap()
        .insert("BTCUSDT".to_string(), snapshot("BTCUSDT", 500.0, 200));

    let update = view.next_refresh().await.unwrap();
    assert!(view.apply_refresh(update));

    match view.chart() {
        Some(PriceChart::History { points }) => {
            assert_eq!(points.len(), MAX_REALTIME_POINTS);
            assert_eq!(points.last().unwrap().price, 499.0);
        }
        other => panic!("expected history chart, got {:?}", other),
    }
}

#[tokio::test]
async fn test_refresh_from_previous_selection_is_ignored() {
    let (mut view, _, _) = view_with(
        FakeApi::new()
            .with_snapshot(snapshot("BTCUSDT", 100.0, 5))
            .with_klines("BTCUSDT", candles_from_closes(&[100.0]))
            .with_snapshot(snapshot("ETHUSDT", 50.0, 5))
            .with_klines("ETHUSDT", candles_from_closes(&[50.0])),
    );
    view.select_symbol("BTCUSDT").await;
    let old_generation = view.generation();
    view.select_symbol("ETHUSDT").await;

    let late = RefreshUpdate {
        generation: old_generation,
        snapshot: snapshot("BTCUSDT", 999.0, 5),
    };

    assert!(!view.apply_refresh(late));
    assert_eq!(view.snapshot().unwrap().symbol, "ETHUSDT");
}

#[tokio::test]
async fn test_prediction_requires_selection() {
    let (mut view, _, notifier) = view_with(FakeApi::new());

    assert!(view.request_prediction().await.is_none());
    assert_eq!(notifier.take(), vec!["Select a cryptocurrency first".to_string()]);
}

#[tokio::test]
async fn test_prediction_is_hidden_on_new_selection() {
    let (mut view, _, notifier) = view_with(
        FakeApi::new()
            .with_snapshot(snapshot("BTCUSDT", 100.0, 5))
            .with_klines("BTCUSDT", candles_from_closes(&[100.0]))
            .with_snapshot(snapshot("ETHUSDT", 50.0, 5))
            .with_klines("ETHUSDT", candles_from_closes(&[50.0])),
    );
    view.select_symbol("BTCUSDT").await;

    let prediction = view.request_prediction().await.unwrap();
    assert_eq!(prediction.symbol, "BTCUSDT");
    assert_eq!(prediction.days, 7);

    view.select_symbol("ETHUSDT").await;
    assert!(view.prediction().is_none());
    assert!(notifier.messages().is_empty());
}

#[tokio::test]
async fn test_prediction_failure_notifies_user() {
    let (mut view, _, notifier) = view_with(
        FakeApi::new()
            .with_snapshot(snapshot("BTCUSDT", 100.0, 5))
            .with_klines("BTCUSDT", candles_from_closes(&[100.0]))
            .failing_predictions(),
    );
    view.select_symbol("BTCUSDT").await;

    assert!(view.request_prediction().await.is_none());
    assert!(view.prediction().is_none());
    assert_eq!(
        notifier.take(),
        vec!["Forecast failed for BTCUSDT: Insufficient data for prediction".to_string()]
    );
}

#[tokio::test]
async fn test_prediction_over_http() {
    let backend = TestBackend::new().await;
    mock_crypto(&backend.server, "BTCUSDT", 100.0).await;
    mock_klines(&backend.server, "BTCUSDT", &[100.0]).await;
    mock_prediction(&backend.server, "BTCUSDT").await;

    let notifier = Arc::new(RecordingNotifier::new());
    let mut view = DashboardView::new(Arc::new(backend.client), notifier, settings());
    view.select_symbol("BTCUSDT").await;

    let prediction = view.request_prediction().await.unwrap();
    assert_eq!(prediction.expected_price, 104.0);
    assert_eq!(prediction.metrics.accuracy, 93.2);
}

#[tokio::test]
async fn test_level_rows_measure_distance_from_price() {
    let (mut view, _, _) = view_with(
        FakeApi::new()
            .with_snapshot(snapshot("BTCUSDT", 100.0, 5))
            .with_klines("BTCUSDT", candles_from_closes(&[90.0, 110.0])),
    );
    view.select_symbol("BTCUSDT").await;

    let rows = view.level_rows().unwrap();
    let labels: Vec<&str> = rows.iter().map(|r| r.row.label).collect();
    assert_eq!(labels, vec!["R2", "R", "S", "S2"]);
    assert_eq!(rows[0].row.price, 120.0);
    assert!((rows[1].distance_pct.unwrap() - 10.0).abs() < 1e-9);
    assert!((rows[2].distance_pct.unwrap() + 10.0).abs() < 1e-9);
    assert_eq!(rows[3].row.price, 80.0);
}

#[tokio::test]
async fn test_grid_shows_first_six_listings() {
    let listings: Vec<CryptoListing> = ["BTC", "ETH", "SOL", "XRP", "ADA", "DOGE", "DOT", "LINK"]
        .iter()
        .map(|s| listing(&format!("{}USDT", s)))
        .collect();
    let (view, _, _) = view_with(FakeApi::new().with_listings(listings));

    let grid = view.load_grid().await;

    assert_eq!(grid.len(), 6);
    assert_eq!(grid[0].symbol, "BTCUSDT");
    assert_eq!(grid[5].symbol, "DOGEUSDT");
}

#[tokio::test]
async fn test_grid_failure_is_empty() {
    let backend = TestBackend::new().await;
    let view = DashboardView::new(
        Arc::new(backend.client),
        Arc::new(RecordingNotifier::new()),
        settings(),
    );

    assert!(view.load_grid().await.is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_teardown_stops_polling() {
    let (mut view, api, _) = view_with(
        FakeApi::new()
            .with_snapshot(snapshot("BTCUSDT", 100.0, 5))
            .with_klines("BTCUSDT", candles_from_closes(&[100.0])),
    );
    view.select_symbol("BTCUSDT").await;
    assert!(view.is_refreshing());

    view.teardown();
    tokio::time::sleep(Duration::from_secs(60)).await;

    assert!(!view.is_refreshing());
    assert!(view.selected().is_none());
    assert!(view.snapshot().is_none());
    assert_eq!(api.crypto_calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_search_delivers_latest_results() {
    let (mut view, api, _) = view_with(
        FakeApi::new().with_search_hits(vec![hit("BTCUSDT"), hit("ETHUSDT")]),
    );

    view.search_input("bt");
    view.search_input("eth");

    assert_eq!(
        view.next_search_outcome().await,
        Some(SearchOutcome::Pending { query: "eth".into() })
    );
    assert_eq!(
        view.next_search_outcome().await,
        Some(SearchOutcome::Results {
            query: "eth".into(),
            hits: vec![hit("ETHUSDT")],
        })
    );
    assert_eq!(api.searched(), vec!["eth".to_string()]);
}

#[tokio::test(start_paused = true)]
async fn test_search_skips_superseded_results() {
    let (mut view, _, _) = view_with(
        FakeApi::new().with_search_hits(vec![hit("BTCUSDT"), hit("ETHUSDT")]),
    );

    view.search_input("btc");
    tokio::time::sleep(Duration::from_millis(400)).await;
    view.search_input("eth");

    assert_eq!(
        view.next_search_outcome().await,
        Some(SearchOutcome::Pending { query: "eth".into() })
    );
}

#[tokio::test(start_paused = true)]
async fn test_select_from_search_clears_search() {
    let (mut view, api, _) = view_with(
        FakeApi::new()
            .with_snapshot(snapshot("BTCUSDT", 100.0, 5))
            .with_klines("BTCUSDT", candles_from_closes(&[100.0]))
            .with_search_hits(vec![hit("BTCUSDT")]),
    );

    view.search_input("btc");
    assert!(view.is_searching());

    let status = view.select_from_search("BTCUSDT").await;

    assert_eq!(status, SelectionStatus::Applied);
    assert_eq!(view.selected(), Some("BTCUSDT"));
    assert!(!view.is_searching());
    assert_eq!(view.next_search_outcome().await, Some(SearchOutcome::Cleared));

    tokio::time::sleep(Duration::from_secs(1)).await;
    assert!(api.searched().is_empty());
    view.teardown();
}

#[tokio::test(start_paused = true)]
async fn test_teardown_cancels_pending_search() {
    let (mut view, api, _) = view_with(FakeApi::new().with_search_hits(vec![hit("BTCUSDT")]));

    view.search_input("btc");
    assert!(view.is_searching());

    view.teardown();
    tokio::time::sleep(Duration::from_secs(1)).await;

    assert!(!view.is_searching());
    assert!(api.searched().is_empty());
}
