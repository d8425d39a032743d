//! Offline unit tests for tickersent-db pool configuration and row types.
//! These tests do not require a live database connection.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use chrono::Utc;
use tickersent_core::{AppConfig, Environment, SentimentBackend};
use tickersent_db::{HeadlineRow, NewHeadline, PoolConfig, SentimentSummaryRow};

#[test]
fn pool_config_from_app_config_uses_core_values() {
    let app_config = AppConfig {
        database_url: "postgres://example".to_string(),
        env: Environment::Test,
        bind_addr: SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 3000),
        log_level: "info".to_string(),
        watchlist_path: PathBuf::from("./config/watchlist.yaml"),
        sentiment_backend: SentimentBackend::Lexicon,
        max_headlines: 50,
        sweep_interval_secs: 3600,
        fetch_timeout_secs: 15,
        fetch_user_agent: "ua".to_string(),
        db_max_connections: 42,
        db_min_connections: 7,
        db_acquire_timeout_secs: 9,
    };

    let pool_config = PoolConfig::from_app_config(&app_config);
    assert_eq!(pool_config.max_connections, 42);
    assert_eq!(pool_config.min_connections, 7);
    assert_eq!(pool_config.acquire_timeout_secs, 9);
}

/// Compile-time smoke test: confirm that [`HeadlineRow`] has all expected
/// fields with the correct types. No database required.
#[test]
fn headline_row_has_expected_fields() {
    let row = HeadlineRow {
        id: 1_i64,
        stored_at: Utc::now(),
        captured_at: Utc::now(),
        symbol: "AAPL".to_string(),
        source_name: "Yahoo Finance".to_string(),
        raw_text: "Apple beats expectations".to_string(),
        processed_text: Some("apple beats expectations".to_string()),
        sentiment_label: Some("positive".to_string()),
        sentiment_score: Some(0.42),
    };

    assert_eq!(row.id, 1);
    assert_eq!(row.symbol, "AAPL");
    assert_eq!(row.sentiment_label.as_deref(), Some("positive"));
    assert!(row.sentiment_score.unwrap() > 0.0);
}

#[test]
fn new_headline_carries_capture_time() {
    let captured_at = Utc::now();
    let headline = NewHeadline {
        source_name: "MarketWatch".to_string(),
        raw_text: "Shares slide".to_string(),
        captured_at,
        processed_text: "shares slide".to_string(),
        sentiment_label: "negative".to_string(),
        sentiment_score: -0.3,
    };

    assert_eq!(headline.captured_at, captured_at);
    assert_eq!(headline.sentiment_label, "negative");
}

#[test]
fn summary_row_has_expected_fields() {
    let row = SentimentSummaryRow {
        symbol: "TSLA".to_string(),
        headline_count: 12,
        avg_score: Some(-0.05),
        positive_count: 3,
        neutral_count: 4,
        negative_count: 5,
        last_stored_at: Some(Utc::now()),
    };

    assert_eq!(row.headline_count, 12);
    assert_eq!(
        row.positive_count + row.neutral_count + row.negative_count,
        12
    );
}
