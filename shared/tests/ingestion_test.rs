//! End-to-end tests for the incremental and backfill flows against an
//! in-memory SQLite database.

use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection};
use serde_json::{json, Value};
use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use shared::config::{Config, FailurePolicy};
use shared::error::{IngestError, Result};
use shared::fetcher::{FetchAdapter, PriceProvider};
use shared::models::{PriceBar, RawRecord};
use shared::repositories::{price_repository, quality_repository, watermark_repository};
use shared::services::{IngestionService, SymbolOutcome};
use shared::storage::{ObjectStore, RawArchiver};

/// Provider that generates one row per hour of the requested window, unless
/// told to fail or to return canned rows for a symbol.
#[derive(Default)]
struct ScriptedProvider {
    calls: Mutex<Vec<(String, DateTime<Utc>, DateTime<Utc>)>>,
    failing: HashSet<String>,
    canned: Mutex<Vec<(String, Vec<RawRecord>)>>,
}

impl ScriptedProvider {
    fn failing(symbols: &[&str]) -> Self {
        Self {
            failing: symbols.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        }
    }

    fn with_rows(symbol: &str, rows: Vec<RawRecord>) -> Self {
        let provider = Self::default();
        provider.canned.lock().unwrap().push((symbol.to_string(), rows));
        provider
    }

    fn calls(&self) -> Vec<(String, DateTime<Utc>, DateTime<Utc>)> {
        self.calls.lock().unwrap().clone()
    }

    fn called_symbols(&self) -> Vec<String> {
        self.calls().into_iter().map(|(s, _, _)| s).collect()
    }
}

fn hourly_rows(start: DateTime<Utc>, end: DateTime<Utc>) -> Vec<RawRecord> {
    let mut rows = Vec::new();
    let mut at = start;
    let mut price = 100.0;
    while at < end {
        rows.push(record(json!({
            "Datetime": at.to_rfc3339(),
            "Open": price,
            "High": price + 2.0,
            "Low": price - 1.0,
            "Close": price + 1.0,
            "Volume": 1000,
        })));
        at += Duration::hours(1);
        price += 1.0;
    }
    rows
}

#[async_trait]
impl PriceProvider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn download(
        &self,
        symbol: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        _interval: &str,
    ) -> Result<Vec<RawRecord>> {
        self.calls.lock().unwrap().push((symbol.to_string(), start, end));
        if self.failing.contains(symbol) {
            return Err(IngestError::Provider(format!("simulated outage for {}", symbol)));
        }
        if let Some((_, rows)) = self.canned.lock().unwrap().iter().find(|(s, _)| s == symbol) {
            return Ok(rows.clone());
        }
        Ok(hourly_rows(start, end))
    }
}

#[derive(Default)]
struct MemoryStore {
    objects: Mutex<Vec<(String, String, Vec<u8>)>>,
    broken: bool,
}

impl MemoryStore {
    fn keys(&self) -> Vec<String> {
        self.objects.lock().unwrap().iter().map(|(_, k, _)| k.clone()).collect()
    }

    fn payload(&self, key: &str) -> Option<Value> {
        self.objects
            .lock()
            .unwrap()
            .iter()
            .find(|(_, k, _)| k == key)
            .map(|(_, _, p)| serde_json::from_slice(p).unwrap())
    }
}

#[async_trait]
impl ObjectStore for MemoryStore {
    fn name(&self) -> &str {
        "memory"
    }

    async fn put(&self, container: &str, key: &str, payload: Vec<u8>, _overwrite: bool) -> Result<()> {
        if self.broken {
            return Err(IngestError::Archive("store unavailable".to_string()));
        }
        self.objects
            .lock()
            .unwrap()
            .push((container.to_string(), key.to_string(), payload));
        Ok(())
    }
}

fn record(value: Value) -> RawRecord {
    value.as_object().cloned().unwrap()
}

fn ts(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
}

fn bar(symbol: &str, date: &str, hour: u32, open: f64, volume: Option<i64>) -> PriceBar {
    PriceBar {
        date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
        hour,
        symbol: symbol.to_string(),
        open: Some(open),
        high: Some(open + 1.0),
        low: Some(open - 1.0),
        close: Some(open),
        volume,
    }
}

async fn setup_db() -> DatabaseConnection {
    let mut options = ConnectOptions::new("sqlite::memory:".to_string());
    options.max_connections(1).min_connections(1).sqlx_logging(false);
    let db = Database::connect(options).await.unwrap();
    Migrator::up(&db, None).await.unwrap();
    db
}

fn config(symbols: &[&str], failure_policy: FailurePolicy) -> Config {
    Config {
        symbols: symbols.iter().map(|s| s.to_string()).collect(),
        failure_policy,
        ..Config::default()
    }
}

fn service(
    db: &DatabaseConnection,
    config: Config,
    provider: Arc<ScriptedProvider>,
    store: Arc<MemoryStore>,
) -> IngestionService {
    IngestionService::new(
        Arc::new(config),
        Arc::new(db.clone()),
        FetchAdapter::new(provider),
        RawArchiver::new(store, "crypto-raw"),
    )
}

#[tokio::test]
async fn test_gap_since_watermark_is_fetched_and_written() {
    let db = setup_db().await;
    watermark_repository::advance_watermark(&db, "BTC-USD", ts(2024, 6, 1, 10, 0))
        .await
        .unwrap();

    let provider = Arc::new(ScriptedProvider::default());
    let store = Arc::new(MemoryStore::default());
    let svc = service(&db, config(&["BTC-USD"], FailurePolicy::Continue), provider.clone(), store.clone());

    let summary = svc.run(ts(2024, 6, 1, 13, 20)).await.unwrap();

    assert_eq!(
        provider.calls(),
        vec![("BTC-USD".to_string(), ts(2024, 6, 1, 11, 0), ts(2024, 6, 1, 13, 0))]
    );
    match summary.outcome("BTC-USD") {
        Some(SymbolOutcome::Written {
            fetched,
            inserted,
            last_bucket,
            archive_key,
        }) => {
            assert_eq!(*fetched, 2);
            assert_eq!(*inserted, 2);
            assert_eq!(*last_bucket, ts(2024, 6, 1, 12, 0));
            assert!(archive_key.starts_with("incremental/BTC-USD_"));
            assert!(archive_key.ends_with(".json"));
        }
        other => panic!("unexpected outcome {:?}", other),
    }

    let rows = price_repository::find_by_symbol(&db, "BTC-USD").await.unwrap();
    let hours: Vec<i32> = rows.iter().map(|r| r.hourx).collect();
    assert_eq!(hours, vec![11, 12]);
    assert_eq!(rows[0].date, NaiveDate::from_ymd_opt(2024, 6, 1).unwrap());
    assert_eq!(rows[0].volume, Some(1000));

    let watermark = watermark_repository::resolve_watermark(&db, "BTC-USD", Config::default().default_watermark)
        .await
        .unwrap();
    assert_eq!(watermark, ts(2024, 6, 1, 12, 0));

    let keys = store.keys();
    assert_eq!(keys.len(), 1);
    let payload = store.payload(&keys[0]).unwrap();
    assert_eq!(payload.as_array().map(|a| a.len()), Some(2));
    assert_eq!(payload[0]["Datetime"], json!("2024-06-01T11:00:00+00:00"));
}

#[tokio::test]
async fn test_in_progress_hour_is_not_ingested() {
    let db = setup_db().await;
    watermark_repository::advance_watermark(&db, "BTC-USD", ts(2024, 6, 1, 10, 0))
        .await
        .unwrap();

    // provider also returns the still-open 13:00 bar
    let provider = Arc::new(ScriptedProvider::with_rows(
        "BTC-USD",
        hourly_rows(ts(2024, 6, 1, 11, 0), ts(2024, 6, 1, 14, 0)),
    ));
    let svc = service(&db, config(&["BTC-USD"], FailurePolicy::Continue), provider, Arc::new(MemoryStore::default()));

    let summary = svc.run(ts(2024, 6, 1, 13, 20)).await.unwrap();

    match summary.outcome("BTC-USD") {
        Some(SymbolOutcome::Written {
            fetched,
            inserted,
            last_bucket,
            ..
        }) => {
            assert_eq!(*fetched, 2);
            assert_eq!(*inserted, 2);
            assert_eq!(*last_bucket, ts(2024, 6, 1, 12, 0));
        }
        other => panic!("unexpected outcome {:?}", other),
    }
    let hours: Vec<i32> = price_repository::find_by_symbol(&db, "BTC-USD")
        .await
        .unwrap()
        .iter()
        .map(|r| r.hourx)
        .collect();
    assert_eq!(hours, vec![11, 12]);
    assert_eq!(
        watermark_repository::last_success(&db, "BTC-USD").await.unwrap(),
        Some(ts(2024, 6, 1, 12, 0))
    );
}

#[tokio::test]
async fn test_current_symbol_is_skipped_without_fetching() {
    let db = setup_db().await;
    watermark_repository::advance_watermark(&db, "BTC-USD", ts(2024, 6, 1, 13, 0))
        .await
        .unwrap();

    let provider = Arc::new(ScriptedProvider::default());
    let store = Arc::new(MemoryStore::default());
    let svc = service(&db, config(&["BTC-USD", "ETH-USD"], FailurePolicy::Continue), provider.clone(), store.clone());

    let summary = svc.run(ts(2024, 6, 1, 13, 0)).await.unwrap();

    assert!(matches!(summary.outcome("BTC-USD"), Some(SymbolOutcome::Skipped { .. })));
    // the next symbol still runs
    assert!(matches!(summary.outcome("ETH-USD"), Some(SymbolOutcome::Written { .. })));
    assert_eq!(provider.called_symbols(), vec!["ETH-USD".to_string()]);
    assert_eq!(price_repository::count_for_symbol(&db, "BTC-USD").await.unwrap(), 0);
    assert!(store.keys().iter().all(|k| !k.contains("BTC-USD")));
}

#[tokio::test]
async fn test_new_symbol_starts_from_default_watermark() {
    let db = setup_db().await;
    let default = Config::default().default_watermark;
    assert_eq!(
        watermark_repository::resolve_watermark(&db, "DOGE-USD", default).await.unwrap(),
        ts(2024, 1, 1, 0, 0)
    );

    let provider = Arc::new(ScriptedProvider::default());
    let svc = service(&db, config(&["DOGE-USD"], FailurePolicy::Continue), provider.clone(), Arc::new(MemoryStore::default()));
    svc.run(ts(2024, 1, 1, 5, 0)).await.unwrap();

    assert_eq!(provider.calls()[0].1, ts(2024, 1, 1, 1, 0));
    assert_eq!(price_repository::count_for_symbol(&db, "DOGE-USD").await.unwrap(), 4);
}

#[tokio::test]
async fn test_rerun_in_same_hour_does_not_call_provider() {
    let db = setup_db().await;
    let provider = Arc::new(ScriptedProvider::default());
    let store = Arc::new(MemoryStore::default());
    let svc = service(&db, config(&["SOL-USD"], FailurePolicy::Continue), provider.clone(), store.clone());

    svc.run(ts(2024, 1, 1, 4, 0)).await.unwrap();
    assert_eq!(provider.calls().len(), 1);

    // watermark is now 03:00, so the window is [04:00, 04:00)
    let summary = svc.run(ts(2024, 1, 1, 4, 30)).await.unwrap();
    assert!(matches!(summary.outcome("SOL-USD"), Some(SymbolOutcome::Empty { .. })));
    assert_eq!(provider.calls().len(), 1);
    assert_eq!(store.keys().len(), 1);

    let summary = svc.run(ts(2024, 1, 1, 5, 0)).await.unwrap();
    assert_eq!(provider.calls()[1].1, ts(2024, 1, 1, 4, 0));
    assert_eq!(summary.total_inserted(), 1);
}

#[tokio::test]
async fn test_empty_range_never_reaches_provider() {
    let provider = Arc::new(ScriptedProvider::default());
    let adapter = FetchAdapter::new(provider.clone());

    let at = ts(2024, 6, 1, 13, 0);
    assert!(adapter.fetch("BTC-USD", at, at, "1h").await.unwrap().is_empty());
    assert!(adapter
        .fetch("BTC-USD", at, at - Duration::hours(3), "1h")
        .await
        .unwrap()
        .is_empty());
    assert!(provider.calls().is_empty());
}

#[tokio::test]
async fn test_missing_time_column_is_treated_as_empty() {
    let db = setup_db().await;
    let provider = Arc::new(ScriptedProvider::with_rows(
        "XRP-USD",
        vec![record(json!({"Open": 0.5, "Close": 0.6, "Volume": 10}))],
    ));
    let store = Arc::new(MemoryStore::default());
    let svc = service(&db, config(&["XRP-USD"], FailurePolicy::Abort), provider.clone(), store.clone());

    let summary = svc.run(ts(2024, 1, 1, 3, 0)).await.unwrap();

    assert!(matches!(summary.outcome("XRP-USD"), Some(SymbolOutcome::Empty { .. })));
    assert!(store.keys().is_empty());
    assert_eq!(price_repository::count_for_symbol(&db, "XRP-USD").await.unwrap(), 0);
}

#[tokio::test]
async fn test_missing_volume_is_stored_as_null() {
    let db = setup_db().await;
    let provider = Arc::new(ScriptedProvider::with_rows(
        "ETH-USD",
        vec![
            record(json!({"Datetime": "2024-01-01T01:00:00Z", "Open": 2300.0, "High": 2310.0, "Low": 2290.0, "Close": 2305.0})),
            record(json!({"Datetime": "2024-01-01T02:00:00Z", "Open": null, "High": 2320.0, "Low": 2300.0, "Close": 2315.0, "Volume": null})),
        ],
    ));
    let svc = service(&db, config(&["ETH-USD"], FailurePolicy::Continue), provider, Arc::new(MemoryStore::default()));

    svc.run(ts(2024, 1, 1, 3, 0)).await.unwrap();

    let rows = price_repository::find_by_symbol(&db, "ETH-USD").await.unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].volume, None);
    assert_eq!(rows[0].open, Some(2300.0));
    assert_eq!(rows[1].open, None);
    assert_eq!(rows[1].volume, None);
}

#[tokio::test]
async fn test_upsert_is_idempotent() {
    let db = setup_db().await;
    let bars: Vec<PriceBar> = (0..5)
        .map(|h| bar("BTC-USD", "2024-06-01", h, 100.0 + h as f64, Some(10)))
        .collect();

    let first = price_repository::upsert_bars(&db, "BTC-USD", &bars, 2).await.unwrap();
    let second = price_repository::upsert_bars(&db, "BTC-USD", &bars, 2).await.unwrap();

    assert_eq!(first, 5);
    assert_eq!(second, 0);
    assert_eq!(price_repository::count_for_symbol(&db, "BTC-USD").await.unwrap(), 5);
}

#[tokio::test]
async fn test_duplicate_key_keeps_first_row() {
    let db = setup_db().await;
    let original = vec![bar("BTC-USD", "2024-06-01", 11, 100.0, Some(1))];
    let conflicting = vec![bar("BTC-USD", "2024-06-01", 11, 999.0, Some(2))];

    assert_eq!(price_repository::upsert_bars(&db, "BTC-USD", &original, 500).await.unwrap(), 1);
    assert_eq!(price_repository::upsert_bars(&db, "BTC-USD", &conflicting, 500).await.unwrap(), 0);

    // same key twice inside one batch
    let same_batch = vec![
        bar("ETH-USD", "2024-06-01", 11, 1.0, None),
        bar("ETH-USD", "2024-06-01", 11, 2.0, None),
    ];
    assert_eq!(price_repository::upsert_bars(&db, "ETH-USD", &same_batch, 500).await.unwrap(), 1);

    let btc = price_repository::find_by_symbol(&db, "BTC-USD").await.unwrap();
    assert_eq!(btc.len(), 1);
    assert_eq!(btc[0].open, Some(100.0));
    let eth = price_repository::find_by_symbol(&db, "ETH-USD").await.unwrap();
    assert_eq!(eth.len(), 1);
    assert_eq!(eth[0].open, Some(1.0));
}

#[tokio::test]
async fn test_watermark_prefers_latest_of_metadata_and_data() {
    let db = setup_db().await;
    let default = Config::default().default_watermark;

    // data without metadata: derived from the curated table
    let bars = vec![
        bar("BTC-USD", "2024-06-01", 9, 1.0, None),
        bar("BTC-USD", "2024-06-02", 3, 1.0, None),
        bar("BTC-USD", "2024-06-01", 23, 1.0, None),
    ];
    price_repository::upsert_bars(&db, "BTC-USD", &bars, 500).await.unwrap();
    assert_eq!(
        watermark_repository::resolve_watermark(&db, "BTC-USD", default).await.unwrap(),
        ts(2024, 6, 2, 3, 0)
    );

    // metadata behind the data: data wins
    watermark_repository::advance_watermark(&db, "BTC-USD", ts(2024, 6, 1, 0, 0)).await.unwrap();
    assert_eq!(
        watermark_repository::resolve_watermark(&db, "BTC-USD", default).await.unwrap(),
        ts(2024, 6, 2, 3, 0)
    );

    // metadata ahead of the data: metadata wins
    watermark_repository::advance_watermark(&db, "BTC-USD", ts(2024, 6, 3, 0, 0)).await.unwrap();
    assert_eq!(
        watermark_repository::resolve_watermark(&db, "BTC-USD", default).await.unwrap(),
        ts(2024, 6, 3, 0, 0)
    );
}

#[tokio::test]
async fn test_watermark_never_moves_backwards() {
    let db = setup_db().await;
    assert!(watermark_repository::advance_watermark(&db, "ETH-USD", ts(2024, 6, 1, 12, 0)).await.unwrap());
    assert!(!watermark_repository::advance_watermark(&db, "ETH-USD", ts(2024, 6, 1, 8, 0)).await.unwrap());
    assert!(!watermark_repository::advance_watermark(&db, "ETH-USD", ts(2024, 6, 1, 12, 0)).await.unwrap());
    assert_eq!(
        watermark_repository::last_success(&db, "ETH-USD").await.unwrap(),
        Some(ts(2024, 6, 1, 12, 0))
    );
    assert!(watermark_repository::advance_watermark(&db, "ETH-USD", ts(2024, 6, 1, 13, 0)).await.unwrap());
    assert_eq!(
        watermark_repository::last_success(&db, "ETH-USD").await.unwrap(),
        Some(ts(2024, 6, 1, 13, 0))
    );
}

#[tokio::test]
async fn test_failing_symbol_is_isolated_by_default() {
    let db = setup_db().await;
    let provider = Arc::new(ScriptedProvider::failing(&["ETH-USD"]));
    let svc = service(
        &db,
        config(&["BTC-USD", "ETH-USD", "SOL-USD"], FailurePolicy::Continue),
        provider.clone(),
        Arc::new(MemoryStore::default()),
    );

    let summary = svc.run(ts(2024, 1, 1, 3, 0)).await.unwrap();

    assert!(matches!(summary.outcome("BTC-USD"), Some(SymbolOutcome::Written { .. })));
    assert!(matches!(summary.outcome("ETH-USD"), Some(SymbolOutcome::Failed { error }) if error.contains("simulated outage")));
    assert!(matches!(summary.outcome("SOL-USD"), Some(SymbolOutcome::Written { .. })));
    assert!(summary.has_failures());
    assert_eq!(provider.called_symbols(), vec!["BTC-USD", "ETH-USD", "SOL-USD"]);
}

#[tokio::test]
async fn test_abort_policy_stops_the_run() {
    let db = setup_db().await;
    let provider = Arc::new(ScriptedProvider::failing(&["ETH-USD"]));
    let svc = service(
        &db,
        config(&["BTC-USD", "ETH-USD", "SOL-USD"], FailurePolicy::Abort),
        provider.clone(),
        Arc::new(MemoryStore::default()),
    );

    let result = svc.run(ts(2024, 1, 1, 3, 0)).await;

    assert!(matches!(result, Err(IngestError::Provider(_))));
    assert_eq!(provider.called_symbols(), vec!["BTC-USD", "ETH-USD"]);
    // the symbol before the failure was committed
    assert_eq!(price_repository::count_for_symbol(&db, "BTC-USD").await.unwrap(), 2);
    assert_eq!(price_repository::count_for_symbol(&db, "SOL-USD").await.unwrap(), 0);
}

#[tokio::test]
async fn test_archive_failure_leaves_database_untouched() {
    let db = setup_db().await;
    let store = Arc::new(MemoryStore {
        broken: true,
        ..Default::default()
    });
    let svc = service(&db, config(&["BTC-USD"], FailurePolicy::Continue), Arc::new(ScriptedProvider::default()), store);

    let summary = svc.run(ts(2024, 1, 1, 3, 0)).await.unwrap();

    assert!(matches!(summary.outcome("BTC-USD"), Some(SymbolOutcome::Failed { .. })));
    assert_eq!(price_repository::count_for_symbol(&db, "BTC-USD").await.unwrap(), 0);
    assert_eq!(watermark_repository::last_success(&db, "BTC-USD").await.unwrap(), None);
}

#[tokio::test]
async fn test_failed_watermark_write_rolls_back_upserted_rows() {
    let db = setup_db().await;
    db.execute_unprepared("DROP TABLE \"IngestionMetadata\"").await.unwrap();

    let store = Arc::new(MemoryStore::default());
    let svc = service(&db, config(&["BTC-USD"], FailurePolicy::Continue), Arc::new(ScriptedProvider::default()), store.clone());

    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let end = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
    let summary = svc.backfill(start, end).await.unwrap();

    match summary.outcome("BTC-USD") {
        Some(SymbolOutcome::Failed { error }) => assert!(error.contains("IngestionMetadata"), "{}", error),
        other => panic!("unexpected outcome {:?}", other),
    }
    // the raw snapshot was written before the transaction began
    assert_eq!(store.keys().len(), 1);
    assert_eq!(price_repository::count_for_symbol(&db, "BTC-USD").await.unwrap(), 0);
}

#[tokio::test]
async fn test_backfill_ingests_full_range() {
    let db = setup_db().await;
    let provider = Arc::new(ScriptedProvider::default());
    let store = Arc::new(MemoryStore::default());
    let svc = service(&db, config(&["BTC-USD", "ETH-USD"], FailurePolicy::Continue), provider.clone(), store.clone());

    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let end = NaiveDate::from_ymd_opt(2024, 1, 3).unwrap();
    let summary = svc.backfill(start, end).await.unwrap();

    assert_eq!(summary.total_inserted(), 96);
    assert_eq!(
        store.keys(),
        vec![
            "backfill/BTC-USD_raw_2024-01-01_2024-01-03.json".to_string(),
            "backfill/ETH-USD_raw_2024-01-01_2024-01-03.json".to_string(),
        ]
    );
    assert_eq!(
        watermark_repository::last_success(&db, "BTC-USD").await.unwrap(),
        Some(ts(2024, 1, 2, 23, 0))
    );

    // a second backfill over the same range inserts nothing new
    let again = svc.backfill(start, end).await.unwrap();
    assert_eq!(again.total_inserted(), 0);
    assert_eq!(price_repository::count_for_symbol(&db, "ETH-USD").await.unwrap(), 48);
}

#[tokio::test]
async fn test_data_quality_issue_log() {
    let db = setup_db().await;
    let raw = json!({"Datetime": "2024-06-01T11:00:00Z", "Open": -1.0});
    let id = quality_repository::record_issue(&db, "BTC-USD", Some(ts(2024, 6, 1, 11, 0)), "negative_price", &raw)
        .await
        .unwrap();
    assert!(id > 0);

    let issues = quality_repository::issues_for_ticker(&db, "BTC-USD").await.unwrap();
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].issue_type.as_deref(), Some("negative_price"));
    let stored: Value = serde_json::from_str(issues[0].raw_data.as_deref().unwrap()).unwrap();
    assert_eq!(stored, raw);
    assert!(quality_repository::issues_for_ticker(&db, "ETH-USD").await.unwrap().is_empty());
}
