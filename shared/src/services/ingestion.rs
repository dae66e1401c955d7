//! Ingestion orchestrator.
//!
//! Per symbol: resolve watermark, compute window, fetch, archive the raw rows,
//! then upsert curated rows and advance the watermark inside one transaction.
//! Symbols are processed one at a time in configured order.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use sea_orm::{DatabaseConnection, DatabaseTransaction, TransactionTrait};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{error, info, warn};

use super::window::{compute_window, truncate_to_hour, FetchWindow, WindowDecision};
use crate::config::{Config, FailurePolicy};
use crate::error::Result;
use crate::fetcher::{FetchAdapter, YahooProvider};
use crate::models::{FetchResult, PriceBar};
use crate::repositories::{price_repository, watermark_repository};
use crate::storage::{store_from_config, RawArchiver};

#[derive(Debug, Clone, PartialEq)]
pub enum SymbolOutcome {
    /// Watermark already at the current hour; nothing fetched.
    Skipped { watermark: DateTime<Utc> },
    /// The fetch returned no rows; nothing archived or written.
    Empty { window: FetchWindow },
    Written {
        fetched: usize,
        inserted: u64,
        last_bucket: DateTime<Utc>,
        archive_key: String,
    },
    Failed { error: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct SymbolReport {
    pub symbol: String,
    pub outcome: SymbolOutcome,
}

#[derive(Debug, Clone)]
pub struct RunSummary {
    pub started_at: DateTime<Utc>,
    pub reports: Vec<SymbolReport>,
}

impl RunSummary {
    fn new(started_at: DateTime<Utc>) -> Self {
        Self {
            started_at,
            reports: Vec::new(),
        }
    }

    pub fn outcome(&self, symbol: &str) -> Option<&SymbolOutcome> {
        self.reports
            .iter()
            .find(|r| r.symbol == symbol)
            .map(|r| &r.outcome)
    }

    pub fn total_inserted(&self) -> u64 {
        self.reports
            .iter()
            .map(|r| match r.outcome {
                SymbolOutcome::Written { inserted, .. } => inserted,
                _ => 0,
            })
            .sum()
    }

    pub fn failures(&self) -> Vec<&SymbolReport> {
        self.reports
            .iter()
            .filter(|r| matches!(r.outcome, SymbolOutcome::Failed { .. }))
            .collect()
    }

    pub fn has_failures(&self) -> bool {
        !self.failures().is_empty()
    }

    pub fn log(&self) {
        for report in &self.reports {
            match &report.outcome {
                SymbolOutcome::Skipped { watermark } => {
                    info!(symbol = %report.symbol, %watermark, "summary: skipped, already current")
                }
                SymbolOutcome::Empty { window } => {
                    info!(symbol = %report.symbol, start = %window.start, end = %window.end, "summary: no data")
                }
                SymbolOutcome::Written {
                    fetched,
                    inserted,
                    last_bucket,
                    ..
                } => info!(symbol = %report.symbol, fetched, inserted, %last_bucket, "summary: written"),
                SymbolOutcome::Failed { error } => {
                    error!(symbol = %report.symbol, %error, "summary: failed")
                }
            }
        }
        info!(
            started_at = %self.started_at,
            symbols = self.reports.len(),
            inserted = self.total_inserted(),
            failed = self.failures().len(),
            "Run finished"
        );
    }
}

/// Rows per calendar month, for the backfill log.
pub fn monthly_counts(bars: &[PriceBar]) -> BTreeMap<(i32, u32), usize> {
    let mut counts = BTreeMap::new();
    for bar in bars {
        *counts.entry((bar.date.year(), bar.date.month())).or_insert(0) += 1;
    }
    counts
}

pub struct IngestionService {
    config: Arc<Config>,
    db: Arc<DatabaseConnection>,
    fetcher: FetchAdapter,
    archiver: RawArchiver,
}

impl IngestionService {
    pub fn new(
        config: Arc<Config>,
        db: Arc<DatabaseConnection>,
        fetcher: FetchAdapter,
        archiver: RawArchiver,
    ) -> Self {
        Self {
            config,
            db,
            fetcher,
            archiver,
        }
    }

    /// Production wiring: Yahoo Finance provider and the configured object store.
    pub fn from_config(config: Arc<Config>, db: Arc<DatabaseConnection>) -> Result<Self> {
        let provider = Arc::new(YahooProvider::new(config.provider_base_url.clone())?);
        let store = store_from_config(&config)?;
        let archiver = RawArchiver::new(store, config.blob_container.clone());
        Ok(Self::new(config, db, FetchAdapter::new(provider), archiver))
    }

    /// One incremental pass over every configured symbol.
    ///
    /// With [`FailurePolicy::Abort`] the first failing symbol ends the run with
    /// its error; with [`FailurePolicy::Continue`] it is recorded and the next
    /// symbol runs.
    pub async fn run(&self, now: DateTime<Utc>) -> Result<RunSummary> {
        let now = truncate_to_hour(now);
        info!("===== Incremental ingestion started at {} =====", now);

        let mut summary = RunSummary::new(now);
        for symbol in &self.config.symbols {
            let result = self.ingest_symbol(symbol, now).await;
            let outcome = self.settle(symbol, result)?;
            summary.reports.push(SymbolReport {
                symbol: symbol.clone(),
                outcome,
            });
        }

        summary.log();
        Ok(summary)
    }

    /// Ingest `[start, end)` for every configured symbol, ignoring watermarks.
    pub async fn backfill(&self, start: NaiveDate, end: NaiveDate) -> Result<RunSummary> {
        info!("===== Backfill {} .. {} started =====", start, end);
        let window = FetchWindow {
            start: start.and_time(chrono::NaiveTime::MIN).and_utc(),
            end: end.and_time(chrono::NaiveTime::MIN).and_utc(),
        };

        let mut summary = RunSummary::new(Utc::now());
        for symbol in &self.config.symbols {
            let result = self.backfill_symbol(symbol, window, start, end).await;
            let outcome = self.settle(symbol, result)?;
            summary.reports.push(SymbolReport {
                symbol: symbol.clone(),
                outcome,
            });
        }

        summary.log();
        Ok(summary)
    }

    /// Applies the failure policy to one symbol's result.
    fn settle(&self, symbol: &str, result: Result<SymbolOutcome>) -> Result<SymbolOutcome> {
        match result {
            Ok(outcome) => Ok(outcome),
            Err(e) => {
                error!(symbol = %symbol, error = %e, "Ingestion failed");
                match self.config.failure_policy {
                    FailurePolicy::Abort => Err(e),
                    FailurePolicy::Continue => Ok(SymbolOutcome::Failed { error: e.to_string() }),
                }
            }
        }
    }

    pub async fn ingest_symbol(&self, symbol: &str, now: DateTime<Utc>) -> Result<SymbolOutcome> {
        let last_ts =
            watermark_repository::resolve_watermark(self.db.as_ref(), symbol, self.config.default_watermark)
                .await?;
        info!(symbol = %symbol, last_success = %last_ts, "Resolved watermark");

        let window = match compute_window(last_ts, now) {
            WindowDecision::Skip => {
                info!(symbol = %symbol, last_success = %last_ts, %now, "Skip: already current");
                return Ok(SymbolOutcome::Skipped { watermark: last_ts });
            }
            WindowDecision::Fetch(window) => window,
        };

        info!(symbol = %symbol, start = %window.start, end = %window.end, "Fetching");
        let fetched = self
            .fetcher
            .fetch(symbol, window.start, window.end, &self.config.interval)
            .await?;
        let Some(last_bucket) = fetched.last_bucket() else {
            warn!(symbol = %symbol, start = %window.start, end = %window.end, "No data in window");
            return Ok(SymbolOutcome::Empty { window });
        };

        let key = RawArchiver::incremental_key(symbol, Utc::now());
        let outcome = self.persist(symbol, &key, &fetched, last_bucket).await?;

        let hours: Vec<u32> = fetched.bars.iter().map(|b| b.hour).collect();
        if let SymbolOutcome::Written { inserted, .. } = &outcome {
            info!(symbol = %symbol, inserted, ?hours, "Incremental load done");
        }
        Ok(outcome)
    }

    async fn backfill_symbol(
        &self,
        symbol: &str,
        window: FetchWindow,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<SymbolOutcome> {
        info!(symbol = %symbol, %start, %end, interval = %self.config.interval, "Backfill fetching");
        let fetched = self
            .fetcher
            .fetch(symbol, window.start, window.end, &self.config.interval)
            .await?;
        let Some(last_bucket) = fetched.last_bucket() else {
            warn!(symbol = %symbol, %start, %end, "No data for backfill range");
            return Ok(SymbolOutcome::Empty { window });
        };

        for ((year, month), count) in monthly_counts(&fetched.bars) {
            info!(symbol = %symbol, month = %format!("{:04}-{:02}", year, month), rows = count, "Monthly rows");
        }

        let key = RawArchiver::backfill_key(symbol, start, end);
        self.persist(symbol, &key, &fetched, last_bucket).await
    }

    /// Archive, then write curated rows and the watermark in one transaction.
    async fn persist(
        &self,
        symbol: &str,
        key: &str,
        fetched: &FetchResult,
        last_bucket: DateTime<Utc>,
    ) -> Result<SymbolOutcome> {
        self.archiver.archive(symbol, key, &fetched.raw).await?;

        let txn = self.db.begin().await?;
        match self.write(&txn, symbol, &fetched.bars, last_bucket).await {
            Ok(inserted) => {
                txn.commit().await?;
                Ok(SymbolOutcome::Written {
                    fetched: fetched.bars.len(),
                    inserted,
                    last_bucket,
                    archive_key: key.to_string(),
                })
            }
            Err(e) => {
                if let Err(rollback_err) = txn.rollback().await {
                    warn!(symbol = %symbol, error = %rollback_err, "Rollback failed");
                }
                Err(e)
            }
        }
    }

    async fn write(
        &self,
        txn: &DatabaseTransaction,
        symbol: &str,
        bars: &[PriceBar],
        last_bucket: DateTime<Utc>,
    ) -> Result<u64> {
        let inserted = price_repository::upsert_bars(txn, symbol, bars, self.config.batch_size).await?;
        info!(
            symbol = %symbol,
            inserted,
            skipped = (bars.len() as u64).saturating_sub(inserted),
            "Curated rows upserted"
        );
        if watermark_repository::advance_watermark(txn, symbol, last_bucket).await? {
            info!(symbol = %symbol, watermark = %last_bucket, "Watermark advanced");
        }
        Ok(inserted)
    }
}
