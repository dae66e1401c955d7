use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// One provider row, keyed by the provider's own column names
/// (`Datetime` or `Date`, `Open`, `High`, `Low`, `Close`, `Volume`).
pub type RawRecord = serde_json::Map<String, serde_json::Value>;

/// One ticker's OHLCV observation for one UTC calendar-hour bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub date: NaiveDate,
    pub hour: u32,
    pub symbol: String,
    pub open: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub close: Option<f64>,
    pub volume: Option<i64>,
}

impl PriceBar {
    /// Start instant of the hour bucket this bar belongs to.
    pub fn bucket_start(&self) -> DateTime<Utc> {
        self.date
            .and_hms_opt(self.hour, 0, 0)
            .unwrap_or_else(|| self.date.and_time(chrono::NaiveTime::MIN))
            .and_utc()
    }
}

/// Result of one fetch: the provider rows as received plus the curated bars.
#[derive(Debug, Clone, Default)]
pub struct FetchResult {
    pub raw: Vec<RawRecord>,
    pub bars: Vec<PriceBar>,
}

impl FetchResult {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Latest hour bucket present in the curated bars.
    pub fn last_bucket(&self) -> Option<DateTime<Utc>> {
        self.bars.iter().map(PriceBar::bucket_start).max()
    }
}

/// Which flow produced a raw snapshot; decides the object key layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveMode {
    Incremental,
    Backfill,
}

impl ArchiveMode {
    pub fn folder(&self) -> &'static str {
        match self {
            ArchiveMode::Incremental => "incremental",
            ArchiveMode::Backfill => "backfill",
        }
    }
}
