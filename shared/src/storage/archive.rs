use chrono::{DateTime, NaiveDate, Utc};
use std::sync::Arc;
use tracing::info;

use super::ObjectStore;
use crate::error::Result;
use crate::models::{ArchiveMode, RawRecord};

/// Writes fetched rows to object storage as a JSON array of records.
pub struct RawArchiver {
    store: Arc<dyn ObjectStore>,
    container: String,
}

impl RawArchiver {
    pub fn new(store: Arc<dyn ObjectStore>, container: impl Into<String>) -> Self {
        Self {
            store,
            container: container.into(),
        }
    }

    /// `incremental/{symbol}_{YYYYmmdd_HHMMSS}.json`
    pub fn incremental_key(symbol: &str, at: DateTime<Utc>) -> String {
        format!(
            "{}/{}_{}.json",
            ArchiveMode::Incremental.folder(),
            symbol,
            at.format("%Y%m%d_%H%M%S")
        )
    }

    /// `backfill/{symbol}_raw_{start}_{end}.json`
    pub fn backfill_key(symbol: &str, start: NaiveDate, end: NaiveDate) -> String {
        format!(
            "{}/{}_raw_{}_{}.json",
            ArchiveMode::Backfill.folder(),
            symbol,
            start.format("%Y-%m-%d"),
            end.format("%Y-%m-%d")
        )
    }

    pub async fn archive(&self, symbol: &str, key: &str, records: &[RawRecord]) -> Result<()> {
        let payload = serde_json::to_vec(records)?;
        let bytes = payload.len();
        self.store.put(&self.container, key, payload, true).await?;
        info!(symbol = %symbol, store = self.store.name(), container = %self.container, key, bytes, "Saved raw snapshot");
        Ok(())
    }
}
