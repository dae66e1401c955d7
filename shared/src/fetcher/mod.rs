//! Fetch Adapter: wraps a market-data provider and turns its rows into curated
//! [`PriceBar`]s.
//!
//! The [`PriceProvider`] trait abstracts the provider so the ingestion flow can
//! be driven by Yahoo Finance in production and by scripted data in tests.

pub mod normalize;
pub mod yahoo;

pub use normalize::{coerce_price, coerce_volume, normalize, parse_time};
pub use yahoo::YahooProvider;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::error::{IngestError, Result};
use crate::models::{FetchResult, RawRecord};

/// A source of raw OHLCV rows.
#[async_trait]
pub trait PriceProvider: Send + Sync {
    /// Human-readable name of this provider.
    fn name(&self) -> &str;

    /// Download rows for `symbol` in `[start, end)` at the given interval.
    /// An empty vector means the provider has no data for the range.
    async fn download(
        &self,
        symbol: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        interval: &str,
    ) -> Result<Vec<RawRecord>>;
}

pub struct FetchAdapter {
    provider: Arc<dyn PriceProvider>,
}

impl FetchAdapter {
    pub fn new(provider: Arc<dyn PriceProvider>) -> Self {
        Self { provider }
    }

    /// Fetch and curate rows for one symbol.
    ///
    /// Returns an empty result without touching the provider when
    /// `start >= end`. Bars whose bucket falls outside `[start, end)` (such as
    /// the provider's in-progress bar for the current hour) are dropped. A
    /// response without a usable time column is logged and treated as empty;
    /// transport and provider errors are returned.
    pub async fn fetch(
        &self,
        symbol: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        interval: &str,
    ) -> Result<FetchResult> {
        if start >= end {
            warn!(symbol = %symbol, %start, %end, "Invalid range: start >= end, skipping fetch");
            return Ok(FetchResult::empty());
        }

        let raw = self.provider.download(symbol, start, end, interval).await?;
        if raw.is_empty() {
            warn!(symbol = %symbol, %start, %end, provider = self.provider.name(), "No data returned");
            return Ok(FetchResult::empty());
        }

        match normalize(symbol, &raw) {
            Ok(mut bars) => {
                let received = bars.len();
                bars.retain(|bar| (start..end).contains(&bar.bucket_start()));
                if bars.len() < received {
                    warn!(
                        symbol = %symbol,
                        dropped = received - bars.len(),
                        %start,
                        %end,
                        "Dropped rows outside the fetch window"
                    );
                }
                if bars.is_empty() {
                    return Ok(FetchResult::empty());
                }
                info!(symbol = %symbol, fetched = bars.len(), %start, %end, "Fetched rows");
                Ok(FetchResult { raw, bars })
            }
            Err(IngestError::NoTimeColumn { .. }) => {
                error!(symbol = %symbol, rows = raw.len(), "No time column found in provider response");
                Ok(FetchResult::empty())
            }
            Err(e) => Err(e),
        }
    }
}
