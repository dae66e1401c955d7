//! Yahoo Finance data provider.
//!
//! Fetches OHLCV rows from Yahoo's v8 chart API and reshapes them into
//! record-oriented rows. Intraday intervals produce a `Datetime` column,
//! daily-or-coarser intervals a `Date` column.
//!
//! No retries and no client-side timeout: a failed call surfaces to the
//! orchestrator and the next scheduled run picks up the same window.

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use super::normalize::{DATETIME_COLUMN, DATE_COLUMN};
use super::PriceProvider;
use crate::error::{IngestError, Result};
use crate::models::RawRecord;

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// Yahoo Finance v8 chart API response.
#[derive(Debug, Deserialize)]
pub(crate) struct ChartResponse {
    chart: ChartResult,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    result: Option<Vec<ChartData>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    timestamp: Option<Vec<i64>>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    #[serde(default)]
    quote: Vec<QuoteData>,
}

/// Columns are kept as raw JSON so nulls reach coercion untouched.
#[derive(Debug, Default, Deserialize)]
struct QuoteData {
    #[serde(default)]
    open: Vec<Value>,
    #[serde(default)]
    high: Vec<Value>,
    #[serde(default)]
    low: Vec<Value>,
    #[serde(default)]
    close: Vec<Value>,
    #[serde(default)]
    volume: Vec<Value>,
}

pub struct YahooProvider {
    client: reqwest::Client,
    base_url: String,
}

impl YahooProvider {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn chart_url(&self, symbol: &str) -> String {
        format!("{}/v8/finance/chart/{}", self.base_url, symbol)
    }
}

/// Daily-or-coarser bars carry no time of day.
pub fn is_daily_or_coarser(interval: &str) -> bool {
    matches!(interval, "1d" | "5d" | "1wk" | "1mo" | "3mo")
}

/// Reshape a chart response into rows. "Not Found" and a result without
/// timestamps mean no data; any other chart error is a provider error.
pub(crate) fn parse_chart(symbol: &str, interval: &str, resp: ChartResponse) -> Result<Vec<RawRecord>> {
    if let Some(err) = resp.chart.error {
        if err.code == "Not Found" {
            warn!(symbol = %symbol, "Yahoo reports symbol not found: {}", err.description);
            return Ok(Vec::new());
        }
        return Err(IngestError::Provider(format!("{}: {}", err.code, err.description)));
    }

    let Some(data) = resp.chart.result.and_then(|r| r.into_iter().next()) else {
        return Ok(Vec::new());
    };
    let Some(timestamps) = data.timestamp else {
        return Ok(Vec::new());
    };
    let quote = data.indicators.quote.into_iter().next().unwrap_or_default();
    let daily = is_daily_or_coarser(interval);

    let mut records = Vec::with_capacity(timestamps.len());
    for (i, &ts) in timestamps.iter().enumerate() {
        let Some(at) = DateTime::<Utc>::from_timestamp(ts, 0) else {
            warn!(symbol = %symbol, ts, "Dropping row with invalid timestamp");
            continue;
        };

        let mut record = RawRecord::new();
        if daily {
            record.insert(DATE_COLUMN.to_string(), Value::String(at.format("%Y-%m-%d").to_string()));
        } else {
            record.insert(
                DATETIME_COLUMN.to_string(),
                Value::String(at.to_rfc3339_opts(SecondsFormat::Secs, true)),
            );
        }
        for (name, column) in [
            ("Open", &quote.open),
            ("High", &quote.high),
            ("Low", &quote.low),
            ("Close", &quote.close),
            ("Volume", &quote.volume),
        ] {
            record.insert(name.to_string(), column.get(i).cloned().unwrap_or(Value::Null));
        }
        records.push(record);
    }
    Ok(records)
}

#[async_trait]
impl PriceProvider for YahooProvider {
    fn name(&self) -> &str {
        "yahoo_finance"
    }

    async fn download(
        &self,
        symbol: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        interval: &str,
    ) -> Result<Vec<RawRecord>> {
        let url = self.chart_url(symbol);
        debug!(symbol = %symbol, %url, %start, %end, interval, "Requesting chart data");

        let response = self
            .client
            .get(&url)
            .query(&[
                ("period1", start.timestamp().to_string()),
                ("period2", end.timestamp().to_string()),
                ("interval", interval.to_string()),
                ("includePrePost", "false".to_string()),
            ])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        // Yahoo sends a chart error payload with 4xx statuses too.
        match serde_json::from_str::<ChartResponse>(&body) {
            Ok(chart) => parse_chart(symbol, interval, chart),
            Err(e) if status.is_success() => Err(IngestError::Provider(format!(
                "failed to parse chart response for {}: {}",
                symbol, e
            ))),
            Err(_) => Err(IngestError::Provider(format!("HTTP {} for {}", status, symbol))),
        }
    }
}
