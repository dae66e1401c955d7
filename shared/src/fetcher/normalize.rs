//! Provider rows to curated bars.
//!
//! Every OHLCV cell goes through [`coerce_price`] or [`coerce_volume`] here, so
//! storage code only ever sees `Option<f64>` / `Option<i64>`.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Timelike, Utc};
use serde_json::Value;
use tracing::warn;

use crate::error::{IngestError, Result};
use crate::models::{PriceBar, RawRecord};

pub const DATETIME_COLUMN: &str = "Datetime";
pub const DATE_COLUMN: &str = "Date";

/// Epoch values above this are milliseconds rather than seconds.
const EPOCH_MILLIS_THRESHOLD: i64 = 100_000_000_000;

/// Picks the time column of a frame; `Datetime` wins over `Date`.
pub fn time_column(records: &[RawRecord]) -> Option<&'static str> {
    [DATETIME_COLUMN, DATE_COLUMN]
        .into_iter()
        .find(|column| records.iter().any(|r| r.contains_key(*column)))
}

/// Curate provider rows: split the time column into `date` + UTC `hour`, tag
/// the symbol and coerce OHLCV. Rows with an unreadable time are skipped.
pub fn normalize(symbol: &str, records: &[RawRecord]) -> Result<Vec<PriceBar>> {
    let column = time_column(records).ok_or_else(|| IngestError::NoTimeColumn {
        symbol: symbol.to_string(),
    })?;

    let mut bars = Vec::with_capacity(records.len());
    for (i, record) in records.iter().enumerate() {
        let Some(at) = record.get(column).and_then(parse_time) else {
            warn!(symbol = %symbol, row = i, column, "Skipping row with unreadable time value");
            continue;
        };

        bars.push(PriceBar {
            date: at.date_naive(),
            hour: at.hour(),
            symbol: symbol.to_string(),
            open: coerce_price(record.get("Open")),
            high: coerce_price(record.get("High")),
            low: coerce_price(record.get("Low")),
            close: coerce_price(record.get("Close")),
            volume: coerce_volume(record.get("Volume")),
        });
    }
    Ok(bars)
}

/// Reads a time cell: RFC 3339, naive `YYYY-MM-DD[ T]HH:MM:SS` (taken as
/// UTC), bare `YYYY-MM-DD` (midnight UTC) or epoch seconds/milliseconds.
pub fn parse_time(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(s) => {
            let s = s.trim();
            if let Ok(ts) = DateTime::parse_from_rfc3339(s) {
                return Some(ts.with_timezone(&Utc));
            }
            for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S%.f"] {
                if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
                    return Some(naive.and_utc());
                }
            }
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .map(|naive| naive.and_utc())
        }
        Value::Number(n) => {
            let epoch = n.as_i64().or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f as i64))?;
            if epoch.abs() >= EPOCH_MILLIS_THRESHOLD {
                DateTime::from_timestamp_millis(epoch)
            } else {
                DateTime::from_timestamp(epoch, 0)
            }
        }
        _ => None,
    }
}

/// Price cell to `f64`; missing, null, NaN, infinite or non-numeric is `None`.
pub fn coerce_price(value: Option<&Value>) -> Option<f64> {
    let number = match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    number.is_finite().then_some(number)
}

/// Volume cell to `i64`; fractional volumes are truncated.
pub fn coerce_volume(value: Option<&Value>) -> Option<i64> {
    match value? {
        Value::Number(n) => n.as_i64().or_else(|| float_to_i64(n.as_f64()?)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>().ok().or_else(|| float_to_i64(s.parse::<f64>().ok()?))
        }
        _ => None,
    }
}

fn float_to_i64(f: f64) -> Option<i64> {
    (f.is_finite() && f >= i64::MIN as f64 && f <= i64::MAX as f64).then(|| f.trunc() as i64)
}
