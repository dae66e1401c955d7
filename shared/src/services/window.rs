//! Fetch window arithmetic. Everything is bucketed on whole UTC hours.

use chrono::{DateTime, Duration, Timelike, Utc};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl FetchWindow {
    /// Zero or negative width; the fetch adapter returns nothing for these.
    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowDecision {
    /// The symbol is already current.
    Skip,
    Fetch(FetchWindow),
}

/// Zero minutes, seconds and sub-seconds.
pub fn truncate_to_hour(ts: DateTime<Utc>) -> DateTime<Utc> {
    ts.date_naive()
        .and_hms_opt(ts.hour(), 0, 0)
        .map(|naive| naive.and_utc())
        .unwrap_or(ts)
}

/// Window from the bucket after `last_ts` up to the current hour.
///
/// `last_ts >= now` skips. `last_ts == now - 1h` still yields a window
/// (`start == end`), which the fetch adapter short-circuits to empty.
pub fn compute_window(last_ts: DateTime<Utc>, now: DateTime<Utc>) -> WindowDecision {
    let now = truncate_to_hour(now);
    if last_ts >= now {
        return WindowDecision::Skip;
    }
    WindowDecision::Fetch(FetchWindow {
        start: last_ts + Duration::hours(1),
        end: now,
    })
}
