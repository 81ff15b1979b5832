//! Timestamp helpers
//!
//! The API speaks seconds since the epoch as decimal strings; people read
//! local wall-clock time.

use chrono::{DateTime, Local, TimeZone};
use std::fmt::Display;

/// Layout used for every human-readable timestamp
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S %z";

/// Current time as seconds since the epoch
pub fn now_epoch() -> i64 {
    Local::now().timestamp()
}

/// Render an epoch timestamp in the given zone
///
/// Returns `None` for values chrono cannot represent.
pub fn format_epoch<Tz>(secs: i64, tz: &Tz) -> Option<String>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let utc = DateTime::from_timestamp(secs, 0)?;
    Some(utc.with_timezone(tz).format(TIMESTAMP_FORMAT).to_string())
}

/// Render an epoch timestamp in local time
pub fn format_epoch_local(secs: i64) -> Option<String> {
    format_epoch(secs, &Local)
}

/// Parse the decimal-string timestamps the API returns
pub fn parse_epoch(raw: &str) -> Option<i64> {
    raw.trim().parse().ok()
}
