//! Display formatting for journal timestamps
//!
//! Sources disagree on representation: epoch milliseconds as a JSON number,
//! the same number as a string, or an already formatted date. A timestamp
//! that cannot be interpreted is shown as-is rather than reported.

use crate::entry::{LogEntry, RawTimestamp};
use chrono::{DateTime, Local};
use serde_json::Value;

const DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Display time for an entry, `""` when it carries no timestamp
pub fn display_time(entry: &LogEntry) -> String {
    entry
        .timestamp
        .as_ref()
        .map(format_timestamp)
        .unwrap_or_default()
}

/// Format a raw timestamp for display
pub fn format_timestamp(timestamp: &RawTimestamp) -> String {
    match timestamp {
        RawTimestamp::Number(n) => {
            let millis = n.as_f64().unwrap_or_default();
            if millis == 0.0 {
                return String::new();
            }
            format_millis(millis).unwrap_or_else(|| n.to_string())
        }
        RawTimestamp::Text(s) => {
            let s = s.trim();
            match canonical_number(s) {
                Some(millis) => format_millis(millis).unwrap_or_else(|| s.to_string()),
                None => s.to_string(),
            }
        }
        RawTimestamp::Other(Value::Bool(false)) => String::new(),
        RawTimestamp::Other(v) => v.to_string(),
    }
}

/// A string counts as numeric only when it is exactly the canonical
/// rendering of its own value: `"1700000000000"` and `"1.5"` qualify,
/// `"017"`, `"1e3"`, `"+5"` and `"12 "` do not.
fn canonical_number(s: &str) -> Option<f64> {
    s.parse::<f64>()
        .ok()
        .filter(|n| n.is_finite() && n.to_string() == s)
}

/// Epoch milliseconds to local time; `None` when out of range
fn format_millis(millis: f64) -> Option<String> {
    let millis = millis.trunc();
    if !millis.is_finite() || millis.abs() > i64::MAX as f64 {
        return None;
    }
    let utc = DateTime::from_timestamp_millis(millis as i64)?;
    Some(utc.with_timezone(&Local).format(DISPLAY_FORMAT).to_string())
}
