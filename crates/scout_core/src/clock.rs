//! Wall-clock helpers and time display formatting.

use time::format_description::FormatItem;
use time::macros::format_description;
use time::OffsetDateTime;

/// Current wall-clock time in unix milliseconds.
pub fn now_ms() -> u64 {
    (OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000) as u64
}

/// Format whole seconds as `MM:SS`, clamped at zero.
pub fn format_mmss(secs: i64) -> String {
    let secs = secs.max(0);
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

const REPORT_DATE_FORMAT: &[FormatItem<'_>] =
    format_description!("[day]-[month]-[year] [hour]:[minute]");

/// Human-readable report date for a unix-ms timestamp.
pub fn format_report_date(timestamp_ms: u64) -> String {
    OffsetDateTime::from_unix_timestamp_nanos(timestamp_ms as i128 * 1_000_000)
        .ok()
        .and_then(|t| t.format(REPORT_DATE_FORMAT).ok())
        .unwrap_or_else(|| "Unknown".to_string())
}
