// SPDX-License-Identifier: MIT

//! Shared helpers for date/time formatting.

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};

/// The calendar day used as the tracking key.
///
/// Callers compute this once at the start of a toggle and reuse it for the
/// whole round trip, so a midnight rollover mid-flight cannot split one
/// toggle across two dates.
pub fn today_local() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// Format a calendar day as the storage key segment ("YYYY-MM-DD").
pub fn format_date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Format a UTC timestamp as RFC3339 using a `Z` suffix.
pub fn format_utc_rfc3339(date: DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Secs, true)
}
