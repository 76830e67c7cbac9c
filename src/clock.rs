//! clock.rs — the two date strings the app cares about: a long display
//! form embedded in the prompt and report header, and a compact key used
//! for cache invalidation. Both roll over at local midnight.

use chrono::Local;

/// Human-readable date for the prompt and the report header,
/// e.g. "February 3, 2026".
pub fn today_display() -> String {
    Local::now().format("%B %-d, %Y").to_string()
}

/// Stable date key for cache freshness, e.g. "2026-02-03". Compared by
/// string equality only.
pub fn today_key() -> String {
    Local::now().format("%Y-%m-%d").to_string()
}
