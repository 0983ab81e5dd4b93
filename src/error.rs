//! Error types for the scrape pipeline.

use chrono::NaiveDate;

use crate::menu::MealPeriod;

/// All errors that can terminate a scrape attempt.
///
/// Only the two timeout kinds exist as distinct failures; upstream schema
/// irregularities never error — the normalizer absorbs them into defaults.
#[derive(thiserror::Error, Debug)]
pub enum ScrapeError {
    /// The page never reached its initial parsed state within the bound.
    #[error("navigation to {url} timed out after {timeout_ms}ms")]
    NavigationTimeout { url: String, timeout_ms: u64 },

    /// No matching 200+JSON response was captured within the poll ceiling.
    ///
    /// `distinct_matches` is the number of distinct candidate URLs the
    /// interceptor saw: zero means the site never called the menu endpoint,
    /// non-zero means it was called but never answered 200 with JSON.
    #[error(
        "no menu payload captured for {period} on {date} within {ceiling_ms}ms \
         (distinct menu endpoint calls seen: {distinct_matches})"
    )]
    CaptureTimeout {
        period: MealPeriod,
        date: NaiveDate,
        ceiling_ms: u64,
        distinct_matches: usize,
    },

    /// Browser engine failure: launch, session creation, event subscription,
    /// or a navigation error other than the timeout.
    #[error("browser error: {0:#}")]
    Browser(#[from] anyhow::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capture_timeout_message_names_period_and_date() {
        let err = ScrapeError::CaptureTimeout {
            period: MealPeriod::Dinner,
            date: NaiveDate::from_ymd_opt(2026, 3, 14).unwrap(),
            ceiling_ms: 30_000,
            distinct_matches: 2,
        };
        let msg = err.to_string();
        assert!(msg.contains("dinner"));
        assert!(msg.contains("2026-03-14"));
        assert!(msg.contains('2'));
    }
}
