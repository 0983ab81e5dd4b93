//! Scrape configuration.
//!
//! Everything the orchestrator needs to find the menu (page URL, upstream
//! endpoint markers, client identity, timing bounds) lives here as explicit
//! immutable configuration rather than scattered constants.

use chrono::{NaiveDate, Utc};
use chrono_tz::Tz;

use crate::menu::MealPeriod;

/// The time zone the dining hall publishes its menu in.
///
/// "Today" is always computed here, not in the machine's local zone, so a
/// scrape kicked off late at night from another zone still fetches the
/// hall's current day.
pub const HALL_TIMEZONE: Tz = chrono_tz::America::New_York;

/// Today's date in the hall's time zone.
pub fn today_at_hall() -> NaiveDate {
    Utc::now().with_timezone(&HALL_TIMEZONE).date_naive()
}

/// Substring markers identifying the upstream menu endpoint.
///
/// Matching is containment only: host, path segment, and the literal
/// `date=` query parameter. The upstream URL shape is not under our control
/// and drifts.
#[derive(Debug, Clone)]
pub struct EndpointMatcher {
    /// Host of the upstream JSON API.
    pub host_marker: String,
    /// Path segment of the menu endpoint, including the query delimiter.
    pub path_marker: String,
}

impl EndpointMatcher {
    /// Whether `url` is a candidate response for the given date parameter.
    ///
    /// `date_param` is the full `date=YYYY-MM-DD` pair, precomputed by the
    /// caller.
    pub fn is_candidate(&self, url: &str, date_param: &str) -> bool {
        url.contains(&self.host_marker)
            && url.contains(&self.path_marker)
            && url.contains(date_param)
    }
}

/// Client identity presented to the site.
///
/// The menu site serves a degraded shell to clients it considers headless,
/// so sessions carry a desktop user agent, a real viewport, and a locale.
#[derive(Debug, Clone)]
pub struct ClientIdentity {
    pub user_agent: String,
    pub viewport_width: u32,
    pub viewport_height: u32,
    pub accept_language: String,
}

impl Default for ClientIdentity {
    fn default() -> Self {
        Self {
            user_agent: "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
                         AppleWebKit/537.36 (KHTML, like Gecko) \
                         Chrome/122.0.0.0 Safari/537.36"
                .to_string(),
            viewport_width: 1280,
            viewport_height: 800,
            accept_language: "en-US".to_string(),
        }
    }
}

/// Immutable configuration for a scrape run.
#[derive(Debug, Clone)]
pub struct ScrapeConfig {
    /// Menu page for the hall, without date or period segments.
    pub base_page_url: String,
    /// Human-readable hall name stamped into every persisted record.
    pub hall_name: String,
    /// Markers identifying the upstream menu endpoint.
    pub endpoint: EndpointMatcher,
    /// Identity presented by each browsing session.
    pub identity: ClientIdentity,
    /// Bound on page navigation. Fatal when exceeded.
    pub navigation_timeout_ms: u64,
    /// Interval between capture polls.
    pub poll_interval_ms: u64,
    /// Number of capture polls before giving up.
    pub poll_attempts: u32,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            base_page_url:
                "https://dineoncampus.com/barryu/whats-on-the-menu/roussell-dining-hall"
                    .to_string(),
            hall_name: "Roussell Dining Hall".to_string(),
            endpoint: EndpointMatcher {
                host_marker: "apiv4.dineoncampus.com".to_string(),
                path_marker: "/menu?".to_string(),
            },
            identity: ClientIdentity::default(),
            navigation_timeout_ms: 90_000,
            poll_interval_ms: 500,
            poll_attempts: 60,
        }
    }
}

impl ScrapeConfig {
    /// Target page URL for one (date, period) pair.
    pub fn menu_page_url(&self, date: NaiveDate, period: MealPeriod) -> String {
        format!("{}/{date}/{period}", self.base_page_url)
    }

    /// The capture ceiling implied by the poll settings, in milliseconds.
    pub fn capture_ceiling_ms(&self) -> u64 {
        self.poll_interval_ms * u64::from(self.poll_attempts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_menu_page_url_composition() {
        let config = ScrapeConfig::default();
        let date = NaiveDate::from_ymd_opt(2026, 3, 14).unwrap();
        assert_eq!(
            config.menu_page_url(date, MealPeriod::Lunch),
            "https://dineoncampus.com/barryu/whats-on-the-menu/roussell-dining-hall/2026-03-14/lunch"
        );
    }

    #[test]
    fn test_candidate_matching() {
        let matcher = ScrapeConfig::default().endpoint;
        let date_param = "date=2026-03-14";

        assert!(matcher.is_candidate(
            "https://apiv4.dineoncampus.com/location/1234/periods/5678/menu?platform=0&date=2026-03-14",
            date_param
        ));
        // Wrong date
        assert!(!matcher.is_candidate(
            "https://apiv4.dineoncampus.com/location/1234/periods/5678/menu?platform=0&date=2026-03-15",
            date_param
        ));
        // Wrong host
        assert!(!matcher.is_candidate(
            "https://cdn.dineoncampus.com/assets/menu?date=2026-03-14",
            date_param
        ));
        // Not the menu endpoint
        assert!(!matcher.is_candidate(
            "https://apiv4.dineoncampus.com/location/1234/hours?date=2026-03-14",
            date_param
        ));
    }

    #[test]
    fn test_capture_ceiling() {
        let config = ScrapeConfig::default();
        assert_eq!(config.capture_ceiling_ms(), 30_000);
    }
}
