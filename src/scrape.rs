//! Scrape orchestration: one bounded attempt per (date, period).

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use serde_json::Value;
use tracing::{info, warn};

use crate::browser::{BrowserEngine, BrowsingSession};
use crate::capture::MenuCapture;
use crate::config::ScrapeConfig;
use crate::error::ScrapeError;
use crate::menu::MealPeriod;

/// Scrape the raw menu document for one (date, period) pair.
///
/// Opens a fresh isolated session, attaches the interceptor before
/// navigating, then polls for a capture up to the configured ceiling. The
/// session is torn down on every exit path, success or failure, before the
/// result is surfaced. No retries at this layer — a failed attempt
/// propagates to the caller.
pub async fn scrape_one(
    engine: &dyn BrowserEngine,
    config: &ScrapeConfig,
    date: NaiveDate,
    period: MealPeriod,
) -> Result<Value, ScrapeError> {
    let session = engine.open_session(&config.identity).await?;

    let outcome = drive(Arc::clone(&session), config, date, period).await;

    if let Err(e) = session.close().await {
        warn!("[{period}] session teardown failed: {e:#}");
    }
    outcome
}

async fn drive(
    session: Arc<dyn BrowsingSession>,
    config: &ScrapeConfig,
    date: NaiveDate,
    period: MealPeriod,
) -> Result<Value, ScrapeError> {
    let capture =
        MenuCapture::attach(Arc::clone(&session), config.endpoint.clone(), date, period).await?;

    let url = config.menu_page_url(date, period);
    info!("[{period}] opening {url}");

    // The menu payload arrives asynchronously after the initial document, so
    // a parsed document is enough; the poll loop below does the waiting.
    let navigation = tokio::time::timeout(
        Duration::from_millis(config.navigation_timeout_ms),
        session.navigate(&url),
    )
    .await;
    match navigation {
        Ok(Ok(())) => {}
        Ok(Err(e)) => return Err(ScrapeError::Browser(e)),
        Err(_) => {
            return Err(ScrapeError::NavigationTimeout {
                url,
                timeout_ms: config.navigation_timeout_ms,
            })
        }
    }

    let mut attempts = 0;
    loop {
        if let Some(payload) = capture.peek() {
            info!("[{period}] captured menu payload for {date}");
            return Ok(payload);
        }
        if attempts >= config.poll_attempts {
            break;
        }
        attempts += 1;
        tokio::time::sleep(Duration::from_millis(config.poll_interval_ms)).await;
    }

    Err(ScrapeError::CaptureTimeout {
        period,
        date,
        ceiling_ms: config.capture_ceiling_ms(),
        distinct_matches: capture.distinct_matches(),
    })
}
