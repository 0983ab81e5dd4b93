//! Network response interception and menu payload capture.
//!
//! The menu site gives no load signal when its menu XHR lands, so capture is
//! event-driven: a listener task watches every response on the page and fills
//! a write-once slot with the first successful menu body. Callers poll the
//! handle; the slot transitions empty→filled exactly once.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::NaiveDate;
use futures::StreamExt;
use serde_json::Value;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::browser::{BrowsingSession, ResponseEvent};
use crate::config::EndpointMatcher;
use crate::menu::MealPeriod;

/// Per-attempt capture state: the payload slot and the candidate URLs
/// already logged. Owned by exactly one scrape attempt.
#[derive(Debug, Default)]
struct CaptureState {
    payload: Option<Value>,
    seen: HashSet<String>,
}

/// Handle to a live interception.
///
/// Listens from the moment [`MenuCapture::attach`] returns until the handle
/// is dropped. Performs no blocking wait itself — callers poll [`peek`].
///
/// [`peek`]: MenuCapture::peek
pub struct MenuCapture {
    state: Arc<Mutex<CaptureState>>,
    listener: JoinHandle<()>,
}

impl MenuCapture {
    /// Subscribe to the session's response events and start capturing.
    ///
    /// The subscription is established before this returns, so attaching
    /// before navigation cannot miss the menu response.
    pub async fn attach(
        session: Arc<dyn BrowsingSession>,
        matcher: EndpointMatcher,
        date: NaiveDate,
        period: MealPeriod,
    ) -> anyhow::Result<Self> {
        let mut events = session.response_events().await?;
        let state = Arc::new(Mutex::new(CaptureState::default()));

        let task_state = Arc::clone(&state);
        let date_param = format!("date={date}");
        let listener = tokio::spawn(async move {
            while let Some(event) = events.next().await {
                handle_event(
                    &task_state,
                    session.as_ref(),
                    &matcher,
                    &date_param,
                    period,
                    event,
                )
                .await;
            }
        });

        Ok(Self { state, listener })
    }

    /// The captured payload, if one has landed yet.
    pub fn peek(&self) -> Option<Value> {
        lock(&self.state).payload.clone()
    }

    /// Number of distinct candidate URLs observed so far.
    ///
    /// Zero after a timeout means the site never called the menu endpoint;
    /// non-zero means it was called but never answered 200 with JSON.
    pub fn distinct_matches(&self) -> usize {
        lock(&self.state).seen.len()
    }
}

impl Drop for MenuCapture {
    fn drop(&mut self) {
        self.listener.abort();
    }
}

async fn handle_event(
    state: &Mutex<CaptureState>,
    session: &dyn BrowsingSession,
    matcher: &EndpointMatcher,
    date_param: &str,
    period: MealPeriod,
    event: ResponseEvent,
) {
    if !matcher.is_candidate(&event.url, date_param) {
        return;
    }

    let already_captured = {
        let mut guard = lock(state);
        // One log line per distinct candidate URL; repeats stay eligible
        // for capture but are not re-logged.
        if guard.seen.insert(event.url.clone()) {
            info!("[{period}] saw {} {}", event.status, event.url);
        }
        guard.payload.is_some()
    };

    if already_captured || event.status != 200 || !is_json(&event.content_type) {
        return;
    }

    match session.response_body_json(&event.request_id).await {
        Ok(body) => {
            let mut guard = lock(state);
            if guard.payload.is_none() {
                guard.payload = Some(body);
            }
        }
        Err(e) => {
            // An unreadable body must not abort the attempt; the slot stays
            // empty and a later sighting of the endpoint can still fill it.
            debug!("[{period}] body read failed for {}: {e:#}", event.url);
        }
    }
}

fn is_json(content_type: &str) -> bool {
    content_type.to_ascii_lowercase().contains("application/json")
}

fn lock(state: &Mutex<CaptureState>) -> MutexGuard<'_, CaptureState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_json_content_types() {
        assert!(is_json("application/json"));
        assert!(is_json("Application/JSON; charset=utf-8"));
        assert!(!is_json("text/html"));
        assert!(!is_json(""));
    }
}
