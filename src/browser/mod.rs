//! Browser abstraction for scraping client-rendered pages.
//!
//! Defines the `BrowserEngine` and `BrowsingSession` traits that abstract
//! over the browser engine (currently Chromium via chromiumoxide). The
//! interceptor and orchestrator only ever see these traits, so tests can
//! substitute scripted fakes.

pub mod chromium;

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use futures::stream::BoxStream;
use serde_json::Value;

use crate::config::ClientIdentity;

/// One network response observed on a page.
///
/// Carries the response metadata only; the body is fetched separately via
/// [`BrowsingSession::response_body_json`] because it may not be available
/// (or wanted) for every response.
#[derive(Debug, Clone)]
pub struct ResponseEvent {
    /// Engine-level id for retrieving the body.
    pub request_id: String,
    pub url: String,
    pub status: u16,
    /// MIME type as reported by the engine, e.g. `application/json`.
    pub content_type: String,
}

/// A browser engine that can open isolated browsing sessions.
#[async_trait]
pub trait BrowserEngine: Send + Sync {
    /// Open a fresh isolated session presenting the given client identity.
    ///
    /// Sessions share nothing with each other; cookies, cache, and network
    /// state are all per-session.
    async fn open_session(&self, identity: &ClientIdentity) -> Result<Arc<dyn BrowsingSession>>;
}

/// A single isolated browsing session (one page).
#[async_trait]
pub trait BrowsingSession: Send + Sync {
    /// Navigate to a URL, resolving once the initial document has been
    /// parsed. Does not wait for all subresources; pages here keep loading
    /// data long after the document is ready.
    async fn navigate(&self, url: &str) -> Result<()>;

    /// Subscribe to the stream of response-received events on this page.
    ///
    /// The subscription is live from the moment this returns, so attaching
    /// before navigation cannot miss a response.
    async fn response_events(&self) -> Result<BoxStream<'static, ResponseEvent>>;

    /// Fetch a response body by request id and parse it as JSON.
    async fn response_body_json(&self, request_id: &str) -> Result<Value>;

    /// Tear the session down. Safe to call exactly once on every exit path.
    async fn close(&self) -> Result<()>;
}
