//! Chromium-based browser engine using chromiumoxide.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::network::{
    EventResponseReceived, GetResponseBodyParams, RequestId, SetUserAgentOverrideParams,
};
use chromiumoxide::handler::viewport::Viewport;
use chromiumoxide::page::Page;
use futures::stream::BoxStream;
use futures::StreamExt;
use serde_json::Value;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use super::{BrowserEngine, BrowsingSession, ResponseEvent};
use crate::config::ClientIdentity;

/// Find the Chromium binary path.
pub fn find_chromium() -> Option<PathBuf> {
    // 1. DINEGRAB_CHROMIUM_PATH env
    if let Ok(p) = std::env::var("DINEGRAB_CHROMIUM_PATH") {
        let path = PathBuf::from(&p);
        if path.exists() {
            return Some(path);
        }
    }

    // 2. ~/.dinegrab/chromium/
    if let Some(home) = dirs::home_dir() {
        let candidates = if cfg!(target_os = "macos") {
            vec![
                home.join(".dinegrab/chromium/chrome-mac-arm64/Google Chrome for Testing.app/Contents/MacOS/Google Chrome for Testing"),
                home.join(".dinegrab/chromium/chrome-mac-x64/Google Chrome for Testing.app/Contents/MacOS/Google Chrome for Testing"),
                home.join(".dinegrab/chromium/chrome"),
            ]
        } else {
            vec![
                home.join(".dinegrab/chromium/chrome-linux64/chrome"),
                home.join(".dinegrab/chromium/chrome"),
            ]
        };
        for c in candidates {
            if c.exists() {
                return Some(c);
            }
        }
    }

    // 3. System PATH
    if let Ok(path) = which::which("google-chrome") {
        return Some(path);
    }
    if let Ok(path) = which::which("chromium") {
        return Some(path);
    }
    if let Ok(path) = which::which("chromium-browser") {
        return Some(path);
    }

    // 4. Common macOS locations
    if cfg!(target_os = "macos") {
        let common =
            PathBuf::from("/Applications/Google Chrome.app/Contents/MacOS/Google Chrome");
        if common.exists() {
            return Some(common);
        }
    }

    None
}

/// Chromium-based browser engine.
///
/// Each session launches its own headless Chromium process, so no cookies,
/// cache, or network state leaks between scrape attempts.
pub struct ChromiumEngine {
    chrome_path: PathBuf,
}

impl ChromiumEngine {
    /// Create a new engine, resolving the Chromium executable.
    pub fn new() -> Result<Self> {
        let chrome_path = find_chromium().context(
            "Chromium not found. Install Chrome/Chromium, or set DINEGRAB_CHROMIUM_PATH.",
        )?;
        Ok(Self { chrome_path })
    }
}

#[async_trait]
impl BrowserEngine for ChromiumEngine {
    async fn open_session(&self, identity: &ClientIdentity) -> Result<Arc<dyn BrowsingSession>> {
        let viewport = Viewport {
            width: identity.viewport_width,
            height: identity.viewport_height,
            device_scale_factor: None,
            emulating_mobile: false,
            is_landscape: false,
            has_touch: false,
        };

        let config = BrowserConfig::builder()
            .chrome_executable(self.chrome_path.clone())
            .window_size(identity.viewport_width, identity.viewport_height)
            .viewport(viewport)
            .arg("--headless=new")
            .arg("--disable-gpu")
            .arg("--no-sandbox")
            .arg("--disable-dev-shm-usage")
            .arg("--disable-extensions")
            .arg("--disable-background-networking")
            .arg(format!("--lang={}", identity.accept_language))
            .build()
            .map_err(|e| anyhow::anyhow!("failed to build browser config: {e}"))?;

        let (browser, mut handler) = Browser::launch(config)
            .await
            .context("failed to launch Chromium")?;

        // Spawn the handler task
        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                let _ = event;
            }
        });

        let page = browser
            .new_page("about:blank")
            .await
            .context("failed to create new page")?;

        let override_params = SetUserAgentOverrideParams::builder()
            .user_agent(&identity.user_agent)
            .accept_language(&identity.accept_language)
            .build()
            .map_err(|e| anyhow::anyhow!("failed to build user agent override: {e}"))?;
        page.set_user_agent(override_params)
            .await
            .context("failed to set user agent")?;

        Ok(Arc::new(ChromiumSession {
            browser: Mutex::new(browser),
            page,
            handler_task,
        }))
    }
}

/// A single Chromium session: one browser process, one page.
pub struct ChromiumSession {
    browser: Mutex<Browser>,
    page: Page,
    handler_task: JoinHandle<()>,
}

#[async_trait]
impl BrowsingSession for ChromiumSession {
    async fn navigate(&self, url: &str) -> Result<()> {
        self.page
            .goto(url)
            .await
            .with_context(|| format!("navigation to {url} failed"))?;
        Ok(())
    }

    async fn response_events(&self) -> Result<BoxStream<'static, ResponseEvent>> {
        let events = self
            .page
            .event_listener::<EventResponseReceived>()
            .await
            .context("failed to subscribe to network events")?;

        Ok(events
            .map(|event| ResponseEvent {
                request_id: event.request_id.inner().clone(),
                url: event.response.url.clone(),
                status: u16::try_from(event.response.status).unwrap_or(0),
                content_type: event.response.mime_type.clone(),
            })
            .boxed())
    }

    async fn response_body_json(&self, request_id: &str) -> Result<Value> {
        let response = self
            .page
            .execute(GetResponseBodyParams::new(RequestId::new(request_id)))
            .await
            .with_context(|| format!("failed to fetch body for request {request_id}"))?;

        let returns = &response.result;
        let value = if returns.base64_encoded {
            let bytes = BASE64
                .decode(returns.body.as_bytes())
                .context("response body was not valid base64")?;
            serde_json::from_slice(&bytes).context("response body was not valid JSON")?
        } else {
            serde_json::from_str(&returns.body).context("response body was not valid JSON")?
        };
        Ok(value)
    }

    async fn close(&self) -> Result<()> {
        let _ = self.page.clone().close().await;
        let mut browser = self.browser.lock().await;
        let _ = browser.close().await;
        let _ = browser.wait().await;
        self.handler_task.abort();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_chromium_env_override_requires_existing_path() {
        // A nonexistent override must not short-circuit the lookup chain.
        std::env::set_var("DINEGRAB_CHROMIUM_PATH", "/definitely/not/a/browser");
        let found = find_chromium();
        std::env::remove_var("DINEGRAB_CHROMIUM_PATH");
        if let Some(path) = found {
            assert_ne!(path, PathBuf::from("/definitely/not/a/browser"));
        }
    }

    #[tokio::test]
    #[ignore] // Requires Chromium to be installed
    async fn test_session_navigate_and_close() {
        let engine = ChromiumEngine::new().expect("failed to create engine");
        let session = engine
            .open_session(&ClientIdentity::default())
            .await
            .expect("failed to open session");

        session
            .navigate("data:text/html,<h1>Menu</h1>")
            .await
            .expect("navigation failed");

        session.close().await.expect("close failed");
    }
}
