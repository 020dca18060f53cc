//! chromiumoxide-backed engine
//!
//! One Chrome process is launched lazily and shared by all requests. Each
//! session gets its own browser context (separate cookies, storage and
//! cache) with a single page, so concurrent requests never see each
//! other's state. The shared process is health-checked before every new
//! session and relaunched if it died.

use anyhow::{Context, Result, bail};
use chromiumoxide::browser::Browser;
use chromiumoxide::cdp::browser_protocol::browser::BrowserContextId;
use chromiumoxide::cdp::browser_protocol::emulation::SetUserAgentOverrideParams;
use chromiumoxide::cdp::browser_protocol::page::NavigateParams;
use chromiumoxide::cdp::browser_protocol::target::{
    CreateBrowserContextParams, CreateTargetParams, DisposeBrowserContextParams,
};
use chromiumoxide::page::Page;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info, trace, warn};

use super::launcher::launch_browser;
use super::scripts::{BODY_TEXT_SCRIPT, READY_STATE_SCRIPT, closest_link_script, texts_script};
use super::timeout::with_page_timeout;
use super::{BrowserEngine, BrowserSession, WaitUntil};
use crate::utils::constants::READY_STATE_POLL_MS;

/// Launch options for [`ChromeEngine`]
#[derive(Debug, Clone)]
pub struct ChromeEngineConfig {
    pub headless: bool,
    /// Explicit Chrome/Chromium binary; auto-detected or downloaded when `None`
    pub executable: Option<PathBuf>,
}

impl Default for ChromeEngineConfig {
    fn default() -> Self {
        Self {
            headless: true,
            executable: None,
        }
    }
}

/// Browser process plus its CDP handler task and profile directory
struct BrowserWrapper {
    browser: Arc<Browser>,
    handler: JoinHandle<()>,
    user_data_dir: Option<PathBuf>,
}

impl BrowserWrapper {
    /// Close the process if no session still holds it, then remove the profile.
    async fn shutdown(mut self) {
        match Arc::get_mut(&mut self.browser) {
            Some(browser) => {
                if let Err(e) = browser.close().await {
                    warn!("Failed to close browser cleanly: {e}");
                }
                if let Err(e) = browser.wait().await {
                    warn!("Failed to wait for browser exit: {e}");
                }
            }
            None => warn!("Browser still referenced by open sessions, dropping without close"),
        }
        self.cleanup_temp_dir();
    }

    fn cleanup_temp_dir(&mut self) {
        if let Some(path) = self.user_data_dir.take() {
            debug!("Cleaning up browser profile directory: {}", path.display());
            if let Err(e) = std::fs::remove_dir_all(&path) {
                warn!("Failed to clean up {}: {e}", path.display());
            }
        }
    }
}

impl Drop for BrowserWrapper {
    fn drop(&mut self) {
        self.handler.abort();
        self.cleanup_temp_dir();
    }
}

/// Shared Chrome engine handing out isolated sessions
#[derive(Clone)]
pub struct ChromeEngine {
    config: ChromeEngineConfig,
    browser: Arc<Mutex<Option<BrowserWrapper>>>,
}

impl ChromeEngine {
    /// Create the engine. Chrome is not launched until the first session.
    #[must_use]
    pub fn new(config: ChromeEngineConfig) -> Self {
        Self {
            config,
            browser: Arc::new(Mutex::new(None)),
        }
    }

    /// Return the running browser, launching or relaunching it as needed
    async fn get_or_launch(&self) -> Result<Arc<Browser>> {
        let mut guard = self.browser.lock().await;

        if let Some(wrapper) = guard.as_ref() {
            match wrapper.browser.version().await {
                Ok(_) => return Ok(Arc::clone(&wrapper.browser)),
                Err(e) => {
                    warn!("Browser health check failed: {e}. Relaunching");
                    if let Some(crashed) = guard.take() {
                        crashed.shutdown().await;
                    }
                }
            }
        }

        let (browser, handler, user_data_dir) =
            launch_browser(self.config.headless, self.config.executable.as_deref()).await?;
        let wrapper = BrowserWrapper {
            browser: Arc::new(browser),
            handler,
            user_data_dir: Some(user_data_dir),
        };
        let browser = Arc::clone(&wrapper.browser);
        *guard = Some(wrapper);

        Ok(browser)
    }

    /// Close the shared browser if running. Safe to call more than once.
    pub async fn shutdown(&self) -> Result<()> {
        if let Some(wrapper) = self.browser.lock().await.take() {
            info!("Shutting down browser engine");
            wrapper.shutdown().await;
        }
        Ok(())
    }
}

impl BrowserEngine for ChromeEngine {
    type Session = ChromeSession;

    async fn new_session(&self, user_agent: &str) -> Result<ChromeSession> {
        let browser = self.get_or_launch().await?;

        let context_id = browser
            .execute(CreateBrowserContextParams::default())
            .await
            .context("Failed to create isolated browser context")?
            .result
            .browser_context_id;

        // From here on the session owns the context and releases it on close
        let mut session = ChromeSession {
            browser,
            context_id: Some(context_id.clone()),
            page: None,
        };

        if let Err(e) = session.open_page(context_id, user_agent).await {
            if let Err(close_err) = session.close().await {
                warn!("Failed to release half-open session: {close_err}");
            }
            return Err(e);
        }

        Ok(session)
    }
}

/// A browser context with one page
pub struct ChromeSession {
    browser: Arc<Browser>,
    context_id: Option<BrowserContextId>,
    page: Option<Page>,
}

impl ChromeSession {
    async fn open_page(&mut self, context_id: BrowserContextId, user_agent: &str) -> Result<()> {
        let target = CreateTargetParams::builder()
            .url("about:blank")
            .browser_context_id(context_id)
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to build target params: {e}"))?;

        let page = self
            .browser
            .new_page(target)
            .await
            .context("Failed to open page in browser context")?;

        // Stored before the override so a failure below still closes it
        let page = self.page.insert(page);
        page.execute(SetUserAgentOverrideParams::new(user_agent))
            .await
            .context("Failed to set user agent")?;

        Ok(())
    }

    fn page(&self) -> Result<&Page> {
        match self.page.as_ref() {
            Some(page) => Ok(page),
            None => bail!("session already closed"),
        }
    }

    async fn evaluate<T: serde::de::DeserializeOwned>(&self, script: &str) -> Result<T> {
        self.page()?
            .evaluate(script)
            .await
            .context("Script evaluation failed")?
            .into_value()
            .context("Unexpected script result")
    }
}

/// Poll `document.readyState` until `wait_until` is reached
async fn wait_for_ready_state(page: &Page, wait_until: WaitUntil) -> Result<()> {
    let poll_interval = Duration::from_millis(READY_STATE_POLL_MS);
    loop {
        match page.evaluate(READY_STATE_SCRIPT).await {
            Ok(result) => {
                if let Ok(state) = result.into_value::<String>() {
                    if wait_until.is_reached(&state) {
                        return Ok(());
                    }
                    trace!("readyState is {state}, waiting for {wait_until}");
                }
            }
            // The execution context is replaced mid-navigation; try again
            Err(e) => trace!("readyState check failed: {e}"),
        }
        tokio::time::sleep(poll_interval).await;
    }
}

impl BrowserSession for ChromeSession {
    async fn navigate(&mut self, url: &str, wait_until: WaitUntil, timeout: Duration) -> Result<()> {
        let page = self.page()?;
        with_page_timeout(
            async {
                let response = page
                    .execute(NavigateParams::new(url))
                    .await
                    .context("Page.navigate failed")?;
                if let Some(error_text) = response.result.error_text.as_deref() {
                    bail!("{error_text}");
                }
                wait_for_ready_state(page, wait_until).await
            },
            timeout,
            &format!("Navigation ({wait_until})"),
        )
        .await
    }

    async fn title(&mut self) -> Result<String> {
        Ok(self
            .page()?
            .get_title()
            .await
            .context("Failed to read page title")?
            .unwrap_or_default())
    }

    async fn body_text(&mut self) -> Result<String> {
        self.evaluate(BODY_TEXT_SCRIPT).await
    }

    async fn query_link(&mut self, selector: &str) -> Result<Option<String>> {
        self.evaluate(&closest_link_script(selector)).await
    }

    async fn query_texts(&mut self, selector: &str) -> Result<Vec<String>> {
        self.evaluate(&texts_script(selector)).await
    }

    async fn close(&mut self) -> Result<()> {
        let mut errors = Vec::new();

        if let Some(page) = self.page.take()
            && let Err(e) = page.close().await
        {
            errors.push(format!("page close failed: {e}"));
        }

        if let Some(context_id) = self.context_id.take()
            && let Err(e) = self
                .browser
                .execute(DisposeBrowserContextParams::new(context_id))
                .await
        {
            errors.push(format!("context dispose failed: {e}"));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            bail!(errors.join("; "))
        }
    }
}

impl Drop for ChromeSession {
    fn drop(&mut self) {
        if self.page.is_none() && self.context_id.is_none() {
            return;
        }

        // Reached only when a task unwinds before close(); release in the background
        let page = self.page.take();
        let context_id = self.context_id.take();
        let browser = Arc::clone(&self.browser);
        if let Ok(handle) = tokio::runtime::Handle::try_current() {
            handle.spawn(async move {
                if let Some(page) = page
                    && let Err(e) = page.close().await
                {
                    warn!("Failed to close page of dropped session: {e}");
                }
                if let Some(context_id) = context_id
                    && let Err(e) = browser
                        .execute(DisposeBrowserContextParams::new(context_id))
                        .await
                {
                    warn!("Failed to dispose context of dropped session: {e}");
                }
            });
        }
    }
}
