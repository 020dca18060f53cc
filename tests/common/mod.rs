//! Test utilities: a scripted in-memory browser engine
//!
//! Pages are registered per URL with their title, body, listing link and
//! paragraphs, plus switches that make individual steps fail. Every session
//! writes what happened into a shared `EngineLog` so tests can assert on
//! navigations and close calls.

#![allow(dead_code)]

use anyhow::{Result, anyhow};
use kodegen_tools_pagetext::{
    BrowserEngine, BrowserSession, HistoryStore, PageTextService, ServiceConfig, WaitUntil,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tempfile::TempDir;

/// Scripted behaviour of one URL
#[derive(Debug, Clone, Default)]
pub struct FakePage {
    pub title: String,
    pub body: String,
    pub link: Option<String>,
    pub paragraphs: Vec<String>,
    pub fail_dom_content_loaded: bool,
    pub fail_load: bool,
    pub fail_read: bool,
}

impl FakePage {
    pub fn new(title: &str, body: &str) -> Self {
        Self {
            title: title.to_string(),
            body: body.to_string(),
            ..Self::default()
        }
    }

    pub fn listing(link: Option<&str>) -> Self {
        Self {
            title: "Listing".to_string(),
            link: link.map(str::to_string),
            ..Self::default()
        }
    }

    pub fn article(title: &str, paragraphs: &[&str]) -> Self {
        Self {
            title: title.to_string(),
            paragraphs: paragraphs.iter().map(|p| p.to_string()).collect(),
            ..Self::default()
        }
    }

    pub fn failing_dom_content_loaded(mut self) -> Self {
        self.fail_dom_content_loaded = true;
        self
    }

    pub fn failing_load(mut self) -> Self {
        self.fail_load = true;
        self
    }

    pub fn failing_read(mut self) -> Self {
        self.fail_read = true;
        self
    }
}

/// Everything the fake engine observed
#[derive(Debug, Default)]
pub struct EngineLog {
    pub sessions_opened: usize,
    pub closes: usize,
    pub navigations: Vec<(String, WaitUntil)>,
    pub user_agents: Vec<String>,
    pub link_selectors: Vec<String>,
    pub text_selectors: Vec<String>,
}

impl EngineLog {
    pub fn navigated_urls(&self) -> Vec<&str> {
        self.navigations.iter().map(|(url, _)| url.as_str()).collect()
    }
}

#[derive(Default)]
pub struct FakeEngine {
    pages: Arc<HashMap<String, FakePage>>,
    log: Arc<Mutex<EngineLog>>,
    fail_sessions: bool,
}

impl FakeEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, url: &str, page: FakePage) -> Self {
        Arc::make_mut(&mut self.pages).insert(url.to_string(), page);
        self
    }

    pub fn failing_sessions(mut self) -> Self {
        self.fail_sessions = true;
        self
    }

    pub fn log(&self) -> MutexGuard<'_, EngineLog> {
        self.log.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl BrowserEngine for FakeEngine {
    type Session = FakeSession;

    async fn new_session(&self, user_agent: &str) -> Result<FakeSession> {
        if self.fail_sessions {
            return Err(anyhow!("browser failed to launch"));
        }
        let mut log = self.log();
        log.sessions_opened += 1;
        log.user_agents.push(user_agent.to_string());
        Ok(FakeSession {
            pages: Arc::clone(&self.pages),
            log: Arc::clone(&self.log),
            current: None,
        })
    }
}

pub struct FakeSession {
    pages: Arc<HashMap<String, FakePage>>,
    log: Arc<Mutex<EngineLog>>,
    current: Option<FakePage>,
}

impl FakeSession {
    fn record(&self, f: impl FnOnce(&mut EngineLog)) {
        f(&mut self.log.lock().unwrap_or_else(|poisoned| poisoned.into_inner()));
    }

    fn page(&self) -> Result<&FakePage> {
        let page = self
            .current
            .as_ref()
            .ok_or_else(|| anyhow!("no document loaded"))?;
        if page.fail_read {
            return Err(anyhow!("Execution context was destroyed"));
        }
        Ok(page)
    }
}

impl BrowserSession for FakeSession {
    async fn navigate(&mut self, url: &str, wait_until: WaitUntil, _timeout: Duration) -> Result<()> {
        self.record(|log| log.navigations.push((url.to_string(), wait_until)));

        let page = self
            .pages
            .get(url)
            .ok_or_else(|| anyhow!("net::ERR_NAME_NOT_RESOLVED"))?;

        let fails = match wait_until {
            WaitUntil::DomContentLoaded => page.fail_dom_content_loaded,
            WaitUntil::Load => page.fail_load,
        };
        if fails {
            return Err(anyhow!("Navigation ({wait_until}) timeout after 60000 ms"));
        }

        self.current = Some(page.clone());
        Ok(())
    }

    async fn title(&mut self) -> Result<String> {
        Ok(self.page()?.title.clone())
    }

    async fn body_text(&mut self) -> Result<String> {
        Ok(self.page()?.body.clone())
    }

    async fn query_link(&mut self, selector: &str) -> Result<Option<String>> {
        self.record(|log| log.link_selectors.push(selector.to_string()));
        Ok(self.page()?.link.clone())
    }

    async fn query_texts(&mut self, selector: &str) -> Result<Vec<String>> {
        self.record(|log| log.text_selectors.push(selector.to_string()));
        Ok(self.page()?.paragraphs.clone())
    }

    async fn close(&mut self) -> Result<()> {
        self.record(|log| log.closes += 1);
        Ok(())
    }
}

/// Configuration without settle delays
pub fn fast_config() -> ServiceConfig {
    ServiceConfig::default().with_settle_delays(Duration::ZERO, Duration::ZERO)
}

/// Open a history store inside `dir`
pub async fn open_history(dir: &TempDir, capacity: usize) -> Result<HistoryStore> {
    Ok(HistoryStore::open(&dir.path().join("history.sqlite"), capacity).await?)
}

/// Service over `engine` with a fresh history in `dir`
pub async fn service_with(
    dir: &TempDir,
    engine: Arc<FakeEngine>,
) -> Result<PageTextService<FakeEngine>> {
    let history = open_history(dir, 20).await?;
    Ok(PageTextService::with_engine(history, engine, fast_config()))
}
