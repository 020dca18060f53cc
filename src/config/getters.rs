//! Accessors and builder-style setters for `ServiceConfig`

use std::path::{Path, PathBuf};
use std::time::Duration;

use super::types::ServiceConfig;
use crate::errors::{PageTextError, PageTextResult};

impl ServiceConfig {
    #[must_use]
    pub fn port(&self) -> u16 {
        self.port
    }

    #[must_use]
    pub fn bind_addr(&self) -> &str {
        &self.bind_addr
    }

    /// `bind_addr:port`, ready for `TcpListener::bind`
    #[must_use]
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }

    #[must_use]
    pub fn history_capacity(&self) -> usize {
        self.history_capacity
    }

    #[must_use]
    pub fn history_db_path(&self) -> &Path {
        &self.history_db_path
    }

    #[must_use]
    pub fn navigation_timeout(&self) -> Duration {
        Duration::from_millis(self.navigation_timeout_ms)
    }

    #[must_use]
    pub fn page_settle(&self) -> Duration {
        Duration::from_millis(self.page_settle_ms)
    }

    #[must_use]
    pub fn article_settle(&self) -> Duration {
        Duration::from_millis(self.article_settle_ms)
    }

    #[must_use]
    pub fn headless(&self) -> bool {
        self.headless
    }

    #[must_use]
    pub fn chromium_path(&self) -> Option<&Path> {
        self.chromium_path.as_deref()
    }

    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    #[must_use]
    pub fn with_history_capacity(mut self, capacity: usize) -> Self {
        self.history_capacity = capacity;
        self
    }

    #[must_use]
    pub fn with_history_db_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.history_db_path = path.into();
        self
    }

    #[must_use]
    pub fn with_navigation_timeout(mut self, timeout: Duration) -> Self {
        self.navigation_timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Set both settle delays (tests use zero)
    #[must_use]
    pub fn with_settle_delays(mut self, page: Duration, article: Duration) -> Self {
        self.page_settle_ms = u64::try_from(page.as_millis()).unwrap_or(u64::MAX);
        self.article_settle_ms = u64::try_from(article.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Reject values the service cannot run with
    pub fn validate(&self) -> PageTextResult<()> {
        if self.history_capacity == 0 {
            return Err(PageTextError::Config(
                "history capacity must be at least 1".to_string(),
            ));
        }
        if self.navigation_timeout_ms == 0 {
            return Err(PageTextError::Config(
                "navigation timeout must be greater than zero".to_string(),
            ));
        }
        if self.history_db_path.as_os_str().is_empty() {
            return Err(PageTextError::Config(
                "history database path must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
