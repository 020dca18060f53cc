//! Core configuration type for the page text service

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::utils::constants::{
    DEFAULT_ARTICLE_SETTLE_MS, DEFAULT_BIND_ADDR, DEFAULT_HISTORY_CAPACITY,
    DEFAULT_HISTORY_DB_PATH, DEFAULT_NAVIGATION_TIMEOUT_MS, DEFAULT_PAGE_SETTLE_MS, DEFAULT_PORT,
};

/// Process-wide configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub(crate) port: u16,
    pub(crate) bind_addr: String,
    pub(crate) history_capacity: usize,
    pub(crate) history_db_path: PathBuf,

    /// Timeout in milliseconds for each navigation attempt
    ///
    /// Applied separately to the `DOMContentLoaded` attempt and to the
    /// `load` fallback.
    ///
    /// Default: 60000
    pub(crate) navigation_timeout_ms: u64,

    /// Grace period after navigating a single page
    ///
    /// Default: 1000
    pub(crate) page_settle_ms: u64,

    /// Grace period for listing and article pages
    ///
    /// Default: 3000
    pub(crate) article_settle_ms: u64,

    pub(crate) headless: bool,

    /// Chrome/Chromium binary; auto-detected (or downloaded) when unset
    pub(crate) chromium_path: Option<PathBuf>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            history_db_path: PathBuf::from(DEFAULT_HISTORY_DB_PATH),
            navigation_timeout_ms: DEFAULT_NAVIGATION_TIMEOUT_MS,
            page_settle_ms: DEFAULT_PAGE_SETTLE_MS,
            article_settle_ms: DEFAULT_ARTICLE_SETTLE_MS,
            headless: true,
            chromium_path: None,
        }
    }
}
