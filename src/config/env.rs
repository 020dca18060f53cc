//! Environment overrides for `ServiceConfig`

use std::path::PathBuf;
use std::str::FromStr;
use tracing::debug;

use super::types::ServiceConfig;
use crate::errors::{PageTextError, PageTextResult};

pub const ENV_PORT: &str = "PORT";
pub const ENV_BIND_ADDR: &str = "BIND_ADDR";
pub const ENV_HISTORY_CAPACITY: &str = "HISTORY_CAPACITY";
pub const ENV_HISTORY_DB_PATH: &str = "HISTORY_DB_PATH";
pub const ENV_NAVIGATION_TIMEOUT_MS: &str = "NAVIGATION_TIMEOUT_MS";
pub const ENV_PAGE_SETTLE_MS: &str = "PAGE_SETTLE_MS";
pub const ENV_ARTICLE_SETTLE_MS: &str = "ARTICLE_SETTLE_MS";
pub const ENV_HEADLESS: &str = "HEADLESS";
pub const ENV_CHROMIUM_PATH: &str = "CHROMIUM_PATH";

impl ServiceConfig {
    /// Defaults overridden by the process environment
    pub fn from_env() -> PageTextResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for each variable
    pub fn from_lookup<F>(lookup: F) -> PageTextResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        if let Some(v) = get(ENV_PORT) {
            config.port = parse(ENV_PORT, &v)?;
        }
        if let Some(v) = get(ENV_BIND_ADDR) {
            config.bind_addr = v;
        }
        if let Some(v) = get(ENV_HISTORY_CAPACITY) {
            config.history_capacity = parse(ENV_HISTORY_CAPACITY, &v)?;
        }
        if let Some(v) = get(ENV_HISTORY_DB_PATH) {
            config.history_db_path = PathBuf::from(v);
        }
        if let Some(v) = get(ENV_NAVIGATION_TIMEOUT_MS) {
            config.navigation_timeout_ms = parse(ENV_NAVIGATION_TIMEOUT_MS, &v)?;
        }
        if let Some(v) = get(ENV_PAGE_SETTLE_MS) {
            config.page_settle_ms = parse(ENV_PAGE_SETTLE_MS, &v)?;
        }
        if let Some(v) = get(ENV_ARTICLE_SETTLE_MS) {
            config.article_settle_ms = parse(ENV_ARTICLE_SETTLE_MS, &v)?;
        }
        if let Some(v) = get(ENV_HEADLESS) {
            config.headless = parse_bool(ENV_HEADLESS, &v)?;
        }
        if let Some(v) = get(ENV_CHROMIUM_PATH) {
            config.chromium_path = Some(PathBuf::from(v));
        }

        debug!("Resolved configuration: {config:?}");
        Ok(config)
    }
}

fn parse<T>(key: &str, value: &str) -> PageTextResult<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value
        .parse()
        .map_err(|e| PageTextError::Config(format!("{key}={value:?}: {e}")))
}

fn parse_bool(key: &str, value: &str) -> PageTextResult<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(PageTextError::Config(format!(
            "{key}={value:?}: expected true or false"
        ))),
    }
}
