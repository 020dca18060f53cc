//! Environment-driven configuration

use anyhow::Result;
use kodegen_tools_pagetext::{ErrorKind, PageTextError, ServiceConfig};
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

fn from_pairs(pairs: &[(&str, &str)]) -> Result<ServiceConfig, PageTextError> {
    let vars: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    ServiceConfig::from_lookup(|key| vars.get(key).cloned())
}

#[test]
fn test_defaults_without_environment() -> Result<()> {
    let config = from_pairs(&[])?;
    assert_eq!(config, ServiceConfig::default());
    assert_eq!(config.port(), 3000);
    assert_eq!(config.listen_addr(), "0.0.0.0:3000");
    assert_eq!(config.history_capacity(), 20);
    assert_eq!(config.history_db_path(), Path::new("last.db"));
    assert_eq!(config.navigation_timeout(), Duration::from_secs(60));
    assert_eq!(config.page_settle(), Duration::from_secs(1));
    assert_eq!(config.article_settle(), Duration::from_secs(3));
    assert!(config.headless());
    assert!(config.chromium_path().is_none());
    config.validate()?;
    Ok(())
}

#[test]
fn test_environment_overrides() -> Result<()> {
    let config = from_pairs(&[
        ("PORT", " 8080 "),
        ("BIND_ADDR", "127.0.0.1"),
        ("HISTORY_CAPACITY", "50"),
        ("HISTORY_DB_PATH", "/var/lib/pagetext/history.db"),
        ("NAVIGATION_TIMEOUT_MS", "15000"),
        ("PAGE_SETTLE_MS", "0"),
        ("ARTICLE_SETTLE_MS", "500"),
        ("HEADLESS", "off"),
        ("CHROMIUM_PATH", "/usr/bin/chromium"),
    ])?;

    assert_eq!(config.listen_addr(), "127.0.0.1:8080");
    assert_eq!(config.history_capacity(), 50);
    assert_eq!(
        config.history_db_path(),
        Path::new("/var/lib/pagetext/history.db")
    );
    assert_eq!(config.navigation_timeout(), Duration::from_secs(15));
    assert_eq!(config.page_settle(), Duration::ZERO);
    assert_eq!(config.article_settle(), Duration::from_millis(500));
    assert!(!config.headless());
    assert_eq!(config.chromium_path(), Some(Path::new("/usr/bin/chromium")));
    Ok(())
}

#[test]
fn test_empty_values_fall_back_to_defaults() -> Result<()> {
    let config = from_pairs(&[("PORT", ""), ("HISTORY_CAPACITY", "   ")])?;
    assert_eq!(config.port(), 3000);
    assert_eq!(config.history_capacity(), 20);
    Ok(())
}

#[test]
fn test_malformed_values_are_config_errors() {
    for (key, value) in [
        ("PORT", "http"),
        ("PORT", "70000"),
        ("HISTORY_CAPACITY", "-1"),
        ("NAVIGATION_TIMEOUT_MS", "1.5"),
        ("HEADLESS", "maybe"),
    ] {
        let result = from_pairs(&[(key, value)]);
        assert!(
            matches!(&result, Err(err) if err.kind() == ErrorKind::Config),
            "{key}={value} gave {result:?}"
        );
    }
}

#[test]
fn test_validate_rejects_unusable_values() {
    assert!(
        ServiceConfig::default()
            .with_history_capacity(0)
            .validate()
            .is_err()
    );
    assert!(
        ServiceConfig::default()
            .with_navigation_timeout(Duration::ZERO)
            .validate()
            .is_err()
    );
    assert!(
        ServiceConfig::default()
            .with_history_db_path("")
            .validate()
            .is_err()
    );
    assert!(
        from_pairs(&[("HISTORY_CAPACITY", "0")])
            .and_then(|config| config.validate())
            .is_err()
    );
}
