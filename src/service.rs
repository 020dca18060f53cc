//! Request-level orchestration
//!
//! Each operation validates its input, short-circuits on URLs already in
//! the history, runs the extraction workflow (directly or through the
//! locator) and records the URL only once extraction succeeded.

use serde::Serialize;
use std::sync::Arc;
use tracing::info;

use crate::config::ServiceConfig;
use crate::engine::BrowserEngine;
use crate::errors::{PageTextError, PageTextResult};
use crate::extraction::{ExtractOptions, ExtractionResult, Extractor};
use crate::history::{HistoryEntry, HistoryStore};
use crate::locator::{Located, SiteProfile, SiteRegistry, locate_latest};
use crate::utils::parse_target_url;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
}

/// Result of `extract_page`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractOutcome {
    Extracted(ExtractionResult),
    AlreadySeen { url: String },
}

/// Result of `fetch_latest_known`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LatestOutcome {
    Extracted(ExtractionResult),
    AlreadySeen { url: String },
    NotFound { site: String, selector: String },
}

/// Result of `remember`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Remembered {
    pub url: String,
    pub was_new: bool,
}

/// History-aware page text service
pub struct PageTextService<E> {
    history: HistoryStore,
    extractor: Extractor<E>,
    sites: SiteRegistry,
    config: ServiceConfig,
}

impl<E: BrowserEngine> PageTextService<E> {
    pub fn new(
        history: HistoryStore,
        extractor: Extractor<E>,
        sites: SiteRegistry,
        config: ServiceConfig,
    ) -> Self {
        Self {
            history,
            extractor,
            sites,
            config,
        }
    }

    /// Convenience constructor over a shared engine
    pub fn with_engine(history: HistoryStore, engine: Arc<E>, config: ServiceConfig) -> Self {
        Self::new(
            history,
            Extractor::new(engine),
            SiteRegistry::with_defaults(),
            config,
        )
    }

    #[must_use]
    pub fn check_health(&self) -> HealthStatus {
        HealthStatus { status: "ok" }
    }

    /// Extract `url` unless it is already in the history
    pub async fn extract_page(&self, url: Option<&str>) -> PageTextResult<ExtractOutcome> {
        let url = parse_target_url(url)?;

        if self.history.contains(&url).await? {
            info!("URL already processed, skipping: {url}");
            return Ok(ExtractOutcome::AlreadySeen { url });
        }

        let options = ExtractOptions::page(self.config.navigation_timeout(), self.config.page_settle());
        let result = self.extractor.extract(&url, &options).await?;

        self.history.remember(&url).await?;
        info!("URL added to history: {url}");

        Ok(ExtractOutcome::Extracted(result))
    }

    /// Locate and extract the newest article of `site` (default site if `None`)
    pub async fn fetch_latest_known(&self, site: Option<&str>) -> PageTextResult<LatestOutcome> {
        let name = site.unwrap_or(self.sites.default_site());
        let profile = self
            .sites
            .get(name)
            .ok_or_else(|| PageTextError::NotFound(format!("unknown site profile '{name}'")))?;

        self.fetch_latest_for(profile.as_ref()).await
    }

    async fn fetch_latest_for(&self, site: &dyn SiteProfile) -> PageTextResult<LatestOutcome> {
        let settle = site.settle_delay().unwrap_or(self.config.article_settle());
        let timeout = self.config.navigation_timeout();

        let url = match locate_latest(&self.extractor, site, timeout, settle).await? {
            Located::Found(url) => url,
            Located::NotFound => {
                return Ok(LatestOutcome::NotFound {
                    site: site.name().to_string(),
                    selector: site.listing_selector().to_string(),
                });
            }
        };

        if self.history.contains(&url).await? {
            info!("Latest article already processed: {url}");
            return Ok(LatestOutcome::AlreadySeen { url });
        }

        let options = ExtractOptions::article(timeout, settle, site.article_body_selector());
        let result = self.extractor.extract(&url, &options).await?;

        self.history.remember(&url).await?;
        info!("Article added to history: {url}");

        Ok(LatestOutcome::Extracted(result))
    }

    /// Record `url` without fetching it
    pub async fn remember(&self, url: Option<&str>) -> PageTextResult<Remembered> {
        let url = url.map(str::trim).unwrap_or_default();
        if url.is_empty() {
            return Err(PageTextError::Validation("url is required".to_string()));
        }

        let was_new = self.history.remember(url).await?;
        if was_new {
            info!("URL remembered: {url}");
        } else {
            info!("URL already remembered: {url}");
        }

        Ok(Remembered {
            url: url.to_string(),
            was_new,
        })
    }

    /// Remembered URLs, newest first
    pub async fn recent(&self) -> PageTextResult<Vec<HistoryEntry>> {
        self.history.entries().await
    }

    #[must_use]
    pub fn history(&self) -> &HistoryStore {
        &self.history
    }

    #[must_use]
    pub fn sites(&self) -> &SiteRegistry {
        &self.sites
    }

    #[must_use]
    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }
}
