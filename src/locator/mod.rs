//! Latest-article locator
//!
//! Resolves the newest article URL from a site's listing page. A missing
//! element is the expected result of markup drift, so it is reported as
//! [`Located::NotFound`] rather than as an error.

pub mod profile;

pub use profile::{SiteProfile, SiteRegistry, StaticSiteProfile, WORLD_NUCLEAR_NEWS};

use std::time::Duration;
use tracing::{info, warn};

use crate::engine::{BrowserEngine, BrowserSession};
use crate::errors::{PageTextError, PageTextResult};
use crate::extraction::Extractor;
use crate::utils::resolve_href;

/// Outcome of looking for the newest article
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Located {
    Found(String),
    NotFound,
}

/// Find the newest article URL on `site`'s listing page.
///
/// Uses its own session, released before returning on every path.
pub async fn locate_latest<E: BrowserEngine>(
    extractor: &Extractor<E>,
    site: &dyn SiteProfile,
    navigation_timeout: Duration,
    settle_delay: Duration,
) -> PageTextResult<Located> {
    let home = site.home_url();
    let mut session = extractor.acquire(home).await?;
    let outcome = find_link(extractor, &mut session, site, navigation_timeout, settle_delay).await;
    extractor.release(session, home, outcome.is_ok()).await;

    match &outcome {
        Ok(Located::Found(url)) => info!("Latest article on {}: {url}", site.name()),
        Ok(Located::NotFound) => warn!(
            "No element matching '{}' on {home}",
            site.listing_selector()
        ),
        Err(_) => {}
    }
    outcome
}

async fn find_link<E: BrowserEngine>(
    extractor: &Extractor<E>,
    session: &mut E::Session,
    site: &dyn SiteProfile,
    navigation_timeout: Duration,
    settle_delay: Duration,
) -> PageTextResult<Located> {
    let home = site.home_url();
    extractor
        .open(session, home, navigation_timeout, settle_delay)
        .await?;

    let href = session
        .query_link(site.listing_selector())
        .await
        .map_err(|e| PageTextError::extraction(home, format!("listing link: {e:#}")))?;

    Ok(match href.and_then(|h| resolve_href(home, &h)) {
        Some(url) => Located::Found(url),
        None => Located::NotFound,
    })
}
