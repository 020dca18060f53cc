//! Two-attempt navigation
//!
//! Attempt 1 waits for `DOMContentLoaded`. If it fails for any reason
//! (timeout or network error) attempt 2 loads the same URL again and waits
//! for the full `load` event. Only when both fail is the navigation an
//! error. This is the one failure the workflow deliberately absorbs.

use anyhow::Result;
use std::time::Duration;
use tracing::{debug, warn};

use crate::engine::{BrowserSession, WaitUntil};
use crate::errors::{PageTextError, PageTextResult};

/// Which branch of the navigation succeeded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationAttempt {
    Primary,
    Fallback,
}

impl NavigationAttempt {
    #[must_use]
    pub fn wait_until(self) -> WaitUntil {
        match self {
            Self::Primary => WaitUntil::DomContentLoaded,
            Self::Fallback => WaitUntil::Load,
        }
    }
}

/// Run a single navigation branch
pub async fn attempt<S: BrowserSession>(
    session: &mut S,
    url: &str,
    which: NavigationAttempt,
    timeout: Duration,
) -> Result<()> {
    debug!("Navigating to {url} ({which:?}, waiting for {})", which.wait_until());
    session.navigate(url, which.wait_until(), timeout).await
}

/// Navigate with the primary strategy, falling back once to the stricter one
pub async fn navigate_with_fallback<S: BrowserSession>(
    session: &mut S,
    url: &str,
    timeout: Duration,
) -> PageTextResult<NavigationAttempt> {
    let primary = match attempt(session, url, NavigationAttempt::Primary, timeout).await {
        Ok(()) => return Ok(NavigationAttempt::Primary),
        Err(e) => e,
    };

    warn!("{} failed for {url}: {primary:#}, retrying with load", WaitUntil::DomContentLoaded);

    match attempt(session, url, NavigationAttempt::Fallback, timeout).await {
        Ok(()) => Ok(NavigationAttempt::Fallback),
        Err(fallback) => Err(PageTextError::Navigation {
            url: url.to_string(),
            primary: format!("{primary:#}"),
            fallback: format!("{fallback:#}"),
        }),
    }
}
