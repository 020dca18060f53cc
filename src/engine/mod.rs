//! Browser engine capability
//!
//! The extraction workflow only ever talks to these two traits: an engine
//! hands out isolated sessions, a session navigates and reads one page.
//! [`ChromeEngine`] is the production implementation on chromiumoxide;
//! tests drive the workflow through scripted fakes.

pub mod chrome;
pub mod launcher;
pub mod scripts;
pub mod timeout;

use anyhow::Result;
use std::future::Future;
use std::time::Duration;

pub use chrome::{ChromeEngine, ChromeEngineConfig, ChromeSession};
pub use timeout::with_page_timeout;

/// Load signal a navigation waits for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitUntil {
    /// `DOMContentLoaded`: document parsed, subresources may still load
    DomContentLoaded,
    /// `load`: document and all subresources finished loading
    Load,
}

impl WaitUntil {
    /// Whether a `document.readyState` value satisfies this signal
    #[must_use]
    pub fn is_reached(self, ready_state: &str) -> bool {
        match self {
            Self::DomContentLoaded => matches!(ready_state, "interactive" | "complete"),
            Self::Load => ready_state == "complete",
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::DomContentLoaded => "domcontentloaded",
            Self::Load => "load",
        }
    }
}

impl std::fmt::Display for WaitUntil {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One isolated browsing context (own cookies and storage) with one page.
///
/// A session belongs to exactly one request and is never shared.
/// `close` must be called once on every exit path.
pub trait BrowserSession: Send {
    /// Navigate to `url` and wait for `wait_until`, failing after `timeout`.
    fn navigate(
        &mut self,
        url: &str,
        wait_until: WaitUntil,
        timeout: Duration,
    ) -> impl Future<Output = Result<()>> + Send;

    /// Document title
    fn title(&mut self) -> impl Future<Output = Result<String>> + Send;

    /// Rendered visible text of the document body
    fn body_text(&mut self) -> impl Future<Output = Result<String>> + Send;

    /// Absolute `href` of the anchor enclosing the first element matching
    /// `selector`; `None` when the element or the anchor is absent.
    fn query_link(&mut self, selector: &str) -> impl Future<Output = Result<Option<String>>> + Send;

    /// Trimmed visible text of every element matching `selector`
    fn query_texts(&mut self, selector: &str) -> impl Future<Output = Result<Vec<String>>> + Send;

    /// Release the session and everything it holds
    fn close(&mut self) -> impl Future<Output = Result<()>> + Send;
}

/// Source of isolated browser sessions
pub trait BrowserEngine: Send + Sync {
    type Session: BrowserSession;

    /// Open a fresh, cookie-isolated session presenting `user_agent`
    fn new_session(&self, user_agent: &str) -> impl Future<Output = Result<Self::Session>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wait_until_ready_states() {
        assert!(!WaitUntil::DomContentLoaded.is_reached("loading"));
        assert!(WaitUntil::DomContentLoaded.is_reached("interactive"));
        assert!(WaitUntil::DomContentLoaded.is_reached("complete"));

        assert!(!WaitUntil::Load.is_reached("loading"));
        assert!(!WaitUntil::Load.is_reached("interactive"));
        assert!(WaitUntil::Load.is_reached("complete"));
    }
}
