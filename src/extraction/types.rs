//! Data structures for page extraction

use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::navigation::NavigationAttempt;
use crate::utils::constants::{DEFAULT_NAVIGATION_TIMEOUT_MS, DEFAULT_PAGE_SETTLE_MS};

/// Title and text of one extracted page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionResult {
    pub source_url: String,
    pub title: String,
    pub content: String,
}

/// What the "read" step pulls out of the page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentReader {
    /// Rendered visible text of the whole body
    BodyText,
    /// Texts of the elements matching `selector`, joined by blank lines
    Paragraphs { selector: String },
}

/// Per-call knobs of the extraction workflow
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// Bound on each navigation attempt (not on the whole workflow)
    pub navigation_timeout: Duration,
    /// Grace period between navigation and reading
    pub settle_delay: Duration,
    pub reader: ContentReader,
}

impl ExtractOptions {
    /// Generic single page: body text after a short settle
    #[must_use]
    pub fn page(navigation_timeout: Duration, settle_delay: Duration) -> Self {
        Self {
            navigation_timeout,
            settle_delay,
            reader: ContentReader::BodyText,
        }
    }

    /// Site article: paragraphs under `body_selector`
    #[must_use]
    pub fn article(
        navigation_timeout: Duration,
        settle_delay: Duration,
        body_selector: impl Into<String>,
    ) -> Self {
        Self {
            navigation_timeout,
            settle_delay,
            reader: ContentReader::Paragraphs {
                selector: body_selector.into(),
            },
        }
    }
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self::page(
            Duration::from_millis(DEFAULT_NAVIGATION_TIMEOUT_MS),
            Duration::from_millis(DEFAULT_PAGE_SETTLE_MS),
        )
    }
}

/// Workflow states, logged as the workflow moves through them
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionState {
    Idle,
    SessionAcquired,
    Navigated(NavigationAttempt),
    Stabilized,
    ContentRead,
    Released { success: bool },
}

impl ExtractionState {
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Released { .. })
    }
}
