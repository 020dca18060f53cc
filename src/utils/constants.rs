//! Shared configuration constants for pagetext
//!
//! Default values used by the config layer, the extraction workflow and the
//! built-in site profiles, kept in one place to avoid magic numbers.

/// Default number of URLs the history store keeps
pub const DEFAULT_HISTORY_CAPACITY: usize = 20;

/// Default per-navigation timeout: 60 seconds
///
/// Applies to each navigation attempt separately. There is no overall
/// workflow budget; callers that need one must impose it themselves.
pub const DEFAULT_NAVIGATION_TIMEOUT_MS: u64 = 60_000;

/// Grace period after navigating a single page before reading it
pub const DEFAULT_PAGE_SETTLE_MS: u64 = 1_000;

/// Grace period for listing and article pages, which render client-side
pub const DEFAULT_ARTICLE_SETTLE_MS: u64 = 3_000;

/// Default HTTP port
pub const DEFAULT_PORT: u16 = 3000;

/// Default bind address for the HTTP listener
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0";

/// Default location of the history database, relative to the working directory
pub const DEFAULT_HISTORY_DB_PATH: &str = "last.db";

/// Interval between `document.readyState` polls while waiting for a load signal
pub const READY_STATE_POLL_MS: u64 = 100;

/// Chrome user agent string for sessions
///
/// Real sites block the default headless signature, so every session
/// presents a desktop Chrome build instead.
///
/// Reference: https://chromiumdash.appspot.com/schedule
pub const CHROME_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/132.0.6834.160 Safari/537.36";
