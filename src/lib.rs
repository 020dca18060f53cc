pub mod config;
pub mod engine;
pub mod errors;
pub mod extraction;
pub mod history;
pub mod http;
pub mod locator;
pub mod service;
pub mod utils;

pub use config::ServiceConfig;
pub use engine::{BrowserEngine, BrowserSession, ChromeEngine, ChromeEngineConfig, WaitUntil};
pub use errors::{ErrorKind, PageTextError, PageTextResult};
pub use extraction::{
    ContentReader, ExtractOptions, ExtractionResult, ExtractionState, Extractor, NavigationAttempt,
};
pub use history::{HistoryEntry, HistoryStore};
pub use http::{HttpServer, create_router};
pub use locator::{Located, SiteProfile, SiteRegistry, StaticSiteProfile, locate_latest};
pub use service::{ExtractOutcome, HealthStatus, LatestOutcome, PageTextService, Remembered};
