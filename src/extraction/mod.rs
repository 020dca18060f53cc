//! Page extraction workflow: acquire session, navigate with fallback,
//! stabilize, read, release.

pub mod navigation;
pub mod types;
pub mod workflow;

pub use navigation::{NavigationAttempt, attempt, navigate_with_fallback};
pub use types::{ContentReader, ExtractOptions, ExtractionResult, ExtractionState};
pub use workflow::{Extractor, join_paragraphs};
