//! Single-page extraction workflow
//!
//! `Idle → SessionAcquired → Navigated → Stabilized → ContentRead →
//! Released`. Whatever happens after the session is acquired, the session
//! is closed exactly once before the result is returned.

use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use super::navigation::{NavigationAttempt, navigate_with_fallback};
use super::types::{ContentReader, ExtractOptions, ExtractionResult, ExtractionState};
use crate::engine::{BrowserEngine, BrowserSession};
use crate::errors::{PageTextError, PageTextResult};
use crate::utils::constants::CHROME_USER_AGENT;

/// Runs the extraction workflow against a browser engine
pub struct Extractor<E> {
    engine: Arc<E>,
    user_agent: String,
}

impl<E> Clone for Extractor<E> {
    fn clone(&self) -> Self {
        Self {
            engine: Arc::clone(&self.engine),
            user_agent: self.user_agent.clone(),
        }
    }
}

impl<E: BrowserEngine> Extractor<E> {
    #[must_use]
    pub fn new(engine: Arc<E>) -> Self {
        Self {
            engine,
            user_agent: CHROME_USER_AGENT.to_string(),
        }
    }

    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    #[must_use]
    pub fn engine(&self) -> &Arc<E> {
        &self.engine
    }

    /// Extract title and text from `url`
    pub async fn extract(
        &self,
        url: &str,
        options: &ExtractOptions,
    ) -> PageTextResult<ExtractionResult> {
        let mut session = self.acquire(url).await?;
        let outcome = self.read_page(&mut session, url, options).await;
        self.release(session, url, outcome.is_ok()).await;

        if let Ok(result) = &outcome {
            info!(
                "Extracted {} characters from {url} (title: {:?})",
                result.content.len(),
                result.title
            );
        }
        outcome
    }

    /// Open a fresh isolated session
    pub(crate) async fn acquire(&self, url: &str) -> PageTextResult<E::Session> {
        let session = self
            .engine
            .new_session(&self.user_agent)
            .await
            .map_err(|e| PageTextError::Session(format!("{e:#}")))?;
        transition(url, ExtractionState::SessionAcquired);
        Ok(session)
    }

    /// Navigate with fallback, then wait out the settle delay
    pub(crate) async fn open(
        &self,
        session: &mut E::Session,
        url: &str,
        navigation_timeout: Duration,
        settle_delay: Duration,
    ) -> PageTextResult<NavigationAttempt> {
        let which = navigate_with_fallback(session, url, navigation_timeout).await?;
        transition(url, ExtractionState::Navigated(which));

        // Client-side rendering heuristic, not a readiness guarantee
        if !settle_delay.is_zero() {
            tokio::time::sleep(settle_delay).await;
        }
        transition(url, ExtractionState::Stabilized);

        Ok(which)
    }

    /// Close the session; a failing close is logged, never surfaced
    pub(crate) async fn release(&self, mut session: E::Session, url: &str, success: bool) {
        if let Err(e) = session.close().await {
            warn!("Failed to release browser session for {url}: {e:#}");
        }
        transition(url, ExtractionState::Released { success });
    }

    async fn read_page(
        &self,
        session: &mut E::Session,
        url: &str,
        options: &ExtractOptions,
    ) -> PageTextResult<ExtractionResult> {
        self.open(session, url, options.navigation_timeout, options.settle_delay)
            .await?;

        let title = session
            .title()
            .await
            .map_err(|e| PageTextError::extraction(url, format!("title: {e:#}")))?;

        let content = match &options.reader {
            ContentReader::BodyText => session
                .body_text()
                .await
                .map_err(|e| PageTextError::extraction(url, format!("body text: {e:#}")))?
                .trim()
                .to_string(),
            ContentReader::Paragraphs { selector } => {
                let paragraphs = session.query_texts(selector).await.map_err(|e| {
                    PageTextError::extraction(url, format!("paragraphs '{selector}': {e:#}"))
                })?;
                join_paragraphs(&paragraphs)
            }
        };
        transition(url, ExtractionState::ContentRead);

        Ok(ExtractionResult {
            source_url: url.to_string(),
            title: title.trim().to_string(),
            content,
        })
    }
}

/// Join non-empty trimmed paragraphs with a blank line between them
#[must_use]
pub fn join_paragraphs(paragraphs: &[String]) -> String {
    paragraphs
        .iter()
        .map(|p| p.trim())
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn transition(url: &str, state: ExtractionState) {
    debug!("Extraction of {url} -> {state:?}");
}
