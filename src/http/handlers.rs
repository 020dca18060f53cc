//! HTTP API Request Handlers
//!
//! Thin mapping from requests onto `PageTextService` operations.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use std::sync::Arc;

use super::types::{
    ApiError, ArticleResponse, ErrorResponse, HistoryResponse, MessageResponse, PageResponse,
    UrlRequest,
};
use crate::engine::BrowserEngine;
use crate::service::{ExtractOutcome, LatestOutcome, PageTextService};

/// Shared application state
pub struct AppState<E> {
    pub service: Arc<PageTextService<E>>,
}

impl<E> Clone for AppState<E> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
        }
    }
}

fn body_url(body: Option<Json<UrlRequest>>) -> Option<String> {
    body.and_then(|Json(request)| request.url)
}

/// Health check endpoint
pub async fn health<E: BrowserEngine + 'static>(State(state): State<AppState<E>>) -> Response {
    Json(state.service.check_health()).into_response()
}

/// Extract title and text of the requested URL
pub async fn extract<E: BrowserEngine + 'static>(
    State(state): State<AppState<E>>,
    body: Option<Json<UrlRequest>>,
) -> Result<Response, ApiError> {
    let url = body_url(body);
    match state.service.extract_page(url.as_deref()).await? {
        ExtractOutcome::Extracted(result) => Ok(Json(PageResponse {
            title: result.title,
            content: result.content,
        })
        .into_response()),
        ExtractOutcome::AlreadySeen { .. } => {
            Ok(Json(MessageResponse::new("URL already processed, skipping")).into_response())
        }
    }
}

/// Newest article of the default site
pub async fn scrape_latest_default<E: BrowserEngine + 'static>(
    State(state): State<AppState<E>>,
) -> Result<Response, ApiError> {
    latest_response(state.service.fetch_latest_known(None).await?)
}

/// Newest article of a named site profile
pub async fn scrape_latest_site<E: BrowserEngine + 'static>(
    State(state): State<AppState<E>>,
    Path(site): Path<String>,
) -> Result<Response, ApiError> {
    latest_response(state.service.fetch_latest_known(Some(&site)).await?)
}

fn latest_response(outcome: LatestOutcome) -> Result<Response, ApiError> {
    Ok(match outcome {
        LatestOutcome::Extracted(result) => Json(ArticleResponse {
            url: result.source_url,
            title: result.title,
            content: result.content,
        })
        .into_response(),
        LatestOutcome::AlreadySeen { url } => {
            Json(MessageResponse::new("Latest article already processed").with_url(url))
                .into_response()
        }
        LatestOutcome::NotFound { site, selector } => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::new(
                "not_found",
                format!("No article link found on {site} (selector '{selector}')"),
            )),
        )
            .into_response(),
    })
}

/// Record a URL without fetching it
pub async fn remember<E: BrowserEngine + 'static>(
    State(state): State<AppState<E>>,
    body: Option<Json<UrlRequest>>,
) -> Result<Response, ApiError> {
    let url = body_url(body);
    let remembered = state.service.remember(url.as_deref()).await?;
    let message = if remembered.was_new {
        "URL saved"
    } else {
        "URL already saved"
    };
    Ok(Json(MessageResponse::new(message)).into_response())
}

/// Remembered URLs, newest first
pub async fn history<E: BrowserEngine + 'static>(
    State(state): State<AppState<E>>,
) -> Result<Response, ApiError> {
    let urls = state.service.recent().await?;
    Ok(Json(HistoryResponse {
        capacity: state.service.history().capacity(),
        urls,
    })
    .into_response())
}
