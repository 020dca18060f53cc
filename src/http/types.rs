//! HTTP API Request/Response Types

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

use crate::errors::{ErrorKind, PageTextError};
use crate::history::HistoryEntry;

/// Body of `POST /extract` and `POST /remember`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UrlRequest {
    #[serde(default)]
    pub url: Option<String>,
}

/// Extracted single page
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageResponse {
    pub title: String,
    pub content: String,
}

/// Extracted latest article
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArticleResponse {
    pub url: String,
    pub title: String,
    pub content: String,
}

/// Informational 200 response (skips, confirmations)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            url: None,
        }
    }

    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }
}

/// Remembered URLs listing
#[derive(Debug, Clone, Serialize)]
pub struct HistoryResponse {
    pub capacity: usize,
    pub urls: Vec<HistoryEntry>,
}

/// Error response body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub kind: String,
}

impl ErrorResponse {
    pub fn new(kind: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            kind: kind.into(),
        }
    }
}

/// Status code for each error kind
#[must_use]
pub fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::Validation => StatusCode::BAD_REQUEST,
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::Upstream | ErrorKind::Storage | ErrorKind::Config => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

fn kind_label(kind: ErrorKind) -> &'static str {
    match kind {
        ErrorKind::Validation => "validation",
        ErrorKind::NotFound => "not_found",
        ErrorKind::Upstream => "upstream",
        ErrorKind::Storage => "storage",
        ErrorKind::Config => "config",
    }
}

/// Handler error wrapper mapping `PageTextError` onto a JSON response
#[derive(Debug)]
pub struct ApiError(pub PageTextError);

impl From<PageTextError> for ApiError {
    fn from(err: PageTextError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let kind = self.0.kind();
        let status = status_for(kind);
        if status.is_server_error() {
            error!("Request failed: {}", self.0);
        } else {
            warn!("Request rejected: {}", self.0);
        }
        (status, Json(ErrorResponse::new(kind_label(kind), self.0.to_string()))).into_response()
    }
}
