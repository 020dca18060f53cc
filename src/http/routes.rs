//! HTTP API Route Definitions

use axum::Router;
use axum::routing::{get, post};
use std::sync::Arc;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use super::handlers::{self, AppState};
use crate::engine::BrowserEngine;
use crate::service::PageTextService;

/// Create the router with all routes
///
/// A panicking handler becomes a 500 for that request only; the server
/// keeps serving.
pub fn create_router<E: BrowserEngine + 'static>(service: Arc<PageTextService<E>>) -> Router {
    let state = AppState { service };

    Router::new()
        .route("/health", get(handlers::health::<E>))
        .route("/extract", post(handlers::extract::<E>))
        .route("/scrape-latest-one", get(handlers::scrape_latest_default::<E>))
        .route("/scrape-latest/:site", get(handlers::scrape_latest_site::<E>))
        .route("/remember", post(handlers::remember::<E>))
        .route("/history", get(handlers::history::<E>))
        .with_state(state)
        .layer(CatchPanicLayer::new())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
}
