//! HTTP route handlers.
//!
//! Every response carries `Cache-Control: no-store`. Handler and 404 bodies
//! are JSON; the 405 for a wrong method on `/webhook` is axum's empty-bodied
//! default with an `Allow` header. Request tracing is enabled via middleware
//! that generates a unique request ID for each incoming request.

pub mod health;
pub mod webhook;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use http::header::{HeaderValue, CACHE_CONTROL};
use tower_http::set_header::SetResponseHeaderLayer;

use crate::config::CACHE_CONTROL_NO_STORE;
use crate::error::AppError;
use crate::middleware::request_id_layer;
use crate::state::AppState;

async fn not_found() -> AppError {
    AppError::NotFound
}

/// Creates the Axum router with all routes.
///
/// Methods other than POST on `/webhook` get axum's 405 with an `Allow` header.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/webhook", post(webhook::trigger))
        .fallback(not_found)
        .with_state(state)
        .layer(SetResponseHeaderLayer::overriding(
            CACHE_CONTROL,
            HeaderValue::from_static(CACHE_CONTROL_NO_STORE),
        ))
        // Request ID middleware - creates root span with request_id for correlation
        .layer(middleware::from_fn(request_id_layer))
}
