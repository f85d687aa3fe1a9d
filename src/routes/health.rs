//! Health check endpoint.
//!
//! A liveness probe that returns 200 OK whenever the process can answer HTTP.
//! It has no side effects and never fails.

use axum::{http::StatusCode, Json};

use crate::response::StatusBody;

/// Health check handler. Always `200 {"status":"ok"}`.
pub async fn health() -> (StatusCode, Json<StatusBody>) {
    (StatusCode::OK, Json(StatusBody::ok()))
}
