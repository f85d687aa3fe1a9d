//! Deployment webhook.
//!
//! There is no caller authentication: anyone who can reach the endpoint can
//! trigger a deployment. The request body is ignored.

use axum::{extract::State, http::StatusCode, Json};
use tracing::instrument;

use crate::error::AppError;
use crate::response::StatusBody;
use crate::state::AppState;

pub const STARTED_MESSAGE: &str = "Deployment script started";

/// Launch the deployment script and answer 202 without waiting for it.
#[instrument(name = "webhook::trigger", skip(state))]
pub async fn trigger(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<StatusBody>), AppError> {
    state.launcher.launch()?;
    Ok((StatusCode::ACCEPTED, Json(StatusBody::success(STARTED_MESSAGE))))
}
