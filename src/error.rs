use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::launcher::LaunchError;
use crate::response::StatusBody;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Launch(#[from] LaunchError),

    #[error("Not found")]
    NotFound,
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Launch(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::NotFound => StatusCode::NOT_FOUND,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        match &self {
            AppError::Launch(LaunchError::ScriptNotFound { .. }) => {
                tracing::error!(error = %self, "Deployment script missing");
            }
            AppError::Launch(e) => {
                tracing::error!(error = %e, "Failed to launch deployment script");
            }
            AppError::NotFound => {
                tracing::debug!("No route matched");
            }
        }

        (status, Json(StatusBody::error(self.to_string()))).into_response()
    }
}
