// src/error.rs
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::{message::ErrorResponse, services::model_backend::BackendError};

#[derive(Debug, Error)]
pub enum AppError {
    #[error("model backend failed: {0}")]
    Backend(#[from] BackendError),

    #[error("model worker failed: {0}")]
    Worker(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self, "generate request failed");
        let body = ErrorResponse {
            error: self.to_string(),
        };
        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}
