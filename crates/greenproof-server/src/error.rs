//! API errors and their HTTP rendering.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use greenproof::GreenProofError;
use serde_json::json;
use thiserror::Error;

/// An error rendered as an HTTP response with a `{"error": message}` body.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Service(#[from] GreenProofError),

    /// The request body could not be decoded.
    #[error("{}", .0.body_text())]
    Body(#[from] JsonRejection),

    /// The query string could not be decoded.
    #[error("{}", .0.body_text())]
    Query(#[from] QueryRejection),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Service(GreenProofError::Validation(_)) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Service(GreenProofError::NotFound(_)) => StatusCode::NOT_FOUND,
            ApiError::Service(GreenProofError::StorageUnavailable(_)) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            ApiError::Body(rejection) => rejection.status(),
            ApiError::Query(rejection) => rejection.status(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}
