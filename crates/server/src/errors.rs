use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use service::errors::{FieldErrors, ServiceError};
use thiserror::Error;
use tracing::{error, warn};

use crate::response::Envelope;

pub const NOT_FOUND_MESSAGE: &str = "Recipe not found";
pub const VALIDATION_MESSAGE: &str = "Validation failed";

/// Handler error rendered as an error envelope.
#[derive(Debug, Error)]
#[error("{status}: {message}")]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
    pub errors: Option<FieldErrors>,
    pub detail: Option<String>,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self { status, message: message.into(), errors: None, detail: None }
    }

    pub fn not_found() -> Self { Self::new(StatusCode::NOT_FOUND, NOT_FOUND_MESSAGE) }

    pub fn bad_request(message: impl Into<String>, detail: impl Into<String>) -> Self {
        Self { detail: Some(detail.into()), ..Self::new(StatusCode::BAD_REQUEST, message) }
    }

    pub fn validation(errors: FieldErrors) -> Self {
        Self { errors: Some(errors), ..Self::new(StatusCode::BAD_REQUEST, VALIDATION_MESSAGE) }
    }

    /// Map a service failure; `failure` is the operation message used for conflicts and 5xx
    /// (e.g. "Failed to create recipe").
    pub fn from_service(e: ServiceError, failure: &str) -> Self {
        match e {
            ServiceError::Validation(errors) => Self::validation(errors),
            ServiceError::NotFound(_) => Self::not_found(),
            ServiceError::Conflict(msg) => Self { detail: Some(msg), ..Self::new(StatusCode::CONFLICT, failure) },
            ServiceError::Db(msg) => {
                Self { detail: Some(msg), ..Self::new(StatusCode::INTERNAL_SERVER_ERROR, failure) }
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            error!(status = %self.status, message = %self.message, detail = ?self.detail, "request failed");
        } else if self.status == StatusCode::CONFLICT {
            warn!(message = %self.message, detail = ?self.detail, "request conflicted");
        }
        let body = Envelope::error(self.message, self.errors, self.detail);
        (self.status, Json(body)).into_response()
    }
}
