use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::logic::ServiceError;

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: &str) -> Self {
        Self {
            error: message.to_string(),
        }
    }
}

/// Errors raised at the HTTP boundary.
///
/// Everything the client can fix maps to 400; store failures map to 500.
/// GET handlers translate `NotFound` to 404 themselves.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid ID")]
    InvalidId,

    #[error("Error decoding request")]
    Decode,

    #[error(transparent)]
    Service(#[from] ServiceError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidId | ApiError::Decode => StatusCode::BAD_REQUEST,
            ApiError::Service(err) if err.is_client_error() => StatusCode::BAD_REQUEST,
            ApiError::Service(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            log::error!("Request failed: {:#}", self);
        }

        (status, Json(ErrorResponse::new(&self.to_string()))).into_response()
    }
}
