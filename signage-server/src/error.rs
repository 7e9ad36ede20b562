//! Error types for signage-server
//!
//! API routes report every failure the same way: status 500 with a
//! `{"error": "<message>"}` body. Clients tell failures apart by message.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::ingest::{IngestError, ValidationError};

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Submission rejected by the ingestion rules
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Store, configuration or I/O failure
    #[error(transparent)]
    Store(#[from] signage_common::Error),

    /// No asset with the given id
    #[error("Asset not found: {0}")]
    NotFound(String),

    /// Request body could not be read
    #[error("Invalid request: {0}")]
    BadRequest(String),
}

impl ApiError {
    /// Reason code for logging
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::Validation(e) => e.code(),
            ApiError::Store(_) => "store",
            ApiError::NotFound(_) => "not_found",
            ApiError::BadRequest(_) => "bad_request",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        tracing::warn!(code = self.code(), "API request failed: {}", self);

        let body = Json(json!({ "error": self.to_string() }));
        (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
    }
}

impl From<IngestError> for ApiError {
    fn from(err: IngestError) -> Self {
        match err {
            IngestError::Rejected(e) => ApiError::Validation(e),
            IngestError::Store(e) => ApiError::Store(e),
        }
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
