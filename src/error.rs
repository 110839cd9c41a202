// SPDX-License-Identifier: MIT

//! Application error types with consistent API responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Application error type that converts to HTTP responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Unknown prayer identifier. A well-formed client never sends one,
    /// so this is logged as a programmer error.
    #[error("Unknown prayer slot: {0}")]
    InvalidSlot(String),

    /// Transport-level store failure. Transient; the caller may retry the
    /// same toggle.
    #[error("Record store unavailable: {0}")]
    StoreUnavailable(String),

    /// Uniqueness conflict on the (user, date) key. Should not occur under
    /// upsert-by-key semantics.
    #[error("Record constraint violation: {0}")]
    ConstraintViolation(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// JSON error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, details) = match &self {
            AppError::InvalidSlot(slot) => {
                tracing::error!(slot = %slot, "Unknown prayer slot from client");
                (StatusCode::BAD_REQUEST, "invalid_slot", Some(slot.clone()))
            }
            AppError::StoreUnavailable(msg) => {
                tracing::error!(error = %msg, "Record store unavailable");
                (StatusCode::SERVICE_UNAVAILABLE, "store_unavailable", None)
            }
            // User-visible behavior matches a store failure; the conflict
            // itself is logged since it indicates a keying bug.
            AppError::ConstraintViolation(msg) => {
                tracing::error!(error = %msg, "Unexpected record constraint violation");
                (StatusCode::SERVICE_UNAVAILABLE, "store_unavailable", None)
            }
            AppError::Internal(err) => {
                tracing::error!(error = %err, "Internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", None)
            }
        };

        let body = ErrorResponse {
            error: error.to_string(),
            details,
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for handlers
pub type Result<T> = std::result::Result<T, AppError>;
