//! Shared API types and error mapping
//!
//! The error bodies on this surface are externally fixed: callers match on
//! the exact `{"error": ...}` strings, so the mapping here never carries
//! extra fields.

use axum::{http::StatusCode, response::Json};
use flight_core::{LookupError, NormalizedFlightInfo};
use serde::{Deserialize, Serialize};
use tracing::error;

/// Query parameters for the flight info endpoint
#[derive(Debug, Deserialize)]
pub struct FlightInfoQuery {
    /// Flight number to look up (e.g., "DL400")
    pub flight_number: Option<String>,
}

/// Successful lookup response
#[derive(Debug, Serialize)]
pub struct FlightInfoResponse {
    /// The spelling that produced data (may be the respelled form)
    pub flight_number: String,
    pub flight_info: NormalizedFlightInfo,
}

/// Error response structure
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Result type for API handlers
pub type ApiResult<T> = Result<Json<T>, ApiError>;

/// API error types
#[derive(Debug)]
pub enum ApiError {
    MissingFlightNumber,
    NotFound,
    Internal(String),
}

impl From<LookupError> for ApiError {
    fn from(err: LookupError) -> Self {
        match err {
            LookupError::NotFound => ApiError::NotFound,
            // Attempt-level errors are recovered inside the pipeline; one
            // escaping is an internal fault, not a caller-visible condition
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl axum::response::IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            ApiError::MissingFlightNumber => (
                StatusCode::BAD_REQUEST,
                "Flight number is required".to_string(),
            ),
            ApiError::NotFound => (
                StatusCode::NOT_FOUND,
                "Flight information not found or could not be processed.".to_string(),
            ),
            ApiError::Internal(detail) => {
                error!("Internal error during lookup: {}", detail);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}
