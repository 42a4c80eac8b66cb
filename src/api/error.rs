//! API Error Types
//!
//! Defines error types for the API layer and implements conversion
//! to HTTP responses carrying the `{ success: false, error }` envelope.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::api::dto::BaseResponse;
use crate::dictionary::DictionaryError;

/// API error types
#[derive(Error, Debug)]
pub enum ApiError {
    /// Page dictionary could not be generated
    #[error("Dictionary error: {0}")]
    Dictionary(#[from] DictionaryError),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Dictionary(_) | ApiError::Internal(_) | ApiError::Io(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let request_id = uuid::Uuid::new_v4().to_string();

        tracing::error!(
            request_id = %request_id,
            status = %status,
            error_message = %self,
            "API error occurred"
        );

        (status, Json(BaseResponse::failure(self.to_string()))).into_response()
    }
}

/// Result type for API operations
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ApiError::Internal("x".into()).into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
