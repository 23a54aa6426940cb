//! Error handling utilities for route handlers

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// Error returned by route handlers.
///
/// Authentication failures render as bare status codes; everything else renders the
/// `{ "success": false, ... }` envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// No bearer token on a protected route
    Unauthenticated,
    /// Bearer token present but failed verification
    Forbidden,
    /// Login attempt with credentials that do not match the admin identity
    InvalidCredentials,
    BadRequest(String),
    NotFound(String),
    /// Downstream (database or blob store) failure, carrying the underlying message
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Unauthenticated | ApiError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match self {
            ApiError::Unauthenticated | ApiError::Forbidden => status.into_response(),
            ApiError::InvalidCredentials => (
                status,
                Json(json!({ "success": false, "message": "Invalid credentials" })),
            )
                .into_response(),
            ApiError::BadRequest(error) | ApiError::NotFound(error) | ApiError::Internal(error) => {
                (status, Json(json!({ "success": false, "error": error }))).into_response()
            }
        }
    }
}

/// Extension trait for logging errors and converting to ApiError
pub trait LogErr<T> {
    /// Log error with context and return a 500 carrying the error message
    fn log_500(self, context: &str) -> Result<T, ApiError>;

    /// Log error with context and return a 400 carrying the error message
    fn log_400(self, context: &str) -> Result<T, ApiError>;
}

impl<T, E: std::fmt::Display> LogErr<T> for Result<T, E> {
    fn log_500(self, context: &str) -> Result<T, ApiError> {
        self.map_err(|e| {
            tracing::error!(error = %e, "{}", context);
            ApiError::Internal(e.to_string())
        })
    }

    fn log_400(self, context: &str) -> Result<T, ApiError> {
        self.map_err(|e| {
            tracing::warn!(error = %e, "{}", context);
            ApiError::BadRequest(e.to_string())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn auth_failures_have_no_body() {
        for (err, status) in [
            (ApiError::Unauthenticated, StatusCode::UNAUTHORIZED),
            (ApiError::Forbidden, StatusCode::FORBIDDEN),
        ] {
            let response = err.into_response();
            assert_eq!(response.status(), status);
            let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
                .await
                .unwrap();
            assert!(bytes.is_empty());
        }
    }

    #[tokio::test]
    async fn internal_errors_carry_the_message() {
        let result: Result<(), &str> = Err("connection refused");
        let err = result.log_500("Create lead error").unwrap_err();
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_json(response).await,
            json!({ "success": false, "error": "connection refused" })
        );
    }

    #[tokio::test]
    async fn invalid_credentials_uses_message_field() {
        let response = ApiError::InvalidCredentials.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            body_json(response).await,
            json!({ "success": false, "message": "Invalid credentials" })
        );
    }
}
