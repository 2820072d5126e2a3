//! HTTP error type.
//!
//! Every handler returns `Result<_, ApiError>`. The response body is always
//! `{"error": "<message>"}`. Server-side failures are logged with their cause
//! and reported to the client with a generic message.

use crate::ai::AiError;
use crate::models::InvalidDocId;
use crate::store::StoreError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::error;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("invalid id")]
    InvalidId,
    #[error("{0}")]
    BadRequest(String),
    #[error("not found")]
    NotFound,
    #[error("Failed to generate AI response")]
    Ai(#[from] AiError),
    #[error("internal error")]
    Store(#[from] StoreError),
    #[error("internal error")]
    Internal(String),
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidId | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Ai(_) | ApiError::Store(_) | ApiError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<InvalidDocId> for ApiError {
    fn from(_: InvalidDocId) -> Self {
        ApiError::InvalidId
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::Ai(cause) => error!(error = %cause, "AI request failed"),
            ApiError::Store(cause) => error!(error = %cause, "store operation failed"),
            ApiError::Internal(cause) => error!(error = %cause, "internal error"),
            _ => {}
        }

        let message = self.to_string();
        (self.status(), Json(ErrorBody { error: &message })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_of(err: ApiError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_invalid_id_is_400() {
        let (status, body) = body_of(ApiError::InvalidId).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "invalid id");
    }

    #[tokio::test]
    async fn test_not_found_is_404() {
        let (status, body) = body_of(ApiError::NotFound).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "not found");
    }

    #[tokio::test]
    async fn test_ai_failure_hides_cause() {
        let err = ApiError::from(AiError::Status {
            status: 403,
            body: "API key leaked: sk-123".to_string(),
        });
        let (status, body) = body_of(err).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Failed to generate AI response");
    }

    #[tokio::test]
    async fn test_internal_failure_hides_cause() {
        let (status, body) = body_of(ApiError::Internal("disk on fire".to_string())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "internal error");
    }
}
