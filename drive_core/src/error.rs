//! Application error types and handling

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Unsupported content type: {0}")]
    UnsupportedType(String),

    #[error("No organization or user identity could be resolved")]
    IdentityResolution,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Infrastructure error: {0}")]
    Infrastructure(String),
}

impl AppError {
    /// Stable machine-readable label, echoed in every error body.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::UnsupportedType(_) => "unsupported_type",
            AppError::IdentityResolution => "identity_resolution",
            AppError::NotFound(_) => "not_found",
            AppError::BadRequest(_) => "bad_request",
            AppError::Infrastructure(_) => "infrastructure",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::UnsupportedType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            AppError::IdentityResolution => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Infrastructure(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let code = self.code();

        let error_message = match &self {
            AppError::Infrastructure(msg) => {
                tracing::error!("Infrastructure error: {}", msg);
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };

        let body = Json(json!({
            "error": error_message,
            "code": code,
            "status": status.as_u16(),
        }));

        (status, body).into_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::Infrastructure(format!("database: {}", err))
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Infrastructure(format!("io: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            AppError::UnsupportedType("application/csv".to_string()).status(),
            StatusCode::UNSUPPORTED_MEDIA_TYPE
        );
        assert_eq!(AppError::IdentityResolution.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(AppError::NotFound("x".to_string()).status(), StatusCode::NOT_FOUND);
        assert_eq!(
            AppError::Infrastructure("disk".to_string()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_sqlx_errors_are_infrastructure() {
        let err: AppError = sqlx::Error::RowNotFound.into();
        assert_eq!(err.code(), "infrastructure");
    }

    #[tokio::test]
    async fn test_infrastructure_response_hides_details() {
        let response = AppError::Infrastructure("secret path /var/db".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(body["error"], "Internal server error");
        assert_eq!(body["code"], "infrastructure");
        assert_eq!(body["status"], 500);
        assert!(!String::from_utf8_lossy(&bytes).contains("/var/db"));
    }
}
