//! 核心错误处理模块

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::error;

use super::response::encode_error;
use crate::app::products::service::StoreError;

/// 核心错误类型
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// 请求体结构不合法
    #[error("validation error: {0}")]
    Validation(String),
    #[error("not found: {0}")]
    NotFound(String),
    /// 请求体超过配置的大小上限
    #[error("payload too large: {0}")]
    PayloadTooLarge(String),
    #[error("store error: {0}")]
    Store(#[source] sqlx::Error),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { id } => {
                ApiError::NotFound(format!("Product with id {} not found", id))
            }
            StoreError::Failure(cause) => ApiError::Store(cause),
        }
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::Store(_) | ApiError::Serialization(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (title, detail) = match self {
            ApiError::Validation(detail) => ("ValidationError", detail),
            ApiError::NotFound(detail) => ("NotFound", detail),
            ApiError::PayloadTooLarge(detail) => ("PayloadTooLarge", detail),
            ApiError::Store(err) => {
                error!("Database error: {}", err);
                ("InternalServerError", "An unexpected error occurred".to_string())
            }
            ApiError::Serialization(err) => {
                error!("Serialization error: {}", err);
                ("InternalServerError", "An unexpected error occurred".to_string())
            }
        };

        encode_error(title, status, detail).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_mapping() {
        let not_found = ApiError::from(StoreError::NotFound { id: 12 });
        assert_eq!(not_found.status(), StatusCode::NOT_FOUND);
        assert!(matches!(&not_found, ApiError::NotFound(detail) if detail == "Product with id 12 not found"));

        let failure = ApiError::from(StoreError::Failure(sqlx::Error::PoolTimedOut));
        assert_eq!(failure.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_store_failure_hides_cause() {
        let response = ApiError::Store(sqlx::Error::PoolTimedOut).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value["errors"][0]["title"], "InternalServerError");
        assert_eq!(value["errors"][0]["status"], "500");
        assert_eq!(value["errors"][0]["detail"], "An unexpected error occurred");
    }

    #[tokio::test]
    async fn test_payload_too_large_envelope() {
        let response = ApiError::PayloadTooLarge("length limit exceeded".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value["errors"][0]["title"], "PayloadTooLarge");
        assert_eq!(value["errors"][0]["status"], "413");
    }

    #[test]
    fn test_validation_status() {
        let err = ApiError::Validation("Given request body was invalid".to_string());
        assert_eq!(err.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}
