use crate::application::inventory::InventoryError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use super::types::ErrorResponse;

/// API層のエラー型
///
/// アプリケーション層のエラーをラップし、HTTPレスポンスへのマッピングを提供する。
#[derive(Debug)]
pub struct ApiError(InventoryError);

impl From<InventoryError> for ApiError {
    fn from(err: InventoryError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match self.0 {
            // 404 Not Found - リクエストされたリソースが存在しない
            ref e @ InventoryError::BookNotFound(_) => {
                (StatusCode::NOT_FOUND, "BOOK_NOT_FOUND", e.to_string())
            }
            ref e @ InventoryError::SaleNotFound(_) => {
                (StatusCode::NOT_FOUND, "SALE_NOT_FOUND", e.to_string())
            }

            // 422 Unprocessable Entity - ビジネスルール違反
            ref e @ InventoryError::SaleAlreadyCompleted(_) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "SALE_ALREADY_COMPLETED",
                e.to_string(),
            ),
            ref e @ InventoryError::InsufficientStock { .. } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "INSUFFICIENT_STOCK",
                e.to_string(),
            ),
            InventoryError::Validation(ref e) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "VALIDATION_ERROR",
                e.to_string(),
            ),

            // 500 Internal Server Error - システム障害
            // 内部エラーの詳細はログに記録し、クライアントには一般的なメッセージのみを返す
            InventoryError::Snapshot(ref e) => {
                tracing::error!("Snapshot codec error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "SNAPSHOT_ERROR",
                    "Failed to encode inventory snapshot".to_string(),
                )
            }
            InventoryError::SnapshotStore(ref e) => {
                tracing::error!("Snapshot store error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "SNAPSHOT_STORE_ERROR",
                    "Failed to persist inventory".to_string(),
                )
            }
        };

        let body = Json(ErrorResponse::new(error_type, message));
        (status, body).into_response()
    }
}

/// クエリハンドラー用のエラー型
#[derive(Debug)]
pub enum QueryError {
    BadRequest(String),
}

impl IntoResponse for QueryError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match self {
            QueryError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg),
        };

        let body = Json(ErrorResponse::new(error_type, message));
        (status, body).into_response()
    }
}
