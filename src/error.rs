use crate::store::StorageError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

/// 경매 저장소 계층 오류
#[derive(Debug, Error)]
pub enum AuctionError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("auction not found: {0}")]
    NotFound(String),
}

impl IntoResponse for AuctionError {
    fn into_response(self) -> Response {
        let status = match &self {
            AuctionError::NotFound(_) => StatusCode::NOT_FOUND,
            AuctionError::Storage(StorageError::DuplicateId(_)) => StatusCode::CONFLICT,
            AuctionError::Storage(StorageError::Unavailable(_)) => StatusCode::SERVICE_UNAVAILABLE,
            AuctionError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AuctionError>;
