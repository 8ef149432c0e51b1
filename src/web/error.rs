use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::models::IdentityError;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Upstream(String),

    #[error("{0}")]
    Internal(String),
}

#[derive(Serialize)]
struct ErrorBody {
    success: bool,
    error: String,
}

impl From<IdentityError> for ApiError {
    fn from(e: IdentityError) -> Self {
        match e {
            IdentityError::InvalidInput(_)
            | IdentityError::InvalidAddress(_)
            | IdentityError::InvalidTxHash(_) => ApiError::BadRequest(e.to_string()),
            IdentityError::NotFound(_) => ApiError::NotFound(e.to_string()),
            IdentityError::RpcError { .. }
            | IdentityError::DataFetchTimeout { .. }
            | IdentityError::HttpError(_)
            | IdentityError::GenerationError(_) => ApiError::Upstream(e.to_string()),
            IdentityError::StorageError(_)
            | IdentityError::DatabaseError(_)
            | IdentityError::SerializationError(_)
            | IdentityError::ConfigError(_) => ApiError::Internal(e.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Upstream(_) => StatusCode::BAD_GATEWAY,
            ApiError::Internal(msg) => {
                tracing::error!("Internal error: {msg}");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let error = match self {
            ApiError::Internal(_) => "Internal server error".to_string(),
            other => other.to_string(),
        };

        (status, Json(ErrorBody { success: false, error })).into_response()
    }
}
