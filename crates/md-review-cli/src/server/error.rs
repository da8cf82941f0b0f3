//! Error responses for the review API

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use md_review_engine::{IoError, ReviewError};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Io(#[from] IoError),

    #[error(transparent)]
    Review(#[from] ReviewError),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Io(IoError::OutsideRoot(_) | IoError::NotMarkdown(_)) => StatusCode::FORBIDDEN,
            ApiError::Io(IoError::NotFound(_)) => StatusCode::NOT_FOUND,
            ApiError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Review(ReviewError::EmptyComment | ReviewError::NoSelection) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::Review(ReviewError::UnknownComment(_) | ReviewError::UnknownFile(_)) => {
                StatusCode::NOT_FOUND
            }
            ApiError::Review(ReviewError::Superseded { .. }) => StatusCode::CONFLICT,
            ApiError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            log::error!("{self}");
            "Internal error".to_string()
        } else {
            self.to_string()
        };

        let body = Json(json!({
            "error": message,
            "status": status.as_u16(),
        }));

        (status, body).into_response()
    }
}
