use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::users::RepoError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("user not found")]
    NotFound,
    #[error("{}", .0.body_text())]
    Rejection(#[from] JsonRejection),
    #[error(transparent)]
    Repo(#[from] RepoError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Rejection(rejection) => rejection.status(),
            ApiError::Repo(RepoError::InvalidId(_) | RepoError::Validation(_)) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::Repo(RepoError::DuplicateEmail(_)) => StatusCode::CONFLICT,
            ApiError::Repo(RepoError::Database(_) | RepoError::Migration(_)) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = if status.is_server_error() {
            error!(error = %self, "request failed");
            "internal server error".to_string()
        } else {
            self.to_string()
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}
