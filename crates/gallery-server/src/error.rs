use axum::{
    Json,
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use gallery::{
    GalleryError,
    upload::{UploadError, ValidationErrors},
};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Gallery(#[from] GalleryError),

    #[error(transparent)]
    Validation(#[from] ValidationErrors),

    #[error("insufficient privileges to upload into this album")]
    Forbidden,

    #[error("malformed multipart body: {0}")]
    Multipart(#[from] MultipartError),

    #[error("invalid user header: {0}")]
    BadUser(String),
}

impl From<UploadError> for ApiError {
    fn from(value: UploadError) -> Self {
        match value {
            UploadError::Validation(errors) => ApiError::Validation(errors),
            UploadError::Forbidden => ApiError::Forbidden,
            UploadError::Gallery(e) => ApiError::Gallery(e),
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    errors: Option<&'a ValidationErrors>,
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Gallery(GalleryError::AlbumNotFound(_)) => StatusCode::NOT_FOUND,
            ApiError::Gallery(GalleryError::Unauthenticated) => StatusCode::UNAUTHORIZED,
            ApiError::Gallery(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::Multipart(e) => e.status(),
            ApiError::BadUser(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::debug!(error = %self, %status, "request rejected");
        }

        let errors = match &self {
            ApiError::Validation(errors) => Some(errors),
            _ => None,
        };
        let body = ErrorBody {
            message: self.to_string(),
            errors,
        };

        (status, Json(body)).into_response()
    }
}
