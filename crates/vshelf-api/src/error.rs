//! API error types.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use vshelf_ingest::{ErrorKind, RepositoryError, UploadError};

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error(transparent)]
    Upload(#[from] UploadError),

    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}

impl ApiError {
    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self::Unauthorized(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) | ApiError::Repository(RepositoryError::NotFound(_)) => {
                StatusCode::NOT_FOUND
            }
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Upload(UploadError::TooLarge { .. }) => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::Upload(e) => match e.kind() {
                ErrorKind::Validation => StatusCode::BAD_REQUEST,
                ErrorKind::Processing | ErrorKind::Storage | ErrorKind::Format => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            ApiError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Detail sent in place of server error messages in production.
pub const INTERNAL_ERROR_DETAIL: &str = "An internal error occurred";

#[derive(Serialize)]
struct ErrorResponse {
    detail: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    code: Option<&'static str>,
}

/// Error code of a response built from an [`ApiError`], kept for redaction.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ErrorCode(pub Option<&'static str>);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = match &self {
            ApiError::Upload(e) => Some(e.kind().as_str()),
            _ => None,
        };

        let mut response = (
            status,
            Json(ErrorResponse {
                detail: self.to_string(),
                code,
            }),
        )
            .into_response();
        response.extensions_mut().insert(ErrorCode(code));
        response
    }
}

/// Replace the detail of a server error response, keeping its code.
pub(crate) fn redacted_response(status: StatusCode, code: Option<&'static str>) -> Response {
    (
        status,
        Json(ErrorResponse {
            detail: INTERNAL_ERROR_DETAIL.to_string(),
            code,
        }),
    )
        .into_response()
}
