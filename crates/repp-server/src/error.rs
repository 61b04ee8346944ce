//! Error types for the Repp API server.
//!
//! [`ApiError`] unifies all failure modes into a single enum that can be
//! converted into an Axum HTTP response via its
//! [`IntoResponse`](axum::response::IntoResponse) implementation. Every
//! failure is answered and the server keeps running.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use repp_core::{CatalogError, PlatformError, ReppError};

/// Errors that can occur in the API layer.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The request was malformed or failed validation.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// The requested resource was not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// The request conflicts with current state.
    #[error("conflict: {0}")]
    Conflict(String),

    /// The wallet provider failed or rejected the request.
    #[error("wallet provider error: {0}")]
    BadGateway(String),

    /// An internal error occurred.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// The HTTP status this error is answered with.
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::BadGateway(_) => StatusCode::BAD_GATEWAY,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ReppError> for ApiError {
    fn from(err: ReppError) -> Self {
        match err {
            ReppError::NoSession => Self::Conflict(err.to_string()),
            ReppError::Connection(_) | ReppError::Submission(_) => {
                Self::BadGateway(err.to_string())
            }
        }
    }
}

impl From<CatalogError> for ApiError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::UnknownEvent(_) | CatalogError::UnknownParticipant { .. } => {
                Self::NotFound(err.to_string())
            }
            CatalogError::InvalidEvent(_) => Self::BadRequest(err.to_string()),
            CatalogError::AlreadyReviewed { .. } => Self::Conflict(err.to_string()),
            CatalogError::IdOverflow => Self::Internal(err.to_string()),
        }
    }
}

impl From<PlatformError> for ApiError {
    fn from(err: PlatformError) -> Self {
        match err {
            PlatformError::Repp(e) => e.into(),
            PlatformError::Catalog(e) => e.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            Self::BadRequest(msg)
            | Self::NotFound(msg)
            | Self::Conflict(msg)
            | Self::BadGateway(msg)
            | Self::Internal(msg) => msg,
        };

        let body = serde_json::json!({
            "error": message,
            "status": status.as_u16(),
        });

        (status, axum::Json(body)).into_response()
    }
}
