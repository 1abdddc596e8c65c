use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use gridduel_core::{MoveRejected, WireError};
use serde::Serialize;

/// Errors returned by the HTTP handlers.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("unknown session {0}")]
    SessionNotFound(String),

    #[error("session limit of {max} reached")]
    SessionLimit { max: usize },

    #[error("the default session cannot be removed")]
    DefaultSessionProtected,

    #[error(transparent)]
    Rejected(#[from] MoveRejected),

    #[error(transparent)]
    Malformed(#[from] WireError),
}

#[derive(Debug, Serialize)]
pub struct ErrorModel {
    pub detail: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<&'static str>,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::SessionNotFound(_) => StatusCode::NOT_FOUND,
            ApiError::SessionLimit { .. } => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::DefaultSessionProtected => StatusCode::FORBIDDEN,
            ApiError::Rejected(_) => StatusCode::CONFLICT,
            ApiError::Malformed(_) => StatusCode::BAD_REQUEST,
        }
    }

    pub fn reason(&self) -> Option<&'static str> {
        match self {
            ApiError::Rejected(rejected) => Some(rejected.reason()),
            _ => None,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorModel {
            detail: self.to_string(),
            reason: self.reason(),
        };
        (self.status(), Json(body)).into_response()
    }
}
