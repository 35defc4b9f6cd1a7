use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::repository::repository_error::RepositoryError;

/// Domain error taxonomy surfaced by the service layer.
///
/// `StoreUnavailable` is the only retryable class; everything else is
/// terminal for the attempted operation.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ServiceError {
    #[error("Not Found: {0}")]
    NotFound(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Invalid State Transition: {0}")]
    InvalidStateTransition(String),

    #[error("Invalid Input: {0}")]
    InvalidInput(String),

    #[error("Store Unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Internal Error: {0}")]
    Internal(String),
}

impl From<RepositoryError> for ServiceError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound(msg) => ServiceError::NotFound(msg),
            RepositoryError::Validation(msg) => ServiceError::InvalidInput(msg),
            RepositoryError::AlreadyExists(msg) => ServiceError::InvalidInput(msg),
            RepositoryError::Database(msg) => ServiceError::StoreUnavailable(msg),
            RepositoryError::Connection(msg) => ServiceError::StoreUnavailable(msg),
            RepositoryError::Serialization(msg) => ServiceError::Internal(msg),
        }
    }
}

#[derive(Debug, Serialize)]
pub enum HandlerErrorKind {
    NotFound,
    Validation,
    Internal,
    Unauthorized,
    Forbidden,
    Conflict,
    BadRequest,
    ServiceUnavailable,
}

impl std::fmt::Display for HandlerErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            HandlerErrorKind::NotFound => "NotFound",
            HandlerErrorKind::Validation => "Validation",
            HandlerErrorKind::Internal => "Internal",
            HandlerErrorKind::Unauthorized => "Unauthorized",
            HandlerErrorKind::Forbidden => "Forbidden",
            HandlerErrorKind::Conflict => "Conflict",
            HandlerErrorKind::BadRequest => "BadRequest",
            HandlerErrorKind::ServiceUnavailable => "ServiceUnavailable",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Serialize)]
pub struct HandlerError {
    pub error: HandlerErrorKind,
    pub message: String,
    pub details: Option<String>,
}

impl HandlerError {
    pub fn bad_request<T: Into<String>>(message: T) -> Self {
        HandlerError {
            error: HandlerErrorKind::BadRequest,
            message: message.into(),
            details: None,
        }
    }
}

impl std::fmt::Display for HandlerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error, self.message)
    }
}

impl std::error::Error for HandlerError {}

impl IntoResponse for HandlerError {
    fn into_response(self) -> Response {
        let status = match self.error {
            HandlerErrorKind::NotFound => StatusCode::NOT_FOUND,
            HandlerErrorKind::Validation | HandlerErrorKind::BadRequest => StatusCode::BAD_REQUEST,
            HandlerErrorKind::Unauthorized => StatusCode::UNAUTHORIZED,
            HandlerErrorKind::Forbidden => StatusCode::FORBIDDEN,
            HandlerErrorKind::Conflict => StatusCode::CONFLICT,
            HandlerErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
            HandlerErrorKind::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        };
        let body = axum::Json(self);
        (status, body).into_response()
    }
}

impl From<ServiceError> for HandlerError {
    fn from(err: ServiceError) -> Self {
        let (kind, message) = match &err {
            ServiceError::NotFound(msg) => (HandlerErrorKind::NotFound, msg.clone()),
            ServiceError::Unauthorized(msg) => (HandlerErrorKind::Forbidden, msg.clone()),
            ServiceError::InvalidStateTransition(msg) => (HandlerErrorKind::Conflict, msg.clone()),
            ServiceError::InvalidInput(msg) => (HandlerErrorKind::Validation, msg.clone()),
            ServiceError::StoreUnavailable(msg) => {
                (HandlerErrorKind::ServiceUnavailable, msg.clone())
            }
            ServiceError::Internal(msg) => (HandlerErrorKind::Internal, msg.clone()),
        };
        HandlerError {
            error: kind,
            message,
            details: None,
        }
    }
}
