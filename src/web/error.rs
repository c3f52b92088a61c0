//! Error responses for the Cubby Web API.
//!
//! Every failure leaves the API as a JSON envelope of the form
//! `{"error": {"code", "message", "details"?}}` so clients can branch on
//! the machine-readable code instead of the status line.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::collections::HashMap;

/// Machine-readable error codes carried in response bodies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Request could not be parsed (400).
    BadRequest,
    /// Missing or blank user identity (401).
    Unauthorized,
    /// Target absent, or hidden from the requester (404).
    NotFound,
    /// Duplicate identifier (409).
    Conflict,
    /// Field-level validation failures (422).
    ValidationError,
    /// Semantically invalid request without field detail (422).
    UnprocessableEntity,
    /// The owner's storage allowance cannot absorb the write (507).
    InsufficientStorage,
    /// Anything the server cannot explain to the client (500).
    InternalError,
}

impl ErrorCode {
    /// HTTP status this code maps to.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ErrorCode::BadRequest => StatusCode::BAD_REQUEST,
            ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::Conflict => StatusCode::CONFLICT,
            ErrorCode::ValidationError => StatusCode::UNPROCESSABLE_ENTITY,
            ErrorCode::UnprocessableEntity => StatusCode::UNPROCESSABLE_ENTITY,
            ErrorCode::InsufficientStorage => StatusCode::INSUFFICIENT_STORAGE,
            ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Top-level JSON envelope for error responses.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

/// The payload inside the envelope.
#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: ErrorCode,
    pub message: String,
    /// Per-field messages, present only on validation failures.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<HashMap<String, Vec<String>>>,
}

/// Error type returned by handlers and extractors.
#[derive(Debug)]
pub struct ApiError {
    code: ErrorCode,
    message: String,
    details: Option<HashMap<String, Vec<String>>>,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::BadRequest, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Unauthorized, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotFound, message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Conflict, message)
    }

    pub fn unprocessable(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::UnprocessableEntity, message)
    }

    pub fn insufficient_storage(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InsufficientStorage, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }

    /// Validation failure carrying per-field messages.
    pub fn validation(details: HashMap<String, Vec<String>>) -> Self {
        Self {
            code: ErrorCode::ValidationError,
            message: "Request validation failed".to_string(),
            details: Some(details),
        }
    }

    /// Flatten `validator` output into the per-field detail map.
    pub fn from_validation_errors(errors: validator::ValidationErrors) -> Self {
        let details = errors
            .field_errors()
            .into_iter()
            .map(|(field, field_errors)| {
                let messages = field_errors
                    .iter()
                    .map(|e| match &e.message {
                        Some(m) => m.to_string(),
                        None => format!("{field} is invalid"),
                    })
                    .collect();
                (field.to_string(), messages)
            })
            .collect();

        Self::validation(details)
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: ErrorDetail {
                code: self.code,
                message: self.message,
                details: self.details,
            },
        };
        (self.code.status_code(), Json(body)).into_response()
    }
}

impl From<crate::CubbyError> for ApiError {
    fn from(err: crate::CubbyError) -> Self {
        match &err {
            crate::CubbyError::NotFound(msg) => ApiError::not_found(format!("{msg} not found")),
            crate::CubbyError::Validation(msg) => ApiError::unprocessable(msg.clone()),
            crate::CubbyError::Conflict(msg) => ApiError::conflict(msg.clone()),
            crate::CubbyError::QuotaExceeded { .. } => {
                ApiError::insufficient_storage(err.to_string())
            }
            _ => {
                tracing::error!("Internal error: {}", err);
                ApiError::internal("Unexpected internal error")
            }
        }
    }
}
