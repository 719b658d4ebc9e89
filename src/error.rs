// HTTP API Error Types
use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    extract::multipart::{MultipartError, MultipartRejection},
    http::{header, HeaderValue, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::BTreeMap;
use thiserror::Error;
use uuid::Uuid;

use crate::auth::{PasswordError, TokenError};
use crate::database::StoreError;

/// Field name to the list of problems found with it.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

pub const INVALID_CREDENTIALS: &str = "Invalid credentials.";
pub const INTERNAL_TITLE: &str = "An unexpected error occurred.";

/// HTTP API error with appropriate status codes and client-friendly messages
#[derive(Debug, Error)]
pub enum ApiError {
    // 400 Bad Request
    #[error("{message}")]
    BadRequest {
        message: String,
        detail: Option<String>,
        field_errors: Option<FieldErrors>,
    },

    // 401 Unauthorized
    #[error("{0}")]
    Unauthorized(String),

    // 401 Unauthorized, login only
    #[error("Invalid credentials.")]
    InvalidCredentials,

    // 403 Forbidden
    #[error("{0}")]
    Forbidden(String),

    // 404 Not Found
    #[error("{0}")]
    NotFound(String),

    // 406 Not Acceptable
    #[error("{0}")]
    NotAcceptable(String),

    // 409 Conflict
    #[error("{0}")]
    Conflict(String),

    // 429 Too Many Requests
    #[error("Too many requests.")]
    TooManyRequests { retry_after_secs: u64 },

    // 500 Internal Server Error, the cause never reaches the client body
    #[error("internal error: {0}")]
    Internal(String),
}

/// The one wire shape for every failed request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    pub id: Uuid,
    pub title: String,
    pub status: u16,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<FieldErrors>,
    /// Server-side cause of an internal failure.
    #[serde(skip)]
    pub internal_detail: Option<String>,
}

impl ErrorEnvelope {
    /// Copy that also exposes the internal cause to the client.
    pub fn with_internal_detail(&self) -> Self {
        let mut envelope = self.clone();
        if envelope.internal_detail.is_some() {
            envelope.detail = envelope.internal_detail.clone();
        }
        envelope
    }
}

impl ApiError {
    /// Get HTTP status code
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) | ApiError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::NotAcceptable(_) => StatusCode::NOT_ACCEPTABLE,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::TooManyRequests { .. } => StatusCode::TOO_MANY_REQUESTS,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get error code for client handling
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::BadRequest { .. } => "BAD_REQUEST",
            ApiError::Unauthorized(_) | ApiError::InvalidCredentials => "UNAUTHORIZED",
            ApiError::Forbidden(_) => "FORBIDDEN",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::NotAcceptable(_) => "NOT_ACCEPTABLE",
            ApiError::Conflict(_) => "CONFLICT",
            ApiError::TooManyRequests { .. } => "TOO_MANY_REQUESTS",
            ApiError::Internal(_) => "INTERNAL_SERVER_ERROR",
        }
    }

    /// Get client-safe title
    pub fn title(&self) -> String {
        match self {
            ApiError::Internal(_) => INTERNAL_TITLE.to_string(),
            other => other.to_string(),
        }
    }

    pub fn envelope(&self) -> ErrorEnvelope {
        let (detail, errors, internal_detail) = match self {
            ApiError::BadRequest { detail, field_errors, .. } => (detail.clone(), field_errors.clone(), None),
            ApiError::Internal(cause) => (None, None, Some(cause.clone())),
            _ => (None, None, None),
        };

        ErrorEnvelope {
            id: Uuid::new_v4(),
            title: self.title(),
            status: self.status_code().as_u16(),
            kind: self.error_code().to_string(),
            detail,
            errors,
            internal_detail,
        }
    }
}

// Static constructor methods
impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest {
            message: message.into(),
            detail: None,
            field_errors: None,
        }
    }

    pub fn validation_error(message: impl Into<String>, field_errors: FieldErrors) -> Self {
        ApiError::BadRequest {
            message: message.into(),
            detail: None,
            field_errors: Some(field_errors),
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        ApiError::Unauthorized(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        ApiError::Forbidden(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    pub fn not_acceptable(message: impl Into<String>) -> Self {
        ApiError::NotAcceptable(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        ApiError::Conflict(message.into())
    }

    pub fn internal(cause: impl std::fmt::Display) -> Self {
        ApiError::Internal(cause.to_string())
    }
}

/// Collects per-field problems and turns them into a 400.
#[derive(Debug, Default)]
pub struct Validator {
    errors: FieldErrors,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.errors.entry(field.to_string()).or_default().push(message.into());
    }

    pub fn require(&mut self, field: &str, value: &str) {
        if value.trim().is_empty() {
            self.add(field, format!("The {} field is required.", field));
        }
    }

    pub fn max_len(&mut self, field: &str, value: &str, max: usize) {
        if value.chars().count() > max {
            self.add(field, format!("The {} field must be at most {} characters.", field, max));
        }
    }

    pub fn finish(self) -> Result<(), ApiError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(ApiError::validation_error("One or more validation errors occurred.", self.errors))
        }
    }
}

// Convert other error types to ApiError
impl From<TokenError> for ApiError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Signing(msg) => ApiError::Internal(format!("token signing failed: {}", msg)),
            other => {
                tracing::debug!("Session token rejected: {}", other);
                ApiError::unauthorized("Authentication required.")
            }
        }
    }
}

impl From<PasswordError> for ApiError {
    fn from(err: PasswordError) -> Self {
        ApiError::internal(err)
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(msg) => ApiError::not_found(msg),
            StoreError::Conflict(msg) => ApiError::conflict(msg),
            // Don't expose internal SQL errors to clients
            other => ApiError::internal(other),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::MissingJsonContentType(_) => {
                ApiError::not_acceptable("Expected request with `Content-Type: application/json`.")
            }
            other => ApiError::BadRequest {
                message: "The request body is not valid JSON for this endpoint.".to_string(),
                detail: Some(other.body_text()),
                field_errors: None,
            },
        }
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::BadRequest {
            message: "Invalid path parameter.".to_string(),
            detail: Some(rejection.body_text()),
            field_errors: None,
        }
    }
}

impl From<MultipartRejection> for ApiError {
    fn from(rejection: MultipartRejection) -> Self {
        ApiError::BadRequest {
            message: "Expected a multipart/form-data upload.".to_string(),
            detail: Some(rejection.body_text()),
            field_errors: None,
        }
    }
}

impl From<MultipartError> for ApiError {
    fn from(err: MultipartError) -> Self {
        ApiError::BadRequest {
            message: "The upload could not be read.".to_string(),
            detail: Some(err.body_text()),
            field_errors: None,
        }
    }
}

// Automatic HTTP response conversion for Axum
impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let envelope = self.envelope();
        let status = self.status_code();

        let mut response = match &self {
            ApiError::InvalidCredentials => (status, Json(json!({ "error": INVALID_CREDENTIALS }))).into_response(),
            _ => (status, Json(&envelope)).into_response(),
        };

        if let ApiError::TooManyRequests { retry_after_secs } = self {
            response
                .headers_mut()
                .insert(header::RETRY_AFTER, HeaderValue::from(retry_after_secs));
        }

        // Picked up by the error boundary for logging and development detail.
        response.extensions_mut().insert(envelope);
        response
    }
}
