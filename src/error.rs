use std::any::Any;

use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection},
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;

use crate::validation::ValidationErrors;

/// Client-visible body of every unhandled failure. The real cause is only logged.
pub const GENERIC_ERROR_MESSAGE: &str = "Something went wrong.";

pub type ApiResult<T> = Result<T, ApiError>;

/// ApiError
///
/// The single error boundary of the service. Handlers, extractors and
/// middleware return this type and it alone decides the transport status and
/// body, so every failure path renders the same way.
#[derive(Debug, Error)]
pub enum ApiError {
    /// No principal could be established for the request (401).
    #[error("unauthenticated: {0}")]
    Unauthenticated(String),

    /// A principal exists but lacks the required role (403).
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// One or more input fields failed their constraints (400).
    #[error("validation failed: {0}")]
    Validation(ValidationErrors),

    /// The addressed resource does not exist (404).
    #[error("not found: {0}")]
    NotFound(String),

    /// Body was sent without a JSON content type (415).
    #[error("unsupported media type")]
    UnsupportedMediaType,

    /// Body exceeded the request size limit (413).
    #[error("payload too large")]
    PayloadTooLarge,

    /// Anything else (500). The message is logged, never returned.
    #[error("internal error: {0}")]
    Internal(String),
}

/// ProblemBody
///
/// Shape of the non-500 error payloads: a short title, the numeric status and,
/// for validation failures, the per-field messages.
#[derive(Debug, Serialize)]
struct ProblemBody<'a> {
    title: &'a str,
    status: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    errors: Option<&'a ValidationErrors>,
}

impl ApiError {
    pub fn unauthenticated(reason: impl Into<String>) -> Self {
        Self::Unauthenticated(reason.into())
    }

    pub fn forbidden(reason: impl Into<String>) -> Self {
        Self::Forbidden(reason.into())
    }

    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound(resource.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Single-field validation failure.
    pub fn invalid_field(field: &str, message: impl Into<String>) -> Self {
        let mut errors = ValidationErrors::new();
        errors.add(field, message);
        Self::Validation(errors)
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::UnsupportedMediaType => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            ApiError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn title(&self) -> &'static str {
        match self {
            ApiError::Unauthenticated(_) => "Unauthorized",
            ApiError::Forbidden(_) => "Forbidden",
            ApiError::Validation(_) => "One or more validation errors occurred.",
            ApiError::NotFound(_) => "Not Found",
            ApiError::UnsupportedMediaType => "Unsupported Media Type",
            ApiError::PayloadTooLarge => "Payload Too Large",
            ApiError::Internal(_) => GENERIC_ERROR_MESSAGE,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if let ApiError::Internal(message) = &self {
            tracing::error!(error = %message, "unhandled error");
            return (status, Json(json!({ "error": GENERIC_ERROR_MESSAGE }))).into_response();
        }

        tracing::debug!(error = %self, status = %status, "request rejected");

        let errors = match &self {
            ApiError::Validation(errors) => Some(errors),
            _ => None,
        };
        let body = ProblemBody {
            title: self.title(),
            status: status.as_u16(),
            errors,
        };

        let mut response = (status, Json(body)).into_response();
        if status == StatusCode::UNAUTHORIZED {
            response
                .headers_mut()
                .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
        }
        response
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        ApiError::Validation(errors)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::MissingJsonContentType(_) => ApiError::UnsupportedMediaType,
            JsonRejection::BytesRejection(rejection)
                if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE =>
            {
                ApiError::PayloadTooLarge
            }
            other => ApiError::invalid_field("$", other.body_text()),
        }
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::invalid_field("id", rejection.body_text())
    }
}

/// handle_panic
///
/// Response factory for `CatchPanicLayer`: the outermost error boundary. A
/// panic anywhere below it is logged and rendered as the generic 500 body.
pub fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(message) = err.downcast_ref::<String>() {
        message.clone()
    } else if let Some(message) = err.downcast_ref::<&str>() {
        message.to_string()
    } else {
        "unknown panic payload".to_string()
    };

    ApiError::Internal(format!("handler panicked: {detail}")).into_response()
}
