//! Error types for the application intake service.
//!
//! This module defines the central `Error` enum, which captures all
//! recoverable and reportable error cases within the intake pipeline. It
//! implements [`IntoResponse`] to enable seamless HTTP error propagation to
//! clients with appropriate status codes and machine-readable `errorType`
//! tags.
//!
//! ## Error Cases
//! - `InvalidRequest`: The submission payload failed schema validation.
//! - `InvalidApplicationId`: A client-supplied external id was malformed.
//! - `EmailAlreadyExists`: The duplicate guard found a live record for the
//!   submission email.
//! - `ApplicationNotFound`: A withdrawal targeted a missing record.
//! - `RateLimitExceeded`: Admission control rejected the request.
//! - `Store`: Any document-store failure. The context is for server-side
//!   logs only and is never sent to the client.

use crate::validate::FieldError;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

pub type Result<T> = core::result::Result<T, Error>;

/// Unified error type for the application intake service.
#[derive(Clone, thiserror::Error, Debug)]
pub enum Error {
    /// The submission payload violated the validation schema.
    #[error("Invalid request data ({} field error(s))", details.len())]
    InvalidRequest { details: Vec<FieldError> },

    /// The client-supplied application id did not carry the expected prefix.
    #[error("Invalid application id: {reason}")]
    InvalidApplicationId { reason: String },

    /// A live application with the same email already exists.
    #[error("An application with this email already exists")]
    EmailAlreadyExists,

    /// The withdrawal target does not exist.
    #[error("Application not found")]
    ApplicationNotFound,

    /// Admission control rejected the request for this window.
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// The document store failed. `context` is internal detail for logging.
    #[error("Store error: {context}")]
    Store { context: String },
}

impl Error {
    /// Machine-readable error tag included in every error response body.
    pub const fn error_type(&self) -> &'static str {
        match self {
            Error::InvalidRequest { .. } => "INVALID_REQUEST",
            Error::InvalidApplicationId { .. } => "INVALID_APPLICATION_ID",
            Error::EmailAlreadyExists => "EMAIL_ALREADY_EXISTS",
            Error::ApplicationNotFound => "APPLICATION_NOT_FOUND",
            Error::RateLimitExceeded => "RATE_LIMIT_EXCEEDED",
            Error::Store { .. } => "DATABASE_ERROR",
        }
    }

    /// HTTP status class for this error.
    pub const fn status(&self) -> StatusCode {
        match self {
            Error::InvalidRequest { .. }
            | Error::InvalidApplicationId { .. }
            | Error::EmailAlreadyExists => StatusCode::BAD_REQUEST,
            Error::ApplicationNotFound => StatusCode::NOT_FOUND,
            Error::RateLimitExceeded => StatusCode::TOO_MANY_REQUESTS,
            Error::Store { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Human-readable message shown to the client.
    ///
    /// Store failures are collapsed to a generic message; the context stays
    /// in server logs.
    fn client_message(&self) -> &'static str {
        match self {
            Error::InvalidRequest { .. } => "Invalid request data",
            Error::InvalidApplicationId { .. } => "Invalid or missing application ID",
            Error::EmailAlreadyExists => "An application with this email already exists.",
            Error::ApplicationNotFound => "Application not found",
            Error::RateLimitExceeded => "Too many requests, please try again later.",
            Error::Store { .. } => "Internal server error",
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let mut body = json!({
            "error": self.client_message(),
            "errorType": self.error_type(),
        });
        if let Error::InvalidRequest { details } = &self {
            body["details"] = json!(details);
        }
        (self.status(), Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_errors_do_not_leak_context() {
        let err = Error::Store {
            context: "firestore: permission denied for collection".to_string(),
        };
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.error_type(), "DATABASE_ERROR");
        assert_eq!(err.client_message(), "Internal server error");
    }

    #[test]
    fn invalid_request_carries_field_details() {
        let err = Error::InvalidRequest {
            details: vec![FieldError::new("email", "email is a required field")],
        };
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.error_type(), "INVALID_REQUEST");
    }
}
