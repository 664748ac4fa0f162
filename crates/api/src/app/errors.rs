use std::collections::BTreeMap;

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use geocore_core::DomainError;

/// Machine-readable error codes carried in every problem body.
pub const PERSON_NOT_FOUND: &str = "PESSOA_NOT_FOUND";
pub const INVALID_PARAMETER: &str = "INVALID_PARAMETER";
pub const VALIDATION_ERROR: &str = "VALIDATION_ERROR";
pub const CONSTRAINT_VIOLATION: &str = "CONSTRAINT_VIOLATION";
pub const INTERNAL_ERROR: &str = "INTERNAL_ERROR";

/// Errors surfaced by HTTP handlers.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Requested person does not exist (404).
    #[error("{0}")]
    NotFound(String),

    /// Unusable parameter: bad id, bad `output`, conflicting id, broken invariant (400).
    #[error("{0}")]
    InvalidParameter(String),

    /// Request body failed field validation (400).
    #[error("validation failed")]
    Validation(BTreeMap<String, String>),

    /// Body could not be read as the expected shape (400).
    #[error("{0}")]
    ConstraintViolation(String),

    /// Anything unexpected (500). The message is logged, never returned.
    #[error("internal error: {0}")]
    Internal(String),
}

/// Problem-detail body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Problem {
    pub status: u16,
    pub title: &'static str,
    pub detail: String,
    pub error_code: &'static str,
    pub message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_errors: Option<BTreeMap<String, String>>,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::InvalidParameter(_)
            | ApiError::Validation(_)
            | ApiError::ConstraintViolation(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::NotFound(_) => PERSON_NOT_FOUND,
            ApiError::InvalidParameter(_) => INVALID_PARAMETER,
            ApiError::Validation(_) => VALIDATION_ERROR,
            ApiError::ConstraintViolation(_) => CONSTRAINT_VIOLATION,
            ApiError::Internal(_) => INTERNAL_ERROR,
        }
    }

    fn problem(self) -> Problem {
        let status = self.status().as_u16();
        let error_code = self.error_code();

        match self {
            ApiError::NotFound(detail) => Problem {
                status,
                title: "Person not found",
                detail,
                error_code,
                message: "The requested person was not found",
                field_errors: None,
            },
            ApiError::InvalidParameter(detail) => Problem {
                status,
                title: "Invalid parameter",
                detail,
                error_code,
                message: "The supplied parameters are invalid",
                field_errors: None,
            },
            ApiError::Validation(fields) => Problem {
                status,
                title: "Validation error",
                detail: "Invalid input data".to_string(),
                error_code,
                message: "The supplied data does not meet the validation criteria",
                field_errors: Some(fields),
            },
            ApiError::ConstraintViolation(detail) => Problem {
                status,
                title: "Constraint violation",
                detail,
                error_code,
                message: "The supplied data violates the system constraints",
                field_errors: None,
            },
            ApiError::Internal(cause) => {
                tracing::error!(%cause, "unexpected error while handling request");
                Problem {
                    status,
                    title: "Internal server error",
                    detail: "An unexpected error occurred on the server".to_string(),
                    error_code,
                    message: "Please contact technical support",
                    field_errors: None,
                }
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_client_error() {
            tracing::debug!(error = %self, code = self.error_code(), "request rejected");
        }

        let mut response = (status, axum::Json(self.problem())).into_response();
        response.headers_mut().insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/problem+json"),
        );
        response
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::NotFound(_) => ApiError::NotFound(err.to_string()),
            DomainError::Validation(msg)
            | DomainError::InvariantViolation(msg)
            | DomainError::InvalidId(msg)
            | DomainError::Conflict(msg) => ApiError::InvalidParameter(msg),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::ConstraintViolation(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::InvalidParameter(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::InvalidParameter(rejection.body_text())
    }
}
