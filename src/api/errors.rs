use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

#[derive(Debug, Serialize)]
struct ErrorResponse {
    success: bool,
    status: u16,
    message: String,
}

#[derive(Debug)]
pub(crate) enum ApiError {
    Unauthorized(&'static str),
    Forbidden(&'static str),
    BadRequest(String),
    NotFound(String),
    Conflict(String),
    Internal(String),
}

const CHECK_VIOLATION: &str = "23514";
const NOT_NULL_VIOLATION: &str = "23502";
const INVALID_TEXT_REPRESENTATION: &str = "22P02";
const NUMERIC_VALUE_OUT_OF_RANGE: &str = "22003";
const UNIQUE_VIOLATION: &str = "23505";

impl ApiError {
    /// Log the underlying error with context and return an `Internal` variant.
    pub(crate) fn internal(err: impl std::fmt::Display, context: &str) -> Self {
        tracing::error!(error = %err, "{context}");
        Self::Internal(context.to_string())
    }

    /// Constraint violations raised by the database become client errors carrying the
    /// database message; anything else is an internal failure.
    pub(crate) fn from_persistence(err: sqlx::Error, context: &str) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            match db_err.code().as_deref() {
                Some(
                    CHECK_VIOLATION
                    | NOT_NULL_VIOLATION
                    | INVALID_TEXT_REPRESENTATION
                    | NUMERIC_VALUE_OUT_OF_RANGE,
                ) => {
                    tracing::warn!(error = %db_err, "{context}");
                    return Self::BadRequest(db_err.message().to_string());
                }
                Some(UNIQUE_VIOLATION) => {
                    return Self::Conflict(db_err.message().to_string());
                }
                _ => {}
            }
        }
        Self::internal(err, context)
    }
}

fn error_body(status: StatusCode, message: String) -> Response {
    (status, Json(ErrorResponse { success: false, status: status.as_u16(), message }))
        .into_response()
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Unauthorized(message) => {
                let mut response = error_body(StatusCode::UNAUTHORIZED, message.to_string());
                response
                    .headers_mut()
                    .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
                response
            }
            ApiError::Forbidden(message) => error_body(StatusCode::FORBIDDEN, message.to_string()),
            ApiError::BadRequest(message) => error_body(StatusCode::BAD_REQUEST, message),
            ApiError::NotFound(message) => error_body(StatusCode::NOT_FOUND, message),
            ApiError::Conflict(message) => error_body(StatusCode::CONFLICT, message),
            // Context was logged where the error was raised; clients get a generic message.
            ApiError::Internal(_) => {
                error_body(StatusCode::INTERNAL_SERVER_ERROR, "Server Error".to_string())
            }
        }
    }
}
