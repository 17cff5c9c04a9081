//! HTTP adapter mapping for domain errors.
//!
//! Purpose: keep the domain error type HTTP-agnostic while allowing Actix
//! handlers to turn domain failures into consistent JSON responses and
//! status codes. Port errors are folded into the domain envelope here too,
//! so adapters never leak Diesel or pool details to clients.

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use tracing::error;

use crate::domain::ports::{DirectoryError, FollowGraphError};
use crate::domain::{Error, ErrorCode};

const fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::InvalidRequest => StatusCode::BAD_REQUEST,
        ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
        ErrorCode::Forbidden => StatusCode::FORBIDDEN,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn redact_if_internal(err: &Error) -> Error {
    if matches!(err.code(), ErrorCode::InternalError) {
        Error::internal("Internal server error")
    } else {
        err.clone()
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        status_for(self.code())
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(redact_if_internal(self))
    }
}

impl From<actix_web::Error> for Error {
    fn from(err: actix_web::Error) -> Self {
        // Do not leak implementation details to clients.
        error!(error = %err, "actix error promoted to domain error");
        Self::internal("Internal server error")
    }
}

/// Fold a directory port failure into the domain envelope.
pub(crate) fn map_directory_error(error: DirectoryError) -> Error {
    match error {
        DirectoryError::Connection { message } => Error::service_unavailable(message),
        DirectoryError::Query { message } => Error::internal(message),
        DirectoryError::EmailTaken => Error::invalid_request("email address has already been taken"),
        DirectoryError::NotFound => Error::not_found("user not found"),
    }
}

/// Fold a follow graph port failure into the domain envelope.
pub(crate) fn map_follow_graph_error(error: FollowGraphError) -> Error {
    match error {
        FollowGraphError::Connection { message } => Error::service_unavailable(message),
        FollowGraphError::Query { message } => Error::internal(message),
        FollowGraphError::UnknownUser => Error::not_found("user not found"),
    }
}
