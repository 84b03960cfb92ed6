//! Conversion between service-layer errors and HTTP responses.
//!
//! Every failed request is answered with the same JSON shape:
//! `{"message": ..., "code": ...}` with a matching HTTP status. Database
//! and internal failures are logged in full server-side and surface only a
//! generic message to the client.

use axum::Json;
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};

use crate::errors::ServiceError;

/// JSON body returned for every failed request.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub message: String,
    pub code: u16,
}

pub type HttpError = (StatusCode, Json<ErrorBody>);

fn http_error(status: StatusCode, message: impl Into<String>) -> HttpError {
    (
        status,
        Json(ErrorBody {
            message: message.into(),
            code: status.as_u16(),
        }),
    )
}

/// Maps a `ServiceError` onto its HTTP status and wire body.
pub fn service_error_to_http(error: ServiceError) -> HttpError {
    match &error {
        ServiceError::WeakPassword | ServiceError::Validation { .. } => {
            http_error(StatusCode::BAD_REQUEST, error.to_string())
        }
        ServiceError::InvalidPassword
        | ServiceError::InvalidToken
        | ServiceError::Unauthorized => http_error(StatusCode::UNAUTHORIZED, error.to_string()),
        ServiceError::NotFound { .. } => http_error(StatusCode::NOT_FOUND, error.to_string()),
        ServiceError::Database { source } => {
            tracing::error!("database error: {source:?}");
            http_error(StatusCode::INTERNAL_SERVER_ERROR, "internal server error")
        }
        ServiceError::Internal { message } => {
            tracing::error!("internal error: {message}");
            http_error(StatusCode::INTERNAL_SERVER_ERROR, "internal server error")
        }
    }
}

/// Maps a malformed or missing JSON body onto the standard error body.
pub fn body_rejection_to_http(rejection: JsonRejection) -> HttpError {
    tracing::warn!("request body rejected: {rejection}");
    http_error(StatusCode::BAD_REQUEST, "decode request body error")
}

/// Maps a non-numeric path id onto the standard error body.
pub fn path_rejection_to_http(rejection: PathRejection) -> HttpError {
    tracing::warn!("path parameter rejected: {rejection}");
    http_error(StatusCode::BAD_REQUEST, "parse path params error")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_match_the_error_taxonomy() {
        let cases = [
            (ServiceError::WeakPassword, StatusCode::BAD_REQUEST),
            (ServiceError::InvalidPassword, StatusCode::UNAUTHORIZED),
            (ServiceError::InvalidToken, StatusCode::UNAUTHORIZED),
            (ServiceError::Unauthorized, StatusCode::UNAUTHORIZED),
            (ServiceError::not_found("user"), StatusCode::NOT_FOUND),
            (
                ServiceError::validation("email: Email must be valid"),
                StatusCode::BAD_REQUEST,
            ),
            (
                ServiceError::internal("boom"),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, expected) in cases {
            let (status, Json(body)) = service_error_to_http(error);
            assert_eq!(status, expected);
            assert_eq!(body.code, expected.as_u16());
        }
    }

    #[test]
    fn internal_detail_never_reaches_the_client() {
        let (_, Json(body)) = service_error_to_http(ServiceError::internal("secret detail"));
        assert_eq!(body.message, "internal server error");
    }
}
