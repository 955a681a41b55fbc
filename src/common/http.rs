// SPDX-FileCopyrightText: 2024 Softbear, Inc.
// SPDX-License-Identifier: LGPL-3.0-or-later

use super::Error;
use axum::response::{IntoResponse, Response};
use hyper::header::CONTENT_TYPE;
use hyper::StatusCode;

/// Create a `Response` suitable for `axum::Router`.
pub fn create_error_response(status: StatusCode, message: String) -> Response {
    (status, [(CONTENT_TYPE, "text/plain")], message).into_response()
}

impl Error {
    /// The HTTP status which best describes this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            #[cfg(feature = "aws")]
            Error::Anyhow(..) => StatusCode::FAILED_DEPENDENCY,
            Error::BatchFailed { .. } => StatusCode::FAILED_DEPENDENCY,
            Error::Closed(_) => StatusCode::SERVICE_UNAVAILABLE,
            Error::Serde(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Error::Validation(_) => StatusCode::BAD_REQUEST,
            Error::Multiple(_) | Error::String(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Convert `Error` into a `Response` suitable for `axum::Router`.
impl From<Error> for Response {
    fn from(error: Error) -> Self {
        create_error_response(error.status_code(), error.to_string())
    }
}
