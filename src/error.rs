use axum::extract::rejection::BytesRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::models::Envelope;

pub const SUBMIT_FAILED: &str = "Failed to submit form";
pub const GENERIC_UPSTREAM_ERROR: &str = "Google Script error";

#[derive(Debug)]
pub enum RelayError {
    /// A required field was missing; never forwarded.
    Validation(String),
    InvalidBody(String),
    BodyTooLarge,
    MethodNotAllowed,
    /// The sheet service could not be reached or did not answer in time.
    UpstreamTransport(String),
    /// The sheet service answered but reported a failure.
    UpstreamApplication { status: u16, message: String },
    /// The sheet service answered 2xx with a body that is not JSON.
    Decode(String),
}

impl std::fmt::Display for RelayError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RelayError::Validation(msg) => write!(f, "Validation failed: {msg}"),
            RelayError::InvalidBody(msg) => write!(f, "Invalid request body: {msg}"),
            RelayError::BodyTooLarge => write!(f, "Request body too large"),
            RelayError::MethodNotAllowed => write!(f, "Method not allowed"),
            RelayError::UpstreamTransport(msg) => write!(f, "Sheet service unreachable: {msg}"),
            RelayError::UpstreamApplication { status, message } => {
                write!(f, "Sheet service rejected submission ({status}): {message}")
            }
            RelayError::Decode(msg) => write!(f, "Sheet service reply undecodable: {msg}"),
        }
    }
}

impl std::error::Error for RelayError {}

impl RelayError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            RelayError::Validation(_) | RelayError::InvalidBody(_) => StatusCode::BAD_REQUEST,
            RelayError::BodyTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            RelayError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            RelayError::UpstreamTransport(_)
            | RelayError::UpstreamApplication { .. }
            | RelayError::Decode(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn envelope(&self) -> Envelope {
        match self {
            RelayError::Validation(msg) => Envelope::failure(msg.clone()),
            RelayError::InvalidBody(detail) => {
                Envelope::failure("Invalid request body").with_error(detail.clone())
            }
            RelayError::BodyTooLarge => Envelope::failure("Request body too large"),
            RelayError::MethodNotAllowed => Envelope::failure("Method not allowed"),
            RelayError::UpstreamTransport(detail) | RelayError::Decode(detail) => {
                Envelope::failure(SUBMIT_FAILED).with_error(detail.clone())
            }
            RelayError::UpstreamApplication { message, .. } => Envelope::failure(message.clone()),
        }
    }
}

impl From<BytesRejection> for RelayError {
    fn from(rejection: BytesRejection) -> Self {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            RelayError::BodyTooLarge
        } else {
            RelayError::InvalidBody(rejection.body_text())
        }
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        match &self {
            RelayError::UpstreamTransport(_)
            | RelayError::UpstreamApplication { .. }
            | RelayError::Decode(_) => tracing::error!("{self}"),
            _ => tracing::debug!("{self}"),
        }

        (self.status_code(), Json(self.envelope())).into_response()
    }
}
