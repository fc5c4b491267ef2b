pub mod fields;
pub mod parser;

use axum::http::HeaderMap;
use bytes::Bytes;

use crate::error::RelayError;
use crate::models::{FormType, Submission};

/// Decode and validate an inbound request body.
pub async fn from_request(
    headers: &HeaderMap,
    body: Bytes,
    default_form_type: Option<&FormType>,
) -> Result<Submission, RelayError> {
    let content_type = headers.get("content-type").and_then(|v| v.to_str().ok());

    let raw = if content_type.is_some_and(|ct| ct.contains("multipart/form-data")) {
        parser::parse_multipart(headers, body).await
    } else {
        parser::parse_body(content_type, &body)
    }
    .map_err(RelayError::InvalidBody)?;

    fields::extract(&raw, default_form_type)
}
