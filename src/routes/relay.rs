use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::Instrument;
use uuid::Uuid;

use crate::error::RelayError;
use crate::models::Envelope;
use crate::state::SharedState;
use crate::submission;

/// Validate one submission, forward it to the sheet service, and answer with the envelope.
pub async fn submit(
    State(state): State<SharedState>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    let relay_id = Uuid::now_v7();
    let span = tracing::info_span!("relay", %relay_id);

    let response = relay(&state, &headers, body)
        .instrument(span)
        .await
        .into_response();

    ([("x-relay-id", relay_id.to_string())], response).into_response()
}

async fn relay(
    state: &SharedState,
    headers: &HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Result<Response, RelayError> {
    let body = body.inspect_err(|e| tracing::warn!("Unreadable request body: {e}"))?;
    let submission =
        submission::from_request(headers, body, state.config.default_form_type.as_ref())
            .await
            .inspect_err(|e| tracing::warn!("Rejected submission: {e}"))?;

    tracing::info!(
        form_type = %submission.form_type(),
        sheet = state.sheet.target(),
        "Forwarding submission"
    );

    let ack = state.sheet.append(&submission).await?;

    tracing::info!(form_type = %submission.form_type(), "Submission stored");
    Ok((StatusCode::OK, Json(Envelope::submitted(ack))).into_response())
}

/// GET/HEAD health check on a relay path.
pub async fn health_check() -> &'static str {
    "OK"
}

/// CORS preflight. The CORS headers themselves are added by the router layers.
pub async fn preflight() -> Response {
    (
        [("Access-Control-Max-Age", "86400")],
        StatusCode::NO_CONTENT,
    )
        .into_response()
}

pub async fn method_not_allowed() -> RelayError {
    RelayError::MethodNotAllowed
}
