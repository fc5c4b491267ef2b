use axum::extract::{Request, State};
use axum::http::header::{ACCESS_CONTROL_ALLOW_ORIGIN, ORIGIN, VARY};
use axum::http::HeaderValue;
use axum::middleware::Next;
use axum::response::Response;

use crate::state::SharedState;

/// Resolves the `Access-Control-Allow-Origin` value for a request.
#[derive(Debug, Clone)]
pub struct CorsPolicy {
    allowed: Vec<HeaderValue>,
}

impl CorsPolicy {
    /// An empty list allows any origin.
    pub fn new(origins: &[String]) -> Result<Self, String> {
        let allowed = origins
            .iter()
            .map(|o| {
                HeaderValue::from_str(o).map_err(|e| format!("Invalid allowed origin '{o}': {e}"))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { allowed })
    }

    pub fn is_wildcard(&self) -> bool {
        self.allowed.is_empty()
    }

    pub fn allow_origin(&self, origin: Option<&HeaderValue>) -> HeaderValue {
        let Some(first) = self.allowed.first() else {
            return HeaderValue::from_static("*");
        };

        match origin {
            Some(origin) if self.allowed.contains(origin) => origin.clone(),
            // Browsers block the response when this doesn't match the caller
            _ => first.clone(),
        }
    }
}

/// Stamp the allow-origin header on every response, including errors and preflights.
pub async fn allow_origin(State(state): State<SharedState>, req: Request, next: Next) -> Response {
    let origin = req.headers().get(ORIGIN).cloned();
    let mut response = next.run(req).await;

    let headers = response.headers_mut();
    headers.insert(
        ACCESS_CONTROL_ALLOW_ORIGIN,
        state.cors.allow_origin(origin.as_ref()),
    );
    if !state.cors.is_wildcard() {
        headers.append(VARY, HeaderValue::from_static("Origin"));
    }

    response
}
