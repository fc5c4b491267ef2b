pub mod client;
pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod sheet;
pub mod state;
pub mod submission;

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::http::{HeaderName, HeaderValue};
use axum::Router;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::middleware::cors::{self, CorsPolicy};
use crate::sheet::{HttpSheet, SheetService};
use crate::state::{AppState, SharedState};

pub fn build_app(config: Config) -> Result<Router, String> {
    let sheet = HttpSheet::new(config.relay.clone())
        .map_err(|e| format!("Failed to build sheet client: {e}"))?;
    build_app_with(config, Arc::new(sheet))
}

/// Build the router around an already constructed sheet service.
pub fn build_app_with(config: Config, sheet: Arc<dyn SheetService>) -> Result<Router, String> {
    let cors_policy = CorsPolicy::new(&config.allowed_origins)?;
    let max_body_size = config.max_body_size;

    tracing::info!(
        paths = ?config.relay_paths,
        encoding = ?config.relay.encoding,
        "Relay configured"
    );

    let state: SharedState = Arc::new(AppState {
        config,
        sheet,
        cors: cors_policy,
    });

    let app = Router::new()
        .merge(routes::relay_routes(&state.config.relay_paths))
        .route("/health", axum::routing::get(health))
        .layer(DefaultBodyLimit::max(max_body_size))
        .layer(TraceLayer::new_for_http())
        .layer(SetResponseHeaderLayer::overriding(
            HeaderName::from_static("access-control-allow-methods"),
            HeaderValue::from_static("POST, OPTIONS"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            HeaderName::from_static("access-control-allow-headers"),
            HeaderValue::from_static("Content-Type"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            HeaderName::from_static("x-content-type-options"),
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            HeaderName::from_static("referrer-policy"),
            HeaderValue::from_static("strict-origin-when-cross-origin"),
        ))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            cors::allow_origin,
        ))
        .with_state(state);

    Ok(app)
}

async fn health() -> &'static str {
    "ok"
}
