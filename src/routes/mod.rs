pub mod relay;

use axum::routing::post;
use axum::Router;

use crate::state::SharedState;

/// Mount the relay handler on every configured path.
pub fn relay_routes(paths: &[String]) -> Router<SharedState> {
    paths.iter().fold(Router::new(), |router, path| {
        router.route(
            path,
            post(relay::submit)
                .get(relay::health_check)
                .options(relay::preflight)
                .fallback(relay::method_not_allowed),
        )
    })
}
