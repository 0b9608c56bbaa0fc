//! Router assembly.

use axum::routing::{get, post};
use axum::Router;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use crate::handlers::{add_target, delete_target, get_target, list_targets, update_target};
use crate::state::AppState;

/// Build the simulator router for one simulator instance.
///
/// The body-limit layer sits outside the handlers: a request over the
/// configured ceiling is cut off with a bare 413 before any envelope can be
/// composed, mirroring how the live transport aborts oversized uploads.
pub fn mock_router(state: AppState) -> Router {
    let body_limit = RequestBodyLimitLayer::new(state.config.request_body_limit);

    Router::new()
        .route("/targets", post(add_target).get(list_targets))
        .route(
            "/targets/{target_id}",
            get(get_target).put(update_target).delete(delete_target),
        )
        .with_state(state)
        .layer(body_limit)
        .layer(TraceLayer::new_for_http())
}
