//! Route definitions for audit trail queries.

use axum::routing::get;
use axum::Router;

use crate::handlers::audit;
use crate::state::AppState;

/// Audit routes mounted at `/audit`.
///
/// All routes are read-only; audit writes happen inside the engine.
///
/// ```text
/// GET /logs                                -> search_logs
/// GET /logs/actor/{actor_id}               -> list_by_actor
/// GET /logs/target/{target_type}/{id}      -> list_by_target
/// GET /logs/action/{action}                -> list_by_action
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/logs", get(audit::search_logs))
        .route("/logs/actor/{actor_id}", get(audit::list_by_actor))
        .route(
            "/logs/target/{target_type}/{target_id}",
            get(audit::list_by_target),
        )
        .route("/logs/action/{action}", get(audit::list_by_action))
}
