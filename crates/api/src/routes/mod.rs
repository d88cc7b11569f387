pub mod audit;
pub mod health;
pub mod jobs;
pub mod moderation;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /moderation/reports                        submit a report (POST)
/// /moderation/queue/{content_type}           paginated queue listing (GET)
/// /moderation/cases/{id}                     case detail (GET)
/// /moderation/cases/{id}/assign              assign to a moderator (POST)
/// /moderation/cases/{id}/decision            apply a decision (POST)
/// /moderation/decisions/bulk                 bulk decisions (POST)
///
/// /audit/logs                                filtered search (GET)
/// /audit/logs/actor/{actor_id}               entries by actor (GET)
/// /audit/logs/target/{type}/{id}             entries by target (GET)
/// /audit/logs/action/{action}                entries by action (GET)
///
/// /admin/jobs/audit-queue                    run replay sweep now (POST)
/// /admin/jobs/soft-delete-cleanup            run retention sweep now (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Report intake, queue, and decisions.
        .nest("/moderation", moderation::router())
        // Audit trail queries (read-only).
        .nest("/audit", audit::router())
        // On-demand maintenance sweeps.
        .nest("/admin/jobs", jobs::router())
}
