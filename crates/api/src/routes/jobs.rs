//! Route definitions for on-demand maintenance jobs.

use axum::routing::post;
use axum::Router;

use crate::handlers::jobs;
use crate::state::AppState;

/// Job routes mounted at `/admin/jobs`.
///
/// ```text
/// POST /audit-queue           -> run_audit_queue_sweep
/// POST /soft-delete-cleanup   -> run_soft_delete_cleanup
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/audit-queue", post(jobs::run_audit_queue_sweep))
        .route(
            "/soft-delete-cleanup",
            post(jobs::run_soft_delete_cleanup),
        )
}
