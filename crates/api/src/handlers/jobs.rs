//! Admin job endpoints.
//!
//! On-demand triggers for the background sweeps, for deployments that
//! schedule maintenance through an external cron instead of the in-process
//! loops.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;

use crate::background::retention::cleanup_expired_soft_deletes;
use crate::engine::audit::process_audit_queue;
use crate::error::AppResult;
use crate::middleware::identity::Identity;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct SweepOutcome {
    pub processed: u64,
}

#[derive(Debug, Serialize)]
pub struct CleanupOutcome {
    pub purged: u64,
}

/// POST /admin/jobs/audit-queue
///
/// Run one audit queue replay pass and report how many entries were
/// restored to the primary log.
pub async fn run_audit_queue_sweep(
    State(state): State<AppState>,
    Identity(admin_id): Identity,
) -> AppResult<impl IntoResponse> {
    tracing::info!(admin_id, "Manual audit queue sweep requested");
    let store = state.audit.store();
    let processed = process_audit_queue(store.as_ref(), &state.pool).await?;
    Ok(Json(DataResponse {
        data: SweepOutcome { processed },
    }))
}

/// POST /admin/jobs/soft-delete-cleanup
///
/// Run one retention sweep, purging tombstones past their retention window.
pub async fn run_soft_delete_cleanup(
    State(state): State<AppState>,
    Identity(admin_id): Identity,
) -> AppResult<impl IntoResponse> {
    tracing::info!(admin_id, "Manual soft-delete cleanup requested");
    let purged = cleanup_expired_soft_deletes(&state.pool, &state.audit).await?;
    Ok(Json(DataResponse {
        data: CleanupOutcome { purged },
    }))
}
