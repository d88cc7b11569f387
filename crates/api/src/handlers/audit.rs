//! Handlers for audit trail queries.
//!
//! Read-only surface over `audit_logs`. Write paths go through
//! [`AuditWriter`] inside the engine, never through HTTP.
//!
//! [`AuditWriter`]: crate::engine::audit::AuditWriter

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use pawlink_core::types::DbId;
use pawlink_db::models::audit::{AuditLogPage, AuditQuery};
use pawlink_db::repositories::AuditLogRepo;

use crate::error::AppResult;
use crate::middleware::identity::Identity;
use crate::response::DataResponse;
use crate::state::AppState;

/// Query params for the convenience list endpoints.
#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub limit: Option<i64>,
}

/// GET /audit/logs
///
/// Filtered, paginated search over the audit trail. Timestamps are RFC 3339.
pub async fn search_logs(
    State(state): State<AppState>,
    Identity(_admin_id): Identity,
    Query(params): Query<AuditQuery>,
) -> AppResult<impl IntoResponse> {
    let items = AuditLogRepo::search(&state.pool, &params).await?;
    let total = AuditLogRepo::count(&state.pool, &params).await?;

    Ok(Json(DataResponse {
        data: AuditLogPage { items, total },
    }))
}

/// GET /audit/logs/actor/{actor_id}
pub async fn list_by_actor(
    State(state): State<AppState>,
    Identity(_admin_id): Identity,
    Path(actor_id): Path<DbId>,
    Query(params): Query<ListParams>,
) -> AppResult<impl IntoResponse> {
    let items =
        AuditLogRepo::list_by_actor(&state.pool, actor_id, params.limit.unwrap_or(50)).await?;
    Ok(Json(DataResponse { data: items }))
}

/// GET /audit/logs/target/{target_type}/{target_id}
pub async fn list_by_target(
    State(state): State<AppState>,
    Identity(_admin_id): Identity,
    Path((target_type, target_id)): Path<(String, DbId)>,
    Query(params): Query<ListParams>,
) -> AppResult<impl IntoResponse> {
    let items = AuditLogRepo::list_by_target(
        &state.pool,
        &target_type,
        target_id,
        params.limit.unwrap_or(50),
    )
    .await?;
    Ok(Json(DataResponse { data: items }))
}

/// GET /audit/logs/action/{action}
pub async fn list_by_action(
    State(state): State<AppState>,
    Identity(_admin_id): Identity,
    Path(action): Path<String>,
    Query(params): Query<ListParams>,
) -> AppResult<impl IntoResponse> {
    let items =
        AuditLogRepo::list_by_action(&state.pool, &action, params.limit.unwrap_or(50)).await?;
    Ok(Json(DataResponse { data: items }))
}
