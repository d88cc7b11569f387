//! Handlers for report intake and the moderator-facing queue endpoints.

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use pawlink_core::error::CoreError;
use pawlink_core::moderation::{ContentType, ModerationAction};
use pawlink_core::types::DbId;
use pawlink_db::models::case::{CaseQuery, CasePage};
use pawlink_db::repositories::CaseRepo;

use crate::engine::moderation::{
    self, BulkDecisionItem, SubmitReport,
};
use crate::error::{AppError, AppResult};
use crate::middleware::identity::Identity;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Body for `POST /moderation/reports`.
#[derive(Debug, Deserialize)]
pub struct SubmitReportRequest {
    pub content_type: ContentType,
    pub content_id: DbId,
    #[serde(default)]
    pub auto_flagged: bool,
    pub auto_reason: Option<String>,
    pub ai_score: Option<f64>,
}

/// Body for `POST /moderation/cases/{id}/assign`.
#[derive(Debug, Deserialize)]
pub struct AssignRequest {
    pub moderator_id: DbId,
}

/// Body for `POST /moderation/cases/{id}/decision`.
#[derive(Debug, Deserialize)]
pub struct DecisionRequest {
    pub action: ModerationAction,
    pub justification: String,
}

/// Body for `POST /moderation/decisions/bulk`.
#[derive(Debug, Deserialize)]
pub struct BulkDecisionRequest {
    pub items: Vec<BulkDecisionItem>,
}

// ---------------------------------------------------------------------------
// Report intake
// ---------------------------------------------------------------------------

/// POST /moderation/reports
///
/// Submit a report against a piece of content. The reporter is the
/// authenticated caller.
pub async fn submit_report(
    State(state): State<AppState>,
    Identity(reporter_id): Identity,
    Json(input): Json<SubmitReportRequest>,
) -> AppResult<impl IntoResponse> {
    let case = moderation::submit_report(
        &state.pool,
        &state.audit,
        SubmitReport {
            content_type: input.content_type,
            content_id: input.content_id,
            reporter_id,
            auto_flagged: input.auto_flagged,
            auto_reason: input.auto_reason,
            ai_score: input.ai_score,
        },
    )
    .await?;

    Ok(Json(DataResponse { data: case }))
}

// ---------------------------------------------------------------------------
// Queue listing
// ---------------------------------------------------------------------------

/// GET /moderation/queue/{content_type}
///
/// Paginated queue listing with status filtering and sorting.
pub async fn list_queue(
    State(state): State<AppState>,
    Identity(_moderator_id): Identity,
    Path(content_type): Path<String>,
    Query(params): Query<CaseQuery>,
) -> AppResult<impl IntoResponse> {
    let content_type = ContentType::parse(&content_type)
        .ok_or_else(|| AppError::BadRequest(format!("Unknown content type '{content_type}'")))?;

    let items = CaseRepo::list_by_type(&state.pool, content_type.as_str(), &params).await?;
    let total =
        CaseRepo::count_by_type(&state.pool, content_type.as_str(), params.status.as_deref())
            .await?;

    let page = params.page.unwrap_or(1).max(1);
    let page_size = params.page_size.unwrap_or(20).clamp(1, 100);
    let total_pages = (total + page_size - 1) / page_size;

    Ok(Json(DataResponse {
        data: CasePage {
            items,
            total,
            page,
            page_size,
            total_pages,
        },
    }))
}

/// GET /moderation/cases/{id}
pub async fn get_case(
    State(state): State<AppState>,
    Identity(_moderator_id): Identity,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let case = CaseRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "moderation case",
            id,
        })?;
    Ok(Json(DataResponse { data: case }))
}

// ---------------------------------------------------------------------------
// Assignment
// ---------------------------------------------------------------------------

/// POST /moderation/cases/{id}/assign
pub async fn assign_case(
    State(state): State<AppState>,
    Identity(_admin_id): Identity,
    Path(id): Path<DbId>,
    Json(input): Json<AssignRequest>,
) -> AppResult<impl IntoResponse> {
    let case = moderation::assign(&state.pool, &state.audit, id, input.moderator_id).await?;
    Ok(Json(DataResponse { data: case }))
}

// ---------------------------------------------------------------------------
// Decisions
// ---------------------------------------------------------------------------

/// POST /moderation/cases/{id}/decision
///
/// Apply a decision to one case. The moderator is the authenticated caller.
pub async fn decide_case(
    State(state): State<AppState>,
    Identity(moderator_id): Identity,
    Path(id): Path<DbId>,
    Json(input): Json<DecisionRequest>,
) -> AppResult<impl IntoResponse> {
    let log = moderation::process_decision(
        &state.pool,
        &state.audit,
        state.config.soft_delete_retention_days,
        id,
        input.action,
        moderator_id,
        &input.justification,
    )
    .await?;

    Ok(Json(DataResponse { data: log }))
}

/// POST /moderation/decisions/bulk
///
/// Apply decisions to many cases; partial success is reported per item.
pub async fn bulk_decide(
    State(state): State<AppState>,
    Identity(moderator_id): Identity,
    Json(input): Json<BulkDecisionRequest>,
) -> AppResult<impl IntoResponse> {
    let outcome = moderation::process_bulk(
        &state.pool,
        &state.audit,
        state.config.soft_delete_retention_days,
        moderator_id,
        input.items,
    )
    .await;

    Ok(Json(DataResponse { data: outcome }))
}
