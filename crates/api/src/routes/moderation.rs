//! Route definitions for report intake and moderation decisions.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::moderation;
use crate::state::AppState;

/// Moderation routes mounted at `/moderation`.
///
/// ```text
/// POST /reports                   -> submit_report
/// GET  /queue/{content_type}      -> list_queue
/// GET  /cases/{id}                -> get_case
/// POST /cases/{id}/assign         -> assign_case
/// POST /cases/{id}/decision       -> decide_case
/// POST /decisions/bulk            -> bulk_decide
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/reports", post(moderation::submit_report))
        .route("/queue/{content_type}", get(moderation::list_queue))
        .route("/cases/{id}", get(moderation::get_case))
        .route("/cases/{id}/assign", post(moderation::assign_case))
        .route("/cases/{id}/decision", post(moderation::decide_case))
        .route("/decisions/bulk", post(moderation::bulk_decide))
}
