//! Moderation case entity models and DTOs.
//!
//! One case exists per (content_type, content_id) while unresolved; the
//! partial unique index `uq_moderation_cases_open_content` enforces this.
//! `report_count` is a generated column and always equals the cardinality
//! of `reported_by`.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use pawlink_core::types::{DbId, Timestamp};

// ---------------------------------------------------------------------------
// Case entity
// ---------------------------------------------------------------------------

/// One moderation case: the unit of moderation work.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ModerationCase {
    pub id: DbId,
    pub content_type: String,
    pub content_id: DbId,
    pub priority: String,
    pub reported_by: Vec<DbId>,
    pub report_count: i64,
    pub auto_flagged: bool,
    pub auto_reason: Option<String>,
    pub ai_score: Option<f64>,
    pub status: String,
    pub assigned_to: Option<DbId>,
    /// Set exactly once, when the case is resolved.
    pub justification: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub reviewed_at: Option<Timestamp>,
}

// ---------------------------------------------------------------------------
// Create DTO
// ---------------------------------------------------------------------------

/// DTO for inserting a new case on first report.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateCase {
    pub content_type: String,
    pub content_id: DbId,
    pub reporter_id: DbId,
    pub priority: String,
    pub auto_flagged: bool,
    pub auto_reason: Option<String>,
    pub ai_score: Option<f64>,
}

// ---------------------------------------------------------------------------
// Query parameters / pagination
// ---------------------------------------------------------------------------

/// Filter and sort parameters for queue listings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CaseQuery {
    pub status: Option<String>,
    /// `priority` | `ai_score` | `created_at` (default `created_at`).
    pub sort_by: Option<String>,
    /// `asc` | `desc` (default `desc`).
    pub sort_order: Option<String>,
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

/// Paginated response for queue listings.
#[derive(Debug, Clone, Serialize)]
pub struct CasePage {
    pub items: Vec<ModerationCase>,
    pub total: i64,
    pub page: i64,
    pub page_size: i64,
    pub total_pages: i64,
}
