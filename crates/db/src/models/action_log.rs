//! Moderation action log entity models and DTOs.
//!
//! One immutable record per resolved case (no `updated_at`); the
//! `uq_moderation_action_logs_case` constraint backs the at-most-once
//! resolution guarantee.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use pawlink_core::types::{DbId, Timestamp};

/// The authoritative record of one applied moderation decision.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ModerationActionLog {
    pub id: DbId,
    pub case_id: DbId,
    pub action: String,
    pub performed_by: DbId,
    pub justification: String,
    /// Snapshot at decision time: content type/id, AI score.
    pub metadata: Option<serde_json::Value>,
    pub created_at: Timestamp,
}

/// DTO for inserting a new action log entry.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateActionLog {
    pub case_id: DbId,
    pub action: String,
    pub performed_by: DbId,
    pub justification: String,
    pub metadata: Option<serde_json::Value>,
}
