//! Soft-delete tombstone entity models and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use pawlink_core::types::{DbId, Timestamp};

/// Tombstone for redacted or deleted content. Hard-deleted by the retention
/// sweep once `expires_at` has passed.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SoftDeleteRecord {
    pub id: DbId,
    pub content_type: String,
    pub content_id: DbId,
    pub deleted_by: DbId,
    pub reason: String,
    pub deleted_at: Timestamp,
    pub expires_at: Timestamp,
    /// References the originating case and action.
    pub metadata: Option<serde_json::Value>,
}

/// DTO for inserting a new tombstone.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateSoftDelete {
    pub content_type: String,
    pub content_id: DbId,
    pub deleted_by: DbId,
    pub reason: String,
    pub expires_at: Timestamp,
    pub metadata: Option<serde_json::Value>,
}
