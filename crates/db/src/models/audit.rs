//! Audit trail entity models and DTOs.
//!
//! `AuditLog` rows are append-only (no `updated_at`). `AuditQueueEntry` is
//! the staging record for writes that could not reach `audit_logs`; its
//! `created_at` is the original event time and survives replay.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use pawlink_core::types::{DbId, Timestamp};

// ---------------------------------------------------------------------------
// Audit log entity
// ---------------------------------------------------------------------------

/// A single audit log entry. Immutable once created.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AuditLog {
    pub id: DbId,
    pub actor_id: DbId,
    pub action: String,
    pub target_type: Option<String>,
    pub target_id: Option<DbId>,
    pub reason: Option<String>,
    pub metadata: Option<serde_json::Value>,
    pub created_at: Timestamp,
}

/// DTO for inserting a new audit log entry.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateAuditLog {
    pub actor_id: DbId,
    pub action: String,
    pub target_type: Option<String>,
    pub target_id: Option<DbId>,
    pub reason: Option<String>,
    pub metadata: Option<serde_json::Value>,
    /// Original event time, set when replaying a queued entry. `None` lets
    /// the database default to `now()`.
    pub created_at: Option<Timestamp>,
}

// ---------------------------------------------------------------------------
// Audit queue entity
// ---------------------------------------------------------------------------

/// A queued audit write awaiting replay into `audit_logs`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AuditQueueEntry {
    pub id: DbId,
    pub actor_id: DbId,
    pub action: String,
    pub target_type: Option<String>,
    pub target_id: Option<DbId>,
    pub reason: Option<String>,
    pub metadata: Option<serde_json::Value>,
    pub attempts: i32,
    pub last_attempt: Option<Timestamp>,
    pub created_at: Timestamp,
}

// ---------------------------------------------------------------------------
// Query parameters
// ---------------------------------------------------------------------------

/// Filter parameters for querying audit logs.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuditQuery {
    pub actor_id: Option<DbId>,
    pub action: Option<String>,
    pub target_type: Option<String>,
    pub target_id: Option<DbId>,
    pub from: Option<Timestamp>,
    pub to: Option<Timestamp>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Paginated response for audit log queries.
#[derive(Debug, Clone, Serialize)]
pub struct AuditLogPage {
    pub items: Vec<AuditLog>,
    pub total: i64,
}
