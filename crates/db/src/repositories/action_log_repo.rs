//! Repository for the `moderation_action_logs` table.

use sqlx::PgPool;

use pawlink_core::types::DbId;

use crate::models::action_log::{CreateActionLog, ModerationActionLog};

/// Column list for `moderation_action_logs` queries.
const COLUMNS: &str = "id, case_id, action, performed_by, justification, metadata, created_at";

/// Provides insert and read operations for the moderation action log.
pub struct ActionLogRepo;

impl ActionLogRepo {
    /// Insert a new action log entry, returning the created row.
    ///
    /// The `uq_moderation_action_logs_case` constraint rejects a second
    /// entry for the same case.
    pub async fn create(
        pool: &PgPool,
        input: &CreateActionLog,
    ) -> Result<ModerationActionLog, sqlx::Error> {
        let query = format!(
            "INSERT INTO moderation_action_logs
                (case_id, action, performed_by, justification, metadata)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ModerationActionLog>(&query)
            .bind(input.case_id)
            .bind(&input.action)
            .bind(input.performed_by)
            .bind(&input.justification)
            .bind(&input.metadata)
            .fetch_one(pool)
            .await
    }

    /// Find the action log entry for a case, if it has been resolved.
    pub async fn find_by_case(
        pool: &PgPool,
        case_id: DbId,
    ) -> Result<Option<ModerationActionLog>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM moderation_action_logs WHERE case_id = $1");
        sqlx::query_as::<_, ModerationActionLog>(&query)
            .bind(case_id)
            .fetch_optional(pool)
            .await
    }

    /// List recent action log entries, newest first.
    pub async fn list_recent(
        pool: &PgPool,
        limit: i64,
    ) -> Result<Vec<ModerationActionLog>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM moderation_action_logs
             ORDER BY created_at DESC
             LIMIT $1"
        );
        sqlx::query_as::<_, ModerationActionLog>(&query)
            .bind(limit.clamp(1, 500))
            .fetch_all(pool)
            .await
    }
}
