//! Repository for the `audit_queue_entries` table.
//!
//! Queue entries are created when a direct audit write fails, replayed by
//! the queue sweep, and dropped once their replay budget is exhausted.

use sqlx::PgPool;

use pawlink_core::types::DbId;

use crate::models::audit::{AuditQueueEntry, CreateAuditLog};

/// Column list for `audit_queue_entries` queries.
const COLUMNS: &str = "\
    id, actor_id, action, target_type, target_id, reason, metadata, \
    attempts, last_attempt, created_at";

/// Provides staging operations for the audit fallback queue.
pub struct AuditQueueRepo;

impl AuditQueueRepo {
    /// Stage an audit entry that could not reach the primary log.
    /// `attempts` starts at 0.
    pub async fn create(
        pool: &PgPool,
        input: &CreateAuditLog,
    ) -> Result<AuditQueueEntry, sqlx::Error> {
        let query = format!(
            "INSERT INTO audit_queue_entries
                (actor_id, action, target_type, target_id, reason, metadata)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AuditQueueEntry>(&query)
            .bind(input.actor_id)
            .bind(&input.action)
            .bind(&input.target_type)
            .bind(input.target_id)
            .bind(&input.reason)
            .bind(&input.metadata)
            .fetch_one(pool)
            .await
    }

    /// Load all entries still within their replay budget, oldest first.
    ///
    /// Oldest-first ordering preserves the chronological fidelity of the
    /// audit trail as entries are replayed.
    pub async fn list_replayable(
        pool: &PgPool,
        max_attempts: i32,
    ) -> Result<Vec<AuditQueueEntry>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM audit_queue_entries
             WHERE attempts < $1
             ORDER BY created_at ASC"
        );
        sqlx::query_as::<_, AuditQueueEntry>(&query)
            .bind(max_attempts)
            .fetch_all(pool)
            .await
    }

    /// Delete one entry after successful replay. Returns `false` when no
    /// row matched.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM audit_queue_entries WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Record a failed replay attempt: increment `attempts`, stamp
    /// `last_attempt`.
    pub async fn record_failure(pool: &PgPool, id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE audit_queue_entries
             SET attempts = attempts + 1, last_attempt = now()
             WHERE id = $1",
        )
        .bind(id)
        .execute(pool)
        .await
        .map(|_| ())
    }

    /// Hard-delete every entry that has exhausted its replay budget.
    /// Deliberate data loss; the caller logs what was dropped.
    pub async fn purge_exhausted(pool: &PgPool, max_attempts: i32) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM audit_queue_entries WHERE attempts >= $1")
            .bind(max_attempts)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }

    /// Count all queued entries (operational visibility).
    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*)::BIGINT FROM audit_queue_entries")
            .fetch_one(pool)
            .await
    }
}
