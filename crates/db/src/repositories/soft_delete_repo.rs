//! Repository for the `soft_delete_records` table.

use sqlx::PgPool;

use pawlink_core::types::{DbId, Timestamp};

use crate::models::soft_delete::{CreateSoftDelete, SoftDeleteRecord};

/// Column list for `soft_delete_records` queries.
const COLUMNS: &str =
    "id, content_type, content_id, deleted_by, reason, deleted_at, expires_at, metadata";

/// Provides tombstone creation and expiry purging.
pub struct SoftDeleteRepo;

impl SoftDeleteRepo {
    /// Insert a new tombstone, returning the created row.
    pub async fn create(
        pool: &PgPool,
        input: &CreateSoftDelete,
    ) -> Result<SoftDeleteRecord, sqlx::Error> {
        let query = format!(
            "INSERT INTO soft_delete_records
                (content_type, content_id, deleted_by, reason, expires_at, metadata)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, SoftDeleteRecord>(&query)
            .bind(&input.content_type)
            .bind(input.content_id)
            .bind(input.deleted_by)
            .bind(&input.reason)
            .bind(input.expires_at)
            .bind(&input.metadata)
            .fetch_one(pool)
            .await
    }

    /// Find the tombstone for a piece of content, if one exists.
    pub async fn find_by_content(
        pool: &PgPool,
        content_type: &str,
        content_id: DbId,
    ) -> Result<Option<SoftDeleteRecord>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM soft_delete_records
             WHERE content_type = $1 AND content_id = $2
             ORDER BY deleted_at DESC
             LIMIT 1"
        );
        sqlx::query_as::<_, SoftDeleteRecord>(&query)
            .bind(content_type)
            .bind(content_id)
            .fetch_optional(pool)
            .await
    }

    /// List tombstones that have not yet expired, soonest-expiring first.
    pub async fn list_active(
        pool: &PgPool,
        now: Timestamp,
    ) -> Result<Vec<SoftDeleteRecord>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM soft_delete_records
             WHERE expires_at > $1
             ORDER BY expires_at ASC"
        );
        sqlx::query_as::<_, SoftDeleteRecord>(&query)
            .bind(now)
            .fetch_all(pool)
            .await
    }

    /// Hard-delete every tombstone whose retention window has passed.
    ///
    /// Idempotent: re-running with no expired rows removes nothing and
    /// returns 0.
    pub async fn delete_expired(pool: &PgPool, now: Timestamp) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM soft_delete_records WHERE expires_at <= $1")
            .bind(now)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}
