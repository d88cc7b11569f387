//! Repository for the `moderation_cases` table.
//!
//! Concurrency-sensitive writes (`add_reporter`, `resolve`) are single
//! conditional UPDATE statements so correctness does not depend on
//! read-then-write sequences in the engine.

use sqlx::PgPool;

use pawlink_core::types::DbId;

use crate::models::case::{CaseQuery, CreateCase, ModerationCase};

/// Column list for `moderation_cases` SELECT queries.
const COLUMNS: &str = "\
    id, content_type, content_id, priority, reported_by, report_count, \
    auto_flagged, auto_reason, ai_score, status, assigned_to, \
    justification, created_at, updated_at, reviewed_at";

/// SQL expression mapping `priority` to its sort rank (urgent=4 ... low=1).
const PRIORITY_RANK: &str = "\
    CASE priority WHEN 'urgent' THEN 4 WHEN 'high' THEN 3 \
    WHEN 'medium' THEN 2 ELSE 1 END";

/// Default page size for queue listings.
const DEFAULT_PAGE_SIZE: i64 = 20;

/// Hard cap on page size.
const MAX_PAGE_SIZE: i64 = 100;

/// Provides CRUD and atomic state-transition operations for moderation cases.
pub struct CaseRepo;

impl CaseRepo {
    /// Insert a new case for the first report of a piece of content.
    ///
    /// Fails with a unique violation on `uq_moderation_cases_open_content`
    /// if another open case for the same content was created concurrently.
    pub async fn create(pool: &PgPool, input: &CreateCase) -> Result<ModerationCase, sqlx::Error> {
        let query = format!(
            "INSERT INTO moderation_cases
                (content_type, content_id, priority, reported_by,
                 auto_flagged, auto_reason, ai_score)
             VALUES ($1, $2, $3, ARRAY[$4]::BIGINT[], $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ModerationCase>(&query)
            .bind(&input.content_type)
            .bind(input.content_id)
            .bind(&input.priority)
            .bind(input.reporter_id)
            .bind(input.auto_flagged)
            .bind(&input.auto_reason)
            .bind(input.ai_score)
            .fetch_one(pool)
            .await
    }

    /// Find a case by its ID.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<ModerationCase>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM moderation_cases WHERE id = $1");
        sqlx::query_as::<_, ModerationCase>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find the open (pending or in-review) case for a piece of content.
    ///
    /// The partial unique index guarantees at most one such row.
    pub async fn find_open_by_content(
        pool: &PgPool,
        content_type: &str,
        content_id: DbId,
    ) -> Result<Option<ModerationCase>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM moderation_cases
             WHERE content_type = $1 AND content_id = $2 AND status <> 'resolved'"
        );
        sqlx::query_as::<_, ModerationCase>(&query)
            .bind(content_type)
            .bind(content_id)
            .fetch_optional(pool)
            .await
    }

    /// Find the most recent case (open or resolved) for a piece of content.
    pub async fn find_latest_by_content(
        pool: &PgPool,
        content_type: &str,
        content_id: DbId,
    ) -> Result<Option<ModerationCase>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM moderation_cases
             WHERE content_type = $1 AND content_id = $2
             ORDER BY created_at DESC
             LIMIT 1"
        );
        sqlx::query_as::<_, ModerationCase>(&query)
            .bind(content_type)
            .bind(content_id)
            .fetch_optional(pool)
            .await
    }

    /// Add a reporter to an open case and re-derive its priority, in one
    /// atomic statement.
    ///
    /// Set-union semantics: the row is only touched when the reporter is not
    /// already present, so duplicate reports never inflate the count even
    /// under concurrent submission. Priority is the greater of the current
    /// priority and the threshold for the new report count (10+ urgent,
    /// 5+ high, 2+ medium), so it never decreases.
    ///
    /// Returns `None` when nothing changed: the reporter already reported
    /// this case, the case is resolved, or the ID does not exist.
    pub async fn add_reporter(
        pool: &PgPool,
        case_id: DbId,
        reporter_id: DbId,
    ) -> Result<Option<ModerationCase>, sqlx::Error> {
        let query = format!(
            "UPDATE moderation_cases
             SET reported_by = array_append(reported_by, $2),
                 priority = CASE GREATEST(
                     {PRIORITY_RANK},
                     CASE WHEN cardinality(reported_by) + 1 >= 10 THEN 4
                          WHEN cardinality(reported_by) + 1 >= 5 THEN 3
                          WHEN cardinality(reported_by) + 1 >= 2 THEN 2
                          ELSE 1 END)
                     WHEN 4 THEN 'urgent'
                     WHEN 3 THEN 'high'
                     WHEN 2 THEN 'medium'
                     ELSE 'low' END,
                 updated_at = now()
             WHERE id = $1
               AND status <> 'resolved'
               AND NOT ($2 = ANY(reported_by))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ModerationCase>(&query)
            .bind(case_id)
            .bind(reporter_id)
            .fetch_optional(pool)
            .await
    }

    /// Atomically resolve a case (compare-and-set on `status`).
    ///
    /// Only a `pending` or `in_review` case transitions; a second resolve
    /// attempt matches zero rows and returns `None`. Two concurrent calls
    /// therefore yield exactly one winner.
    pub async fn resolve(
        pool: &PgPool,
        case_id: DbId,
        justification: &str,
    ) -> Result<Option<ModerationCase>, sqlx::Error> {
        let query = format!(
            "UPDATE moderation_cases
             SET status = 'resolved',
                 justification = $2,
                 reviewed_at = now(),
                 updated_at = now()
             WHERE id = $1 AND status IN ('pending', 'in_review')
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ModerationCase>(&query)
            .bind(case_id)
            .bind(justification)
            .fetch_optional(pool)
            .await
    }

    /// Assign a moderator to a case.
    ///
    /// A `pending` case moves to `in_review`; an `in_review` case may be
    /// re-assigned. A resolved case keeps its terminal status (only
    /// `assigned_to` is recorded).
    pub async fn assign(
        pool: &PgPool,
        case_id: DbId,
        moderator_id: DbId,
    ) -> Result<Option<ModerationCase>, sqlx::Error> {
        let query = format!(
            "UPDATE moderation_cases
             SET assigned_to = $2,
                 status = CASE WHEN status = 'resolved' THEN status ELSE 'in_review' END,
                 updated_at = now()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ModerationCase>(&query)
            .bind(case_id)
            .bind(moderator_id)
            .fetch_optional(pool)
            .await
    }

    /// List cases of one content type with status filtering, sorting, and
    /// offset pagination.
    pub async fn list_by_type(
        pool: &PgPool,
        content_type: &str,
        params: &CaseQuery,
    ) -> Result<Vec<ModerationCase>, sqlx::Error> {
        let page = params.page.unwrap_or(1).max(1);
        let page_size = params
            .page_size
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE);
        let offset = (page - 1) * page_size;

        // Sort expressions are whitelisted; user input never reaches the SQL
        // string directly.
        let sort_expr = match params.sort_by.as_deref() {
            Some("priority") => PRIORITY_RANK,
            Some("ai_score") => "COALESCE(ai_score, 0)",
            _ => "created_at",
        };
        let sort_dir = match params.sort_order.as_deref() {
            Some("asc") => "ASC",
            _ => "DESC",
        };

        let query = match params.status.as_deref() {
            Some(_) => format!(
                "SELECT {COLUMNS} FROM moderation_cases
                 WHERE content_type = $1 AND status = $2
                 ORDER BY {sort_expr} {sort_dir}
                 LIMIT $3 OFFSET $4"
            ),
            None => format!(
                "SELECT {COLUMNS} FROM moderation_cases
                 WHERE content_type = $1
                 ORDER BY {sort_expr} {sort_dir}
                 LIMIT $2 OFFSET $3"
            ),
        };

        match params.status.as_deref() {
            Some(status) => {
                sqlx::query_as::<_, ModerationCase>(&query)
                    .bind(content_type)
                    .bind(status)
                    .bind(page_size)
                    .bind(offset)
                    .fetch_all(pool)
                    .await
            }
            None => {
                sqlx::query_as::<_, ModerationCase>(&query)
                    .bind(content_type)
                    .bind(page_size)
                    .bind(offset)
                    .fetch_all(pool)
                    .await
            }
        }
    }

    /// Count cases of one content type (for pagination metadata).
    pub async fn count_by_type(
        pool: &PgPool,
        content_type: &str,
        status: Option<&str>,
    ) -> Result<i64, sqlx::Error> {
        match status {
            Some(status) => {
                sqlx::query_scalar::<_, i64>(
                    "SELECT COUNT(*)::BIGINT FROM moderation_cases
                     WHERE content_type = $1 AND status = $2",
                )
                .bind(content_type)
                .bind(status)
                .fetch_one(pool)
                .await
            }
            None => {
                sqlx::query_scalar::<_, i64>(
                    "SELECT COUNT(*)::BIGINT FROM moderation_cases WHERE content_type = $1",
                )
                .bind(content_type)
                .fetch_one(pool)
                .await
            }
        }
    }
}
