//! Repository for the `audit_logs` table.

use sqlx::PgPool;

use pawlink_core::types::{DbId, Timestamp};

use crate::models::audit::{AuditLog, AuditQuery, CreateAuditLog};

/// Column list for `audit_logs` SELECT queries.
const COLUMNS: &str =
    "id, actor_id, action, target_type, target_id, reason, metadata, created_at";

/// Provides insert and filtered read operations for the primary audit log.
pub struct AuditLogRepo;

impl AuditLogRepo {
    /// Append a new audit log entry.
    ///
    /// When `input.created_at` is set (queue replay), the original event
    /// time is preserved instead of the database default `now()`.
    pub async fn create(pool: &PgPool, input: &CreateAuditLog) -> Result<AuditLog, sqlx::Error> {
        let query = match input.created_at {
            Some(_) => format!(
                "INSERT INTO audit_logs
                    (actor_id, action, target_type, target_id, reason, metadata, created_at)
                 VALUES ($1, $2, $3, $4, $5, $6, $7)
                 RETURNING {COLUMNS}"
            ),
            None => format!(
                "INSERT INTO audit_logs
                    (actor_id, action, target_type, target_id, reason, metadata)
                 VALUES ($1, $2, $3, $4, $5, $6)
                 RETURNING {COLUMNS}"
            ),
        };

        let mut q = sqlx::query_as::<_, AuditLog>(&query)
            .bind(input.actor_id)
            .bind(&input.action)
            .bind(&input.target_type)
            .bind(input.target_id)
            .bind(&input.reason)
            .bind(&input.metadata);
        if let Some(created_at) = input.created_at {
            q = q.bind(created_at);
        }
        q.fetch_one(pool).await
    }

    /// Search audit logs with filtering and pagination, newest first.
    pub async fn search(pool: &PgPool, params: &AuditQuery) -> Result<Vec<AuditLog>, sqlx::Error> {
        let limit = params.limit.unwrap_or(50).clamp(1, 500);
        let offset = params.offset.unwrap_or(0).max(0);

        let (where_clause, bind_values, bind_idx) = build_audit_filter(params);

        let query = format!(
            "SELECT {COLUMNS} FROM audit_logs {where_clause} \
             ORDER BY created_at DESC \
             LIMIT ${bind_idx} OFFSET ${}",
            bind_idx + 1
        );

        let q = bind_audit_values(sqlx::query_as::<_, AuditLog>(&query), &bind_values);
        q.bind(limit).bind(offset).fetch_all(pool).await
    }

    /// Count audit logs matching the given filter (for pagination metadata).
    pub async fn count(pool: &PgPool, params: &AuditQuery) -> Result<i64, sqlx::Error> {
        let (where_clause, bind_values, _) = build_audit_filter(params);

        let query = format!("SELECT COUNT(*)::BIGINT FROM audit_logs {where_clause}");

        let q = bind_audit_values_scalar(sqlx::query_scalar::<_, i64>(&query), &bind_values);
        q.fetch_one(pool).await
    }

    /// List entries recorded by one actor, newest first.
    pub async fn list_by_actor(
        pool: &PgPool,
        actor_id: DbId,
        limit: i64,
    ) -> Result<Vec<AuditLog>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM audit_logs
             WHERE actor_id = $1
             ORDER BY created_at DESC
             LIMIT $2"
        );
        sqlx::query_as::<_, AuditLog>(&query)
            .bind(actor_id)
            .bind(limit.clamp(1, 500))
            .fetch_all(pool)
            .await
    }

    /// List entries against one target, newest first.
    pub async fn list_by_target(
        pool: &PgPool,
        target_type: &str,
        target_id: DbId,
        limit: i64,
    ) -> Result<Vec<AuditLog>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM audit_logs
             WHERE target_type = $1 AND target_id = $2
             ORDER BY created_at DESC
             LIMIT $3"
        );
        sqlx::query_as::<_, AuditLog>(&query)
            .bind(target_type)
            .bind(target_id)
            .bind(limit.clamp(1, 500))
            .fetch_all(pool)
            .await
    }

    /// List entries for one action string, newest first.
    pub async fn list_by_action(
        pool: &PgPool,
        action: &str,
        limit: i64,
    ) -> Result<Vec<AuditLog>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM audit_logs
             WHERE action = $1
             ORDER BY created_at DESC
             LIMIT $2"
        );
        sqlx::query_as::<_, AuditLog>(&query)
            .bind(action)
            .bind(limit.clamp(1, 500))
            .fetch_all(pool)
            .await
    }
}

// ---------------------------------------------------------------------------
// Internal helpers for dynamic query building
// ---------------------------------------------------------------------------

/// Typed bind value for dynamically-built audit log queries.
enum BindValue {
    BigInt(i64),
    Text(String),
    Timestamp(Timestamp),
}

/// Build a WHERE clause and bind values from `AuditQuery` filter parameters.
///
/// Returns `(where_clause, bind_values, next_bind_index)`.
/// The `where_clause` is empty if no filters are active, or starts with `WHERE `.
fn build_audit_filter(params: &AuditQuery) -> (String, Vec<BindValue>, u32) {
    let mut conditions: Vec<String> = Vec::new();
    let mut bind_idx = 1u32;
    let mut bind_values: Vec<BindValue> = Vec::new();

    if let Some(actor_id) = params.actor_id {
        conditions.push(format!("actor_id = ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(BindValue::BigInt(actor_id));
    }

    if let Some(ref action) = params.action {
        conditions.push(format!("action = ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(BindValue::Text(action.clone()));
    }

    if let Some(ref target_type) = params.target_type {
        conditions.push(format!("target_type = ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(BindValue::Text(target_type.clone()));
    }

    if let Some(target_id) = params.target_id {
        conditions.push(format!("target_id = ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(BindValue::BigInt(target_id));
    }

    if let Some(from) = params.from {
        conditions.push(format!("created_at >= ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(BindValue::Timestamp(from));
    }

    if let Some(to) = params.to {
        conditions.push(format!("created_at <= ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(BindValue::Timestamp(to));
    }

    let where_clause = if conditions.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", conditions.join(" AND "))
    };

    (where_clause, bind_values, bind_idx)
}

/// Bind a slice of `BindValue` to a sqlx `QueryAs`.
fn bind_audit_values<'q, O>(
    mut q: sqlx::query::QueryAs<'q, sqlx::Postgres, O, sqlx::postgres::PgArguments>,
    bind_values: &'q [BindValue],
) -> sqlx::query::QueryAs<'q, sqlx::Postgres, O, sqlx::postgres::PgArguments> {
    for val in bind_values {
        match val {
            BindValue::BigInt(v) => q = q.bind(*v),
            BindValue::Text(v) => q = q.bind(v.as_str()),
            BindValue::Timestamp(v) => q = q.bind(*v),
        }
    }
    q
}

/// Bind a slice of `BindValue` to a sqlx `QueryScalar`.
fn bind_audit_values_scalar<'q>(
    mut q: sqlx::query::QueryScalar<'q, sqlx::Postgres, i64, sqlx::postgres::PgArguments>,
    bind_values: &'q [BindValue],
) -> sqlx::query::QueryScalar<'q, sqlx::Postgres, i64, sqlx::postgres::PgArguments> {
    for val in bind_values {
        match val {
            BindValue::BigInt(v) => q = q.bind(*v),
            BindValue::Text(v) => q = q.bind(v.as_str()),
            BindValue::Timestamp(v) => q = q.bind(*v),
        }
    }
    q
}
