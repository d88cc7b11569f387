//! Audit writer and queue replay.
//!
//! Every moderation/admin action is recorded through [`AuditWriter::write`]:
//! a direct append to the primary audit log, falling back to a persistent
//! queue entry when the primary store is unavailable. The queue is drained
//! by [`process_audit_queue`], which replays entries oldest-first with the
//! original event time and drops entries that exhaust their replay budget.
//!
//! Audit durability is decoupled from moderation correctness: callers on
//! the decision path use [`AuditWriter::write_best_effort`], which never
//! propagates a failure.

use std::sync::Arc;

use async_trait::async_trait;

use pawlink_core::audit::redact_sensitive_fields;
use pawlink_core::moderation::MAX_REPLAY_ATTEMPTS;
use pawlink_core::types::DbId;
use pawlink_db::models::audit::{AuditLog, CreateAuditLog};
use pawlink_db::repositories::{AuditLogRepo, AuditQueueRepo};
use pawlink_db::DbPool;

// ---------------------------------------------------------------------------
// Primary store seam
// ---------------------------------------------------------------------------

/// The primary audit store. The single seam where "store unavailable" can
/// surface; everything else in the audit subsystem is plain pool access.
#[async_trait]
pub trait AuditStore: Send + Sync {
    /// Append one entry to the primary audit log.
    async fn append(&self, entry: &CreateAuditLog) -> Result<AuditLog, sqlx::Error>;
}

/// Production store: appends straight to the `audit_logs` table.
pub struct PgAuditStore {
    pool: DbPool,
}

impl PgAuditStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuditStore for PgAuditStore {
    async fn append(&self, entry: &CreateAuditLog) -> Result<AuditLog, sqlx::Error> {
        AuditLogRepo::create(&self.pool, entry).await
    }
}

// ---------------------------------------------------------------------------
// Audit writer
// ---------------------------------------------------------------------------

/// Result of a successful [`AuditWriter::write`].
#[derive(Debug, Clone, Copy)]
pub struct AuditOutcome {
    /// ID of the primary log entry, or of the queue entry when `queued`.
    pub log_id: DbId,
    /// `true` means "recorded, not yet durable in the primary store".
    pub queued: bool,
}

/// Durably records audit entries, falling back to the replay queue when the
/// primary store rejects the write. Performs no inline retries; retry is
/// the queue sweep's job.
pub struct AuditWriter {
    store: Arc<dyn AuditStore>,
    pool: DbPool,
}

impl AuditWriter {
    pub fn new(store: Arc<dyn AuditStore>, pool: DbPool) -> Self {
        Self { store, pool }
    }

    /// The primary store this writer appends to (shared with the sweep).
    pub fn store(&self) -> Arc<dyn AuditStore> {
        Arc::clone(&self.store)
    }

    /// Record one audit entry.
    ///
    /// Returns `Ok` with `queued = false` on a direct append, `queued = true`
    /// when the entry was staged to the fallback queue. Errors only when
    /// both the primary store and the queue reject the write -- the one hard
    /// failure mode, which callers must not let roll back the action being
    /// audited.
    pub async fn write(&self, entry: CreateAuditLog) -> Result<AuditOutcome, sqlx::Error> {
        let entry = CreateAuditLog {
            metadata: entry.metadata.as_ref().map(redact_sensitive_fields),
            ..entry
        };

        match self.store.append(&entry).await {
            Ok(log) => Ok(AuditOutcome {
                log_id: log.id,
                queued: false,
            }),
            Err(err) => {
                tracing::warn!(
                    error = %err,
                    action = %entry.action,
                    "Primary audit write failed, staging entry to replay queue"
                );
                let staged = AuditQueueRepo::create(&self.pool, &entry).await?;
                Ok(AuditOutcome {
                    log_id: staged.id,
                    queued: true,
                })
            }
        }
    }

    /// Record an audit entry without surfacing failure to the caller.
    ///
    /// Used on the decision path: moderation throughput is never blocked on
    /// audit-subsystem health. A total write failure is logged and dropped.
    pub async fn write_best_effort(&self, entry: CreateAuditLog) {
        let action = entry.action.clone();
        if let Err(err) = self.write(entry).await {
            tracing::error!(
                error = %err,
                action = %action,
                "Audit entry lost: both primary store and queue writes failed"
            );
        }
    }
}

// ---------------------------------------------------------------------------
// Queue replay
// ---------------------------------------------------------------------------

/// Advisory lock key for the replay sweep. Arbitrary but stable; shared by
/// every process draining the same queue.
const SWEEP_LOCK_KEY: i64 = 88_417_205_312;

/// Drain the audit replay queue.
///
/// Loads entries with remaining replay budget oldest-first and replays each
/// into the primary log with its original `created_at`. A failed replay
/// increments the entry's attempt counter; entries at the budget are
/// hard-deleted after the pass (accepted data loss, visible only here).
///
/// At most one sweep runs at a time: the pass is guarded by a session-scoped
/// Postgres advisory lock, so an overlapping call (another process, or the
/// manual job endpoint racing the background loop) skips the pass and
/// returns 0 instead of replaying an entry a second time.
///
/// Returns the number of entries successfully replayed.
pub async fn process_audit_queue(
    store: &dyn AuditStore,
    pool: &DbPool,
) -> Result<u64, sqlx::Error> {
    // The lock is tied to this connection's session, so it is released even
    // if the process dies mid-sweep.
    let mut conn = pool.acquire().await?;
    let acquired: bool = sqlx::query_scalar("SELECT pg_try_advisory_lock($1)")
        .bind(SWEEP_LOCK_KEY)
        .fetch_one(&mut *conn)
        .await?;
    if !acquired {
        tracing::debug!("Audit queue sweep skipped, another sweep holds the lock");
        return Ok(0);
    }

    let outcome = replay_pending(store, pool).await;

    // Dropping the connection would release the lock anyway; unlocking
    // explicitly returns it to the pool clean.
    if let Err(err) = sqlx::query("SELECT pg_advisory_unlock($1)")
        .bind(SWEEP_LOCK_KEY)
        .execute(&mut *conn)
        .await
    {
        tracing::warn!(error = %err, "Failed to release audit sweep advisory lock");
    }

    outcome
}

/// One replay pass over the queue. Caller holds the sweep lock.
async fn replay_pending(store: &dyn AuditStore, pool: &DbPool) -> Result<u64, sqlx::Error> {
    let entries = AuditQueueRepo::list_replayable(pool, MAX_REPLAY_ATTEMPTS).await?;
    let mut processed = 0u64;

    for entry in entries {
        let replay = CreateAuditLog {
            actor_id: entry.actor_id,
            action: entry.action.clone(),
            target_type: entry.target_type.clone(),
            target_id: entry.target_id,
            reason: entry.reason.clone(),
            metadata: entry.metadata.clone(),
            // The audit trail reflects when the action occurred, not when it
            // became durable.
            created_at: Some(entry.created_at),
        };

        match store.append(&replay).await {
            Ok(_) => {
                AuditQueueRepo::delete(pool, entry.id).await?;
                processed += 1;
            }
            Err(err) => {
                tracing::warn!(
                    entry_id = entry.id,
                    attempts = entry.attempts + 1,
                    error = %err,
                    "Audit replay failed, keeping entry in queue"
                );
                AuditQueueRepo::record_failure(pool, entry.id).await?;
            }
        }
    }

    let dropped = AuditQueueRepo::purge_exhausted(pool, MAX_REPLAY_ATTEMPTS).await?;
    if dropped > 0 {
        tracing::warn!(
            dropped,
            max_attempts = MAX_REPLAY_ATTEMPTS,
            "Dropped audit queue entries after exhausting replay budget"
        );
    }

    Ok(processed)
}
