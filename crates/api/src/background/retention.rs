//! Periodic purge of expired soft-delete tombstones.
//!
//! Spawns a background task that hard-deletes `soft_delete_records` whose
//! retention window has passed. Runs on a fixed interval using
//! `tokio::time::interval`.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio_util::sync::CancellationToken;

use pawlink_core::audit::{actions, SYSTEM_ACTOR_ID};
use pawlink_db::models::audit::CreateAuditLog;
use pawlink_db::repositories::SoftDeleteRepo;
use pawlink_db::DbPool;

use crate::engine::audit::AuditWriter;

/// How often the retention sweep runs by default.
const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 3600; // 1 hour

/// Purge every expired tombstone, returning the count removed.
///
/// Idempotent: a sweep with nothing expired is a no-op returning 0. A sweep
/// that removed anything leaves a best-effort audit entry, since the purge
/// is the permanent end of the removed content.
pub async fn cleanup_expired_soft_deletes(
    pool: &DbPool,
    audit: &AuditWriter,
) -> Result<u64, sqlx::Error> {
    let purged = SoftDeleteRepo::delete_expired(pool, Utc::now()).await?;

    if purged > 0 {
        audit
            .write_best_effort(CreateAuditLog {
                actor_id: SYSTEM_ACTOR_ID,
                action: actions::SOFT_DELETE_PURGED.to_string(),
                target_type: None,
                target_id: None,
                reason: None,
                metadata: Some(serde_json::json!({ "purged": purged })),
                created_at: None,
            })
            .await;
    }

    Ok(purged)
}

/// Run the soft-delete retention loop.
///
/// The interval is overridable via `RETENTION_SWEEP_INTERVAL_SECS`. Runs
/// until `cancel` is triggered.
pub async fn run(pool: DbPool, audit: Arc<AuditWriter>, cancel: CancellationToken) {
    let interval_secs: u64 = std::env::var("RETENTION_SWEEP_INTERVAL_SECS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_SWEEP_INTERVAL_SECS);

    tracing::info!(interval_secs, "Soft-delete retention job started");

    let mut interval = tokio::time::interval(Duration::from_secs(interval_secs));

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Soft-delete retention job stopping");
                break;
            }
            _ = interval.tick() => {
                match cleanup_expired_soft_deletes(&pool, &audit).await {
                    Ok(deleted) => {
                        if deleted > 0 {
                            tracing::info!(deleted, "Soft-delete retention: purged expired tombstones");
                        } else {
                            tracing::debug!("Soft-delete retention: nothing to purge");
                        }
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Soft-delete retention: sweep failed");
                    }
                }
            }
        }
    }
}
