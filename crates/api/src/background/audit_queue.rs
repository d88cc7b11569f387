//! Periodic replay of queued audit writes.
//!
//! Spawns a background task that drains `audit_queue_entries` into the
//! primary audit log. Runs on a fixed interval using `tokio::time::interval`.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use pawlink_db::DbPool;

use crate::engine::audit::{process_audit_queue, AuditStore};

/// How often the replay sweep runs by default.
const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 60;

/// Run the audit queue replay loop.
///
/// The interval is overridable via `AUDIT_SWEEP_INTERVAL_SECS`. Runs until
/// `cancel` is triggered; each sweep processes queue entries independently,
/// so interruption between entries is safe.
pub async fn run(store: Arc<dyn AuditStore>, pool: DbPool, cancel: CancellationToken) {
    let interval_secs: u64 = std::env::var("AUDIT_SWEEP_INTERVAL_SECS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_SWEEP_INTERVAL_SECS);

    tracing::info!(interval_secs, "Audit queue replay job started");

    let mut interval = tokio::time::interval(Duration::from_secs(interval_secs));

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Audit queue replay job stopping");
                break;
            }
            _ = interval.tick() => {
                match process_audit_queue(store.as_ref(), &pool).await {
                    Ok(processed) => {
                        if processed > 0 {
                            tracing::info!(processed, "Audit queue replay: entries restored to primary log");
                        } else {
                            tracing::debug!("Audit queue replay: queue empty");
                        }
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Audit queue replay: sweep failed");
                    }
                }
            }
        }
    }
}
