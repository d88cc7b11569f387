//! Integration tests for the audit trail: write path, fallback queue,
//! replay sweep, and the query endpoints.
//!
//! Primary-store outages are simulated by swapping the [`AuditStore`]
//! implementation behind the writer; the queue and replay paths run against
//! the real database.

mod common;

use std::sync::atomic::{AtomicBool, AtomicI64, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::http::StatusCode;
use chrono::Utc;
use common::{body_json, build_test_app, get, post_empty, post_json, seed_post};
use serde_json::json;
use sqlx::PgPool;

use pawlink_api::engine::audit::{
    process_audit_queue, AuditStore, AuditWriter, PgAuditStore,
};
use pawlink_core::audit::actions;
use pawlink_core::moderation::MAX_REPLAY_ATTEMPTS;
use pawlink_db::models::audit::{AuditLog, CreateAuditLog};
use pawlink_db::repositories::{AuditLogRepo, AuditQueueRepo};

// ---------------------------------------------------------------------------
// Test stores
// ---------------------------------------------------------------------------

/// A primary store that always rejects writes, as if the audit database
/// were unreachable.
struct FailingAuditStore;

#[async_trait]
impl AuditStore for FailingAuditStore {
    async fn append(&self, _entry: &CreateAuditLog) -> Result<AuditLog, sqlx::Error> {
        Err(sqlx::Error::PoolClosed)
    }
}

/// A primary store that records the order in which actions arrive.
struct RecordingAuditStore {
    next_id: AtomicI64,
    seen: Mutex<Vec<String>>,
}

impl RecordingAuditStore {
    fn new() -> Self {
        Self {
            next_id: AtomicI64::new(1),
            seen: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl AuditStore for RecordingAuditStore {
    async fn append(&self, entry: &CreateAuditLog) -> Result<AuditLog, sqlx::Error> {
        self.seen.lock().unwrap().push(entry.action.clone());
        Ok(AuditLog {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            actor_id: entry.actor_id,
            action: entry.action.clone(),
            target_type: entry.target_type.clone(),
            target_id: entry.target_id,
            reason: entry.reason.clone(),
            metadata: entry.metadata.clone(),
            created_at: entry.created_at.unwrap_or_else(Utc::now),
        })
    }
}

/// A primary store whose first append starts a second, competing sweep over
/// the same queue before completing its own write.
struct OverlappingSweepStore {
    pool: PgPool,
    fired: AtomicBool,
    inner_processed: AtomicU64,
}

impl OverlappingSweepStore {
    fn new(pool: PgPool) -> Self {
        Self {
            pool,
            fired: AtomicBool::new(false),
            inner_processed: AtomicU64::new(0),
        }
    }
}

#[async_trait]
impl AuditStore for OverlappingSweepStore {
    async fn append(&self, entry: &CreateAuditLog) -> Result<AuditLog, sqlx::Error> {
        if !self.fired.swap(true, Ordering::SeqCst) {
            let inner = PgAuditStore::new(self.pool.clone());
            let processed = process_audit_queue(&inner, &self.pool).await?;
            self.inner_processed.store(processed, Ordering::SeqCst);
        }
        PgAuditStore::new(self.pool.clone()).append(entry).await
    }
}

fn sample_entry(actor_id: i64, action: &str) -> CreateAuditLog {
    CreateAuditLog {
        actor_id,
        action: action.to_string(),
        target_type: Some("post".to_string()),
        target_id: Some(7),
        reason: None,
        metadata: Some(json!({"case_id": 1})),
        created_at: None,
    }
}

// ---------------------------------------------------------------------------
// Write path
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_direct_write_reaches_primary_log(pool: PgPool) {
    let writer = AuditWriter::new(Arc::new(PgAuditStore::new(pool.clone())), pool.clone());

    let outcome = writer.write(sample_entry(1, "test.direct")).await.unwrap();
    assert!(!outcome.queued);

    let logs = AuditLogRepo::list_by_action(&pool, "test.direct", 10)
        .await
        .unwrap();
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].actor_id, 1);

    assert_eq!(AuditQueueRepo::count(&pool).await.unwrap(), 0);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_failed_write_falls_back_to_queue(pool: PgPool) {
    let writer = AuditWriter::new(Arc::new(FailingAuditStore), pool.clone());

    let outcome = writer.write(sample_entry(1, "test.queued")).await.unwrap();
    assert!(outcome.queued);

    // Entry is staged, not lost -- and not in the primary log.
    assert_eq!(AuditQueueRepo::count(&pool).await.unwrap(), 1);
    let logs = AuditLogRepo::list_by_action(&pool, "test.queued", 10)
        .await
        .unwrap();
    assert!(logs.is_empty());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_sensitive_metadata_is_redacted(pool: PgPool) {
    let writer = AuditWriter::new(Arc::new(PgAuditStore::new(pool.clone())), pool.clone());

    let mut entry = sample_entry(1, "test.redacted");
    entry.metadata = Some(json!({
        "session_token": "super-secret",
        "context": {"api_key": "abc", "case_id": 9}
    }));
    writer.write(entry).await.unwrap();

    let logs = AuditLogRepo::list_by_action(&pool, "test.redacted", 10)
        .await
        .unwrap();
    let metadata = logs[0].metadata.as_ref().unwrap();
    assert_eq!(metadata["session_token"], "[REDACTED]");
    assert_eq!(metadata["context"]["api_key"], "[REDACTED]");
    assert_eq!(metadata["context"]["case_id"], 9);
}

// ---------------------------------------------------------------------------
// Queue replay
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_replay_preserves_original_event_time(pool: PgPool) {
    let failing_writer = AuditWriter::new(Arc::new(FailingAuditStore), pool.clone());
    failing_writer
        .write(sample_entry(1, "test.replayed"))
        .await
        .unwrap();

    let staged = &AuditQueueRepo::list_replayable(&pool, MAX_REPLAY_ATTEMPTS)
        .await
        .unwrap()[0];
    let original_time = staged.created_at;

    let store = PgAuditStore::new(pool.clone());
    let processed = process_audit_queue(&store, &pool).await.unwrap();
    assert_eq!(processed, 1);
    assert_eq!(AuditQueueRepo::count(&pool).await.unwrap(), 0);

    let logs = AuditLogRepo::list_by_action(&pool, "test.replayed", 10)
        .await
        .unwrap();
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].created_at, original_time);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_replay_is_oldest_first(pool: PgPool) {
    // Stage two entries and force distinct, out-of-insertion-order times.
    for action in ["test.second", "test.first"] {
        AuditQueueRepo::create(&pool, &sample_entry(1, action))
            .await
            .unwrap();
    }
    sqlx::query(
        "UPDATE audit_queue_entries SET created_at = now() - interval '1 hour'
         WHERE action = 'test.first'",
    )
    .execute(&pool)
    .await
    .unwrap();

    let store = RecordingAuditStore::new();
    let processed = process_audit_queue(&store, &pool).await.unwrap();
    assert_eq!(processed, 2);

    let seen = store.seen.lock().unwrap().clone();
    assert_eq!(seen, vec!["test.first", "test.second"]);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_replay_budget_exhaustion_drops_entry(pool: PgPool) {
    AuditQueueRepo::create(&pool, &sample_entry(1, "test.doomed"))
        .await
        .unwrap();

    // Every sweep fails; the entry survives until the attempt budget is
    // spent, then the sweep purges it.
    for sweep in 1..=MAX_REPLAY_ATTEMPTS {
        let processed = process_audit_queue(&FailingAuditStore, &pool).await.unwrap();
        assert_eq!(processed, 0, "sweep {sweep} must not report success");
    }

    assert_eq!(AuditQueueRepo::count(&pool).await.unwrap(), 0);
    let logs = AuditLogRepo::list_by_action(&pool, "test.doomed", 10)
        .await
        .unwrap();
    assert!(logs.is_empty(), "a dropped entry never reaches the log");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_overlapping_sweeps_replay_entry_once(pool: PgPool) {
    AuditQueueRepo::create(&pool, &sample_entry(1, "test.once"))
        .await
        .unwrap();

    // The competing sweep fires while the first sweep is mid-entry, after
    // it has listed the queue but before the replayed write lands.
    let store = OverlappingSweepStore::new(pool.clone());
    let processed = process_audit_queue(&store, &pool).await.unwrap();

    assert_eq!(processed, 1);
    assert_eq!(
        store.inner_processed.load(Ordering::SeqCst),
        0,
        "the competing sweep must yield instead of replaying"
    );
    assert_eq!(AuditQueueRepo::count(&pool).await.unwrap(), 0);

    let logs = AuditLogRepo::list_by_action(&pool, "test.once", 10)
        .await
        .unwrap();
    assert_eq!(logs.len(), 1, "a queue entry is replayed exactly once");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_failed_replay_keeps_entry_with_attempt_count(pool: PgPool) {
    AuditQueueRepo::create(&pool, &sample_entry(1, "test.retrying"))
        .await
        .unwrap();

    process_audit_queue(&FailingAuditStore, &pool).await.unwrap();

    let entries = AuditQueueRepo::list_replayable(&pool, MAX_REPLAY_ATTEMPTS)
        .await
        .unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].attempts, 1);
    assert!(entries[0].last_attempt.is_some());

    // A now-healthy store picks the entry up on the next sweep.
    let store = PgAuditStore::new(pool.clone());
    let processed = process_audit_queue(&store, &pool).await.unwrap();
    assert_eq!(processed, 1);
}

// ---------------------------------------------------------------------------
// HTTP surface
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_decision_leaves_audit_trail(pool: PgPool) {
    let post_id = seed_post(&pool, 100).await;
    let app = build_test_app(pool);

    let response = post_json(
        &app,
        "/api/v1/moderation/reports",
        1,
        json!({"content_type": "post", "content_id": post_id}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let case_id = body_json(response).await["data"]["id"].as_i64().unwrap();

    let response = post_json(
        &app,
        &format!("/api/v1/moderation/cases/{case_id}/decision"),
        50,
        json!({"action": "reject", "justification": "policy violation"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    // Both the report submission and the resolution are on the trail.
    let path = format!("/api/v1/audit/logs?action={}", actions::CASE_RESOLVED);
    let response = get(&app, &path, 50).await;
    assert_eq!(response.status(), StatusCode::OK);

    let page = body_json(response).await["data"].clone();
    assert_eq!(page["total"], 1);
    let entry = &page["items"][0];
    assert_eq!(entry["actor_id"], 50);
    assert_eq!(entry["target_id"], case_id);
    assert_eq!(entry["reason"], "policy violation");
    assert_eq!(entry["metadata"]["moderation_action"], "reject");

    let path = format!("/api/v1/audit/logs?action={}", actions::REPORT_SUBMITTED);
    let response = get(&app, &path, 50).await;
    let page = body_json(response).await["data"].clone();
    assert_eq!(page["total"], 1);
    assert_eq!(page["items"][0]["actor_id"], 1);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_content_removal_is_audited(pool: PgPool) {
    let post_id = seed_post(&pool, 100).await;
    let app = build_test_app(pool);

    let response = post_json(
        &app,
        "/api/v1/moderation/reports",
        1,
        json!({"content_type": "post", "content_id": post_id}),
    )
    .await;
    let case_id = body_json(response).await["data"]["id"].as_i64().unwrap();

    let response = post_json(
        &app,
        &format!("/api/v1/moderation/cases/{case_id}/decision"),
        50,
        json!({"action": "delete", "justification": "spam content"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    // The removal gets its own trail entry, targeting the content rather
    // than the case.
    let path = format!("/api/v1/audit/logs?action={}", actions::CONTENT_SOFT_DELETED);
    let response = get(&app, &path, 50).await;
    let page = body_json(response).await["data"].clone();
    assert_eq!(page["total"], 1);
    let entry = &page["items"][0];
    assert_eq!(entry["actor_id"], 50);
    assert_eq!(entry["target_type"], "post");
    assert_eq!(entry["target_id"], post_id);
    assert_eq!(entry["metadata"]["case_id"], case_id);
    assert!(entry["metadata"]["tombstone_id"].as_i64().is_some());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_retention_purge_is_audited(pool: PgPool) {
    use chrono::Duration;
    use pawlink_core::audit::SYSTEM_ACTOR_ID;
    use pawlink_db::models::soft_delete::CreateSoftDelete;
    use pawlink_db::repositories::SoftDeleteRepo;

    let expired = CreateSoftDelete {
        content_type: "post".to_string(),
        content_id: 1,
        deleted_by: 50,
        reason: "old".to_string(),
        expires_at: Utc::now() - Duration::days(1),
        metadata: None,
    };
    SoftDeleteRepo::create(&pool, &expired).await.unwrap();

    let app = build_test_app(pool);

    let response = post_empty(&app, "/api/v1/admin/jobs/soft-delete-cleanup", 50).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["purged"], 1);

    let path = format!("/api/v1/audit/logs?action={}", actions::SOFT_DELETE_PURGED);
    let response = get(&app, &path, 50).await;
    let page = body_json(response).await["data"].clone();
    assert_eq!(page["total"], 1);
    let entry = &page["items"][0];
    assert_eq!(entry["actor_id"], SYSTEM_ACTOR_ID);
    assert_eq!(entry["metadata"]["purged"], 1);

    // A purge with nothing expired leaves no entry behind.
    let response = post_empty(&app, "/api/v1/admin/jobs/soft-delete-cleanup", 50).await;
    assert_eq!(body_json(response).await["data"]["purged"], 0);
    let response = get(&app, &path, 50).await;
    assert_eq!(body_json(response).await["data"]["total"], 1);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_audit_search_filters_by_actor(pool: PgPool) {
    AuditLogRepo::create(&pool, &sample_entry(1, "test.one"))
        .await
        .unwrap();
    AuditLogRepo::create(&pool, &sample_entry(2, "test.two"))
        .await
        .unwrap();

    let app = build_test_app(pool);

    let response = get(&app, "/api/v1/audit/logs?actor_id=2", 50).await;
    assert_eq!(response.status(), StatusCode::OK);
    let page = body_json(response).await["data"].clone();
    assert_eq!(page["total"], 1);
    assert_eq!(page["items"][0]["action"], "test.two");

    let response = get(&app, "/api/v1/audit/logs/actor/1", 50).await;
    let items = body_json(response).await["data"].clone();
    assert_eq!(items.as_array().unwrap().len(), 1);
    assert_eq!(items[0]["action"], "test.one");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_audit_target_listing(pool: PgPool) {
    let mut entry = sample_entry(1, "test.targeted");
    entry.target_type = Some("comment".to_string());
    entry.target_id = Some(33);
    AuditLogRepo::create(&pool, &entry).await.unwrap();
    AuditLogRepo::create(&pool, &sample_entry(1, "test.other"))
        .await
        .unwrap();

    let app = build_test_app(pool);

    let response = get(&app, "/api/v1/audit/logs/target/comment/33", 50).await;
    assert_eq!(response.status(), StatusCode::OK);
    let items = body_json(response).await["data"].clone();
    assert_eq!(items.as_array().unwrap().len(), 1);
    assert_eq!(items[0]["action"], "test.targeted");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_audit_queue_sweep_job(pool: PgPool) {
    AuditQueueRepo::create(&pool, &sample_entry(1, "test.via_job"))
        .await
        .unwrap();

    let app = build_test_app(pool.clone());

    let response = post_empty(&app, "/api/v1/admin/jobs/audit-queue", 50).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["processed"], 1);

    assert_eq!(AuditQueueRepo::count(&pool).await.unwrap(), 0);
    let logs = AuditLogRepo::list_by_action(&pool, "test.via_job", 10)
        .await
        .unwrap();
    assert_eq!(logs.len(), 1);
}
