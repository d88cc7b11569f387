//! Moderation pipeline: report intake, assignment, and decision processing.
//!
//! Correctness under concurrency comes from the storage layer, not from
//! in-process coordination: reporter de-duplication and priority escalation
//! are a single conditional UPDATE, case resolution is a compare-and-set on
//! `status` backed by a unique constraint on the action log, and the open
//! case per content is enforced by a partial unique index.

use pawlink_core::audit::{actions, target_types};
use pawlink_core::error::CoreError;
use pawlink_core::moderation::{
    initial_priority, validate_justification, CaseStatus, ContentType, ModerationAction,
};
use pawlink_core::types::DbId;
use pawlink_db::models::action_log::{CreateActionLog, ModerationActionLog};
use pawlink_db::models::audit::CreateAuditLog;
use pawlink_db::models::case::{CreateCase, ModerationCase};
use pawlink_db::models::soft_delete::CreateSoftDelete;
use pawlink_db::repositories::{ActionLogRepo, CaseRepo, ContentRepo, SoftDeleteRepo};
use pawlink_db::DbPool;
use serde::{Deserialize, Serialize};

use crate::engine::audit::AuditWriter;
use crate::error::AppError;

// ---------------------------------------------------------------------------
// Report intake
// ---------------------------------------------------------------------------

/// One incoming report against a piece of content.
#[derive(Debug, Clone)]
pub struct SubmitReport {
    pub content_type: ContentType,
    pub content_id: DbId,
    pub reporter_id: DbId,
    pub auto_flagged: bool,
    pub auto_reason: Option<String>,
    /// External ML signal, 0-100. Consumed, never computed here.
    pub ai_score: Option<f64>,
}

/// Add a report to the moderation queue.
///
/// Creates a case on first report, or folds the reporter into the existing
/// open case (duplicate reports from the same user never inflate the
/// count). A report against content whose case is already resolved returns
/// the resolved case unchanged -- resolved cases are never reopened.
pub async fn submit_report(
    pool: &DbPool,
    audit: &AuditWriter,
    req: SubmitReport,
) -> Result<ModerationCase, AppError> {
    if let Some(score) = req.ai_score {
        if !(0.0..=100.0).contains(&score) {
            return Err(CoreError::Validation(format!(
                "ai_score must be between 0 and 100, got {score}"
            ))
            .into());
        }
    }

    let content_type = req.content_type.as_str();

    // Fold into the open case if one exists.
    if let Some(open) = CaseRepo::find_open_by_content(pool, content_type, req.content_id).await? {
        return match CaseRepo::add_reporter(pool, open.id, req.reporter_id).await? {
            Some(updated) => {
                audit_report(audit, &req, &updated).await;
                Ok(updated)
            }
            // Duplicate reporter: nothing changed.
            None => Ok(open),
        };
    }

    // No open case. A resolved case for the same content is returned as-is
    // without reopening it.
    if let Some(latest) =
        CaseRepo::find_latest_by_content(pool, content_type, req.content_id).await?
    {
        if CaseStatus::parse(&latest.status) == Some(CaseStatus::Resolved) {
            return Ok(latest);
        }
    }

    let create = CreateCase {
        content_type: content_type.to_string(),
        content_id: req.content_id,
        reporter_id: req.reporter_id,
        priority: initial_priority(req.ai_score).as_str().to_string(),
        auto_flagged: req.auto_flagged,
        auto_reason: req.auto_reason.clone(),
        ai_score: req.ai_score,
    };

    match CaseRepo::create(pool, &create).await {
        Ok(case) => {
            audit_report(audit, &req, &case).await;
            Ok(case)
        }
        // Lost a creation race: another reporter opened the case first.
        // Fold into theirs instead.
        Err(err) if is_unique_violation(&err, "uq_moderation_cases_open_content") => {
            let open = CaseRepo::find_open_by_content(pool, content_type, req.content_id)
                .await?
                .ok_or_else(|| {
                    AppError::InternalError(
                        "Open case vanished after unique violation on creation".into(),
                    )
                })?;
            match CaseRepo::add_reporter(pool, open.id, req.reporter_id).await? {
                Some(updated) => {
                    audit_report(audit, &req, &updated).await;
                    Ok(updated)
                }
                None => Ok(open),
            }
        }
        Err(err) => Err(err.into()),
    }
}

/// Best-effort audit entry for a submitted report.
async fn audit_report(audit: &AuditWriter, req: &SubmitReport, case: &ModerationCase) {
    audit
        .write_best_effort(CreateAuditLog {
            actor_id: req.reporter_id,
            action: actions::REPORT_SUBMITTED.to_string(),
            target_type: Some(req.content_type.as_str().to_string()),
            target_id: Some(req.content_id),
            reason: req.auto_reason.clone(),
            metadata: Some(serde_json::json!({
                "case_id": case.id,
                "report_count": case.report_count,
                "priority": case.priority,
                "auto_flagged": req.auto_flagged,
            })),
            created_at: None,
        })
        .await;
}

// ---------------------------------------------------------------------------
// Assignment
// ---------------------------------------------------------------------------

/// Assign a case to a moderator.
///
/// A `pending` case moves to `in_review`; re-assigning an `in_review` case
/// is allowed. Fails only when the case does not exist.
pub async fn assign(
    pool: &DbPool,
    audit: &AuditWriter,
    case_id: DbId,
    moderator_id: DbId,
) -> Result<ModerationCase, AppError> {
    let case = CaseRepo::assign(pool, case_id, moderator_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "moderation case",
            id: case_id,
        })?;

    audit
        .write_best_effort(CreateAuditLog {
            actor_id: moderator_id,
            action: actions::CASE_ASSIGNED.to_string(),
            target_type: Some(target_types::MODERATION_CASE.to_string()),
            target_id: Some(case_id),
            reason: None,
            metadata: None,
            created_at: None,
        })
        .await;

    Ok(case)
}

// ---------------------------------------------------------------------------
// Decision processing
// ---------------------------------------------------------------------------

/// Apply a moderator's decision to a case.
///
/// Validation order: justification, case existence, case still open,
/// content still resolvable. Nothing is written until all checks pass.
///
/// On success the action log entry is written first, then the case is
/// resolved via compare-and-set; the two steps are sequential, not atomic,
/// and the unique constraint on `case_id` plus the CAS guarantee that two
/// concurrent calls produce exactly one success and one
/// [`CoreError::AlreadyResolved`].
///
/// Audit-trail recording is best-effort and never rolls back the decision.
pub async fn process_decision(
    pool: &DbPool,
    audit: &AuditWriter,
    retention_days: i64,
    case_id: DbId,
    action: ModerationAction,
    performed_by: DbId,
    justification: &str,
) -> Result<ModerationActionLog, AppError> {
    validate_justification(justification)?;

    let case = CaseRepo::find_by_id(pool, case_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "moderation case",
            id: case_id,
        })?;

    let status = CaseStatus::parse(&case.status).ok_or_else(|| {
        AppError::InternalError(format!("Case {case_id} has unknown status '{}'", case.status))
    })?;
    if !status.is_open() {
        return Err(CoreError::AlreadyResolved { case_id }.into());
    }

    if !ContentRepo::exists(pool, &case.content_type, case.content_id).await? {
        return Err(CoreError::ContentNotFound {
            content_type: case.content_type.clone(),
            content_id: case.content_id,
        }
        .into());
    }

    // Authoritative record first. The unique constraint on case_id makes
    // this the point where a concurrent racer loses.
    let log_input = CreateActionLog {
        case_id,
        action: action.as_str().to_string(),
        performed_by,
        justification: justification.to_string(),
        metadata: Some(serde_json::json!({
            "content_type": case.content_type,
            "content_id": case.content_id,
            "ai_score": case.ai_score,
            "report_count": case.report_count,
        })),
    };
    let log = match ActionLogRepo::create(pool, &log_input).await {
        Ok(log) => log,
        Err(err) if is_unique_violation(&err, "uq_moderation_action_logs_case") => {
            return Err(CoreError::AlreadyResolved { case_id }.into());
        }
        Err(err) => return Err(err.into()),
    };

    // Terminal transition; matches zero rows if a racer got here first.
    if CaseRepo::resolve(pool, case_id, justification).await?.is_none() {
        return Err(CoreError::AlreadyResolved { case_id }.into());
    }

    if action.removes_content() {
        let tombstone = CreateSoftDelete {
            content_type: case.content_type.clone(),
            content_id: case.content_id,
            deleted_by: performed_by,
            reason: justification.to_string(),
            expires_at: chrono::Utc::now() + chrono::Duration::days(retention_days),
            metadata: Some(serde_json::json!({
                "case_id": case_id,
                "action_log_id": log.id,
                "action": action.as_str(),
            })),
        };
        let record = SoftDeleteRepo::create(pool, &tombstone).await?;

        audit
            .write_best_effort(CreateAuditLog {
                actor_id: performed_by,
                action: actions::CONTENT_SOFT_DELETED.to_string(),
                target_type: Some(case.content_type.clone()),
                target_id: Some(case.content_id),
                reason: Some(justification.to_string()),
                metadata: Some(serde_json::json!({
                    "case_id": case_id,
                    "tombstone_id": record.id,
                    "expires_at": record.expires_at,
                })),
                created_at: None,
            })
            .await;
    }

    audit
        .write_best_effort(CreateAuditLog {
            actor_id: performed_by,
            action: actions::CASE_RESOLVED.to_string(),
            target_type: Some(target_types::MODERATION_CASE.to_string()),
            target_id: Some(case_id),
            reason: Some(justification.to_string()),
            metadata: Some(serde_json::json!({
                "moderation_action": action.as_str(),
                "content_type": case.content_type,
                "content_id": case.content_id,
            })),
            created_at: None,
        })
        .await;

    Ok(log)
}

// ---------------------------------------------------------------------------
// Bulk decisions
// ---------------------------------------------------------------------------

/// One item in a bulk decision request.
#[derive(Debug, Clone, Deserialize)]
pub struct BulkDecisionItem {
    pub case_id: DbId,
    pub action: ModerationAction,
    pub justification: String,
}

/// Per-item failure in a bulk decision.
#[derive(Debug, Clone, Serialize)]
pub struct BulkError {
    pub case_id: DbId,
    pub error: String,
}

/// Outcome of a bulk decision request. Partial success is expected.
#[derive(Debug, Clone, Serialize)]
pub struct BulkOutcome {
    pub success: u64,
    pub failed: u64,
    pub errors: Vec<BulkError>,
}

/// Apply decisions to many cases, each in its own failure domain.
///
/// One item's failure never blocks or rolls back the others; failures are
/// reported per item.
pub async fn process_bulk(
    pool: &DbPool,
    audit: &AuditWriter,
    retention_days: i64,
    performed_by: DbId,
    items: Vec<BulkDecisionItem>,
) -> BulkOutcome {
    let mut outcome = BulkOutcome {
        success: 0,
        failed: 0,
        errors: Vec::new(),
    };

    for item in items {
        match process_decision(
            pool,
            audit,
            retention_days,
            item.case_id,
            item.action,
            performed_by,
            &item.justification,
        )
        .await
        {
            Ok(_) => outcome.success += 1,
            Err(err) => {
                outcome.failed += 1;
                outcome.errors.push(BulkError {
                    case_id: item.case_id,
                    error: err.to_string(),
                });
            }
        }
    }

    outcome
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Whether a sqlx error is a Postgres unique violation on `constraint`.
fn is_unique_violation(err: &sqlx::Error, constraint: &str) -> bool {
    match err {
        sqlx::Error::Database(db_err) => {
            db_err.code().as_deref() == Some("23505")
                && db_err.constraint() == Some(constraint)
        }
        _ => false,
    }
}
