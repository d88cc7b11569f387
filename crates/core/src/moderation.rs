//! Moderation policy: content/action/priority/status vocabulary and the
//! pure decision rules applied by the queue and decision engine.
//!
//! Everything here is side-effect free. Escalation thresholds are mirrored
//! by the SQL in `CaseRepo::add_reporter`; this module is the reference
//! implementation the repository layer must agree with.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// How long a tombstone is kept before the retention sweep hard-deletes it.
pub const SOFT_DELETE_RETENTION_DAYS: i64 = 90;

/// Replay budget for queued audit writes. Entries that fail this many times
/// are dropped (accepted data-loss boundary).
pub const MAX_REPLAY_ATTEMPTS: i32 = 5;

/// Report-count thresholds for priority escalation.
pub const URGENT_REPORT_THRESHOLD: i64 = 10;
pub const HIGH_REPORT_THRESHOLD: i64 = 5;
pub const MEDIUM_REPORT_THRESHOLD: i64 = 2;

/// AI score above which a brand-new case starts at `High` priority.
pub const AI_SCORE_HIGH_THRESHOLD: f64 = 80.0;

// ---------------------------------------------------------------------------
// Content types
// ---------------------------------------------------------------------------

/// The kinds of user content that can be reported for moderation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    Post,
    Comment,
    Media,
    WikiRevision,
}

impl ContentType {
    pub const ALL: &'static [ContentType] = &[
        ContentType::Post,
        ContentType::Comment,
        ContentType::Media,
        ContentType::WikiRevision,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Post => "post",
            ContentType::Comment => "comment",
            ContentType::Media => "media",
            ContentType::WikiRevision => "wiki_revision",
        }
    }

    pub fn parse(s: &str) -> Option<ContentType> {
        match s {
            "post" => Some(ContentType::Post),
            "comment" => Some(ContentType::Comment),
            "media" => Some(ContentType::Media),
            "wiki_revision" => Some(ContentType::WikiRevision),
            _ => None,
        }
    }
}

impl std::fmt::Display for ContentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Moderation actions
// ---------------------------------------------------------------------------

/// A moderator's decision on a case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModerationAction {
    Approve,
    Reject,
    Redact,
    Delete,
}

impl ModerationAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModerationAction::Approve => "approve",
            ModerationAction::Reject => "reject",
            ModerationAction::Redact => "redact",
            ModerationAction::Delete => "delete",
        }
    }

    pub fn parse(s: &str) -> Option<ModerationAction> {
        match s {
            "approve" => Some(ModerationAction::Approve),
            "reject" => Some(ModerationAction::Reject),
            "redact" => Some(ModerationAction::Redact),
            "delete" => Some(ModerationAction::Delete),
            _ => None,
        }
    }

    /// Whether applying this action removes content and therefore creates a
    /// tombstone.
    pub fn removes_content(&self) -> bool {
        matches!(self, ModerationAction::Redact | ModerationAction::Delete)
    }
}

impl std::fmt::Display for ModerationAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Case priority
// ---------------------------------------------------------------------------

/// Case priority, derived from report volume (and the AI score at creation).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CasePriority {
    Low,
    Medium,
    High,
    Urgent,
}

impl CasePriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            CasePriority::Low => "low",
            CasePriority::Medium => "medium",
            CasePriority::High => "high",
            CasePriority::Urgent => "urgent",
        }
    }

    pub fn parse(s: &str) -> Option<CasePriority> {
        match s {
            "low" => Some(CasePriority::Low),
            "medium" => Some(CasePriority::Medium),
            "high" => Some(CasePriority::High),
            "urgent" => Some(CasePriority::Urgent),
            _ => None,
        }
    }

    /// Numeric rank used for queue sorting (urgent = 4 ... low = 1).
    pub fn rank(&self) -> i32 {
        match self {
            CasePriority::Low => 1,
            CasePriority::Medium => 2,
            CasePriority::High => 3,
            CasePriority::Urgent => 4,
        }
    }
}

impl std::fmt::Display for CasePriority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Case status
// ---------------------------------------------------------------------------

/// Lifecycle status of a moderation case. `Resolved` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseStatus {
    Pending,
    InReview,
    Resolved,
}

impl CaseStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CaseStatus::Pending => "pending",
            CaseStatus::InReview => "in_review",
            CaseStatus::Resolved => "resolved",
        }
    }

    pub fn parse(s: &str) -> Option<CaseStatus> {
        match s {
            "pending" => Some(CaseStatus::Pending),
            "in_review" => Some(CaseStatus::InReview),
            "resolved" => Some(CaseStatus::Resolved),
            _ => None,
        }
    }

    /// Whether a case in this status can still accept reports or decisions.
    pub fn is_open(&self) -> bool {
        !matches!(self, CaseStatus::Resolved)
    }
}

impl std::fmt::Display for CaseStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Policy functions
// ---------------------------------------------------------------------------

/// Recompute a case's priority after its report count changed.
///
/// Thresholds: 10+ reports is urgent, 5+ high, 2+ medium. Below that the
/// priority stays where it was (a case created at `High` from an AI flag is
/// never downgraded). The result never ranks below `current`.
pub fn escalated_priority(report_count: i64, current: CasePriority) -> CasePriority {
    let escalated = if report_count >= URGENT_REPORT_THRESHOLD {
        CasePriority::Urgent
    } else if report_count >= HIGH_REPORT_THRESHOLD {
        CasePriority::High
    } else if report_count >= MEDIUM_REPORT_THRESHOLD {
        CasePriority::Medium
    } else {
        current
    };

    if escalated.rank() >= current.rank() {
        escalated
    } else {
        current
    }
}

/// Priority for a brand-new case. High-confidence AI flags jump the queue.
pub fn initial_priority(ai_score: Option<f64>) -> CasePriority {
    match ai_score {
        Some(score) if score > AI_SCORE_HIGH_THRESHOLD => CasePriority::High,
        _ => CasePriority::Low,
    }
}

/// Every decision requires a human-readable justification. Empty or
/// whitespace-only strings are rejected before any state change.
pub fn validate_justification(justification: &str) -> Result<(), CoreError> {
    if justification.trim().is_empty() {
        return Err(CoreError::Validation(
            "Justification is required for every moderation decision".into(),
        ));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // -----------------------------------------------------------------------
    // Enum round-trips
    // -----------------------------------------------------------------------

    #[test]
    fn content_type_parse_round_trip() {
        for ct in ContentType::ALL {
            assert_eq!(ContentType::parse(ct.as_str()), Some(*ct));
        }
    }

    #[test]
    fn content_type_rejects_unknown() {
        assert_eq!(ContentType::parse("group"), None);
    }

    #[test]
    fn action_parse_round_trip() {
        for action in [
            ModerationAction::Approve,
            ModerationAction::Reject,
            ModerationAction::Redact,
            ModerationAction::Delete,
        ] {
            assert_eq!(ModerationAction::parse(action.as_str()), Some(action));
        }
    }

    #[test]
    fn redact_and_delete_remove_content() {
        assert!(ModerationAction::Redact.removes_content());
        assert!(ModerationAction::Delete.removes_content());
        assert!(!ModerationAction::Approve.removes_content());
        assert!(!ModerationAction::Reject.removes_content());
    }

    #[test]
    fn resolved_is_terminal() {
        assert!(CaseStatus::Pending.is_open());
        assert!(CaseStatus::InReview.is_open());
        assert!(!CaseStatus::Resolved.is_open());
    }

    // -----------------------------------------------------------------------
    // Priority escalation
    // -----------------------------------------------------------------------

    #[test]
    fn single_report_keeps_initial_priority() {
        assert_eq!(escalated_priority(1, CasePriority::Low), CasePriority::Low);
        assert_eq!(escalated_priority(1, CasePriority::High), CasePriority::High);
    }

    #[test]
    fn two_reports_escalate_to_medium() {
        assert_eq!(
            escalated_priority(2, CasePriority::Low),
            CasePriority::Medium
        );
    }

    #[test]
    fn five_reports_escalate_to_high() {
        assert_eq!(
            escalated_priority(5, CasePriority::Medium),
            CasePriority::High
        );
    }

    #[test]
    fn ten_reports_escalate_to_urgent() {
        assert_eq!(
            escalated_priority(10, CasePriority::High),
            CasePriority::Urgent
        );
    }

    #[test]
    fn priority_never_decreases() {
        // An AI-flagged case starts High; two human reports must not drop it
        // back to Medium.
        assert_eq!(
            escalated_priority(2, CasePriority::High),
            CasePriority::High
        );
        assert_eq!(
            escalated_priority(3, CasePriority::Urgent),
            CasePriority::Urgent
        );
    }

    #[test]
    fn escalation_sequence_is_monotonic() {
        let mut priority = CasePriority::Low;
        let mut last_rank = priority.rank();
        for count in 1..=12 {
            priority = escalated_priority(count, priority);
            assert!(priority.rank() >= last_rank, "rank dropped at count {count}");
            last_rank = priority.rank();
        }
        assert_eq!(priority, CasePriority::Urgent);
    }

    // -----------------------------------------------------------------------
    // Initial priority
    // -----------------------------------------------------------------------

    #[test]
    fn high_ai_score_starts_high() {
        assert_eq!(initial_priority(Some(92.5)), CasePriority::High);
    }

    #[test]
    fn boundary_ai_score_stays_low() {
        // Strictly greater than 80 is required.
        assert_eq!(initial_priority(Some(80.0)), CasePriority::Low);
    }

    #[test]
    fn missing_ai_score_starts_low() {
        assert_eq!(initial_priority(None), CasePriority::Low);
    }

    // -----------------------------------------------------------------------
    // Justification validation
    // -----------------------------------------------------------------------

    #[test]
    fn empty_justification_rejected() {
        assert!(validate_justification("").is_err());
    }

    #[test]
    fn whitespace_justification_rejected() {
        assert!(validate_justification("   \t\n").is_err());
    }

    #[test]
    fn non_empty_justification_accepted() {
        assert!(validate_justification("Spam").is_ok());
    }
}
