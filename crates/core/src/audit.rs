//! Audit trail vocabulary and metadata hygiene.
//!
//! This module lives in `core` (zero internal deps) so the action and
//! target-type constants stay consistent between the API layer, the replay
//! sweep, and audit queries.

// ---------------------------------------------------------------------------
// Action constants
// ---------------------------------------------------------------------------

/// Known action strings for audit log entries. The `action` column is
/// free-form; these are the values the moderation pipeline itself writes.
pub mod actions {
    pub const REPORT_SUBMITTED: &str = "moderation.report_submitted";
    pub const CASE_ASSIGNED: &str = "moderation.case_assigned";
    pub const CASE_RESOLVED: &str = "moderation.case_resolved";
    pub const CONTENT_SOFT_DELETED: &str = "moderation.content_soft_deleted";
    pub const SOFT_DELETE_PURGED: &str = "moderation.soft_delete_purged";
}

/// Actor recorded on audit entries written by background jobs rather than a
/// signed-in user.
pub const SYSTEM_ACTOR_ID: crate::types::DbId = 0;

// ---------------------------------------------------------------------------
// Target-type constants
// ---------------------------------------------------------------------------

/// Known target types for audit log entries. Content targets use the
/// `ContentType::as_str` value directly rather than a constant here.
pub mod target_types {
    pub const MODERATION_CASE: &str = "moderation_case";
}

// ---------------------------------------------------------------------------
// Sensitive field redaction
// ---------------------------------------------------------------------------

/// Fields redacted from audit metadata before storage.
pub const SENSITIVE_FIELDS: &[&str] = &[
    "password",
    "token",
    "secret",
    "access_token",
    "refresh_token",
    "api_key",
    "session_token",
    "authorization",
];

/// Redact sensitive fields from a JSON value before it is written to the
/// audit trail. Matching keys (substring, case-insensitive) are replaced
/// with `"[REDACTED]"`; objects and arrays are walked recursively.
pub fn redact_sensitive_fields(value: &serde_json::Value) -> serde_json::Value {
    match value {
        serde_json::Value::Object(map) => {
            let mut redacted = serde_json::Map::new();
            for (key, val) in map {
                let lower_key = key.to_lowercase();
                if SENSITIVE_FIELDS.iter().any(|f| lower_key.contains(f)) {
                    redacted.insert(
                        key.clone(),
                        serde_json::Value::String("[REDACTED]".to_string()),
                    );
                } else {
                    redacted.insert(key.clone(), redact_sensitive_fields(val));
                }
            }
            serde_json::Value::Object(redacted)
        }
        serde_json::Value::Array(arr) => {
            serde_json::Value::Array(arr.iter().map(redact_sensitive_fields).collect())
        }
        other => other.clone(),
    }
}
