//! Domain error taxonomy.
//!
//! `CoreError` is the single error type crossing the engine/repository
//! boundary. HTTP mapping lives in the API crate (`AppError`); nothing in
//! here knows about status codes.

use crate::types::DbId;

/// Errors produced by domain-level operations.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// A referenced entity does not exist.
    #[error("{entity} with id {id} not found")]
    NotFound { entity: &'static str, id: DbId },

    /// Malformed or missing input, rejected before any mutation.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// The case is already terminal; the decision was applied at most once
    /// by an earlier call. Callers should treat this as "already handled".
    #[error("Moderation case {case_id} is already resolved")]
    AlreadyResolved { case_id: DbId },

    /// The reported content vanished between report and decision.
    #[error("Content {content_type}/{content_id} not found")]
    ContentNotFound {
        content_type: String,
        content_id: DbId,
    },

    /// Conflicting concurrent write.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Caller identity missing or invalid.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Unexpected internal failure.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Convenience alias for domain-level results.
pub type CoreResult<T> = Result<T, CoreError>;
