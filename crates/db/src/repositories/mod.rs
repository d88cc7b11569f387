//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod action_log_repo;
pub mod audit_log_repo;
pub mod audit_queue_repo;
pub mod case_repo;
pub mod content_repo;
pub mod soft_delete_repo;

pub use action_log_repo::ActionLogRepo;
pub use audit_log_repo::AuditLogRepo;
pub use audit_queue_repo::AuditQueueRepo;
pub use case_repo::CaseRepo;
pub use content_repo::ContentRepo;
pub use soft_delete_repo::SoftDeleteRepo;
