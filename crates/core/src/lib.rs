//! Pawlink core domain logic.
//!
//! Zero-I/O building blocks shared by the repository layer, the API server,
//! and any future worker or CLI tooling: common type aliases, the domain
//! error taxonomy, moderation policy (enums, escalation thresholds,
//! justification rules), and audit action vocabulary.

pub mod audit;
pub mod error;
pub mod moderation;
pub mod types;
