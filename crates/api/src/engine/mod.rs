//! Moderation engine.
//!
//! Contains the audit writer (direct-write-then-queue resilience and the
//! replay sweep) and the moderation pipeline itself (report intake,
//! decision processing, assignment, bulk decisions).

pub mod audit;
pub mod moderation;
