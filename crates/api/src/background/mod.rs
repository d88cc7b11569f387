//! Background tasks and scheduled jobs.
//!
//! Each submodule provides a long-running async function intended to be
//! spawned via `tokio::spawn`. All tasks accept a [`CancellationToken`]
//! for graceful shutdown. The same sweeps can be triggered on demand
//! through the admin job endpoints for deployments that prefer external
//! cron scheduling.
//!
//! [`CancellationToken`]: tokio_util::sync::CancellationToken

pub mod audit_queue;
pub mod retention;
