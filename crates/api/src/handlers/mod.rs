//! Request handlers.
//!
//! Each submodule provides async handler functions for one surface of the
//! moderation pipeline. Handlers delegate to the engine and repositories
//! and map errors via [`AppError`].
//!
//! [`AppError`]: crate::error::AppError

pub mod audit;
pub mod jobs;
pub mod moderation;
