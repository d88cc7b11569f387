//! Pawlink moderation API server library.
//!
//! Exposes the core building blocks (config, state, error handling, the
//! moderation engine, background sweeps, routes) so integration tests and
//! the binary entrypoint can both access them.

pub mod background;
pub mod config;
pub mod engine;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod routes;
pub mod state;
