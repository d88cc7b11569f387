//! Request extractors shared across handlers.

pub mod identity;
