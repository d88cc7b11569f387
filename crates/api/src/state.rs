use std::sync::Arc;

use crate::config::ServerConfig;
use crate::engine::audit::AuditWriter;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: pawlink_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Audit writer (primary store plus fallback queue).
    pub audit: Arc<AuditWriter>,
}
