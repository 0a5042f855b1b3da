use std::sync::Arc;

use routemix_core::store::AllocationStore;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Allocation and trunk-directory storage (Postgres in production).
    pub store: Arc<dyn AllocationStore>,
    /// Server configuration (JWT settings are read by the auth extractors).
    pub config: Arc<ServerConfig>,
}
