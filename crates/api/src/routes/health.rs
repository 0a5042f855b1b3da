//! Liveness endpoint polled by the panel and by `routemixctl`.

use axum::extract::State;
use axum::{routing::get, Json, Router};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Ok,
    /// The server answers but the allocation store does not.
    Degraded,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub version: &'static str,
    /// Whether the allocation store answered its health check.
    pub db_healthy: bool,
    pub checked_at: DateTime<Utc>,
}

impl HealthResponse {
    fn from_store_check(db_healthy: bool) -> Self {
        Self {
            status: if db_healthy {
                HealthStatus::Ok
            } else {
                HealthStatus::Degraded
            },
            version: env!("CARGO_PKG_VERSION"),
            db_healthy,
            checked_at: Utc::now(),
        }
    }
}

/// GET /health
///
/// Always 200 while the process is up; a store outage shows as `degraded`.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let db_healthy = match state.store.health_check().await {
        Ok(()) => true,
        Err(err) => {
            tracing::warn!(error = %err, "Allocation store health check failed");
            false
        }
    };

    Json(HealthResponse::from_store_check(db_healthy))
}

/// Mounted at the server root, outside `/api/v1`.
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
