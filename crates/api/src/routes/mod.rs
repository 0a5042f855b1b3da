pub mod health;
pub mod routemix;
pub mod trunks;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /routemix                                        list all allocations (GET)
/// /routemix/user/{user}                            get, delete one bucket
/// /routemix/batch-save                             replace one bucket (POST, admin)
///
/// /tariff_trunks                                   trunk directory (GET)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Trunk load-balance allocations.
        .nest("/routemix", routemix::router())
        // Trunk directory feeding the bucket and trunk selectors.
        .nest("/tariff_trunks", trunks::router())
}
