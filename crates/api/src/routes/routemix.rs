//! Route definitions for trunk load-balance allocations.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::routemix;
use crate::state::AppState;

/// Routes mounted at `/routemix`.
///
/// ```text
/// GET    /               -> list_allocations
/// GET    /user/{user}    -> get_user_allocation
/// DELETE /user/{user}    -> delete_user_allocation
/// POST   /batch-save     -> batch_save
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(routemix::list_allocations))
        .route(
            "/user/{user}",
            get(routemix::get_user_allocation).delete(routemix::delete_user_allocation),
        )
        .route("/batch-save", post(routemix::batch_save))
}
