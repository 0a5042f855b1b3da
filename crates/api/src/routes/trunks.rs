use axum::routing::get;
use axum::Router;

use crate::handlers::trunks;
use crate::state::AppState;

/// Routes mounted at `/tariff_trunks`.
///
/// ```text
/// GET /  -> list_trunks
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(trunks::list_trunks))
}
