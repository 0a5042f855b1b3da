//! Handlers for the `/tariff_trunks` directory.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;

use crate::error::AppResult;
use crate::middleware::rbac::RequireAuth;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/tariff_trunks
///
/// List the trunk directory. The panel uses it for both the load-balance
/// bucket selector and the per-row trunk selector.
pub async fn list_trunks(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let trunks = state.store.list_trunks().await?;

    Ok(Json(DataResponse { data: trunks }))
}
