//! Handlers for the `/routemix` resource (trunk load-balance allocations).
//!
//! Reads are open to every panel role; writes need an admin. A save always
//! replaces the bucket's whole allocation and is validated here again,
//! whatever the caller already checked.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use routemix_core::allocation::wire::BatchSaveRequest;
use routemix_core::allocation::{unknown_trunk, validate, AllocationRow};
use routemix_core::error::CoreError;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::{RequireAdmin, RequireAuth};
use crate::response::DataResponse;
use crate::state::AppState;

/// Trim a bucket name taken from a path or body, rejecting blanks.
fn bucket_name(raw: &str) -> AppResult<&str> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(AppError::BadRequest(
            "Load balance trunk name must not be empty".into(),
        ));
    }
    Ok(name)
}

/// GET /api/v1/routemix
///
/// List every stored allocation row across buckets.
pub async fn list_allocations(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let rows = state.store.list_allocations().await?;

    Ok(Json(DataResponse { data: rows }))
}

/// GET /api/v1/routemix/user/{user}
///
/// Current allocation of one bucket. An empty list means the bucket still
/// uses the implicit 100% default.
pub async fn get_user_allocation(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Path(user): Path<String>,
) -> AppResult<impl IntoResponse> {
    let bucket = bucket_name(&user)?;
    let rows = state.store.fetch_allocation(bucket).await?;

    Ok(Json(DataResponse { data: rows }))
}

/// POST /api/v1/routemix/batch-save
///
/// Replace a bucket's allocation with the submitted rows.
pub async fn batch_save(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<BatchSaveRequest>,
) -> AppResult<impl IntoResponse> {
    let bucket = bucket_name(&input.user)?.to_string();

    let rows: Vec<AllocationRow> = input.trunks.into_iter().map(AllocationRow::from).collect();
    let valid = validate(&rows)?;

    let directory = state.store.list_trunks().await?;
    if let Some(name) = unknown_trunk(&valid, &directory) {
        return Err(AppError::Core(CoreError::Validation(format!(
            "Unknown trunk '{name}'"
        ))));
    }

    let saved = state.store.replace_allocation(&bucket, &valid).await?;

    tracing::info!(
        bucket = %bucket,
        rows = saved.len(),
        user_id = admin.user_id,
        "Load balance saved",
    );

    Ok(Json(DataResponse { data: saved }))
}

/// DELETE /api/v1/routemix/user/{user}
///
/// Drop a bucket's allocation so it reverts to the implicit default.
pub async fn delete_user_allocation(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(user): Path<String>,
) -> AppResult<impl IntoResponse> {
    let bucket = bucket_name(&user)?;
    let removed = state.store.delete_allocation(bucket).await?;

    if removed == 0 {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Load balance",
            key: bucket.to_string(),
        }));
    }

    tracing::info!(bucket, removed, user_id = admin.user_id, "Load balance deleted");

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn bucket_names_are_trimmed() {
        assert_eq!(bucket_name("  LB-1 ").unwrap(), "LB-1");
    }

    #[test]
    fn blank_bucket_names_are_rejected() {
        assert_matches!(bucket_name("   "), Err(AppError::BadRequest(_)));
    }
}
