//! Bearer-token authentication for panel users.
//!
//! The panel's login service signs the token. This server only checks the
//! signature and expiry, then reads the role that gates allocation edits.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use routemix_core::error::CoreError;
use routemix_core::roles::ROLE_ADMIN;
use routemix_core::types::DbId;

use crate::auth::jwt::validate_token;
use crate::error::AppError;
use crate::state::AppState;

const BEARER_FORMAT: &str = "Invalid Authorization format. Expected: Bearer <token>";

/// Panel user behind a request, taken from the token's `sub` and `role` claims.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub user_id: DbId,
    pub role: String,
}

impl AuthUser {
    /// Only admins may replace or drop a load-balance allocation.
    pub fn can_edit_allocations(&self) -> bool {
        self.role == ROLE_ADMIN
    }
}

fn unauthorized(message: &str) -> AppError {
    AppError::Core(CoreError::Unauthorized(message.to_string()))
}

/// Token from `Authorization: Bearer <token>`. The scheme is case-insensitive.
fn bearer_token(headers: &HeaderMap) -> Result<&str, AppError> {
    let value = headers
        .get(AUTHORIZATION)
        .ok_or_else(|| unauthorized("Missing Authorization header"))?
        .to_str()
        .map_err(|_| unauthorized(BEARER_FORMAT))?;

    match value.trim().split_once(' ') {
        Some((scheme, token)) if scheme.eq_ignore_ascii_case("bearer") && !token.trim().is_empty() => {
            Ok(token.trim())
        }
        _ => Err(unauthorized(BEARER_FORMAT)),
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers)?;

        let claims = validate_token(token, &state.config.jwt).map_err(|err| {
            tracing::debug!(error = %err, "Rejected panel token");
            unauthorized("Invalid or expired token")
        })?;

        Ok(AuthUser {
            user_id: claims.sub,
            role: claims.role,
        })
    }
}
