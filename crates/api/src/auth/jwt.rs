//! Panel access tokens.
//!
//! The panel's login service issues HS256 tokens carrying a [`Claims`]
//! payload; this server shares its secret and only verifies them.
//! [`generate_access_token`] exists for `routemixctl` setups and tests.

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use routemix_core::types::DbId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Claims the panel puts in every access token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Panel user id.
    pub sub: DbId,
    /// One of `admin`, `reseller`, `client`.
    pub role: String,
    pub exp: i64,
    pub iat: i64,
    /// Token id, logged for audit.
    pub jti: String,
}

/// Shared secret and lifetime for panel tokens.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    /// Lifetime of tokens minted by [`generate_access_token`].
    pub access_token_expiry_mins: i64,
}

const DEFAULT_ACCESS_EXPIRY_MINS: i64 = 15;

impl JwtConfig {
    /// Read `JWT_SECRET` (required) and `JWT_ACCESS_EXPIRY_MINS` (default 15).
    ///
    /// # Panics
    ///
    /// Panics if `JWT_SECRET` is missing or empty, or the expiry is not a number.
    pub fn from_env() -> Self {
        let secret = std::env::var("JWT_SECRET")
            .ok()
            .filter(|s| !s.is_empty())
            .expect("JWT_SECRET must be set to the panel's token secret");

        let access_token_expiry_mins = match std::env::var("JWT_ACCESS_EXPIRY_MINS") {
            Ok(raw) => raw
                .parse()
                .expect("JWT_ACCESS_EXPIRY_MINS must be a whole number of minutes"),
            Err(_) => DEFAULT_ACCESS_EXPIRY_MINS,
        };

        Self {
            secret,
            access_token_expiry_mins,
        }
    }
}

/// Sign a token for `user_id` with the given panel role.
pub fn generate_access_token(
    user_id: DbId,
    role: &str,
    config: &JwtConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    let iat = chrono::Utc::now().timestamp();
    let claims = Claims {
        sub: user_id,
        role: role.to_string(),
        exp: iat + config.access_token_expiry_mins * 60,
        iat,
        jti: Uuid::new_v4().to_string(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
}

/// Verify signature and expiry. The role is checked by the RBAC extractors,
/// so an unknown role decodes fine here and is refused with 403 later.
pub fn validate_token(
    token: &str,
    config: &JwtConfig,
) -> Result<Claims, jsonwebtoken::errors::Error> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
}
