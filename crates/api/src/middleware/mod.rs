//! Authentication and authorization middleware extractors.
//!
//! - [`auth::AuthUser`] -- Extracts the authenticated user from a JWT Bearer token.
//! - [`rbac::RequireAdmin`] -- Requires the `admin` role.
//! - [`rbac::RequireAuth`] -- Requires any known role.

pub mod auth;
pub mod rbac;
