//! Well-known role name constants.
//!
//! These must match the `role` claim issued by the panel's login service.

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_RESELLER: &str = "reseller";
pub const ROLE_CLIENT: &str = "client";

/// All roles allowed to read routing data.
pub const KNOWN_ROLES: &[&str] = &[ROLE_ADMIN, ROLE_RESELLER, ROLE_CLIENT];
