//! JWT claim structures.
//!
//! - [`Claims`]: What is signed into a token
//! - [`Identity`]: What a verified token resolves to

use bookstore_models::UserRole;
use serde::{Deserialize, Serialize};

/// JWT claims for session tokens.
///
/// # Fields
///
/// - `sub`: User ID (subject), as a decimal string
/// - `username`: Username at issuance time
/// - `role`: Role at issuance time
/// - `exp`: Expiration timestamp (Unix seconds)
/// - `iat`: Issued-at timestamp (Unix seconds)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub username: String,
    pub role: UserRole,
    pub exp: usize,
    pub iat: usize,
}

/// The caller behind a verified token.
///
/// Inserted into request extensions by the authorization guard so handlers
/// downstream can read it without re-verifying.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: i64,
    pub username: String,
    pub role: UserRole,
}

impl Identity {
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}
