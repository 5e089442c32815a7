//! Registration and login payloads.
//!
//! Request types redact the plaintext password from their `Debug` output so
//! they can be traced safely.

use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::users::{UserRole, UserView};

/// Minimum accepted password length at registration.
pub const MIN_PASSWORD_LENGTH: u64 = 6;

/// bcrypt input limit. Counted in bytes, not characters.
pub const MAX_PASSWORD_BYTES: usize = 72;

fn validate_password_bytes(password: &str) -> Result<(), ValidationError> {
    if password.len() > MAX_PASSWORD_BYTES {
        return Err(ValidationError::new("password_too_long").with_message(Cow::Owned(
            format!("password must be at most {} bytes", MAX_PASSWORD_BYTES),
        )));
    }
    Ok(())
}

fn validate_role(role: &str) -> Result<(), ValidationError> {
    role.parse::<UserRole>().map(|_| ()).map_err(|e| {
        ValidationError::new("role").with_message(Cow::Owned(e.to_string()))
    })
}

#[derive(Clone, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 64, message = "username must be between 1 and 64 characters"))]
    pub username: String,
    #[validate(
        length(min = 6, message = "password must be at least 6 characters"),
        custom(function = "validate_password_bytes")
    )]
    pub password: String,
    #[validate(custom(function = "validate_role"))]
    pub role: String,
}

impl fmt::Debug for RegisterRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterRequest")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("role", &self.role)
            .finish()
    }
}

#[derive(Clone, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "username is required"))]
    pub username: String,
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
}

impl fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Successful login: a signed token plus the user it identifies.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserView,
}
