//! Authorization guard primitives.
//!
//! These are framework-agnostic: the HTTP layer reads the `Authorization`
//! header, calls [`authenticate`], and then [`require_role`] or
//! [`require_any_role`] for role-gated routes.

use bookstore_models::UserRole;

use crate::claims::Identity;
use crate::error::{AuthError, UnauthenticatedReason};
use crate::jwt::TokenIssuer;

const BEARER_PREFIX: &str = "Bearer ";

/// Extracts the token from an `Authorization: Bearer <token>` header value.
pub fn bearer_token(header: Option<&str>) -> Result<&str, AuthError> {
    let header =
        header.ok_or(AuthError::Unauthenticated(UnauthenticatedReason::MissingToken))?;

    let token = header
        .strip_prefix(BEARER_PREFIX)
        .map(str::trim)
        .ok_or(AuthError::Unauthenticated(UnauthenticatedReason::MalformedHeader))?;

    if token.is_empty() {
        return Err(AuthError::Unauthenticated(UnauthenticatedReason::MalformedHeader));
    }

    Ok(token)
}

/// Resolves the caller from an `Authorization` header value.
pub fn authenticate(issuer: &TokenIssuer, header: Option<&str>) -> Result<Identity, AuthError> {
    let token = bearer_token(header)?;
    issuer.verify(token).map_err(AuthError::from)
}

pub fn require_role(identity: &Identity, required: UserRole) -> Result<(), AuthError> {
    require_any_role(identity, &[required])
}

pub fn require_any_role(identity: &Identity, allowed: &[UserRole]) -> Result<(), AuthError> {
    if allowed.contains(&identity.role) {
        Ok(())
    } else {
        Err(AuthError::Forbidden {
            required: allowed.to_vec(),
            actual: identity.role,
        })
    }
}
