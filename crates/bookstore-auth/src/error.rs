use anyhow::anyhow;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use bookstore_core::AppError;
use bookstore_models::UserRole;
use thiserror::Error;

use crate::audit::AuthOutcome;

/// Failure to verify (or sign) a token.
///
/// `Expired` and `Invalid` both end in a 401 at the HTTP boundary; they are
/// kept apart for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("token is malformed or its signature does not match")]
    Invalid,
    #[error("token has expired")]
    Expired,
    #[error("failed to sign token: {0}")]
    Signing(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnauthenticatedReason {
    MissingToken,
    MalformedHeader,
    InvalidToken,
    ExpiredToken,
}

impl UnauthenticatedReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnauthenticatedReason::MissingToken => "missing_token",
            UnauthenticatedReason::MalformedHeader => "malformed_header",
            UnauthenticatedReason::InvalidToken => "invalid_token",
            UnauthenticatedReason::ExpiredToken => "expired_token",
        }
    }

    fn message(&self) -> &'static str {
        match self {
            UnauthenticatedReason::MissingToken => "Missing authorization header",
            UnauthenticatedReason::MalformedHeader => "Invalid authorization header format",
            UnauthenticatedReason::InvalidToken | UnauthenticatedReason::ExpiredToken => {
                "Invalid or expired token"
            }
        }
    }
}

fn join_roles(roles: &[UserRole]) -> String {
    roles
        .iter()
        .map(UserRole::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("{0}")]
    Validation(String),

    #[error("Username already exists")]
    DuplicateUsername,

    /// Covers both unknown usernames and wrong passwords.
    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("User not found")]
    NotFound,

    #[error("{}", .0.message())]
    Unauthenticated(UnauthenticatedReason),

    #[error("Access denied. Required role: {}", join_roles(.required))]
    Forbidden {
        required: Vec<UserRole>,
        actual: UserRole,
    },

    #[error("Storage failure")]
    Persistence(#[source] anyhow::Error),

    #[error("Internal authentication failure")]
    Internal(#[source] anyhow::Error),
}

impl AuthError {
    pub fn status(&self) -> StatusCode {
        match self {
            AuthError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AuthError::DuplicateUsername => StatusCode::CONFLICT,
            AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AuthError::NotFound => StatusCode::NOT_FOUND,
            AuthError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            AuthError::Forbidden { .. } => StatusCode::FORBIDDEN,
            AuthError::Persistence(_) | AuthError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Audit classification of this failure.
    pub fn outcome(&self) -> AuthOutcome {
        match self {
            AuthError::Validation(_) => AuthOutcome::InvalidInput,
            AuthError::DuplicateUsername => AuthOutcome::Duplicate,
            AuthError::InvalidCredentials => AuthOutcome::BadCredentials,
            AuthError::NotFound => AuthOutcome::LookupFailure,
            AuthError::Unauthenticated(_) => AuthOutcome::Unauthenticated,
            AuthError::Forbidden { .. } => AuthOutcome::Forbidden,
            AuthError::Persistence(_) => AuthOutcome::PersistenceFailure,
            AuthError::Internal(_) => AuthOutcome::InternalFailure,
        }
    }
}

impl From<TokenError> for AuthError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Invalid => AuthError::Unauthenticated(UnauthenticatedReason::InvalidToken),
            TokenError::Expired => AuthError::Unauthenticated(UnauthenticatedReason::ExpiredToken),
            TokenError::Signing(msg) => AuthError::Internal(anyhow!(msg)),
        }
    }
}

impl From<AppError> for AuthError {
    fn from(err: AppError) -> Self {
        AuthError::Internal(err.error)
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        AppError::new(err.status(), err)
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        AppError::from(self).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            AuthError::Validation("bad".into()).status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(AuthError::DuplicateUsername.status(), StatusCode::CONFLICT);
        assert_eq!(AuthError::InvalidCredentials.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(AuthError::NotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            AuthError::Unauthenticated(UnauthenticatedReason::MissingToken).status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AuthError::Forbidden {
                required: vec![UserRole::Admin],
                actual: UserRole::User
            }
            .status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            AuthError::Persistence(anyhow!("down")).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_token_errors_map_to_unauthenticated() {
        assert!(matches!(
            AuthError::from(TokenError::Invalid),
            AuthError::Unauthenticated(UnauthenticatedReason::InvalidToken)
        ));
        assert!(matches!(
            AuthError::from(TokenError::Expired),
            AuthError::Unauthenticated(UnauthenticatedReason::ExpiredToken)
        ));
        assert!(matches!(
            AuthError::from(TokenError::Signing("bad key".into())),
            AuthError::Internal(_)
        ));
    }

    #[test]
    fn test_expired_and_invalid_share_message() {
        let expired = AuthError::from(TokenError::Expired).to_string();
        let invalid = AuthError::from(TokenError::Invalid).to_string();
        assert_eq!(expired, invalid);
    }

    #[test]
    fn test_forbidden_message_names_required_roles() {
        let err = AuthError::Forbidden {
            required: vec![UserRole::Admin],
            actual: UserRole::User,
        };
        assert_eq!(err.to_string(), "Access denied. Required role: admin");
    }

    #[test]
    fn test_into_app_error_keeps_status() {
        let app_error: AppError = AuthError::DuplicateUsername.into();
        assert_eq!(app_error.status, StatusCode::CONFLICT);
        assert_eq!(app_error.error.to_string(), "Username already exists");
    }

    #[test]
    fn test_outcome_classification() {
        assert_eq!(AuthError::InvalidCredentials.outcome(), AuthOutcome::BadCredentials);
        assert_eq!(AuthError::DuplicateUsername.outcome(), AuthOutcome::Duplicate);
        assert_eq!(AuthError::NotFound.outcome(), AuthOutcome::LookupFailure);
        assert_eq!(
            AuthError::Persistence(anyhow!("down")).outcome(),
            AuthOutcome::PersistenceFailure
        );
        assert_eq!(
            AuthError::Internal(anyhow!("hashing task panicked")).outcome(),
            AuthOutcome::InternalFailure
        );
        assert_eq!(
            AuthError::from(TokenError::Signing("bad key".into())).outcome(),
            AuthOutcome::InternalFailure
        );
    }
}
