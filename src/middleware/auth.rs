use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};
use bookstore_auth::{AuthAction, AuthError, AuthEvent, Identity, guard};

use crate::state::AppState;

/// Extractor for the authenticated caller.
///
/// Reuses the identity attached by [`require_auth`] when present; otherwise
/// verifies the bearer token itself.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Identity);

impl AuthUser {
    pub fn user_id(&self) -> i64 {
        self.0.user_id
    }

    pub fn username(&self) -> &str {
        &self.0.username
    }
}

/// Resolves the caller from the `Authorization` header, auditing failures.
pub(crate) fn authenticate_parts(parts: &Parts, state: &AppState) -> Result<Identity, AuthError> {
    if let Some(identity) = parts.extensions.get::<Identity>() {
        return Ok(identity.clone());
    }

    let auth_header = parts
        .headers
        .get(header::AUTHORIZATION)
        .map(|value| value.to_str().unwrap_or_default());

    guard::authenticate(&state.tokens, auth_header).inspect_err(|err| {
        if let AuthError::Unauthenticated(reason) = err {
            tracing::debug!(reason = reason.as_str(), "Rejected bearer token");
        }
        state
            .audit
            .record(AuthEvent::new(AuthAction::Authorize, err.outcome()));
    })
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        authenticate_parts(parts, state).map(AuthUser)
    }
}

/// Middleware that rejects unauthenticated requests and attaches the
/// caller's [`Identity`] to request extensions.
pub async fn require_auth(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let (mut parts, body) = req.into_parts();

    match authenticate_parts(&parts, &state) {
        Ok(identity) => {
            parts.extensions.insert(identity);
            next.run(Request::from_parts(parts, body)).await
        }
        Err(err) => err.into_response(),
    }
}
