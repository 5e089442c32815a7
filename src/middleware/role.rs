//! Role-based authorization middleware.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use bookstore_auth::{AuthAction, AuthError, AuthEvent, guard};
use bookstore_models::UserRole;

use crate::middleware::auth::authenticate_parts;
use crate::state::AppState;

/// Middleware that requires the caller to hold one of `allowed_roles`.
///
/// ```rust,ignore
/// let routes = Router::new()
///     .route("/reports", get(reports_handler))
///     .layer(middleware::from_fn_with_state(
///         state.clone(),
///         |state, req, next| require_roles(state, req, next, &[UserRole::Admin]),
///     ));
/// ```
pub async fn require_roles(
    State(state): State<AppState>,
    req: Request,
    next: Next,
    allowed_roles: &[UserRole],
) -> Result<Response, AuthError> {
    let (mut parts, body) = req.into_parts();

    let identity = authenticate_parts(&parts, &state)?;

    if let Err(err) = guard::require_any_role(&identity, allowed_roles) {
        tracing::warn!(
            user_id = identity.user_id,
            role = %identity.role,
            "Role check failed"
        );
        state.audit.record(
            AuthEvent::new(AuthAction::Authorize, err.outcome())
                .with_username(identity.username.clone())
                .with_user_id(identity.user_id),
        );
        return Err(err);
    }

    parts.extensions.insert(identity);
    Ok(next.run(Request::from_parts(parts, body)).await)
}

/// Admin-only routes.
///
/// ```rust,ignore
/// let admin_routes = Router::new()
///     .route("/", post(create_book))
///     .route_layer(middleware::from_fn_with_state(state.clone(), require_admin));
/// ```
pub async fn require_admin(State(state): State<AppState>, req: Request, next: Next) -> Response {
    match require_roles(State(state), req, next, &[UserRole::Admin]).await {
        Ok(response) => response,
        Err(err) => err.into_response(),
    }
}
