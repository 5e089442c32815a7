use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use bookstore_auth::{AuthAction, AuthError};
use bookstore_core::AppError;
use bookstore_models::{LoginRequest, LoginResponse, RegisterRequest, UserView};
use tracing::{Span, field, instrument};

use crate::state::AppState;
use crate::validator::ValidatedJson;

/// Register a new user
///
/// Bodies rejected by validation are audited before the error is returned.
#[instrument(skip_all, fields(username = field::Empty, role = field::Empty))]
pub async fn register_user(
    State(state): State<AppState>,
    payload: Result<ValidatedJson<RegisterRequest>, AppError>,
) -> Result<(StatusCode, Json<UserView>), AppError> {
    let ValidatedJson(dto) =
        payload.inspect_err(|_| state.auth.record_rejected(AuthAction::Register))?;

    let span = Span::current();
    span.record("username", dto.username.as_str());
    span.record("role", dto.role.as_str());

    let user = state
        .auth
        .register(&dto.username, &dto.password, &dto.role)
        .await?;
    Ok((StatusCode::CREATED, Json(UserView::from(user))))
}

/// Login and receive a bearer token
#[instrument(skip_all, fields(username = field::Empty))]
pub async fn login_user(
    State(state): State<AppState>,
    payload: Result<ValidatedJson<LoginRequest>, AppError>,
) -> Result<Json<LoginResponse>, AppError> {
    let ValidatedJson(dto) =
        payload.inspect_err(|_| state.auth.record_rejected(AuthAction::Login))?;
    Span::current().record("username", dto.username.as_str());

    let user = state.auth.login(&dto.username, &dto.password).await?;
    let token = state
        .tokens
        .issue(user.id, &user.username, user.role)
        .map_err(AuthError::from)?;

    Ok(Json(LoginResponse {
        token,
        user: UserView::from(user),
    }))
}
