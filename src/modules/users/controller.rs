use axum::{Json, extract::State};
use bookstore_auth::AuthError;
use bookstore_models::UserView;
use tracing::instrument;

use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Get the current user's profile
#[instrument(skip_all, fields(user_id = auth_user.user_id()))]
pub async fn get_profile(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<UserView>, AuthError> {
    let user = state.auth.get_by_id(auth_user.user_id()).await?;
    Ok(Json(UserView::from(user)))
}
