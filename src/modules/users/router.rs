use axum::{Router, middleware, routing::get};

use crate::middleware::auth::require_auth;
use crate::state::AppState;

use super::controller::get_profile;

pub fn init_users_router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/profile", get(get_profile))
        .route_layer(middleware::from_fn_with_state(state, require_auth))
}
