use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::middleware::role::require_admin;
use crate::state::AppState;

use super::controller::{create_book, get_book, get_books};

pub fn init_books_router(state: AppState) -> Router<AppState> {
    let admin_routes = Router::new()
        .route("/", post(create_book))
        .route_layer(middleware::from_fn_with_state(state, require_admin));

    Router::new()
        .route("/", get(get_books))
        .route("/{id}", get(get_book))
        .merge(admin_routes)
}
