//! Request guards.
//!
//! # Modules
//!
//! - [`auth`]: Bearer-token authentication (`AuthUser` extractor and
//!   `require_auth` middleware)
//! - [`role`]: Role-gated middleware and in-handler role checks
//!
//! # Authentication Flow
//!
//! 1. Client sends request with `Authorization: Bearer <token>` header
//! 2. `require_auth` (or `require_roles`) verifies the token and stores the
//!    caller's [`Identity`](bookstore_auth::Identity) in request extensions
//! 3. Handlers take `AuthUser`, which reads the stored identity
//! 4. Failures are audited and answered with 401 (no/invalid token) or 403
//!    (wrong role)
//!
//! # Example
//!
//! ```ignore
//! use axum::{Router, middleware, routing::get};
//! use crate::middleware::auth::{AuthUser, require_auth};
//!
//! async fn get_profile(AuthUser(identity): AuthUser) -> impl IntoResponse {
//!     // identity.user_id, identity.role, ...
//! }
//!
//! let routes = Router::new()
//!     .route("/profile", get(get_profile))
//!     .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));
//! ```

pub mod auth;
pub mod role;
