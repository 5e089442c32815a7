//! # Bookstore Models
//!
//! Domain records and request/response DTOs for the Bookstore API.
//!
//! # Modules
//!
//! - [`users`]: User records, roles and the outward user view
//! - [`auth`]: Registration and login payloads
//! - [`books`]: Book records and creation DTO
//! - [`orders`]: Order records and creation DTO
//!
//! Records carry a `deleted_at` soft-delete marker; a record with the marker
//! set is treated as absent by normal lookups.
//!
//! # Example
//!
//! ```ignore
//! use bookstore_models::{User, UserRole, UserView};
//!
//! let role: UserRole = "admin".parse()?;
//! let view = UserView::from(&user);
//! ```

pub mod auth;
pub mod books;
pub mod orders;
pub mod users;

// Re-export commonly used types at crate root for convenience
pub use auth::{LoginRequest, LoginResponse, MAX_PASSWORD_BYTES, RegisterRequest};
pub use books::{Book, CreateBookDto, NewBook};
pub use orders::{CreateOrderDto, NewOrder, Order};
pub use users::{NewUser, ParseRoleError, User, UserRole, UserView};
