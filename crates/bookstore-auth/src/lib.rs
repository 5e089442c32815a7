//! # Bookstore Auth
//!
//! Authentication and authorization primitives for the Bookstore API.
//!
//! - [`claims`]: JWT claim set and the resolved [`Identity`]
//! - [`jwt`]: [`TokenIssuer`], which signs and verifies tokens
//! - [`guard`]: Bearer-token extraction and role checks
//! - [`audit`]: Audit sink receiving classified auth outcomes
//! - [`error`]: [`AuthError`] and [`TokenError`]
//!
//! Tokens are stateless: validity is decided by signature and expiry alone.
//! There is no revocation list; rotating the signing key invalidates every
//! outstanding token.
//!
//! # Example
//!
//! ```ignore
//! use bookstore_auth::{TokenIssuer, guard};
//! use bookstore_config::JwtConfig;
//! use bookstore_models::UserRole;
//!
//! let issuer = TokenIssuer::new(&JwtConfig::from_env()?);
//! let token = issuer.issue(1, "alice", UserRole::User)?;
//!
//! let header = format!("Bearer {}", token);
//! let identity = guard::authenticate(&issuer, Some(&header))?;
//! guard::require_role(&identity, UserRole::Admin)?; // Err(AuthError::Forbidden { .. })
//! ```

pub mod audit;
pub mod claims;
pub mod error;
pub mod guard;
pub mod jwt;

// Re-export commonly used types at crate root
pub use audit::{AuditSink, AuthAction, AuthEvent, AuthOutcome, MemoryAuditSink, TracingAuditSink};
pub use claims::{Claims, Identity};
pub use error::{AuthError, TokenError, UnauthenticatedReason};
pub use jwt::TokenIssuer;
