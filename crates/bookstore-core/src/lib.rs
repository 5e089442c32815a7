//! # Bookstore Core
//!
//! Core types and utilities shared by every Bookstore crate:
//!
//! - [`errors`]: Application error type with HTTP response conversion
//! - [`password`]: Salted password hashing and verification (bcrypt)
//!
//! # Example
//!
//! ```ignore
//! use bookstore_core::{AppError, PasswordHasher};
//!
//! let hasher = PasswordHasher::new(12)?;
//! let hash = hasher.hash("secret1").await?;
//! assert!(hasher.verify("secret1", &hash).await);
//!
//! let error = AppError::not_found(anyhow::anyhow!("Book not found"));
//! ```

pub mod errors;
pub mod password;

// Re-export commonly used types at crate root
pub use errors::AppError;
pub use password::{MAX_PASSWORD_BYTES, PasswordHasher};
