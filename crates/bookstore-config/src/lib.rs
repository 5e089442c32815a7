//! # Bookstore Config
//!
//! Configuration types for the Bookstore API, loaded from environment
//! variables (a `.env` file is honoured by the binary via `dotenvy`).
//!
//! - [`database`]: Connection string, pool size and migration toggle
//! - [`jwt`]: Token signing key, algorithm and lifetime
//! - [`password`]: bcrypt work factor
//! - [`cors`]: Allowed CORS origins
//! - [`server`]: Bind address and logging directory
//!
//! # Example
//!
//! ```ignore
//! use bookstore_config::{CorsConfig, DatabaseConfig, JwtConfig, PasswordConfig, ServerConfig};
//!
//! let database_config = DatabaseConfig::from_env();
//! let jwt_config = JwtConfig::from_env()?;
//! let password_config = PasswordConfig::from_env();
//! let cors_config = CorsConfig::from_env();
//! let server_config = ServerConfig::from_env();
//! ```

pub mod cors;
pub mod database;
pub mod jwt;
pub mod password;
pub mod server;

// Re-export commonly used types at crate root
pub use cors::CorsConfig;
pub use database::DatabaseConfig;
pub use jwt::JwtConfig;
pub use password::PasswordConfig;
pub use server::ServerConfig;
