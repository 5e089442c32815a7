//! # Bookstore DB
//!
//! Persistence gateway for the Bookstore API.
//!
//! - [`repository`]: The async repository traits the services depend on
//! - [`postgres`]: PostgreSQL implementation over a SQLx pool
//! - [`memory`]: In-memory implementation for tests and local runs
//!
//! # Example
//!
//! ```ignore
//! use bookstore_config::DatabaseConfig;
//! use bookstore_db::{PgRepository, init_db_pool, run_migrations};
//!
//! let config = DatabaseConfig::from_env();
//! let pool = init_db_pool(config.url.as_deref().unwrap(), config.max_connections).await?;
//! run_migrations(&pool).await?;
//! let repository = PgRepository::new(pool);
//! ```

pub mod memory;
pub mod postgres;
pub mod repository;

use sqlx::postgres::PgPoolOptions;

pub use memory::InMemoryRepository;
pub use postgres::PgRepository;
pub use repository::{
    BookRepository, OrderRepository, RepositoryError, RepositoryResult, UserRepository,
};

// Re-export PgPool for convenience
pub use sqlx::PgPool;

/// Opens a PostgreSQL connection pool.
///
/// The returned pool is cheaply cloneable; create it once at startup and
/// hand it to [`PgRepository::new`].
pub async fn init_db_pool(database_url: &str, max_connections: u32) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
}

/// Applies pending migrations from the workspace `migrations/` directory.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("../../migrations").run(pool).await
}
