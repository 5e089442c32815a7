//! Repository traits.
//!
//! Services hold these as `Arc<dyn ...Repository>` so the PostgreSQL and
//! in-memory gateways are interchangeable.

use async_trait::async_trait;
use bookstore_models::{Book, NewBook, NewOrder, NewUser, Order, User};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RepositoryError {
    /// A unique constraint rejected the write.
    #[error("unique constraint violated: {0}")]
    Conflict(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// The row a write points at does not exist or is soft-deleted.
    #[error("referenced {0} not found")]
    MissingReference(&'static str),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl RepositoryError {
    pub fn is_conflict(&self) -> bool {
        matches!(self, RepositoryError::Conflict(_))
    }

    pub fn is_missing_reference(&self) -> bool {
        matches!(self, RepositoryError::MissingReference(_))
    }
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Finds a user by exact username. Soft-deleted rows are only returned
    /// when `include_deleted` is set.
    async fn find_by_username(
        &self,
        username: &str,
        include_deleted: bool,
    ) -> RepositoryResult<Option<User>>;

    /// Finds a live (not soft-deleted) user by ID.
    async fn find_by_id(&self, id: i64) -> RepositoryResult<Option<User>>;

    /// Inserts a user. A taken username yields [`RepositoryError::Conflict`].
    async fn insert(&self, user: NewUser) -> RepositoryResult<User>;

    /// Counts rows with this username, soft-deleted ones included.
    async fn count_by_username(&self, username: &str) -> RepositoryResult<i64>;
}

#[async_trait]
pub trait BookRepository: Send + Sync {
    async fn find_all(&self) -> RepositoryResult<Vec<Book>>;

    async fn find_by_id(&self, id: i64) -> RepositoryResult<Option<Book>>;

    async fn insert(&self, book: NewBook) -> RepositoryResult<Book>;

    /// Counts live books with this ID (0 or 1).
    async fn count_by_id(&self, id: i64) -> RepositoryResult<i64>;
}

#[async_trait]
pub trait OrderRepository: Send + Sync {
    async fn find_all(&self) -> RepositoryResult<Vec<Order>>;

    /// Inserts an order against a live book. A missing or soft-deleted
    /// book yields [`RepositoryError::MissingReference`], checked in the
    /// same statement as the insert.
    async fn insert(&self, order: NewOrder) -> RepositoryResult<Order>;
}
