use async_trait::async_trait;
use bookstore_models::{Book, NewBook, NewOrder, NewUser, Order, User};
use sqlx::PgPool;
use tracing::instrument;

use crate::repository::{
    BookRepository, OrderRepository, RepositoryError, RepositoryResult, UserRepository,
};

const USER_COLUMNS: &str = "id, username, password_hash, role, created_at, updated_at, deleted_at";
const BOOK_COLUMNS: &str = "id, title, author, price, created_at, updated_at, deleted_at";
const ORDER_COLUMNS: &str = "id, book_id, customer_name, quantity, created_at, updated_at, deleted_at";

/// PostgreSQL gateway for users, books and orders.
#[derive(Debug, Clone)]
pub struct PgRepository {
    pool: PgPool,
}

impl PgRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

fn map_write_error(err: sqlx::Error) -> RepositoryError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            let constraint = db_err.constraint().unwrap_or("unique").to_string();
            return RepositoryError::Conflict(constraint);
        }
    }
    RepositoryError::Database(err)
}

#[async_trait]
impl UserRepository for PgRepository {
    #[instrument(skip(self))]
    async fn find_by_username(
        &self,
        username: &str,
        include_deleted: bool,
    ) -> RepositoryResult<Option<User>> {
        let sql = format!(
            "SELECT {USER_COLUMNS} FROM users WHERE username = $1 AND ($2 OR deleted_at IS NULL)"
        );
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(username)
            .bind(include_deleted)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: i64) -> RepositoryResult<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1 AND deleted_at IS NULL");
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    #[instrument(skip(self, user), fields(username = %user.username))]
    async fn insert(&self, user: NewUser) -> RepositoryResult<User> {
        let sql = format!(
            "INSERT INTO users (username, password_hash, role) VALUES ($1, $2, $3) \
             RETURNING {USER_COLUMNS}"
        );
        sqlx::query_as::<_, User>(&sql)
            .bind(&user.username)
            .bind(&user.password_hash)
            .bind(user.role)
            .fetch_one(&self.pool)
            .await
            .map_err(map_write_error)
    }

    #[instrument(skip(self))]
    async fn count_by_username(&self, username: &str) -> RepositoryResult<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users WHERE username = $1")
            .bind(username)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

#[async_trait]
impl BookRepository for PgRepository {
    #[instrument(skip(self))]
    async fn find_all(&self) -> RepositoryResult<Vec<Book>> {
        let sql = format!("SELECT {BOOK_COLUMNS} FROM books WHERE deleted_at IS NULL ORDER BY id");
        let books = sqlx::query_as::<_, Book>(&sql).fetch_all(&self.pool).await?;
        Ok(books)
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: i64) -> RepositoryResult<Option<Book>> {
        let sql = format!("SELECT {BOOK_COLUMNS} FROM books WHERE id = $1 AND deleted_at IS NULL");
        let book = sqlx::query_as::<_, Book>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(book)
    }

    #[instrument(skip(self, book), fields(title = %book.title))]
    async fn insert(&self, book: NewBook) -> RepositoryResult<Book> {
        let sql = format!(
            "INSERT INTO books (title, author, price) VALUES ($1, $2, $3) RETURNING {BOOK_COLUMNS}"
        );
        sqlx::query_as::<_, Book>(&sql)
            .bind(&book.title)
            .bind(&book.author)
            .bind(book.price)
            .fetch_one(&self.pool)
            .await
            .map_err(map_write_error)
    }

    #[instrument(skip(self))]
    async fn count_by_id(&self, id: i64) -> RepositoryResult<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM books WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }
}

#[async_trait]
impl OrderRepository for PgRepository {
    #[instrument(skip(self))]
    async fn find_all(&self) -> RepositoryResult<Vec<Order>> {
        let sql = format!("SELECT {ORDER_COLUMNS} FROM orders WHERE deleted_at IS NULL ORDER BY id");
        let orders = sqlx::query_as::<_, Order>(&sql).fetch_all(&self.pool).await?;
        Ok(orders)
    }

    #[instrument(skip(self, order), fields(book_id = order.book_id))]
    async fn insert(&self, order: NewOrder) -> RepositoryResult<Order> {
        // FOR SHARE blocks a concurrent soft-delete of the book until commit.
        let sql = format!(
            "INSERT INTO orders (book_id, customer_name, quantity) \
             SELECT id, $2, $3 FROM books WHERE id = $1 AND deleted_at IS NULL FOR SHARE \
             RETURNING {ORDER_COLUMNS}"
        );
        sqlx::query_as::<_, Order>(&sql)
            .bind(order.book_id)
            .bind(&order.customer_name)
            .bind(order.quantity)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_write_error)?
            .ok_or(RepositoryError::MissingReference("book"))
    }
}
