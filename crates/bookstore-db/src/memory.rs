//! In-memory gateway.
//!
//! Behaves like the PostgreSQL gateway: sequential IDs starting at 1,
//! username uniqueness across all rows (soft-deleted included), and
//! soft-deleted rows hidden from normal lookups. Data lives only as long as
//! the process.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use bookstore_models::{Book, NewBook, NewOrder, NewUser, Order, User};
use chrono::Utc;
use tokio::sync::RwLock;

use crate::repository::{
    BookRepository, OrderRepository, RepositoryError, RepositoryResult, UserRepository,
};

#[derive(Debug, Default)]
struct Tables {
    users: BTreeMap<i64, User>,
    books: BTreeMap<i64, Book>,
    orders: BTreeMap<i64, Order>,
    next_user_id: i64,
    next_book_id: i64,
    next_order_id: i64,
}

fn next_id(counter: &mut i64) -> i64 {
    *counter += 1;
    *counter
}

#[derive(Debug, Default, Clone)]
pub struct InMemoryRepository {
    tables: Arc<RwLock<Tables>>,
    unavailable: Arc<AtomicBool>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent call fail as if the backing store were down.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Marks a user as soft-deleted. Returns false if no such user exists.
    pub async fn soft_delete_user(&self, id: i64) -> bool {
        let mut tables = self.tables.write().await;
        match tables.users.get_mut(&id) {
            Some(user) => {
                user.deleted_at = Some(Utc::now());
                true
            }
            None => false,
        }
    }

    /// Marks a book as soft-deleted. Returns false if no such book exists.
    pub async fn soft_delete_book(&self, id: i64) -> bool {
        let mut tables = self.tables.write().await;
        match tables.books.get_mut(&id) {
            Some(book) => {
                book.deleted_at = Some(Utc::now());
                true
            }
            None => false,
        }
    }

    fn check_available(&self) -> RepositoryResult<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(RepositoryError::Unavailable(
                "in-memory store marked unavailable".to_string(),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl UserRepository for InMemoryRepository {
    async fn find_by_username(
        &self,
        username: &str,
        include_deleted: bool,
    ) -> RepositoryResult<Option<User>> {
        self.check_available()?;
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .values()
            .find(|u| u.username == username && (include_deleted || !u.is_deleted()))
            .cloned())
    }

    async fn find_by_id(&self, id: i64) -> RepositoryResult<Option<User>> {
        self.check_available()?;
        let tables = self.tables.read().await;
        Ok(tables.users.get(&id).filter(|u| !u.is_deleted()).cloned())
    }

    async fn insert(&self, user: NewUser) -> RepositoryResult<User> {
        self.check_available()?;
        let mut tables = self.tables.write().await;

        if tables.users.values().any(|u| u.username == user.username) {
            return Err(RepositoryError::Conflict("users_username_key".to_string()));
        }

        let now = Utc::now();
        let id = next_id(&mut tables.next_user_id);
        let user = User {
            id,
            username: user.username,
            password_hash: user.password_hash,
            role: user.role,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        tables.users.insert(id, user.clone());

        tracing::debug!(user_id = id, username = %user.username, "Inserted user");
        Ok(user)
    }

    async fn count_by_username(&self, username: &str) -> RepositoryResult<i64> {
        self.check_available()?;
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .values()
            .filter(|u| u.username == username)
            .count() as i64)
    }
}

#[async_trait]
impl BookRepository for InMemoryRepository {
    async fn find_all(&self) -> RepositoryResult<Vec<Book>> {
        self.check_available()?;
        let tables = self.tables.read().await;
        Ok(tables
            .books
            .values()
            .filter(|b| b.deleted_at.is_none())
            .cloned()
            .collect())
    }

    async fn find_by_id(&self, id: i64) -> RepositoryResult<Option<Book>> {
        self.check_available()?;
        let tables = self.tables.read().await;
        Ok(tables
            .books
            .get(&id)
            .filter(|b| b.deleted_at.is_none())
            .cloned())
    }

    async fn insert(&self, book: NewBook) -> RepositoryResult<Book> {
        self.check_available()?;
        let mut tables = self.tables.write().await;

        let now = Utc::now();
        let id = next_id(&mut tables.next_book_id);
        let book = Book {
            id,
            title: book.title,
            author: book.author,
            price: book.price,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        tables.books.insert(id, book.clone());
        Ok(book)
    }

    async fn count_by_id(&self, id: i64) -> RepositoryResult<i64> {
        self.check_available()?;
        let tables = self.tables.read().await;
        Ok(tables
            .books
            .get(&id)
            .filter(|b| b.deleted_at.is_none())
            .map_or(0, |_| 1))
    }
}

#[async_trait]
impl OrderRepository for InMemoryRepository {
    async fn find_all(&self) -> RepositoryResult<Vec<Order>> {
        self.check_available()?;
        let tables = self.tables.read().await;
        Ok(tables
            .orders
            .values()
            .filter(|o| o.deleted_at.is_none())
            .cloned()
            .collect())
    }

    async fn insert(&self, order: NewOrder) -> RepositoryResult<Order> {
        self.check_available()?;
        let mut tables = self.tables.write().await;

        let book_live = tables
            .books
            .get(&order.book_id)
            .is_some_and(|b| b.deleted_at.is_none());
        if !book_live {
            return Err(RepositoryError::MissingReference("book"));
        }

        let now = Utc::now();
        let id = next_id(&mut tables.next_order_id);
        let order = Order {
            id,
            book_id: order.book_id,
            customer_name: order.customer_name,
            quantity: order.quantity,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        tables.orders.insert(id, order.clone());
        Ok(order)
    }
}
