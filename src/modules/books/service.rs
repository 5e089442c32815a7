use std::sync::Arc;

use anyhow::{Context, anyhow};
use bookstore_core::AppError;
use bookstore_db::BookRepository;
use bookstore_models::{Book, CreateBookDto};
use tracing::instrument;

#[derive(Clone)]
pub struct BookService {
    books: Arc<dyn BookRepository>,
}

impl BookService {
    pub fn new(books: Arc<dyn BookRepository>) -> Self {
        Self { books }
    }

    #[instrument(skip(self))]
    pub async fn get_books(&self) -> Result<Vec<Book>, AppError> {
        self.books
            .find_all()
            .await
            .context("Failed to fetch books")
            .map_err(AppError::database)
    }

    #[instrument(skip(self))]
    pub async fn get_book(&self, id: i64) -> Result<Book, AppError> {
        self.books
            .find_by_id(id)
            .await
            .context("Failed to fetch book")
            .map_err(AppError::database)?
            .ok_or_else(|| AppError::not_found(anyhow!("Book not found")))
    }

    #[instrument(skip(self))]
    pub async fn create_book(&self, dto: CreateBookDto) -> Result<Book, AppError> {
        self.books
            .insert(dto.into())
            .await
            .context("Failed to create book")
            .map_err(AppError::database)
    }
}
