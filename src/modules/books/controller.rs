use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use bookstore_core::AppError;
use bookstore_models::{Book, CreateBookDto};
use tracing::instrument;

use crate::state::AppState;
use crate::validator::ValidatedJson;

/// List all books
#[instrument(skip(state))]
pub async fn get_books(State(state): State<AppState>) -> Result<Json<Vec<Book>>, AppError> {
    let books = state.books.get_books().await?;
    Ok(Json(books))
}

/// Get a book by ID
#[instrument(skip(state))]
pub async fn get_book(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Book>, AppError> {
    let book = state.books.get_book(id).await?;
    Ok(Json(book))
}

/// Add a book to the catalogue (admin only)
#[instrument(skip(state))]
pub async fn create_book(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<CreateBookDto>,
) -> Result<(StatusCode, Json<Book>), AppError> {
    let book = state.books.create_book(dto).await?;
    Ok((StatusCode::CREATED, Json(book)))
}
