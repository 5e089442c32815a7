use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A book in the catalogue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Book {
    pub id: i64,
    pub title: String,
    pub author: String,
    pub price: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
}

/// DTO for adding a book. Admin only.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateBookDto {
    #[validate(length(min = 1, message = "title is required"))]
    pub title: String,
    #[validate(length(min = 1, message = "author is required"))]
    pub author: String,
    #[validate(range(exclusive_min = 0.0, message = "price must be greater than zero"))]
    pub price: f64,
}

/// Insert payload for a book.
#[derive(Debug, Clone, PartialEq)]
pub struct NewBook {
    pub title: String,
    pub author: String,
    pub price: f64,
}

impl From<CreateBookDto> for NewBook {
    fn from(dto: CreateBookDto) -> Self {
        Self {
            title: dto.title,
            author: dto.author,
            price: dto.price,
        }
    }
}
