use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A customer order for a single book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Order {
    pub id: i64,
    pub book_id: i64,
    pub customer_name: String,
    pub quantity: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
}

/// DTO for placing an order. The referenced book must exist.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateOrderDto {
    pub book_id: i64,
    #[validate(length(min = 1, message = "customer_name is required"))]
    pub customer_name: String,
    #[validate(range(min = 1, message = "quantity must be at least 1"))]
    pub quantity: i32,
}

/// Insert payload for an order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrder {
    pub book_id: i64,
    pub customer_name: String,
    pub quantity: i32,
}

impl From<CreateOrderDto> for NewOrder {
    fn from(dto: CreateOrderDto) -> Self {
        Self {
            book_id: dto.book_id,
            customer_name: dto.customer_name,
            quantity: dto.quantity,
        }
    }
}
