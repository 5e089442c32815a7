use axum::{Json, extract::State, http::StatusCode};
use bookstore_core::AppError;
use bookstore_models::{CreateOrderDto, Order};
use tracing::instrument;

use crate::state::AppState;
use crate::validator::ValidatedJson;

/// List all orders
#[instrument(skip(state))]
pub async fn get_orders(State(state): State<AppState>) -> Result<Json<Vec<Order>>, AppError> {
    let orders = state.orders.get_orders().await?;
    Ok(Json(orders))
}

/// Place an order for a book
#[instrument(skip(state))]
pub async fn create_order(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<CreateOrderDto>,
) -> Result<(StatusCode, Json<Order>), AppError> {
    let order = state.orders.create_order(dto).await?;
    Ok((StatusCode::CREATED, Json(order)))
}
