use std::sync::Arc;

use anyhow::{Context, anyhow};
use bookstore_core::AppError;
use bookstore_db::OrderRepository;
use bookstore_models::{CreateOrderDto, Order};
use tracing::instrument;

#[derive(Clone)]
pub struct OrderService {
    orders: Arc<dyn OrderRepository>,
}

impl OrderService {
    pub fn new(orders: Arc<dyn OrderRepository>) -> Self {
        Self { orders }
    }

    #[instrument(skip(self))]
    pub async fn get_orders(&self) -> Result<Vec<Order>, AppError> {
        self.orders
            .find_all()
            .await
            .context("Failed to fetch orders")
            .map_err(AppError::database)
    }

    /// Places an order. The referenced book must exist and not be deleted;
    /// the repository checks this as part of the insert.
    #[instrument(skip(self))]
    pub async fn create_order(&self, dto: CreateOrderDto) -> Result<Order, AppError> {
        self.orders.insert(dto.into()).await.map_err(|err| {
            if err.is_missing_reference() {
                AppError::not_found(anyhow!("Book not found"))
            } else {
                AppError::database(anyhow::Error::new(err).context("Failed to create order"))
            }
        })
    }
}
