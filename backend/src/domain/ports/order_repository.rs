//! Port abstraction for placed orders.
use async_trait::async_trait;

use crate::domain::{Order, OrderId, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by order repository adapters.
    pub enum OrderRepositoryError {
        /// The backing store could not complete the operation.
        Query { message: String } => "order repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Every order in insertion order.
    async fn list(&self) -> Result<Vec<Order>, OrderRepositoryError>;

    /// Orders placed by one account.
    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<Order>, OrderRepositoryError>;

    /// Fetch an order by id.
    async fn find(&self, id: &OrderId) -> Result<Option<Order>, OrderRepositoryError>;

    /// Store a new order.
    async fn insert(&self, order: &Order) -> Result<(), OrderRepositoryError>;

    /// Overwrite an existing order. Returns `false` when absent.
    async fn update(&self, order: &Order) -> Result<bool, OrderRepositoryError>;
}
