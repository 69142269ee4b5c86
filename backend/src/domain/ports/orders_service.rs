//! Driving port for placing and tracking orders.

use async_trait::async_trait;

use crate::domain::{
    Error, Order, OrderDraft, OrderId, OrderStatus, OrganizationId, Principal, UserId,
};

/// Validated request to place an order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceOrderRequest {
    pub draft: OrderDraft,
    /// Employee the order is for. Only org admins may set this.
    pub org_user_id: Option<UserId>,
}

/// Domain use-case port for orders.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OrdersService: Send + Sync {
    /// Super admins see every order; everyone else sees their own.
    async fn list(&self, principal: &Principal) -> Result<Vec<Order>, Error>;

    /// Orders placed by an organisation's admins or for its employees.
    async fn list_for_organization(
        &self,
        principal: &Principal,
        org_id: &OrganizationId,
    ) -> Result<Vec<Order>, Error>;

    /// Place a `pending` order.
    async fn place(
        &self,
        principal: &Principal,
        request: PlaceOrderRequest,
    ) -> Result<Order, Error>;

    /// One order, visible to its owner and super admins.
    async fn get(&self, principal: &Principal, id: &OrderId) -> Result<Order, Error>;

    /// Set an order's status. Restricted to super admins.
    async fn update_status(
        &self,
        principal: &Principal,
        id: &OrderId,
        status: OrderStatus,
    ) -> Result<Order, Error>;
}
