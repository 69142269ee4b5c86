//! Order placement and tracking.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::info;

use super::port_errors::{account_error, order_error, org_user_error};
use super::ports::{
    AccountRepository, OrderRepository, OrdersService, OrgUserRepository, PlaceOrderRequest,
};
use super::{
    Error, Order, OrderId, OrderPlacement, OrderStatus, OrdererKind, OrganizationId, Principal,
    Role, UserId,
};

/// Ordering service implementing [`OrdersService`].
#[derive(Clone)]
pub struct OrderingService<O, U, A> {
    orders: Arc<O>,
    org_users: Arc<U>,
    accounts: Arc<A>,
    clock: Arc<dyn Clock>,
}

impl<O, U, A> OrderingService<O, U, A> {
    /// Create a new service with the given repositories.
    pub fn new(
        orders: Arc<O>,
        org_users: Arc<U>,
        accounts: Arc<A>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            orders,
            org_users,
            accounts,
            clock,
        }
    }
}

impl<O, U, A> OrderingService<O, U, A>
where
    O: OrderRepository,
    U: OrgUserRepository,
    A: AccountRepository,
{
    async fn require_order(&self, id: &OrderId) -> Result<Order, Error> {
        self.orders
            .find(id)
            .await
            .map_err(order_error)?
            .ok_or_else(|| Error::not_found("Order not found"))
    }

    /// Check that an org admin may order for `org_user_id`.
    async fn check_recipient(
        &self,
        principal: &Principal,
        kind: OrdererKind,
        org_user_id: &UserId,
    ) -> Result<(), Error> {
        if kind != OrdererKind::OrgAdmin {
            return Err(Error::forbidden(
                "Only organization admins can order for an org user",
            ));
        }
        let recipient = self
            .org_users
            .find(org_user_id)
            .await
            .map_err(org_user_error)?
            .ok_or_else(|| Error::not_found("Org user not found"))?;
        principal.require_org_admin_of(&recipient.org_id)
    }
}

#[async_trait]
impl<O, U, A> OrdersService for OrderingService<O, U, A>
where
    O: OrderRepository,
    U: OrgUserRepository,
    A: AccountRepository,
{
    async fn list(&self, principal: &Principal) -> Result<Vec<Order>, Error> {
        if principal.is_super_admin() {
            self.orders.list().await.map_err(order_error)
        } else {
            self.orders
                .list_for_user(principal.user_id())
                .await
                .map_err(order_error)
        }
    }

    async fn list_for_organization(
        &self,
        principal: &Principal,
        org_id: &OrganizationId,
    ) -> Result<Vec<Order>, Error> {
        principal.require_oversight_of(org_id)?;
        let members: HashSet<UserId> = self
            .org_users
            .list_for_org(org_id)
            .await
            .map_err(org_user_error)?
            .into_iter()
            .map(|user| user.id)
            .collect();
        let admins: HashSet<UserId> = self
            .accounts
            .list()
            .await
            .map_err(account_error)?
            .into_iter()
            .filter(|a| a.role == Role::OrgAdmin && a.org_id.as_ref() == Some(org_id))
            .map(|a| a.id)
            .collect();
        let orders = self.orders.list().await.map_err(order_error)?;
        Ok(orders
            .into_iter()
            .filter(|order| {
                order
                    .org_user_id
                    .as_ref()
                    .is_some_and(|id| members.contains(id))
                    || (order.user_type == OrdererKind::OrgAdmin
                        && admins.contains(&order.user_id))
            })
            .collect())
    }

    async fn place(
        &self,
        principal: &Principal,
        request: PlaceOrderRequest,
    ) -> Result<Order, Error> {
        let kind = OrdererKind::from_role(principal.role()).ok_or_else(|| {
            Error::forbidden("Only individuals and organization admins can place orders")
        })?;
        let PlaceOrderRequest { draft, org_user_id } = request;
        if let Some(recipient) = &org_user_id {
            self.check_recipient(principal, kind, recipient).await?;
        }
        let order = Order::place(
            OrderId::generate(),
            OrderPlacement {
                user_id: principal.user_id().clone(),
                user_type: kind,
                org_user_id,
            },
            draft,
            self.clock.utc(),
        );
        self.orders.insert(&order).await.map_err(order_error)?;
        info!(
            order_id = %order.id,
            user_id = %order.user_id,
            total_amount = order.total_amount,
            "order placed"
        );
        Ok(order)
    }

    async fn get(&self, principal: &Principal, id: &OrderId) -> Result<Order, Error> {
        let order = self.require_order(id).await?;
        if principal.is_super_admin() || &order.user_id == principal.user_id() {
            Ok(order)
        } else {
            Err(Error::forbidden("Access denied"))
        }
    }

    async fn update_status(
        &self,
        principal: &Principal,
        id: &OrderId,
        status: OrderStatus,
    ) -> Result<Order, Error> {
        principal.require_super_admin()?;
        let mut order = self.require_order(id).await?;
        let previous = order.status;
        order.set_status(status, self.clock.utc());
        if !self.orders.update(&order).await.map_err(order_error)? {
            return Err(Error::not_found("Order not found"));
        }
        info!(order_id = %id, from = %previous, to = %status, "order status updated");
        Ok(order)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{MockAccountRepository, MockOrderRepository, MockOrgUserRepository};
    use crate::domain::service_test_helpers::{
        fixture_clock, fixture_timestamp, individual, org_admin, org_admin_account, org_id,
        org_user, super_admin, user_id,
    };
    use crate::domain::{ErrorCode, OrderDraft, OrderLine, ProductId};
    use rstest::rstest;

    type Service =
        OrderingService<MockOrderRepository, MockOrgUserRepository, MockAccountRepository>;

    fn service(orders: MockOrderRepository, org_users: MockOrgUserRepository) -> Service {
        service_with_accounts(orders, org_users, MockAccountRepository::new())
    }

    fn service_with_accounts(
        orders: MockOrderRepository,
        org_users: MockOrgUserRepository,
        accounts: MockAccountRepository,
    ) -> Service {
        OrderingService::new(
            Arc::new(orders),
            Arc::new(org_users),
            Arc::new(accounts),
            fixture_clock(),
        )
    }

    fn request(org_user_id: Option<&str>) -> PlaceOrderRequest {
        let draft = OrderDraft::try_new(vec![
            OrderLine {
                product_id: ProductId::new("prod-001").expect("id"),
                product_name: "Classic White Shirt".into(),
                quantity: 2,
                price: 1200,
            },
            OrderLine {
                product_id: ProductId::new("prod-002").expect("id"),
                product_name: "Navy Blue Trousers".into(),
                quantity: 2,
                price: 1500,
            },
        ])
        .expect("draft");
        PlaceOrderRequest {
            draft,
            org_user_id: org_user_id.map(user_id),
        }
    }

    #[rstest]
    #[tokio::test]
    async fn individual_order_is_pending_with_exact_total() {
        let mut orders = MockOrderRepository::new();
        orders.expect_insert().times(1).returning(|_| Ok(()));
        let order = service(orders, MockOrgUserRepository::new())
            .place(&individual("ind-001"), request(None))
            .await
            .expect("placed");
        assert_eq!(order.total_amount, 5400);
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.user_type, OrdererKind::Individual);
        assert_eq!(order.created_at, fixture_timestamp());
    }

    #[rstest]
    #[tokio::test]
    async fn individuals_cannot_order_for_org_users() {
        let mut orders = MockOrderRepository::new();
        orders.expect_insert().never();
        let err = service(orders, MockOrgUserRepository::new())
            .place(&individual("ind-001"), request(Some("ou-001")))
            .await
            .expect_err("forbidden");
        assert_eq!(err.code(), ErrorCode::Forbidden);
    }

    #[rstest]
    #[case("org-001", true)]
    #[case("org-002", false)]
    #[tokio::test]
    async fn org_admin_orders_only_for_own_employees(
        #[case] employee_org: &'static str,
        #[case] allowed: bool,
    ) {
        let mut org_users = MockOrgUserRepository::new();
        org_users
            .expect_find()
            .returning(move |_| Ok(Some(org_user("ou-001", employee_org))));
        let mut orders = MockOrderRepository::new();
        orders
            .expect_insert()
            .times(usize::from(allowed))
            .returning(|_| Ok(()));
        let result = service(orders, org_users)
            .place(&org_admin("org-001"), request(Some("ou-001")))
            .await;
        assert_eq!(result.is_ok(), allowed);
    }

    #[rstest]
    #[tokio::test]
    async fn super_admins_cannot_place_orders() {
        let err = service(MockOrderRepository::new(), MockOrgUserRepository::new())
            .place(&super_admin(), request(None))
            .await
            .expect_err("forbidden");
        assert_eq!(err.code(), ErrorCode::Forbidden);
    }

    #[rstest]
    #[tokio::test]
    async fn non_super_admins_list_their_own_orders() {
        let mut orders = MockOrderRepository::new();
        orders.expect_list().never();
        orders
            .expect_list_for_user()
            .withf(|id| id.as_str() == "ind-001")
            .times(1)
            .returning(|_| Ok(Vec::new()));
        service(orders, MockOrgUserRepository::new())
            .list(&individual("ind-001"))
            .await
            .expect("list");
    }

    #[rstest]
    #[tokio::test]
    async fn status_updates_are_super_admin_only() {
        let err = service(MockOrderRepository::new(), MockOrgUserRepository::new())
            .update_status(
                &individual("ind-001"),
                &OrderId::new("order-001").expect("id"),
                OrderStatus::Completed,
            )
            .await
            .expect_err("forbidden");
        assert_eq!(err.code(), ErrorCode::Forbidden);
    }

    fn placed(id: &str, by: &str, kind: OrdererKind, org_user_id: Option<&str>) -> Order {
        let draft = request(None).draft;
        Order::place(
            OrderId::new(id).expect("id"),
            OrderPlacement {
                user_id: user_id(by),
                user_type: kind,
                org_user_id: org_user_id.map(user_id),
            },
            draft,
            fixture_timestamp(),
        )
    }

    #[rstest]
    #[tokio::test]
    async fn organisation_orders_cover_its_admins_and_members() {
        let mut orders = MockOrderRepository::new();
        orders.expect_list().returning(|| {
            Ok(vec![
                placed("order-001", "oa-001", OrdererKind::OrgAdmin, Some("ou-001")),
                placed("order-002", "ind-001", OrdererKind::Individual, None),
                placed("order-003", "oa-002", OrdererKind::OrgAdmin, None),
                placed("order-004", "oa-009", OrdererKind::OrgAdmin, Some("ou-009")),
            ])
        });
        let mut org_users = MockOrgUserRepository::new();
        org_users
            .expect_list_for_org()
            .withf(|org| org.as_str() == "org-001")
            .returning(|_| Ok(vec![org_user("ou-001", "org-001")]));
        let mut accounts = MockAccountRepository::new();
        accounts.expect_list().returning(|| {
            Ok(vec![
                org_admin_account("oa-001", "org-001"),
                org_admin_account("oa-002", "org-001"),
                org_admin_account("oa-009", "org-002"),
            ])
        });

        let listed = service_with_accounts(orders, org_users, accounts)
            .list_for_organization(&super_admin(), &org_id("org-001"))
            .await
            .expect("listed");

        let ids: Vec<&str> = listed.iter().map(|o| o.id.as_str()).collect();
        assert_eq!(ids, ["order-001", "order-003"]);
    }

    #[rstest]
    #[tokio::test]
    async fn organisation_orders_need_oversight() {
        let mut orders = MockOrderRepository::new();
        orders.expect_list().never();
        let err = service(orders, MockOrgUserRepository::new())
            .list_for_organization(&org_admin("org-002"), &org_id("org-001"))
            .await
            .expect_err("other org");
        assert_eq!(err.code(), ErrorCode::Forbidden);
    }
}
