//! Orders: snapshots of cart contents plus a free-form status.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::account::required_text;
use super::{OrderId, ProductId, Role, UserId};

/// Order lifecycle status. Any status may follow any other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    Processing,
    Completed,
    Cancelled,
}

impl OrderStatus {
    /// Every status.
    pub const ALL: [Self; 4] = [
        Self::Pending,
        Self::Processing,
        Self::Completed,
        Self::Cancelled,
    ];

    /// Wire representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Who placed an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum OrdererKind {
    OrgAdmin,
    Individual,
}

impl OrdererKind {
    /// Map an account role onto the kinds allowed to order.
    pub fn from_role(role: Role) -> Option<Self> {
        match role {
            Role::OrgAdmin => Some(Self::OrgAdmin),
            Role::Individual => Some(Self::Individual),
            Role::SuperAdmin | Role::OrgUser => None,
        }
    }
}

/// One product line captured at order time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    pub product_id: ProductId,
    pub product_name: String,
    pub quantity: u32,
    /// Unit price in whole currency units.
    pub price: u64,
}

impl OrderLine {
    /// `price × quantity`, or `None` on overflow.
    pub fn subtotal(&self) -> Option<u64> {
        self.price.checked_mul(u64::from(self.quantity))
    }
}

/// Validation failures for order inputs.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OrderValidationError {
    /// The cart had no lines.
    #[error("order must contain at least one product")]
    EmptyOrder,
    /// A line requested zero units.
    #[error("quantity for line {index} must be at least 1")]
    ZeroQuantity {
        /// Zero-based line index.
        index: usize,
    },
    /// A line had no product name.
    #[error("product name for line {index} must not be empty")]
    EmptyProductName {
        /// Zero-based line index.
        index: usize,
    },
    /// The total did not fit in 64 bits.
    #[error("order total overflows")]
    TotalOverflow,
}

/// Sum `price × quantity` over `lines` with overflow checking.
///
/// # Examples
/// ```
/// use tailor_backend::domain::{OrderLine, ProductId, order_total};
///
/// let lines = vec![
///     OrderLine {
///         product_id: ProductId::new("prod-001").unwrap(),
///         product_name: "Shirt".into(),
///         quantity: 2,
///         price: 1200,
///     },
///     OrderLine {
///         product_id: ProductId::new("prod-002").unwrap(),
///         product_name: "Trousers".into(),
///         quantity: 2,
///         price: 1500,
///     },
/// ];
/// assert_eq!(order_total(&lines), Ok(5400));
/// ```
pub fn order_total(lines: &[OrderLine]) -> Result<u64, OrderValidationError> {
    lines.iter().try_fold(0_u64, |total, line| {
        line.subtotal()
            .and_then(|subtotal| total.checked_add(subtotal))
            .ok_or(OrderValidationError::TotalOverflow)
    })
}

/// Validated cart contents ready to become an [`Order`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderDraft {
    lines: Vec<OrderLine>,
    total_amount: u64,
}

impl OrderDraft {
    /// Validate the cart and compute its total.
    pub fn try_new(lines: Vec<OrderLine>) -> Result<Self, OrderValidationError> {
        if lines.is_empty() {
            return Err(OrderValidationError::EmptyOrder);
        }
        let lines = lines
            .into_iter()
            .enumerate()
            .map(|(index, line)| {
                if line.quantity == 0 {
                    return Err(OrderValidationError::ZeroQuantity { index });
                }
                let product_name = required_text(&line.product_name, "productName")
                    .map_err(|_| OrderValidationError::EmptyProductName { index })?;
                Ok(OrderLine {
                    product_name,
                    ..line
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        let total_amount = order_total(&lines)?;
        Ok(Self {
            lines,
            total_amount,
        })
    }

    /// Lines in cart order.
    pub fn lines(&self) -> &[OrderLine] {
        &self.lines
    }

    /// Exact sum of line subtotals.
    pub fn total_amount(&self) -> u64 {
        self.total_amount
    }
}

/// A placed order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub user_id: UserId,
    pub user_type: OrdererKind,
    /// Employee the order was placed for, when ordered by an org admin.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub org_user_id: Option<UserId>,
    pub status: OrderStatus,
    pub products: Vec<OrderLine>,
    pub total_amount: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Who an order is placed by and for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderPlacement {
    pub user_id: UserId,
    pub user_type: OrdererKind,
    pub org_user_id: Option<UserId>,
}

impl Order {
    /// Open a new `pending` order.
    pub fn place(
        id: OrderId,
        placement: OrderPlacement,
        draft: OrderDraft,
        now: DateTime<Utc>,
    ) -> Self {
        let OrderDraft {
            lines,
            total_amount,
        } = draft;
        Self {
            id,
            user_id: placement.user_id,
            user_type: placement.user_type,
            org_user_id: placement.org_user_id,
            status: OrderStatus::Pending,
            products: lines,
            total_amount,
            created_at: now,
            updated_at: now,
        }
    }

    /// Set the status unconditionally and stamp `updated_at`.
    pub fn set_status(&mut self, status: OrderStatus, now: DateTime<Utc>) {
        self.status = status;
        self.updated_at = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn line(price: u64, quantity: u32) -> OrderLine {
        OrderLine {
            product_id: ProductId::new("prod-001").expect("id"),
            product_name: "Classic White Shirt".into(),
            quantity,
            price,
        }
    }

    #[rstest]
    #[case(vec![line(1200, 2), line(1500, 2)], 5400)]
    #[case(vec![line(600, 3)], 1800)]
    #[case(vec![line(900, 1), line(600, 4), line(1800, 2)], 6900)]
    fn draft_total_is_sum_of_subtotals(#[case] lines: Vec<OrderLine>, #[case] expected: u64) {
        let draft = OrderDraft::try_new(lines).expect("valid cart");
        assert_eq!(draft.total_amount(), expected);
    }

    #[rstest]
    fn rejects_empty_carts_and_zero_quantities() {
        assert_eq!(
            OrderDraft::try_new(Vec::new()),
            Err(OrderValidationError::EmptyOrder)
        );
        assert_eq!(
            OrderDraft::try_new(vec![line(100, 1), line(100, 0)]),
            Err(OrderValidationError::ZeroQuantity { index: 1 })
        );
    }

    #[rstest]
    fn overflow_is_reported_not_wrapped() {
        assert_eq!(
            OrderDraft::try_new(vec![line(u64::MAX, 2)]),
            Err(OrderValidationError::TotalOverflow)
        );
        assert_eq!(
            OrderDraft::try_new(vec![line(u64::MAX, 1), line(1, 1)]),
            Err(OrderValidationError::TotalOverflow)
        );
    }

    #[rstest]
    fn any_status_may_follow_any_other() {
        let now = Utc::now();
        let draft = OrderDraft::try_new(vec![line(600, 1)]).expect("valid");
        let mut order = Order::place(
            OrderId::generate(),
            OrderPlacement {
                user_id: UserId::new("ind-001").expect("id"),
                user_type: OrdererKind::Individual,
                org_user_id: None,
            },
            draft,
            now,
        );
        for from in OrderStatus::ALL {
            for to in OrderStatus::ALL {
                order.set_status(from, now);
                order.set_status(to, now);
                assert_eq!(order.status, to);
            }
        }
    }
}
