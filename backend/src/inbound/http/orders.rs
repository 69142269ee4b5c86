//! Order handlers.
//!
//! ```text
//! GET /api/orders
//! POST /api/orders
//! GET /api/orders/{id}
//! PUT /api/orders/{id}/status
//! GET /api/organizations/{orgId}/orders
//! ```

use actix_web::{HttpResponse, get, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::PlaceOrderRequest;
use crate::domain::{
    Error, Order, OrderDraft, OrderId, OrderLine, OrderStatus, OrganizationId, UserId,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::bearer::Authenticated;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::order_error;

/// Body for `POST /api/orders`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlaceOrderBody {
    /// Cart lines; price and name are captured as sent.
    pub products: Vec<OrderLine>,
    /// Employee the order is for. Org admins only.
    #[serde(default)]
    pub org_user_id: Option<UserId>,
}

/// Response for `POST /api/orders`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderPlacedResponse {
    #[schema(example = "Order placed successfully")]
    pub message: String,
    pub order_id: String,
    #[schema(example = 5400)]
    pub total_amount: u64,
}

/// Body for `PUT /api/orders/{id}/status`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct UpdateStatusBody {
    pub status: OrderStatus,
}

/// Orders visible to the caller.
#[utoipa::path(
    get,
    path = "/api/orders",
    responses(
        (status = 200, description = "Orders", body = [Order]),
        (status = 401, description = "Missing token", body = Error)
    ),
    tags = ["orders"],
    operation_id = "listOrders"
)]
#[get("/orders")]
pub async fn list_orders(
    state: web::Data<HttpState>,
    caller: Authenticated,
) -> ApiResult<web::Json<Vec<Order>>> {
    let orders = state.orders.list(caller.principal()).await?;
    Ok(web::Json(orders))
}

/// Place a new `pending` order.
#[utoipa::path(
    post,
    path = "/api/orders",
    request_body = PlaceOrderBody,
    responses(
        (status = 201, description = "Order placed", body = OrderPlacedResponse),
        (status = 400, description = "Empty cart or zero quantity", body = Error),
        (status = 403, description = "Caller may not order", body = Error)
    ),
    tags = ["orders"],
    operation_id = "placeOrder"
)]
#[post("/orders")]
pub async fn place_order(
    state: web::Data<HttpState>,
    caller: Authenticated,
    payload: web::Json<PlaceOrderBody>,
) -> ApiResult<HttpResponse> {
    let PlaceOrderBody {
        products,
        org_user_id,
    } = payload.into_inner();
    let draft = OrderDraft::try_new(products).map_err(order_error)?;
    let order = state
        .orders
        .place(caller.principal(), PlaceOrderRequest { draft, org_user_id })
        .await?;
    Ok(HttpResponse::Created().json(OrderPlacedResponse {
        message: "Order placed successfully".to_owned(),
        order_id: order.id.to_string(),
        total_amount: order.total_amount,
    }))
}

/// One order.
#[utoipa::path(
    get,
    path = "/api/orders/{id}",
    params(("id" = String, Path, description = "Order id")),
    responses(
        (status = 200, description = "Order", body = Order),
        (status = 403, description = "Caller does not own the order", body = Error),
        (status = 404, description = "Unknown order", body = Error)
    ),
    tags = ["orders"],
    operation_id = "getOrder"
)]
#[get("/orders/{id}")]
pub async fn get_order(
    state: web::Data<HttpState>,
    caller: Authenticated,
    path: web::Path<OrderId>,
) -> ApiResult<web::Json<Order>> {
    let order = state
        .orders
        .get(caller.principal(), &path.into_inner())
        .await?;
    Ok(web::Json(order))
}

/// Move an order to any status.
#[utoipa::path(
    put,
    path = "/api/orders/{id}/status",
    params(("id" = String, Path, description = "Order id")),
    request_body = UpdateStatusBody,
    responses(
        (status = 200, description = "Updated order", body = Order),
        (status = 400, description = "Unknown status", body = Error),
        (status = 403, description = "Caller is not a super admin", body = Error),
        (status = 404, description = "Unknown order", body = Error)
    ),
    tags = ["orders"],
    operation_id = "updateOrderStatus"
)]
#[put("/orders/{id}/status")]
pub async fn update_order_status(
    state: web::Data<HttpState>,
    caller: Authenticated,
    path: web::Path<OrderId>,
    payload: web::Json<UpdateStatusBody>,
) -> ApiResult<web::Json<Order>> {
    let order = state
        .orders
        .update_status(caller.principal(), &path.into_inner(), payload.status)
        .await?;
    Ok(web::Json(order))
}

/// Orders placed by an organisation's admins or for its employees.
#[utoipa::path(
    get,
    path = "/api/organizations/{orgId}/orders",
    params(("orgId" = String, Path, description = "Organisation id")),
    responses(
        (status = 200, description = "Orders of the organisation", body = [Order]),
        (status = 401, description = "Missing token", body = Error),
        (status = 403, description = "Caller does not oversee this organisation", body = Error)
    ),
    tags = ["orders"],
    operation_id = "listOrganizationOrders"
)]
#[get("/organizations/{org_id}/orders")]
pub async fn list_organization_orders(
    state: web::Data<HttpState>,
    caller: Authenticated,
    path: web::Path<OrganizationId>,
) -> ApiResult<web::Json<Vec<Order>>> {
    let orders = state
        .orders
        .list_for_organization(caller.principal(), &path.into_inner())
        .await?;
    Ok(web::Json(orders))
}
