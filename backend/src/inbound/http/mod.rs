//! HTTP inbound adapter exposing the REST endpoints under `/api`.

pub mod auth;
pub mod bearer;
pub mod error;
pub mod health;
pub mod measurements;
pub mod orders;
pub mod organizations;
pub mod products;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod users;
mod validation;

use actix_web::{Scope, web};

pub use crate::domain::ApiResult;

/// Every `/api` route with JSON, query and path errors mapped onto the
/// error envelope.
///
/// Literal segments (`/products/categories`, `/measurements/all`,
/// `/measurements/types`) are registered ahead of their `{id}` siblings.
/// Callers supply [`state::HttpState`] as app data.
pub fn api_scope() -> Scope {
    web::scope("/api")
        .app_data(web::JsonConfig::default().error_handler(error::json_error_handler))
        .app_data(web::QueryConfig::default().error_handler(error::query_error_handler))
        .app_data(web::PathConfig::default().error_handler(error::path_error_handler))
        .service(auth::login)
        .service(auth::signup)
        .service(auth::current_account)
        .service(auth::change_password)
        .service(users::list_users)
        .service(users::list_super_admins)
        .service(users::create_super_admin)
        .service(users::update_super_admin)
        .service(users::delete_super_admin)
        .service(users::update_individual)
        .service(users::delete_individual)
        .service(organizations::list_organizations)
        .service(organizations::create_organization)
        .service(organizations::get_organization)
        .service(organizations::delete_organization)
        .service(organizations::list_org_users)
        .service(organizations::create_org_user)
        .service(organizations::update_org_user)
        .service(organizations::delete_org_user)
        .service(organizations::list_org_admins)
        .service(organizations::create_org_admin)
        .service(organizations::update_org_admin)
        .service(organizations::delete_org_admin)
        .service(orders::list_organization_orders)
        .service(products::list_categories)
        .service(products::list_products)
        .service(products::get_product)
        .service(products::create_product)
        .service(products::update_product)
        .service(products::delete_product)
        .service(measurements::list_measurement_types)
        .service(measurements::get_measurement_template)
        .service(measurements::list_all_measurements)
        .service(measurements::list_measurements)
        .service(measurements::record_measurement)
        .service(measurements::update_measurement)
        .service(measurements::delete_measurement)
        .service(orders::list_orders)
        .service(orders::place_order)
        .service(orders::get_order)
        .service(orders::update_order_status)
}
