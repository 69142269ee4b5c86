//! Product catalogue handlers.
//!
//! ```text
//! GET    /api/products[?category=]
//! GET    /api/products/categories
//! GET    /api/products/{id}
//! POST   /api/products
//! PUT    /api/products/{id}
//! DELETE /api/products/{id}
//! ```
//!
//! Reads need no token. `categories` must be registered before the `{id}`
//! route so the literal segment wins.

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{CategorySummary, Error, Product, ProductDraft, ProductId, ProductPatch};
use crate::inbound::http::ApiResult;
use crate::inbound::http::bearer::Authenticated;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{empty_patch_error, parse_category, product_error};

/// Query for `GET /api/products`.
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct ProductQuery {
    /// Exact category to filter by, e.g. `corporate_wear`.
    pub category: Option<String>,
}

/// Body for `POST /api/products`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductBody {
    #[schema(example = "Classic White Shirt")]
    pub name: String,
    #[schema(example = "corporate_wear")]
    pub category: String,
    #[serde(default)]
    pub description: String,
    #[schema(example = 1200)]
    pub price: u64,
    #[serde(default)]
    pub image: Option<String>,
}

/// Body for `PUT /api/products/{id}`. An empty `image` clears the image.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductBody {
    pub name: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub price: Option<u64>,
    pub image: Option<String>,
}

fn draft(body: &CreateProductBody) -> Result<ProductDraft, Error> {
    let category = parse_category(Some(body.category.as_str()), "category")?
        .ok_or_else(|| Error::invalid_request("category is required"))?;
    ProductDraft::try_new(
        &body.name,
        category,
        &body.description,
        body.price,
        body.image.as_deref(),
    )
    .map_err(product_error)
}

fn patch(body: &UpdateProductBody) -> Result<ProductPatch, Error> {
    let patch = ProductPatch::try_new(
        body.name.as_deref(),
        parse_category(body.category.as_deref(), "category")?,
        body.description.as_deref(),
        body.price,
        body.image.as_deref(),
    )
    .map_err(product_error)?;
    if patch == ProductPatch::default() {
        return Err(empty_patch_error());
    }
    Ok(patch)
}

/// Products, optionally filtered by category.
#[utoipa::path(
    get,
    path = "/api/products",
    params(ProductQuery),
    responses(
        (status = 200, description = "Products", body = [Product]),
        (status = 400, description = "Unknown category", body = Error)
    ),
    tags = ["products"],
    operation_id = "listProducts",
    security([])
)]
#[get("/products")]
pub async fn list_products(
    state: web::Data<HttpState>,
    query: web::Query<ProductQuery>,
) -> ApiResult<web::Json<Vec<Product>>> {
    let category = parse_category(query.category.as_deref(), "category")?;
    let products = state.products.list(category).await?;
    Ok(web::Json(products))
}

/// The garment categories with display labels.
#[utoipa::path(
    get,
    path = "/api/products/categories",
    responses((status = 200, description = "Categories", body = [CategorySummary])),
    tags = ["products"],
    operation_id = "listProductCategories",
    security([])
)]
#[get("/products/categories")]
pub async fn list_categories(state: web::Data<HttpState>) -> web::Json<Vec<CategorySummary>> {
    web::Json(state.products.categories())
}

/// One product.
#[utoipa::path(
    get,
    path = "/api/products/{id}",
    params(("id" = String, Path, description = "Product id")),
    responses(
        (status = 200, description = "Product", body = Product),
        (status = 404, description = "Unknown product", body = Error)
    ),
    tags = ["products"],
    operation_id = "getProduct",
    security([])
)]
#[get("/products/{id}")]
pub async fn get_product(
    state: web::Data<HttpState>,
    path: web::Path<ProductId>,
) -> ApiResult<web::Json<Product>> {
    let product = state.products.get(&path.into_inner()).await?;
    Ok(web::Json(product))
}

/// Add a product to the catalogue.
#[utoipa::path(
    post,
    path = "/api/products",
    request_body = CreateProductBody,
    responses(
        (status = 201, description = "Product created", body = Product),
        (status = 400, description = "Invalid input", body = Error),
        (status = 403, description = "Caller is not a super admin", body = Error)
    ),
    tags = ["products"],
    operation_id = "createProduct"
)]
#[post("/products")]
pub async fn create_product(
    state: web::Data<HttpState>,
    caller: Authenticated,
    payload: web::Json<CreateProductBody>,
) -> ApiResult<HttpResponse> {
    let draft = draft(&payload)?;
    let product = state.products.create(caller.principal(), draft).await?;
    Ok(HttpResponse::Created().json(product))
}

/// Partially update a product.
#[utoipa::path(
    put,
    path = "/api/products/{id}",
    params(("id" = String, Path, description = "Product id")),
    request_body = UpdateProductBody,
    responses(
        (status = 200, description = "Updated product", body = Product),
        (status = 400, description = "Invalid input", body = Error),
        (status = 403, description = "Caller is not a super admin", body = Error),
        (status = 404, description = "Unknown product", body = Error)
    ),
    tags = ["products"],
    operation_id = "updateProduct"
)]
#[put("/products/{id}")]
pub async fn update_product(
    state: web::Data<HttpState>,
    caller: Authenticated,
    path: web::Path<ProductId>,
    payload: web::Json<UpdateProductBody>,
) -> ApiResult<web::Json<Product>> {
    let patch = patch(&payload)?;
    let product = state
        .products
        .update(caller.principal(), &path.into_inner(), patch)
        .await?;
    Ok(web::Json(product))
}

/// Remove a product.
#[utoipa::path(
    delete,
    path = "/api/products/{id}",
    params(("id" = String, Path, description = "Product id")),
    responses(
        (status = 204, description = "Product removed"),
        (status = 403, description = "Caller is not a super admin", body = Error),
        (status = 404, description = "Unknown product", body = Error)
    ),
    tags = ["products"],
    operation_id = "deleteProduct"
)]
#[delete("/products/{id}")]
pub async fn delete_product(
    state: web::Data<HttpState>,
    caller: Authenticated,
    path: web::Path<ProductId>,
) -> ApiResult<HttpResponse> {
    state
        .products
        .delete(caller.principal(), &path.into_inner())
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{GarmentCategory, ProductCategory};
    use crate::inbound::http::test_utils::{
        MockPorts, bearer, individual_principal, super_admin_principal,
    };
    use actix_web::http::StatusCode;
    use actix_web::{App, test};
    use chrono::{TimeZone, Utc};
    use rstest::rstest;
    use serde_json::{Value, json};

    fn product(id: &str, category: ProductCategory) -> Product {
        let now = Utc.with_ymd_and_hms(2026, 1, 5, 9, 0, 0).single().expect("time");
        Product {
            id: ProductId::new(id).expect("id"),
            name: "Classic White Shirt".into(),
            category,
            description: "Premium cotton".into(),
            price: 1200,
            image: None,
            created_at: now,
            updated_at: now,
        }
    }

    async fn send(ports: MockPorts, request: test::TestRequest) -> (StatusCode, Value) {
        let app = test::init_service(
            App::new().app_data(ports.into_state()).service(
                web::scope("/api")
                    .service(list_products)
                    .service(list_categories)
                    .service(get_product)
                    .service(create_product)
                    .service(update_product)
                    .service(delete_product),
            ),
        )
        .await;
        let response = test::call_service(&app, request.to_request()).await;
        let status = response.status();
        let body = test::read_body(response).await;
        (status, serde_json::from_slice(&body).unwrap_or(Value::Null))
    }

    #[rstest]
    #[actix_web::test]
    async fn listing_passes_the_category_filter_without_a_token() {
        let mut ports = MockPorts::default();
        ports
            .products
            .expect_list()
            .withf(|category| *category == Some(GarmentCategory::CorporateWear))
            .returning(|_| Ok(vec![product("prod-001", GarmentCategory::CorporateWear)]));
        let (status, body) = send(
            ports,
            test::TestRequest::get().uri("/api/products?category=corporate_wear"),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body[0]["category"], "corporate_wear");
    }

    #[rstest]
    #[actix_web::test]
    async fn unknown_category_filter_is_rejected() {
        let mut ports = MockPorts::default();
        ports.products.expect_list().never();
        let (status, body) = send(
            ports,
            test::TestRequest::get().uri("/api/products?category=formal_wear"),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["details"]["code"], "unknown_category");
    }

    #[rstest]
    #[actix_web::test]
    async fn categories_route_is_not_shadowed_by_product_ids() {
        let mut ports = MockPorts::default();
        ports.products.expect_get().never();
        ports.products.expect_categories().returning(|| {
            GarmentCategory::ALL
                .into_iter()
                .map(CategorySummary::from)
                .collect()
        });
        let (status, body) = send(
            ports,
            test::TestRequest::get().uri("/api/products/categories"),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().map(Vec::len), Some(4));
        assert_eq!(body[0]["label"], "School Uniform");
    }

    #[rstest]
    #[actix_web::test]
    async fn create_requires_a_token() {
        let mut ports = MockPorts::default();
        ports.products.expect_create().never();
        let (status, _) = send(
            ports,
            test::TestRequest::post().uri("/api/products").set_json(json!({
                "name": "Shirt",
                "category": "casual_wear",
                "price": 900
            })),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[rstest]
    #[case(json!({"name": "Shirt", "category": "casual_wear", "price": 0}), "price")]
    #[case(json!({"name": " ", "category": "casual_wear", "price": 900}), "name")]
    #[case(json!({"name": "Shirt", "category": "evening_wear", "price": 900}), "category")]
    #[actix_web::test]
    async fn create_validates_fields(#[case] payload: Value, #[case] field: &str) {
        let mut ports = MockPorts::default();
        ports.authenticate_as(super_admin_principal());
        ports.products.expect_create().never();
        let (status, body) = send(
            ports,
            test::TestRequest::post()
                .uri("/api/products")
                .insert_header(bearer())
                .set_json(payload),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["details"]["field"], field);
    }

    #[rstest]
    #[actix_web::test]
    async fn create_returns_the_stored_product() {
        let mut ports = MockPorts::default();
        ports.authenticate_as(super_admin_principal());
        ports
            .products
            .expect_create()
            .withf(|_, draft| draft.price == 900 && draft.category == GarmentCategory::CasualWear)
            .returning(|_, _| Ok(product("prod-new", GarmentCategory::CasualWear)));
        let (status, body) = send(
            ports,
            test::TestRequest::post()
                .uri("/api/products")
                .insert_header(bearer())
                .set_json(json!({"name": "Shirt", "category": "casual_wear", "price": 900})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["id"], "prod-new");
    }

    #[rstest]
    #[actix_web::test]
    async fn forbidden_writes_surface_as_403() {
        let mut ports = MockPorts::default();
        ports.authenticate_as(individual_principal("ind-001"));
        ports
            .products
            .expect_delete()
            .returning(|_, _| Err(Error::forbidden("super admin access required")));
        let (status, body) = send(
            ports,
            test::TestRequest::delete()
                .uri("/api/products/prod-001")
                .insert_header(bearer()),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["code"], "forbidden");
    }

    #[rstest]
    #[actix_web::test]
    async fn empty_updates_are_rejected() {
        let mut ports = MockPorts::default();
        ports.authenticate_as(super_admin_principal());
        ports.products.expect_update().never();
        let (status, body) = send(
            ports,
            test::TestRequest::put()
                .uri("/api/products/prod-001")
                .insert_header(bearer())
                .set_json(json!({})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["details"]["code"], "empty_patch");
    }
}
