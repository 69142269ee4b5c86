//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] collects every `/api` and `/health` path together with the
//! request, response and domain schemas they reference. Authenticated routes
//! use the `BearerToken` scheme; public reads and probes opt out with an
//! empty security requirement.
//!
//! The document is served by Swagger UI in debug builds and printed by the
//! `openapi-dump` binary.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::ports::UserDirectory;
use crate::domain::{
    Account, CategorySummary, Error, ErrorCode, GarmentCategory, LoginOutcome, Measurement,
    MeasurementField, MeasurementSection, MeasurementTemplate, Order, OrderLine, OrderStatus,
    OrgUser, Organization, Product, Role, TemplateField, TemplateSection,
};
use crate::inbound::http::auth::{
    ChangePasswordBody, CreatedResponse, LoginRequest, MessageResponse, SignupBody,
};
use crate::inbound::http::measurements::{RecordMeasurementBody, UpdateMeasurementBody};
use crate::inbound::http::orders::{OrderPlacedResponse, PlaceOrderBody, UpdateStatusBody};
use crate::inbound::http::organizations::{
    CreateOrgUserBody, CreateOrganizationBody, OrganizationCreatedResponse, UpdateOrgUserBody,
};
use crate::inbound::http::products::{CreateProductBody, UpdateProductBody};
use crate::inbound::http::users::{
    AdminCreatedResponse, NewAdminBody, UpdateAdminBody, UpdateIndividualBody,
};

/// Register the bearer token scheme issued by `POST /api/auth/login`.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "BearerToken",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .description(Some("Token issued by POST /api/auth/login."))
                    .build(),
            ),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Tailor backend API",
        description = "Order management for a tailoring business: organisations, \
                       employees, catalogue, measurements and orders."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("BearerToken" = [])),
    paths(
        crate::inbound::http::auth::login,
        crate::inbound::http::auth::signup,
        crate::inbound::http::auth::current_account,
        crate::inbound::http::auth::change_password,
        crate::inbound::http::users::list_users,
        crate::inbound::http::users::list_super_admins,
        crate::inbound::http::users::create_super_admin,
        crate::inbound::http::users::update_super_admin,
        crate::inbound::http::users::delete_super_admin,
        crate::inbound::http::users::update_individual,
        crate::inbound::http::users::delete_individual,
        crate::inbound::http::organizations::list_organizations,
        crate::inbound::http::organizations::create_organization,
        crate::inbound::http::organizations::get_organization,
        crate::inbound::http::organizations::delete_organization,
        crate::inbound::http::organizations::list_org_users,
        crate::inbound::http::organizations::create_org_user,
        crate::inbound::http::organizations::update_org_user,
        crate::inbound::http::organizations::delete_org_user,
        crate::inbound::http::organizations::list_org_admins,
        crate::inbound::http::organizations::create_org_admin,
        crate::inbound::http::organizations::update_org_admin,
        crate::inbound::http::organizations::delete_org_admin,
        crate::inbound::http::products::list_products,
        crate::inbound::http::products::list_categories,
        crate::inbound::http::products::get_product,
        crate::inbound::http::products::create_product,
        crate::inbound::http::products::update_product,
        crate::inbound::http::products::delete_product,
        crate::inbound::http::measurements::list_measurement_types,
        crate::inbound::http::measurements::get_measurement_template,
        crate::inbound::http::measurements::list_measurements,
        crate::inbound::http::measurements::record_measurement,
        crate::inbound::http::measurements::list_all_measurements,
        crate::inbound::http::measurements::update_measurement,
        crate::inbound::http::measurements::delete_measurement,
        crate::inbound::http::orders::list_orders,
        crate::inbound::http::orders::place_order,
        crate::inbound::http::orders::get_order,
        crate::inbound::http::orders::update_order_status,
        crate::inbound::http::orders::list_organization_orders,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        Role,
        Account,
        OrgUser,
        Organization,
        UserDirectory,
        LoginOutcome,
        GarmentCategory,
        CategorySummary,
        Product,
        OrderStatus,
        OrderLine,
        Order,
        Measurement,
        MeasurementSection,
        MeasurementField,
        MeasurementTemplate,
        TemplateSection,
        TemplateField,
        LoginRequest,
        SignupBody,
        ChangePasswordBody,
        CreatedResponse,
        MessageResponse,
        CreateOrganizationBody,
        OrganizationCreatedResponse,
        CreateOrgUserBody,
        UpdateOrgUserBody,
        NewAdminBody,
        UpdateAdminBody,
        UpdateIndividualBody,
        AdminCreatedResponse,
        CreateProductBody,
        UpdateProductBody,
        PlaceOrderBody,
        OrderPlacedResponse,
        UpdateStatusBody,
        RecordMeasurementBody,
        UpdateMeasurementBody,
    )),
    tags(
        (name = "auth", description = "Login, signup and password management"),
        (name = "users", description = "User directory and account management"),
        (name = "organizations", description = "Organisations, their admins and employees"),
        (name = "products", description = "Garment catalogue"),
        (name = "measurements", description = "Body measurements and form templates"),
        (name = "orders", description = "Order placement and tracking"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    fn assert_object_schema_has_field(schema: &RefOr<Schema>, field: &str) {
        match schema {
            RefOr::T(Schema::Object(obj)) => {
                assert!(
                    obj.properties.contains_key(field),
                    "schema should have field '{field}'"
                );
            }
            _ => panic!("expected Object schema"),
        }
    }

    #[rstest]
    #[case("Error", "code")]
    #[case("Error", "traceId")]
    #[case("Account", "isFirstLogin")]
    #[case("Order", "totalAmount")]
    #[case("Measurement", "type")]
    #[case("UserDirectory", "superAdmins")]
    #[case("AdminCreatedResponse", "isFirstLogin")]
    fn schemas_use_wire_field_names(#[case] schema: &str, #[case] field: &str) {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let found = schemas.get(schema).expect("schema registered");
        assert_object_schema_has_field(found, field);
    }

    #[rstest]
    fn account_schema_has_no_password() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        match schemas.get("Account").expect("Account schema") {
            RefOr::T(Schema::Object(obj)) => assert!(!obj.properties.contains_key("password")),
            _ => panic!("expected Object schema"),
        }
    }

    #[rstest]
    #[case("/api/auth/login")]
    #[case("/api/products/categories")]
    #[case("/api/measurements/types/{type}/template")]
    #[case("/api/orders/{id}/status")]
    #[case("/api/users/super-admins/{userId}")]
    #[case("/api/users/individuals/{userId}")]
    #[case("/api/organizations/{orgId}/admins/{adminId}")]
    #[case("/api/organizations/{orgId}/orders")]
    #[case("/health/ready")]
    fn documents_every_route_family(#[case] path: &str) {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key(path), "missing {path}");
    }

    #[rstest]
    fn registers_the_bearer_scheme() {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("BearerToken"));
    }
}
