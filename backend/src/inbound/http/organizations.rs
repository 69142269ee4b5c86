//! Organisation and org-user API handlers.
//!
//! ```text
//! GET    /api/organizations
//! POST   /api/organizations
//! GET    /api/organizations/{orgId}
//! DELETE /api/organizations/{orgId}
//! GET    /api/organizations/{orgId}/users
//! POST   /api/organizations/{orgId}/users
//! PUT    /api/organizations/{orgId}/users/{userId}
//! DELETE /api/organizations/{orgId}/users/{userId}
//! GET    /api/organizations/{orgId}/admins
//! POST   /api/organizations/{orgId}/admins
//! PUT    /api/organizations/{orgId}/admins/{adminId}
//! DELETE /api/organizations/{orgId}/admins/{adminId}
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::CreateOrganizationRequest;
use crate::domain::{
    Account, Error, NewPassword, OrgUser, OrgUserDraft, OrgUserFields, OrgUserPatch, OrgUserPatchFields,
    Organization, OrganizationDraft, OrganizationFields, OrganizationId, UserId,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::CreatedResponse;
use crate::inbound::http::bearer::Authenticated;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::users::{
    AdminCreatedResponse, NewAdminBody, UpdateAdminBody, admin_update, new_admin_request,
};
use crate::inbound::http::validation::{account_error, auth_error_for, empty_patch_error};

/// Body for `POST /api/organizations`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrganizationBody {
    #[schema(example = "ABC Corporation")]
    pub name: String,
    pub pan: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub gstin: String,
    #[serde(default)]
    pub logo: Option<String>,
    /// Password for the organisation's first admin account.
    pub initial_password: String,
}

/// Response for `POST /api/organizations`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationCreatedResponse {
    #[schema(example = "Organization created successfully")]
    pub message: String,
    pub id: String,
    pub admin_id: String,
    /// Always `true`: the admin must change the initial password.
    pub is_first_login: bool,
}

/// Body for `POST /api/organizations/{orgId}/users`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrgUserBody {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub age: u32,
    pub department: String,
}

/// Body for `PUT /api/organizations/{orgId}/users/{userId}`; omitted fields
/// are left unchanged.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOrgUserBody {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub age: Option<u32>,
    pub department: Option<String>,
}

fn create_request(body: &CreateOrganizationBody) -> Result<CreateOrganizationRequest, Error> {
    let organization = OrganizationDraft::try_from_fields(OrganizationFields {
        name: &body.name,
        pan: &body.pan,
        email: &body.email,
        phone: &body.phone,
        address: &body.address,
        gstin: &body.gstin,
        logo: body.logo.as_deref(),
    })
    .map_err(account_error)?;
    let initial_password = NewPassword::try_new(&body.initial_password, None)
        .map_err(|err| auth_error_for("initialPassword", &err))?;
    Ok(CreateOrganizationRequest {
        organization,
        initial_password,
    })
}

fn member_patch(body: &UpdateOrgUserBody) -> Result<OrgUserPatch, Error> {
    let patch = OrgUserPatch::try_from_fields(OrgUserPatchFields {
        name: body.name.as_deref(),
        email: body.email.as_deref(),
        phone: body.phone.as_deref(),
        address: body.address.as_deref(),
        age: body.age,
        department: body.department.as_deref(),
    })
    .map_err(account_error)?;
    if patch.is_empty() {
        return Err(empty_patch_error());
    }
    Ok(patch)
}

/// All organisations.
#[utoipa::path(
    get,
    path = "/api/organizations",
    responses(
        (status = 200, description = "Organisations", body = [Organization]),
        (status = 401, description = "Missing token", body = Error),
        (status = 403, description = "Caller is not a super admin", body = Error)
    ),
    tags = ["organizations"],
    operation_id = "listOrganizations"
)]
#[get("/organizations")]
pub async fn list_organizations(
    state: web::Data<HttpState>,
    caller: Authenticated,
) -> ApiResult<web::Json<Vec<Organization>>> {
    let organizations = state.organizations.list(caller.principal()).await?;
    Ok(web::Json(organizations))
}

/// Create an organisation together with its first admin account.
#[utoipa::path(
    post,
    path = "/api/organizations",
    request_body = CreateOrganizationBody,
    responses(
        (status = 201, description = "Organisation created", body = OrganizationCreatedResponse),
        (status = 400, description = "Invalid input or email already used", body = Error),
        (status = 401, description = "Missing token", body = Error),
        (status = 403, description = "Caller is not a super admin", body = Error)
    ),
    tags = ["organizations"],
    operation_id = "createOrganization"
)]
#[post("/organizations")]
pub async fn create_organization(
    state: web::Data<HttpState>,
    caller: Authenticated,
    payload: web::Json<CreateOrganizationBody>,
) -> ApiResult<HttpResponse> {
    let request = create_request(&payload)?;
    let created = state
        .organizations
        .create(caller.principal(), request)
        .await?;
    Ok(HttpResponse::Created().json(OrganizationCreatedResponse {
        message: "Organization created successfully".to_owned(),
        id: created.organization_id.to_string(),
        admin_id: created.admin_id.to_string(),
        is_first_login: true,
    }))
}

/// One organisation.
#[utoipa::path(
    get,
    path = "/api/organizations/{orgId}",
    params(("orgId" = String, Path, description = "Organisation id")),
    responses(
        (status = 200, description = "Organisation", body = Organization),
        (status = 403, description = "Caller does not oversee this organisation", body = Error),
        (status = 404, description = "Unknown organisation", body = Error)
    ),
    tags = ["organizations"],
    operation_id = "getOrganization"
)]
#[get("/organizations/{org_id}")]
pub async fn get_organization(
    state: web::Data<HttpState>,
    caller: Authenticated,
    path: web::Path<OrganizationId>,
) -> ApiResult<web::Json<Organization>> {
    let organization = state
        .organizations
        .get(caller.principal(), &path.into_inner())
        .await?;
    Ok(web::Json(organization))
}

/// Delete an organisation. Its people, orders and measurements remain.
#[utoipa::path(
    delete,
    path = "/api/organizations/{orgId}",
    params(("orgId" = String, Path, description = "Organisation id")),
    responses(
        (status = 204, description = "Organisation deleted"),
        (status = 403, description = "Caller is not a super admin", body = Error),
        (status = 404, description = "Unknown organisation", body = Error)
    ),
    tags = ["organizations"],
    operation_id = "deleteOrganization"
)]
#[delete("/organizations/{org_id}")]
pub async fn delete_organization(
    state: web::Data<HttpState>,
    caller: Authenticated,
    path: web::Path<OrganizationId>,
) -> ApiResult<HttpResponse> {
    state
        .organizations
        .delete(caller.principal(), &path.into_inner())
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Employees of an organisation.
#[utoipa::path(
    get,
    path = "/api/organizations/{orgId}/users",
    params(("orgId" = String, Path, description = "Organisation id")),
    responses(
        (status = 200, description = "Org users", body = [OrgUser]),
        (status = 403, description = "Caller does not oversee this organisation", body = Error)
    ),
    tags = ["organizations"],
    operation_id = "listOrgUsers"
)]
#[get("/organizations/{org_id}/users")]
pub async fn list_org_users(
    state: web::Data<HttpState>,
    caller: Authenticated,
    path: web::Path<OrganizationId>,
) -> ApiResult<web::Json<Vec<OrgUser>>> {
    let members = state
        .organizations
        .list_members(caller.principal(), &path.into_inner())
        .await?;
    Ok(web::Json(members))
}

/// Add an employee to the caller's organisation.
#[utoipa::path(
    post,
    path = "/api/organizations/{orgId}/users",
    params(("orgId" = String, Path, description = "Organisation id")),
    request_body = CreateOrgUserBody,
    responses(
        (status = 201, description = "Org user created", body = CreatedResponse),
        (status = 400, description = "Invalid input", body = Error),
        (status = 403, description = "Caller is not this organisation's admin", body = Error)
    ),
    tags = ["organizations"],
    operation_id = "createOrgUser"
)]
#[post("/organizations/{org_id}/users")]
pub async fn create_org_user(
    state: web::Data<HttpState>,
    caller: Authenticated,
    path: web::Path<OrganizationId>,
    payload: web::Json<CreateOrgUserBody>,
) -> ApiResult<HttpResponse> {
    let body = payload.into_inner();
    let draft = OrgUserDraft::try_from_fields(OrgUserFields {
        name: &body.name,
        email: &body.email,
        phone: &body.phone,
        address: &body.address,
        age: body.age,
        department: &body.department,
    })
    .map_err(account_error)?;
    let member = state
        .organizations
        .add_member(caller.principal(), &path.into_inner(), draft)
        .await?;
    Ok(HttpResponse::Created().json(CreatedResponse {
        message: "User created successfully".to_owned(),
        id: member.id.to_string(),
    }))
}

/// Partially update an employee.
#[utoipa::path(
    put,
    path = "/api/organizations/{orgId}/users/{userId}",
    params(
        ("orgId" = String, Path, description = "Organisation id"),
        ("userId" = String, Path, description = "Org user id")
    ),
    request_body = UpdateOrgUserBody,
    responses(
        (status = 200, description = "Updated org user", body = OrgUser),
        (status = 400, description = "Invalid input", body = Error),
        (status = 403, description = "Caller is not this organisation's admin", body = Error),
        (status = 404, description = "Unknown org user", body = Error)
    ),
    tags = ["organizations"],
    operation_id = "updateOrgUser"
)]
#[put("/organizations/{org_id}/users/{user_id}")]
pub async fn update_org_user(
    state: web::Data<HttpState>,
    caller: Authenticated,
    path: web::Path<(OrganizationId, UserId)>,
    payload: web::Json<UpdateOrgUserBody>,
) -> ApiResult<web::Json<OrgUser>> {
    let (org_id, user_id) = path.into_inner();
    let patch = member_patch(&payload)?;
    let member = state
        .organizations
        .update_member(caller.principal(), &org_id, &user_id, patch)
        .await?;
    Ok(web::Json(member))
}

/// Remove an employee.
#[utoipa::path(
    delete,
    path = "/api/organizations/{orgId}/users/{userId}",
    params(
        ("orgId" = String, Path, description = "Organisation id"),
        ("userId" = String, Path, description = "Org user id")
    ),
    responses(
        (status = 204, description = "Org user removed"),
        (status = 403, description = "Caller is not this organisation's admin", body = Error),
        (status = 404, description = "Unknown org user", body = Error)
    ),
    tags = ["organizations"],
    operation_id = "deleteOrgUser"
)]
#[delete("/organizations/{org_id}/users/{user_id}")]
pub async fn delete_org_user(
    state: web::Data<HttpState>,
    caller: Authenticated,
    path: web::Path<(OrganizationId, UserId)>,
) -> ApiResult<HttpResponse> {
    let (org_id, user_id) = path.into_inner();
    state
        .organizations
        .remove_member(caller.principal(), &org_id, &user_id)
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Admin accounts of an organisation.
#[utoipa::path(
    get,
    path = "/api/organizations/{orgId}/admins",
    params(("orgId" = String, Path, description = "Organisation id")),
    responses(
        (status = 200, description = "Org admins", body = [Account]),
        (status = 403, description = "Caller does not oversee this organisation", body = Error)
    ),
    tags = ["organizations"],
    operation_id = "listOrgAdmins"
)]
#[get("/organizations/{org_id}/admins")]
pub async fn list_org_admins(
    state: web::Data<HttpState>,
    caller: Authenticated,
    path: web::Path<OrganizationId>,
) -> ApiResult<web::Json<Vec<Account>>> {
    let admins = state
        .accounts
        .list_org_admins(caller.principal(), &path.into_inner())
        .await?;
    Ok(web::Json(admins))
}

/// Add an admin account to an organisation.
#[utoipa::path(
    post,
    path = "/api/organizations/{orgId}/admins",
    params(("orgId" = String, Path, description = "Organisation id")),
    request_body = NewAdminBody,
    responses(
        (status = 201, description = "Org admin created", body = AdminCreatedResponse),
        (status = 400, description = "Invalid input or email already used", body = Error),
        (status = 403, description = "Caller does not oversee this organisation", body = Error),
        (status = 404, description = "Unknown organisation", body = Error)
    ),
    tags = ["organizations"],
    operation_id = "createOrgAdmin"
)]
#[post("/organizations/{org_id}/admins")]
pub async fn create_org_admin(
    state: web::Data<HttpState>,
    caller: Authenticated,
    path: web::Path<OrganizationId>,
    payload: web::Json<NewAdminBody>,
) -> ApiResult<HttpResponse> {
    let request = new_admin_request(&payload)?;
    let account = state
        .accounts
        .create_org_admin(caller.principal(), &path.into_inner(), request)
        .await?;
    Ok(HttpResponse::Created().json(AdminCreatedResponse::new(
        "Organization admin created successfully",
        &account,
    )))
}

/// Partially update an organisation's admin.
#[utoipa::path(
    put,
    path = "/api/organizations/{orgId}/admins/{adminId}",
    params(
        ("orgId" = String, Path, description = "Organisation id"),
        ("adminId" = String, Path, description = "Org admin id")
    ),
    request_body = UpdateAdminBody,
    responses(
        (status = 200, description = "Updated org admin", body = Account),
        (status = 400, description = "Invalid input or email already used", body = Error),
        (status = 403, description = "Caller does not oversee this organisation", body = Error),
        (status = 404, description = "Unknown org admin", body = Error)
    ),
    tags = ["organizations"],
    operation_id = "updateOrgAdmin"
)]
#[put("/organizations/{org_id}/admins/{admin_id}")]
pub async fn update_org_admin(
    state: web::Data<HttpState>,
    caller: Authenticated,
    path: web::Path<(OrganizationId, UserId)>,
    payload: web::Json<UpdateAdminBody>,
) -> ApiResult<web::Json<Account>> {
    let (org_id, admin_id) = path.into_inner();
    let update = admin_update(&payload)?;
    let account = state
        .accounts
        .update_org_admin(caller.principal(), &org_id, &admin_id, update)
        .await?;
    Ok(web::Json(account))
}

/// Remove an organisation's admin other than the caller.
#[utoipa::path(
    delete,
    path = "/api/organizations/{orgId}/admins/{adminId}",
    params(
        ("orgId" = String, Path, description = "Organisation id"),
        ("adminId" = String, Path, description = "Org admin id")
    ),
    responses(
        (status = 204, description = "Org admin removed"),
        (status = 403, description = "Caller does not oversee this organisation", body = Error),
        (status = 404, description = "Unknown org admin", body = Error),
        (status = 409, description = "Caller tried to delete themselves", body = Error)
    ),
    tags = ["organizations"],
    operation_id = "deleteOrgAdmin"
)]
#[delete("/organizations/{org_id}/admins/{admin_id}")]
pub async fn delete_org_admin(
    state: web::Data<HttpState>,
    caller: Authenticated,
    path: web::Path<(OrganizationId, UserId)>,
) -> ApiResult<HttpResponse> {
    let (org_id, admin_id) = path.into_inner();
    state
        .accounts
        .delete_org_admin(caller.principal(), &org_id, &admin_id)
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::OrganizationCreated;
    use crate::inbound::http::test_utils::{
        MockPorts, bearer, org_admin_principal, super_admin_principal,
    };
    use actix_web::http::StatusCode;
    use actix_web::{App, test};
    use rstest::rstest;
    use serde_json::{Value, json};

    async fn send(ports: MockPorts, request: test::TestRequest) -> (StatusCode, Value) {
        let app = test::init_service(
            App::new().app_data(ports.into_state()).service(
                web::scope("/api")
                    .service(list_organizations)
                    .service(create_organization)
                    .service(get_organization)
                    .service(delete_organization)
                    .service(list_org_users)
                    .service(create_org_user)
                    .service(update_org_user)
                    .service(delete_org_user)
                    .service(list_org_admins)
                    .service(create_org_admin)
                    .service(update_org_admin)
                    .service(delete_org_admin),
            ),
        )
        .await;
        let response = test::call_service(&app, request.insert_header(bearer()).to_request()).await;
        let status = response.status();
        let body = test::read_body(response).await;
        (status, serde_json::from_slice(&body).unwrap_or(Value::Null))
    }

    fn organization_body(initial_password: &str) -> Value {
        json!({
            "name": "XYZ Industries",
            "pan": "fghij5678k",
            "email": "contact@xyz.com",
            "phone": "+91 9123456780",
            "address": "45 Park Street, Kolkata",
            "gstin": "19fghij5678k1z2",
            "initialPassword": initial_password
        })
    }

    #[rstest]
    #[actix_web::test]
    async fn create_reports_the_new_admin() {
        let mut ports = MockPorts::default();
        ports.authenticate_as(super_admin_principal());
        ports
            .organizations
            .expect_create()
            .withf(|_, req| req.organization.pan == "FGHIJ5678K")
            .returning(|_, _| {
                Ok(OrganizationCreated {
                    organization_id: OrganizationId::new("org-xyz").expect("id"),
                    admin_id: UserId::new("oa-xyz").expect("id"),
                })
            });
        let (status, body) = send(
            ports,
            test::TestRequest::post()
                .uri("/api/organizations")
                .set_json(organization_body("welcome1")),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["id"], "org-xyz");
        assert_eq!(body["adminId"], "oa-xyz");
        assert_eq!(body["isFirstLogin"], true);
    }

    #[rstest]
    #[actix_web::test]
    async fn create_rejects_short_initial_passwords() {
        let mut ports = MockPorts::default();
        ports.authenticate_as(super_admin_principal());
        ports.organizations.expect_create().never();
        let (status, body) = send(
            ports,
            test::TestRequest::post()
                .uri("/api/organizations")
                .set_json(organization_body("abc")),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["details"]["field"], "initialPassword");
    }

    #[rstest]
    #[actix_web::test]
    async fn deleting_an_organization_returns_no_content() {
        let mut ports = MockPorts::default();
        ports.authenticate_as(super_admin_principal());
        ports
            .organizations
            .expect_delete()
            .withf(|_, id| id.as_str() == "org-001")
            .times(1)
            .returning(|_, _| Ok(()));
        let (status, _) = send(
            ports,
            test::TestRequest::delete().uri("/api/organizations/org-001"),
        )
        .await;
        assert_eq!(status, StatusCode::NO_CONTENT);
    }

    #[rstest]
    #[actix_web::test]
    async fn empty_member_updates_are_rejected() {
        let mut ports = MockPorts::default();
        ports.authenticate_as(org_admin_principal("org-001"));
        ports.organizations.expect_update_member().never();
        let (status, body) = send(
            ports,
            test::TestRequest::put()
                .uri("/api/organizations/org-001/users/ou-001")
                .set_json(json!({})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["details"]["code"], "empty_patch");
    }

    #[rstest]
    #[actix_web::test]
    async fn member_creation_validates_age() {
        let mut ports = MockPorts::default();
        ports.authenticate_as(org_admin_principal("org-001"));
        ports.organizations.expect_add_member().never();
        let (status, body) = send(
            ports,
            test::TestRequest::post()
                .uri("/api/organizations/org-001/users")
                .set_json(json!({
                    "name": "Asha Rao",
                    "email": "asha@abccorp.com",
                    "phone": "+91 9000000001",
                    "address": "Indiranagar",
                    "age": 0,
                    "department": "Design"
                })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["details"]["field"], "age");
    }

    #[rstest]
    #[actix_web::test]
    async fn org_admin_adds_another_admin() {
        let mut ports = MockPorts::default();
        ports.authenticate_as(org_admin_principal("org-001"));
        ports
            .accounts
            .expect_create_org_admin()
            .withf(|_, org, req| {
                org.as_str() == "org-001" && req.admin.email.as_str() == "second@abccorp.com"
            })
            .times(1)
            .returning(|_, org, req| {
                Ok(Account::org_admin(
                    UserId::new("oa-002").expect("id"),
                    org.clone(),
                    req.admin.name,
                    req.admin.email,
                    chrono::Utc::now(),
                ))
            });
        let (status, body) = send(
            ports,
            test::TestRequest::post()
                .uri("/api/organizations/org-001/admins")
                .set_json(json!({
                    "name": "Second Admin",
                    "email": "second@abccorp.com",
                    "password": "welcome1"
                })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["message"], "Organization admin created successfully");
        assert_eq!(body["id"], "oa-002");
        assert_eq!(body["isFirstLogin"], true);
    }

    #[rstest]
    #[actix_web::test]
    async fn admin_listing_is_scoped_to_the_path_org() {
        let mut ports = MockPorts::default();
        ports.authenticate_as(super_admin_principal());
        ports
            .accounts
            .expect_list_org_admins()
            .withf(|_, org| org.as_str() == "org-002")
            .times(1)
            .returning(|_, _| Ok(Vec::new()));
        let (status, body) = send(
            ports,
            test::TestRequest::get().uri("/api/organizations/org-002/admins"),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([]));
    }

    #[rstest]
    #[actix_web::test]
    async fn admin_removal_forwards_both_ids() {
        let mut ports = MockPorts::default();
        ports.authenticate_as(org_admin_principal("org-001"));
        ports
            .accounts
            .expect_delete_org_admin()
            .withf(|_, org, admin| org.as_str() == "org-001" && admin.as_str() == "oa-002")
            .times(1)
            .returning(|_, _, _| Ok(()));
        let (status, _) = send(
            ports,
            test::TestRequest::delete().uri("/api/organizations/org-001/admins/oa-002"),
        )
        .await;
        assert_eq!(status, StatusCode::NO_CONTENT);
    }
}
