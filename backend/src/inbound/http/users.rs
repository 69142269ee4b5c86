//! User directory and account management handlers.
//!
//! ```text
//! GET    /api/users
//! GET    /api/users/super-admins
//! POST   /api/users/super-admins
//! PUT    /api/users/super-admins/{userId}
//! DELETE /api/users/super-admins/{userId}
//! PUT    /api/users/individuals/{userId}
//! DELETE /api/users/individuals/{userId}
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::{AdminUpdate, NewAdminRequest, UserDirectory};
use crate::domain::{
    Account, AccountPatch, AccountPatchFields, AdminDraft, Error, NewPassword, UserId,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::bearer::Authenticated;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{account_error, auth_error, empty_patch_error};

/// Body for creating a super admin or org admin.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct NewAdminBody {
    #[schema(example = "Operations Admin")]
    pub name: String,
    pub email: String,
    /// Assigned password; the admin must change it on first login.
    pub password: String,
}

/// Body for updating an admin; omitted fields are left unchanged.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct UpdateAdminBody {
    pub name: Option<String>,
    pub email: Option<String>,
    /// Replacement password; the admin must change it on next login.
    pub password: Option<String>,
}

/// Body for `PUT /api/users/individuals/{userId}`; omitted fields are left
/// unchanged. Passwords change through `/api/auth/change-password`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct UpdateIndividualBody {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub age: Option<u32>,
}

/// Response for a created admin account.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdminCreatedResponse {
    #[schema(example = "Super admin created successfully")]
    pub message: String,
    pub id: String,
    /// Always `true`: the admin must change the assigned password.
    pub is_first_login: bool,
}

impl AdminCreatedResponse {
    pub(crate) fn new(message: &str, account: &Account) -> Self {
        Self {
            message: message.to_owned(),
            id: account.id.to_string(),
            is_first_login: account.is_first_login,
        }
    }
}

pub(crate) fn new_admin_request(body: &NewAdminBody) -> Result<NewAdminRequest, Error> {
    let admin = AdminDraft::try_from_parts(&body.name, &body.email).map_err(account_error)?;
    let password = NewPassword::try_new(&body.password, None).map_err(auth_error)?;
    Ok(NewAdminRequest { admin, password })
}

pub(crate) fn admin_update(body: &UpdateAdminBody) -> Result<AdminUpdate, Error> {
    let patch = AccountPatch::try_from_fields(AccountPatchFields {
        name: body.name.as_deref(),
        email: body.email.as_deref(),
        ..AccountPatchFields::default()
    })
    .map_err(account_error)?;
    let password = body
        .password
        .as_deref()
        .map(|password| NewPassword::try_new(password, None))
        .transpose()
        .map_err(auth_error)?;
    if patch.is_empty() && password.is_none() {
        return Err(empty_patch_error());
    }
    Ok(AdminUpdate { patch, password })
}

fn individual_patch(body: &UpdateIndividualBody) -> Result<AccountPatch, Error> {
    let patch = AccountPatch::try_from_fields(AccountPatchFields {
        name: body.name.as_deref(),
        email: body.email.as_deref(),
        phone: body.phone.as_deref(),
        address: body.address.as_deref(),
        age: body.age,
    })
    .map_err(account_error)?;
    if patch.is_empty() {
        return Err(empty_patch_error());
    }
    Ok(patch)
}

/// Every account grouped by role, plus all organisations.
#[utoipa::path(
    get,
    path = "/api/users",
    responses(
        (status = 200, description = "User directory", body = UserDirectory),
        (status = 401, description = "Missing token", body = Error),
        (status = 403, description = "Caller is not a super admin", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "listUsers"
)]
#[get("/users")]
pub async fn list_users(
    state: web::Data<HttpState>,
    caller: Authenticated,
) -> ApiResult<web::Json<UserDirectory>> {
    let directory = state.users.directory(caller.principal()).await?;
    Ok(web::Json(directory))
}

/// Every super admin.
#[utoipa::path(
    get,
    path = "/api/users/super-admins",
    responses(
        (status = 200, description = "Super admins", body = [Account]),
        (status = 401, description = "Missing token", body = Error),
        (status = 403, description = "Caller is not a super admin", body = Error)
    ),
    tags = ["users"],
    operation_id = "listSuperAdmins"
)]
#[get("/users/super-admins")]
pub async fn list_super_admins(
    state: web::Data<HttpState>,
    caller: Authenticated,
) -> ApiResult<web::Json<Vec<Account>>> {
    let admins = state.accounts.list_super_admins(caller.principal()).await?;
    Ok(web::Json(admins))
}

/// Create a super admin with an assigned password.
#[utoipa::path(
    post,
    path = "/api/users/super-admins",
    request_body = NewAdminBody,
    responses(
        (status = 201, description = "Super admin created", body = AdminCreatedResponse),
        (status = 400, description = "Invalid input or email already used", body = Error),
        (status = 401, description = "Missing token", body = Error),
        (status = 403, description = "Caller is not a super admin", body = Error)
    ),
    tags = ["users"],
    operation_id = "createSuperAdmin"
)]
#[post("/users/super-admins")]
pub async fn create_super_admin(
    state: web::Data<HttpState>,
    caller: Authenticated,
    payload: web::Json<NewAdminBody>,
) -> ApiResult<HttpResponse> {
    let request = new_admin_request(&payload)?;
    let account = state
        .accounts
        .create_super_admin(caller.principal(), request)
        .await?;
    Ok(HttpResponse::Created().json(AdminCreatedResponse::new(
        "Super admin created successfully",
        &account,
    )))
}

/// Partially update a super admin.
#[utoipa::path(
    put,
    path = "/api/users/super-admins/{userId}",
    params(("userId" = String, Path, description = "Super admin id")),
    request_body = UpdateAdminBody,
    responses(
        (status = 200, description = "Updated super admin", body = Account),
        (status = 400, description = "Invalid input or email already used", body = Error),
        (status = 403, description = "Caller is not a super admin", body = Error),
        (status = 404, description = "Unknown super admin", body = Error)
    ),
    tags = ["users"],
    operation_id = "updateSuperAdmin"
)]
#[put("/users/super-admins/{user_id}")]
pub async fn update_super_admin(
    state: web::Data<HttpState>,
    caller: Authenticated,
    path: web::Path<UserId>,
    payload: web::Json<UpdateAdminBody>,
) -> ApiResult<web::Json<Account>> {
    let update = admin_update(&payload)?;
    let account = state
        .accounts
        .update_super_admin(caller.principal(), &path.into_inner(), update)
        .await?;
    Ok(web::Json(account))
}

/// Delete another super admin.
#[utoipa::path(
    delete,
    path = "/api/users/super-admins/{userId}",
    params(("userId" = String, Path, description = "Super admin id")),
    responses(
        (status = 204, description = "Super admin deleted"),
        (status = 403, description = "Caller is not a super admin", body = Error),
        (status = 404, description = "Unknown super admin", body = Error),
        (status = 409, description = "Caller tried to delete themselves", body = Error)
    ),
    tags = ["users"],
    operation_id = "deleteSuperAdmin"
)]
#[delete("/users/super-admins/{user_id}")]
pub async fn delete_super_admin(
    state: web::Data<HttpState>,
    caller: Authenticated,
    path: web::Path<UserId>,
) -> ApiResult<HttpResponse> {
    state
        .accounts
        .delete_super_admin(caller.principal(), &path.into_inner())
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Edit an individual's profile.
#[utoipa::path(
    put,
    path = "/api/users/individuals/{userId}",
    params(("userId" = String, Path, description = "Individual id")),
    request_body = UpdateIndividualBody,
    responses(
        (status = 200, description = "Updated account", body = Account),
        (status = 400, description = "Invalid input or email already used", body = Error),
        (status = 403, description = "Caller may not manage this account", body = Error),
        (status = 404, description = "Unknown individual", body = Error)
    ),
    tags = ["users"],
    operation_id = "updateIndividual"
)]
#[put("/users/individuals/{user_id}")]
pub async fn update_individual(
    state: web::Data<HttpState>,
    caller: Authenticated,
    path: web::Path<UserId>,
    payload: web::Json<UpdateIndividualBody>,
) -> ApiResult<web::Json<Account>> {
    let patch = individual_patch(&payload)?;
    let account = state
        .accounts
        .update_individual(caller.principal(), &path.into_inner(), patch)
        .await?;
    Ok(web::Json(account))
}

/// Close an individual's account.
#[utoipa::path(
    delete,
    path = "/api/users/individuals/{userId}",
    params(("userId" = String, Path, description = "Individual id")),
    responses(
        (status = 204, description = "Account deleted"),
        (status = 403, description = "Caller may not manage this account", body = Error),
        (status = 404, description = "Unknown individual", body = Error)
    ),
    tags = ["users"],
    operation_id = "deleteIndividual"
)]
#[delete("/users/individuals/{user_id}")]
pub async fn delete_individual(
    state: web::Data<HttpState>,
    caller: Authenticated,
    path: web::Path<UserId>,
) -> ApiResult<HttpResponse> {
    state
        .accounts
        .delete_individual(caller.principal(), &path.into_inner())
        .await?;
    Ok(HttpResponse::NoContent().finish())
}
