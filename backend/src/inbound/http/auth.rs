//! Authentication API handlers.
//!
//! ```text
//! POST /api/auth/login {"email":"john@example.com","password":"john123"}
//! POST /api/auth/signup
//! GET  /api/auth/me
//! POST /api/auth/change-password
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;

use crate::domain::ports::SignupRequest;
use crate::domain::{
    Account, Error, IndividualDraft, LoginCredentials, LoginOutcome, NewPassword, PasswordChange,
    UserId,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::bearer::Authenticated;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{account_error, auth_error};

/// Login request body for `POST /api/auth/login`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[schema(example = "john@example.com")]
    pub email: String,
    #[schema(example = "john123")]
    pub password: String,
}

/// Signup request body for `POST /api/auth/signup`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SignupBody {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub confirm_password: Option<String>,
    pub phone: String,
    pub address: String,
    #[serde(default)]
    pub age: Option<u32>,
}

/// Password change body for `POST /api/auth/change-password`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordBody {
    pub current_password: String,
    pub new_password: String,
    pub confirm_password: String,
}

/// Acknowledgement carrying the id of a created record.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreatedResponse {
    #[schema(example = "User created successfully")]
    pub message: String,
    pub id: String,
}

/// Plain acknowledgement.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

fn signup_request(body: SignupBody) -> Result<SignupRequest, Error> {
    let profile = IndividualDraft::try_from_parts(
        &body.name,
        &body.email,
        &body.phone,
        &body.address,
        body.age,
    )
    .map_err(account_error)?;
    let password =
        NewPassword::try_new(&body.password, body.confirm_password.as_deref()).map_err(auth_error)?;
    Ok(SignupRequest { profile, password })
}

/// Exchange email and password for a bearer token.
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", body = LoginOutcome),
        (status = 400, description = "Unknown user, wrong password or invalid input", body = Error),
        (status = 403, description = "Role cannot log in", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["auth"],
    operation_id = "login",
    security([])
)]
#[post("/auth/login")]
pub async fn login(
    state: web::Data<HttpState>,
    payload: web::Json<LoginRequest>,
) -> ApiResult<web::Json<LoginOutcome>> {
    let LoginRequest { email, password } = payload.into_inner();
    let credentials = LoginCredentials::try_from_parts(&email, &password).map_err(auth_error)?;
    let outcome = state.auth.login(&credentials).await?;
    Ok(web::Json(outcome))
}

/// Register a new individual account.
#[utoipa::path(
    post,
    path = "/api/auth/signup",
    request_body = SignupBody,
    responses(
        (status = 201, description = "Account created", body = CreatedResponse),
        (status = 400, description = "Invalid input or email already used", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["auth"],
    operation_id = "signup",
    security([])
)]
#[post("/auth/signup")]
pub async fn signup(
    state: web::Data<HttpState>,
    payload: web::Json<SignupBody>,
) -> ApiResult<HttpResponse> {
    let request = signup_request(payload.into_inner())?;
    let id: UserId = state.auth.signup(request).await?;
    Ok(HttpResponse::Created().json(CreatedResponse {
        message: "User created successfully".to_owned(),
        id: id.to_string(),
    }))
}

/// The account behind the presented token.
#[utoipa::path(
    get,
    path = "/api/auth/me",
    responses(
        (status = 200, description = "Current account", body = Account),
        (status = 400, description = "Invalid token", body = Error),
        (status = 401, description = "Missing token", body = Error),
        (status = 404, description = "Account no longer exists", body = Error)
    ),
    tags = ["auth"],
    operation_id = "currentAccount"
)]
#[get("/auth/me")]
pub async fn current_account(
    state: web::Data<HttpState>,
    caller: Authenticated,
) -> ApiResult<web::Json<Account>> {
    let account = state.auth.current_account(caller.principal()).await?;
    Ok(web::Json(account))
}

/// Replace the caller's password and clear the first-login flag.
#[utoipa::path(
    post,
    path = "/api/auth/change-password",
    request_body = ChangePasswordBody,
    responses(
        (status = 200, description = "Password changed", body = MessageResponse),
        (status = 400, description = "Wrong current password or invalid input", body = Error),
        (status = 401, description = "Missing token", body = Error)
    ),
    tags = ["auth"],
    operation_id = "changePassword"
)]
#[post("/auth/change-password")]
pub async fn change_password(
    state: web::Data<HttpState>,
    caller: Authenticated,
    payload: web::Json<ChangePasswordBody>,
) -> ApiResult<web::Json<MessageResponse>> {
    let body = payload.into_inner();
    let change = PasswordChange::try_from_parts(
        &body.current_password,
        &body.new_password,
        &body.confirm_password,
    )
    .map_err(auth_error)?;
    state.auth.change_password(caller.principal(), change).await?;
    info!(user_id = %caller.principal().user_id(), "password changed");
    Ok(web::Json(MessageResponse {
        message: "Password changed successfully".to_owned(),
    }))
}
