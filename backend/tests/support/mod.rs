//! Shared helpers for end-to-end API tests.
//!
//! Each test builds its own store from the bundled seed, so tests never see
//! each other's writes. Argon2 runs with minimal cost parameters to keep the
//! suite fast.

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::http::header::AUTHORIZATION;
use actix_web::{App, test, web};
use argon2::Params;
use chrono::Duration;
use mockable::DefaultClock;
use serde_json::{Value, json};

use tailor_backend::Trace;
use tailor_backend::inbound::http::api_scope;
use tailor_backend::inbound::http::state::HttpState;
use tailor_backend::outbound::memory::{DEFAULT_SEED, MemoryStore, SeedData};
use tailor_backend::outbound::security::{Argon2PasswordHasher, JwtTokenCodec};
use tailor_backend::wiring::build_http_state;

/// Seeded super admin credentials.
pub const SUPER_ADMIN: (&str, &str) = ("mk@admin.com", "mk@admin");
/// Seeded org admin of `org-001`.
pub const ORG_ADMIN: (&str, &str) = ("admin@abccorp.com", "password123");
/// Seeded individual customer `ind-001`.
pub const INDIVIDUAL: (&str, &str) = ("john@example.com", "password123");

/// Handler state over a freshly seeded store.
pub fn seeded_state() -> web::Data<HttpState> {
    let params = Params::new(8, 1, 1, None).expect("fast argon2 params");
    let hasher = Arc::new(Argon2PasswordHasher::with_params(params));
    let dataset = SeedData::from_json(DEFAULT_SEED)
        .and_then(|seed| seed.into_dataset(hasher.as_ref()))
        .expect("bundled seed loads");
    web::Data::new(build_http_state(
        Arc::new(MemoryStore::new(dataset)),
        hasher,
        Arc::new(JwtTokenCodec::new(b"integration-test-secret", Duration::hours(1))),
        Arc::new(DefaultClock),
    ))
}

/// Send `request` through the full `/api` scope and decode the JSON body.
pub async fn call(state: &web::Data<HttpState>, request: test::TestRequest) -> (StatusCode, Value) {
    let app = test::init_service(
        App::new()
            .app_data(state.clone())
            .wrap(Trace)
            .service(api_scope()),
    )
    .await;
    let response = test::call_service(&app, request.to_request()).await;
    let status = response.status();
    let body = test::read_body(response).await;
    (status, serde_json::from_slice(&body).unwrap_or(Value::Null))
}

/// Log in and return the bearer token.
pub async fn login(state: &web::Data<HttpState>, (email, password): (&str, &str)) -> String {
    let (status, body) = call(
        state,
        test::TestRequest::post()
            .uri("/api/auth/login")
            .set_json(json!({ "email": email, "password": password })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "login failed: {body}");
    body["token"].as_str().expect("token string").to_owned()
}

/// Attach `token` as a bearer credential.
pub fn authorised(request: test::TestRequest, token: &str) -> test::TestRequest {
    request.insert_header((AUTHORIZATION, format!("Bearer {token}")))
}
