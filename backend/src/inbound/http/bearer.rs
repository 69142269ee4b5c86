//! Bearer-token extractor.
//!
//! Handlers that take an [`Authenticated`] argument only run for requests
//! carrying a verifiable `Authorization: <scheme> <token>` header. The scheme
//! word is not checked, so `Bearer` is conventional rather than required. A
//! missing or empty token is rejected with 401; a token that fails
//! verification is rejected with 400.

use actix_web::http::header::AUTHORIZATION;
use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use futures_util::future::{Ready, ready};
use tracing::debug;

use crate::domain::{Error, Principal};
use crate::inbound::http::state::HttpState;

/// The verified caller of the current request.
#[derive(Debug, Clone)]
pub struct Authenticated(Principal);

impl Authenticated {
    /// Borrow the verified principal.
    pub fn principal(&self) -> &Principal {
        &self.0
    }

    /// Take ownership of the verified principal.
    pub fn into_inner(self) -> Principal {
        self.0
    }
}

/// The second word of an `Authorization` header, if present.
fn bearer_token(req: &HttpRequest) -> Option<&str> {
    let value = req.headers().get(AUTHORIZATION)?.to_str().ok()?;
    let (_scheme, token) = value.trim().split_once(' ')?;
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

fn authenticate(req: &HttpRequest) -> Result<Authenticated, Error> {
    let token = bearer_token(req).ok_or_else(|| Error::unauthorized("Access denied"))?;
    let state = req
        .app_data::<web::Data<HttpState>>()
        .ok_or_else(|| Error::internal("HTTP state is not configured"))?;
    let principal = state.auth.verify_token(token).inspect_err(|err| {
        debug!(path = req.path(), error = %err, "bearer token rejected");
    })?;
    Ok(Authenticated(principal))
}

impl FromRequest for Authenticated {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate(req))
    }
}
