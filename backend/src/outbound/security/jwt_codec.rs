//! HS256 JSON Web Token implementation of the [`TokenCodec`] port.
//!
//! Expiry is checked against the caller-supplied instant rather than the
//! system clock so that services driven by an injected clock stay
//! deterministic.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::domain::ports::{TokenCodec, TokenCodecError};
use crate::domain::{AccessToken, Email, OrganizationId, Principal, Role, UserId};

/// Claims carried by every access token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Claims {
    sub: UserId,
    email: Email,
    role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    org_id: Option<OrganizationId>,
    iat: i64,
    exp: i64,
}

/// Signs and verifies tokens with a shared HMAC secret.
#[derive(Clone)]
pub struct JwtTokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl JwtTokenCodec {
    /// Codec signing with `secret`; tokens expire `ttl` after issue.
    pub fn new(secret: &[u8], ttl: Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.set_required_spec_claims(&["exp", "sub"]);
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
            ttl,
        }
    }

    /// Lifetime of issued tokens.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }
}

impl std::fmt::Debug for JwtTokenCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtTokenCodec")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

impl TokenCodec for JwtTokenCodec {
    fn issue(
        &self,
        principal: &Principal,
        issued_at: DateTime<Utc>,
    ) -> Result<AccessToken, TokenCodecError> {
        let expires_at = issued_at
            .checked_add_signed(self.ttl)
            .ok_or_else(|| TokenCodecError::signing("token expiry overflows"))?;
        let claims = Claims {
            sub: principal.user_id().clone(),
            email: principal.email().clone(),
            role: principal.role(),
            org_id: principal.org_id().cloned(),
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
        };
        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map(AccessToken::new)
            .map_err(|e| TokenCodecError::signing(e.to_string()))
    }

    fn verify(&self, token: &str, now: DateTime<Utc>) -> Result<Principal, TokenCodecError> {
        let data = jsonwebtoken::decode::<Claims>(token, &self.decoding, &self.validation)
            .map_err(|e| TokenCodecError::invalid(e.to_string()))?;
        let claims = data.claims;
        if now.timestamp() >= claims.exp {
            return Err(TokenCodecError::expired());
        }
        Ok(Principal::new(
            claims.sub,
            claims.email,
            claims.role,
            claims.org_id,
        ))
    }
}
