//! Port abstraction for signing and verifying bearer tokens.
use chrono::{DateTime, Utc};

use crate::domain::{AccessToken, Principal};

use super::define_port_error;

define_port_error! {
    /// Failures raised by token codecs.
    pub enum TokenCodecError {
        /// The token failed signature or shape checks.
        Invalid { message: String } => "token rejected: {message}",
        /// The token was well formed but has expired.
        Expired => "token expired",
        /// A token could not be produced.
        Signing { message: String } => "token signing failed: {message}",
    }
}

/// Issue and verify signed, time-limited bearer tokens.
#[cfg_attr(test, mockall::automock)]
pub trait TokenCodec: Send + Sync {
    /// Sign a token for `principal`, valid from `issued_at` for the codec's TTL.
    fn issue(
        &self,
        principal: &Principal,
        issued_at: DateTime<Utc>,
    ) -> Result<AccessToken, TokenCodecError>;

    /// Verify a token and decode the caller it was issued to.
    fn verify(&self, token: &str, now: DateTime<Utc>) -> Result<Principal, TokenCodecError>;
}
