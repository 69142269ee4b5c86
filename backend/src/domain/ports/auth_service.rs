//! Driving port for authentication use-cases.
//!
//! Inbound adapters call this port to log callers in, register individuals
//! and verify bearer tokens without importing the hashing or signing
//! adapters behind it.

use async_trait::async_trait;

use crate::domain::{
    Account, Error, IndividualDraft, LoginCredentials, LoginOutcome, NewPassword, PasswordChange,
    Principal, UserId,
};

/// Validated self-service registration.
#[derive(Debug, Clone, PartialEq)]
pub struct SignupRequest {
    pub profile: IndividualDraft,
    pub password: NewPassword,
}

/// Domain use-case port for authentication.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Check credentials and issue a bearer token.
    async fn login(&self, credentials: &LoginCredentials) -> Result<LoginOutcome, Error>;

    /// Register an individual account.
    async fn signup(&self, request: SignupRequest) -> Result<UserId, Error>;

    /// The stored account behind a principal.
    async fn current_account(&self, principal: &Principal) -> Result<Account, Error>;

    /// Replace the caller's password after checking the current one.
    async fn change_password(
        &self,
        principal: &Principal,
        change: PasswordChange,
    ) -> Result<(), Error>;

    /// Decode a bearer token into the principal it was issued to.
    fn verify_token(&self, token: &str) -> Result<Principal, Error>;
}
