//! Port abstraction for login-capable accounts and their credentials.
use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{Account, UserId};

use super::{PasswordHash, define_port_error};

define_port_error! {
    /// Persistence errors raised by account repository adapters.
    pub enum AccountRepositoryError {
        /// Another account already uses the email address.
        DuplicateEmail { email: String } => "account email already registered: {email}",
        /// The backing store could not complete the operation.
        Query { message: String } => "account repository query failed: {message}",
    }
}

/// Account storage. Credentials are kept beside, never inside, the account.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Every account in insertion order.
    async fn list(&self) -> Result<Vec<Account>, AccountRepositoryError>;

    /// Look an account up by its normalised email.
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, AccountRepositoryError>;

    /// Look an account up by id.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<Account>, AccountRepositoryError>;

    /// Store a new account with its password hash.
    ///
    /// Fails with [`AccountRepositoryError::DuplicateEmail`] when the email is
    /// taken.
    async fn insert(
        &self,
        account: &Account,
        password: &PasswordHash,
    ) -> Result<(), AccountRepositoryError>;

    /// Overwrite a stored account, keeping its credentials.
    ///
    /// Returns `false` when the account does not exist and fails with
    /// [`AccountRepositoryError::DuplicateEmail`] when another account
    /// already uses the new email.
    async fn update(&self, account: &Account) -> Result<bool, AccountRepositoryError>;

    /// Remove an account and its credentials.
    async fn delete(&self, id: &UserId) -> Result<bool, AccountRepositoryError>;

    /// Stored password hash for an account.
    async fn password_hash(
        &self,
        id: &UserId,
    ) -> Result<Option<PasswordHash>, AccountRepositoryError>;

    /// Replace the password hash, clear `isFirstLogin` and stamp `updatedAt`.
    ///
    /// Returns `false` when the account does not exist.
    async fn replace_password(
        &self,
        id: &UserId,
        password: &PasswordHash,
        now: DateTime<Utc>,
    ) -> Result<bool, AccountRepositoryError>;

    /// Store an administrator-assigned password, set `isFirstLogin` and
    /// stamp `updatedAt`.
    ///
    /// Returns `false` when the account does not exist.
    async fn assign_password(
        &self,
        id: &UserId,
        password: &PasswordHash,
        now: DateTime<Utc>,
    ) -> Result<bool, AccountRepositoryError>;
}
