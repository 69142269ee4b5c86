//! Driving port for managing login-capable accounts.
//!
//! Super admins manage each other and every organisation's admins. An org
//! admin manages the admins of their own organisation. Individuals edit or
//! close their own account.

use async_trait::async_trait;

use crate::domain::{
    Account, AccountPatch, AdminDraft, Error, NewPassword, OrganizationId, Principal, UserId,
};

/// Validated request to create a super admin or org admin.
#[derive(Debug, Clone, PartialEq)]
pub struct NewAdminRequest {
    pub admin: AdminDraft,
    /// Assigned password; the holder must change it on first login.
    pub password: NewPassword,
}

/// Validated partial update of an admin account.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AdminUpdate {
    pub patch: AccountPatch,
    /// Replacement password, re-hashed and flagged for a change on next
    /// login.
    pub password: Option<NewPassword>,
}

/// Domain use-case port for account management.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountsService: Send + Sync {
    /// Every super admin.
    async fn list_super_admins(&self, principal: &Principal) -> Result<Vec<Account>, Error>;

    /// Create a super admin.
    async fn create_super_admin(
        &self,
        principal: &Principal,
        request: NewAdminRequest,
    ) -> Result<Account, Error>;

    /// Update a super admin.
    async fn update_super_admin(
        &self,
        principal: &Principal,
        id: &UserId,
        update: AdminUpdate,
    ) -> Result<Account, Error>;

    /// Delete a super admin other than the caller.
    async fn delete_super_admin(&self, principal: &Principal, id: &UserId) -> Result<(), Error>;

    /// Admins of one organisation.
    async fn list_org_admins(
        &self,
        principal: &Principal,
        org_id: &OrganizationId,
    ) -> Result<Vec<Account>, Error>;

    /// Add an admin to an existing organisation.
    async fn create_org_admin(
        &self,
        principal: &Principal,
        org_id: &OrganizationId,
        request: NewAdminRequest,
    ) -> Result<Account, Error>;

    /// Update an admin of an organisation.
    async fn update_org_admin(
        &self,
        principal: &Principal,
        org_id: &OrganizationId,
        id: &UserId,
        update: AdminUpdate,
    ) -> Result<Account, Error>;

    /// Delete an admin of an organisation other than the caller.
    async fn delete_org_admin(
        &self,
        principal: &Principal,
        org_id: &OrganizationId,
        id: &UserId,
    ) -> Result<(), Error>;

    /// Edit an individual's profile.
    async fn update_individual(
        &self,
        principal: &Principal,
        id: &UserId,
        patch: AccountPatch,
    ) -> Result<Account, Error>;

    /// Close an individual's account.
    async fn delete_individual(&self, principal: &Principal, id: &UserId) -> Result<(), Error>;
}
