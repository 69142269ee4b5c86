//! Driving port for organisations and their employees.

use async_trait::async_trait;

use crate::domain::{
    Error, NewPassword, OrgUser, OrgUserDraft, OrgUserPatch, Organization, OrganizationDraft,
    OrganizationId, Principal, UserId,
};

/// Validated request to onboard an organisation with its first admin.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateOrganizationRequest {
    pub organization: OrganizationDraft,
    /// Password the new org admin logs in with until they change it.
    pub initial_password: NewPassword,
}

/// Identifiers minted while onboarding an organisation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrganizationCreated {
    pub organization_id: OrganizationId,
    pub admin_id: UserId,
}

/// Domain use-case port for organisation management.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OrganizationsService: Send + Sync {
    /// Every organisation.
    async fn list(&self, principal: &Principal) -> Result<Vec<Organization>, Error>;

    /// One organisation.
    async fn get(&self, principal: &Principal, id: &OrganizationId)
    -> Result<Organization, Error>;

    /// Create an organisation and its first org admin.
    async fn create(
        &self,
        principal: &Principal,
        request: CreateOrganizationRequest,
    ) -> Result<OrganizationCreated, Error>;

    /// Remove an organisation. Its people and records are left in place.
    async fn delete(&self, principal: &Principal, id: &OrganizationId) -> Result<(), Error>;

    /// Employees of an organisation.
    async fn list_members(
        &self,
        principal: &Principal,
        org_id: &OrganizationId,
    ) -> Result<Vec<OrgUser>, Error>;

    /// Add an employee to an organisation.
    async fn add_member(
        &self,
        principal: &Principal,
        org_id: &OrganizationId,
        draft: OrgUserDraft,
    ) -> Result<OrgUser, Error>;

    /// Partially update an employee.
    async fn update_member(
        &self,
        principal: &Principal,
        org_id: &OrganizationId,
        user_id: &UserId,
        patch: OrgUserPatch,
    ) -> Result<OrgUser, Error>;

    /// Remove an employee.
    async fn remove_member(
        &self,
        principal: &Principal,
        org_id: &OrganizationId,
        user_id: &UserId,
    ) -> Result<(), Error>;
}
