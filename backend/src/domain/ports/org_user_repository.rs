//! Port abstraction for organisation employees.
use async_trait::async_trait;

use crate::domain::{OrgUser, OrganizationId, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by org-user repository adapters.
    pub enum OrgUserRepositoryError {
        /// The backing store could not complete the operation.
        Query { message: String } => "org user repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OrgUserRepository: Send + Sync {
    /// Every org user across all organisations.
    async fn list(&self) -> Result<Vec<OrgUser>, OrgUserRepositoryError>;

    /// Org users belonging to one organisation.
    async fn list_for_org(
        &self,
        org_id: &OrganizationId,
    ) -> Result<Vec<OrgUser>, OrgUserRepositoryError>;

    /// Fetch an org user by id.
    async fn find(&self, id: &UserId) -> Result<Option<OrgUser>, OrgUserRepositoryError>;

    /// Store a new org user.
    async fn insert(&self, user: &OrgUser) -> Result<(), OrgUserRepositoryError>;

    /// Overwrite an existing org user. Returns `false` when absent.
    async fn update(&self, user: &OrgUser) -> Result<bool, OrgUserRepositoryError>;

    /// Remove an org user. Returns `false` when absent.
    async fn delete(&self, id: &UserId) -> Result<bool, OrgUserRepositoryError>;
}
