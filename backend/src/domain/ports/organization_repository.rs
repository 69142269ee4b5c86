//! Port abstraction for organisation records.
use async_trait::async_trait;

use crate::domain::{Organization, OrganizationId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by organisation repository adapters.
    pub enum OrganizationRepositoryError {
        /// The backing store could not complete the operation.
        Query { message: String } => "organization repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OrganizationRepository: Send + Sync {
    /// Every organisation in insertion order.
    async fn list(&self) -> Result<Vec<Organization>, OrganizationRepositoryError>;

    /// Fetch an organisation by id.
    async fn find(
        &self,
        id: &OrganizationId,
    ) -> Result<Option<Organization>, OrganizationRepositoryError>;

    /// Store a new organisation.
    async fn insert(&self, organization: &Organization) -> Result<(), OrganizationRepositoryError>;

    /// Remove an organisation without touching anything that references it.
    ///
    /// Returns `false` when nothing was removed.
    async fn delete(&self, id: &OrganizationId) -> Result<bool, OrganizationRepositoryError>;
}
