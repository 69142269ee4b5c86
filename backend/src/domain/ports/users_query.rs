//! Driving port for the cross-role user directory.

use async_trait::async_trait;
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::{Account, Error, OrgUser, Organization, Principal};

/// Every person and organisation known to the system, grouped by kind.
#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserDirectory {
    pub super_admins: Vec<Account>,
    pub organizations: Vec<Organization>,
    pub org_admins: Vec<Account>,
    pub org_users: Vec<OrgUser>,
    pub individuals: Vec<Account>,
}

/// Domain use-case port for listing users.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UsersQuery: Send + Sync {
    /// Return the full directory. Restricted to super admins.
    async fn directory(&self, principal: &Principal) -> Result<UserDirectory, Error>;
}
