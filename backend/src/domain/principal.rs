//! The authenticated caller and the role checks services apply to it.

use super::{Account, Email, Error, OrganizationId, Role, UserId};

/// Identity decoded from a verified bearer token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    user_id: UserId,
    email: Email,
    role: Role,
    org_id: Option<OrganizationId>,
}

impl Principal {
    /// Assemble a principal from verified token claims.
    pub fn new(user_id: UserId, email: Email, role: Role, org_id: Option<OrganizationId>) -> Self {
        Self {
            user_id,
            email,
            role,
            org_id,
        }
    }

    /// Principal for an account that has just authenticated.
    pub fn for_account(account: &Account) -> Self {
        Self::new(
            account.id.clone(),
            account.email.clone(),
            account.role,
            account.org_id.clone(),
        )
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn email(&self) -> &Email {
        &self.email
    }

    pub fn role(&self) -> Role {
        self.role
    }

    /// Organisation an org admin manages.
    pub fn org_id(&self) -> Option<&OrganizationId> {
        self.org_id.as_ref()
    }

    pub fn is_super_admin(&self) -> bool {
        self.role == Role::SuperAdmin
    }

    /// Whether the caller is the org admin of `org_id`.
    pub fn administers(&self, org_id: &OrganizationId) -> bool {
        self.role == Role::OrgAdmin && self.org_id.as_ref() == Some(org_id)
    }

    /// Fail with `forbidden` unless the caller is a super admin.
    pub fn require_super_admin(&self) -> Result<(), Error> {
        if self.is_super_admin() {
            Ok(())
        } else {
            Err(Error::forbidden("Super admin access required"))
        }
    }

    /// Fail with `forbidden` unless the caller administers `org_id`.
    pub fn require_org_admin_of(&self, org_id: &OrganizationId) -> Result<(), Error> {
        if self.administers(org_id) {
            Ok(())
        } else {
            Err(Error::forbidden("Organization admin access required"))
        }
    }

    /// Super admins, or the org admin of `org_id`.
    pub fn require_oversight_of(&self, org_id: &OrganizationId) -> Result<(), Error> {
        if self.is_super_admin() || self.administers(org_id) {
            Ok(())
        } else {
            Err(Error::forbidden("Access denied for this organization"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;

    fn principal(role: Role, org: Option<&str>) -> Principal {
        Principal::new(
            UserId::new("oa-001").expect("id"),
            Email::new("admin@abccorp.com").expect("email"),
            role,
            org.map(|o| OrganizationId::new(o).expect("org id")),
        )
    }

    #[rstest]
    #[case(Role::SuperAdmin, None, "org-001", true)]
    #[case(Role::OrgAdmin, Some("org-001"), "org-001", true)]
    #[case(Role::OrgAdmin, Some("org-002"), "org-001", false)]
    #[case(Role::Individual, None, "org-001", false)]
    fn oversight_rules(
        #[case] role: Role,
        #[case] own_org: Option<&str>,
        #[case] target: &str,
        #[case] allowed: bool,
    ) {
        let caller = principal(role, own_org);
        let target = OrganizationId::new(target).expect("org id");
        match caller.require_oversight_of(&target) {
            Ok(()) => assert!(allowed),
            Err(err) => {
                assert!(!allowed);
                assert_eq!(err.code(), ErrorCode::Forbidden);
            }
        }
    }

    #[rstest]
    fn super_admin_does_not_administer_orgs() {
        let caller = principal(Role::SuperAdmin, None);
        let org = OrganizationId::new("org-001").expect("org id");
        assert!(caller.require_org_admin_of(&org).is_err());
        assert!(caller.require_super_admin().is_ok());
    }
}
