//! Directory domain service: accounts, organisations and their employees.
//!
//! Implements [`UsersQuery`], [`AccountsService`] and [`OrganizationsService`].

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{info, warn};

use super::port_errors::{
    USER_EXISTS, account_error, hasher_error, org_user_error, organization_error,
};
use super::ports::{
    AccountRepository, AccountsService, AdminUpdate, CreateOrganizationRequest, NewAdminRequest,
    OrgUserRepository, OrganizationCreated, OrganizationRepository, OrganizationsService,
    PasswordHash, PasswordHasher, UserDirectory, UsersQuery,
};
use super::{
    Account, AccountPatch, Email, Error, OrgUser, OrgUserDraft, OrgUserPatch, Organization,
    OrganizationId, Principal, Role, UserId,
};

const USER_NOT_FOUND: &str = "User not found";

/// Service over the account, organisation and org-user repositories.
#[derive(Clone)]
pub struct DirectoryService<A, O, U, H> {
    accounts: Arc<A>,
    organizations: Arc<O>,
    org_users: Arc<U>,
    hasher: Arc<H>,
    clock: Arc<dyn Clock>,
}

impl<A, O, U, H> DirectoryService<A, O, U, H> {
    /// Create a new service with the given adapters.
    pub fn new(
        accounts: Arc<A>,
        organizations: Arc<O>,
        org_users: Arc<U>,
        hasher: Arc<H>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            accounts,
            organizations,
            org_users,
            hasher,
            clock,
        }
    }
}

impl<A, O, U, H> DirectoryService<A, O, U, H>
where
    A: AccountRepository,
    O: OrganizationRepository,
    U: OrgUserRepository,
    H: PasswordHasher,
{
    async fn require_organization(&self, id: &OrganizationId) -> Result<Organization, Error> {
        self.organizations
            .find(id)
            .await
            .map_err(organization_error)?
            .ok_or_else(|| Error::not_found("Organization not found"))
    }

    async fn ensure_email_free(&self, email: &Email) -> Result<(), Error> {
        if self
            .accounts
            .find_by_email(email.as_str())
            .await
            .map_err(account_error)?
            .is_some()
        {
            return Err(Error::invalid_request(USER_EXISTS));
        }
        Ok(())
    }

    /// Fetch an account, treating one that fails `wanted` as absent.
    async fn require_account(
        &self,
        id: &UserId,
        wanted: impl Fn(&Account) -> bool + Send,
    ) -> Result<Account, Error> {
        self.accounts
            .find_by_id(id)
            .await
            .map_err(account_error)?
            .filter(|account| wanted(account))
            .ok_or_else(|| Error::not_found(USER_NOT_FOUND))
    }

    async fn accounts_where(
        &self,
        wanted: impl Fn(&Account) -> bool + Send,
    ) -> Result<Vec<Account>, Error> {
        let accounts = self.accounts.list().await.map_err(account_error)?;
        Ok(accounts.into_iter().filter(|a| wanted(a)).collect())
    }

    async fn store_new_account(
        &self,
        account: &Account,
        hash: &PasswordHash,
    ) -> Result<(), Error> {
        self.accounts
            .insert(account, hash)
            .await
            .map_err(account_error)
    }

    async fn create_admin(&self, account: Account, password: &str) -> Result<Account, Error> {
        self.ensure_email_free(&account.email).await?;
        let hash = self.hasher.hash(password).map_err(hasher_error)?;
        self.store_new_account(&account, &hash).await?;
        Ok(account)
    }

    /// Apply `update` to an admin, re-hashing a supplied password.
    async fn update_admin(
        &self,
        mut account: Account,
        update: AdminUpdate,
    ) -> Result<Account, Error> {
        let AdminUpdate { patch, password } = update;
        let hash = password
            .map(|password| self.hasher.hash(password.expose()))
            .transpose()
            .map_err(hasher_error)?;
        let now = self.clock.utc();
        account.apply(patch, now);
        if !self.accounts.update(&account).await.map_err(account_error)? {
            return Err(Error::not_found(USER_NOT_FOUND));
        }
        if let Some(hash) = hash {
            if !self
                .accounts
                .assign_password(&account.id, &hash, now)
                .await
                .map_err(account_error)?
            {
                return Err(Error::not_found(USER_NOT_FOUND));
            }
            account.is_first_login = true;
        }
        Ok(account)
    }

    async fn delete_account(&self, principal: &Principal, id: &UserId) -> Result<(), Error> {
        if principal.user_id() == id {
            return Err(Error::conflict("You cannot delete your own account"));
        }
        if !self.accounts.delete(id).await.map_err(account_error)? {
            return Err(Error::not_found(USER_NOT_FOUND));
        }
        Ok(())
    }

    /// Fetch an org user, treating members of other organisations as absent.
    async fn require_member(
        &self,
        org_id: &OrganizationId,
        user_id: &UserId,
    ) -> Result<OrgUser, Error> {
        self.org_users
            .find(user_id)
            .await
            .map_err(org_user_error)?
            .filter(|user| &user.org_id == org_id)
            .ok_or_else(|| Error::not_found(USER_NOT_FOUND))
    }
}

#[async_trait]
impl<A, O, U, H> UsersQuery for DirectoryService<A, O, U, H>
where
    A: AccountRepository,
    O: OrganizationRepository,
    U: OrgUserRepository,
    H: PasswordHasher,
{
    async fn directory(&self, principal: &Principal) -> Result<UserDirectory, Error> {
        principal.require_super_admin()?;
        let mut directory = UserDirectory {
            organizations: self.organizations.list().await.map_err(organization_error)?,
            org_users: self.org_users.list().await.map_err(org_user_error)?,
            ..UserDirectory::default()
        };
        for account in self.accounts.list().await.map_err(account_error)? {
            match account.role {
                Role::SuperAdmin => directory.super_admins.push(account),
                Role::OrgAdmin => directory.org_admins.push(account),
                Role::Individual => directory.individuals.push(account),
                Role::OrgUser => {}
            }
        }
        Ok(directory)
    }
}

#[async_trait]
impl<A, O, U, H> AccountsService for DirectoryService<A, O, U, H>
where
    A: AccountRepository,
    O: OrganizationRepository,
    U: OrgUserRepository,
    H: PasswordHasher,
{
    async fn list_super_admins(&self, principal: &Principal) -> Result<Vec<Account>, Error> {
        principal.require_super_admin()?;
        self.accounts_where(|a| a.role == Role::SuperAdmin).await
    }

    async fn create_super_admin(
        &self,
        principal: &Principal,
        request: NewAdminRequest,
    ) -> Result<Account, Error> {
        principal.require_super_admin()?;
        let NewAdminRequest { admin, password } = request;
        let account = Account::super_admin(
            UserId::generate_for(Role::SuperAdmin),
            admin,
            self.clock.utc(),
        );
        let account = self.create_admin(account, password.expose()).await?;
        info!(user_id = %account.id, created_by = %principal.user_id(), "super admin created");
        Ok(account)
    }

    async fn update_super_admin(
        &self,
        principal: &Principal,
        id: &UserId,
        update: AdminUpdate,
    ) -> Result<Account, Error> {
        principal.require_super_admin()?;
        let account = self.require_account(id, |a| a.role == Role::SuperAdmin).await?;
        let account = self.update_admin(account, update).await?;
        info!(user_id = %id, "super admin updated");
        Ok(account)
    }

    async fn delete_super_admin(&self, principal: &Principal, id: &UserId) -> Result<(), Error> {
        principal.require_super_admin()?;
        self.require_account(id, |a| a.role == Role::SuperAdmin).await?;
        self.delete_account(principal, id).await?;
        info!(user_id = %id, "super admin deleted");
        Ok(())
    }

    async fn list_org_admins(
        &self,
        principal: &Principal,
        org_id: &OrganizationId,
    ) -> Result<Vec<Account>, Error> {
        principal.require_oversight_of(org_id)?;
        self.accounts_where(|a| is_admin_of(a, org_id)).await
    }

    async fn create_org_admin(
        &self,
        principal: &Principal,
        org_id: &OrganizationId,
        request: NewAdminRequest,
    ) -> Result<Account, Error> {
        principal.require_oversight_of(org_id)?;
        self.require_organization(org_id).await?;
        let NewAdminRequest { admin, password } = request;
        let account = Account::org_admin(
            UserId::generate_for(Role::OrgAdmin),
            org_id.clone(),
            admin.name,
            admin.email,
            self.clock.utc(),
        );
        let account = self.create_admin(account, password.expose()).await?;
        info!(
            org_id = %org_id,
            user_id = %account.id,
            created_by = %principal.user_id(),
            "org admin created"
        );
        Ok(account)
    }

    async fn update_org_admin(
        &self,
        principal: &Principal,
        org_id: &OrganizationId,
        id: &UserId,
        update: AdminUpdate,
    ) -> Result<Account, Error> {
        principal.require_oversight_of(org_id)?;
        let account = self.require_account(id, |a| is_admin_of(a, org_id)).await?;
        let account = self.update_admin(account, update).await?;
        info!(org_id = %org_id, user_id = %id, "org admin updated");
        Ok(account)
    }

    async fn delete_org_admin(
        &self,
        principal: &Principal,
        org_id: &OrganizationId,
        id: &UserId,
    ) -> Result<(), Error> {
        principal.require_oversight_of(org_id)?;
        self.require_account(id, |a| is_admin_of(a, org_id)).await?;
        self.delete_account(principal, id).await?;
        info!(org_id = %org_id, user_id = %id, "org admin deleted");
        Ok(())
    }

    async fn update_individual(
        &self,
        principal: &Principal,
        id: &UserId,
        patch: AccountPatch,
    ) -> Result<Account, Error> {
        require_self_or_super_admin(principal, id)?;
        let mut account = self.require_account(id, |a| a.role == Role::Individual).await?;
        account.apply(patch, self.clock.utc());
        if !self.accounts.update(&account).await.map_err(account_error)? {
            return Err(Error::not_found(USER_NOT_FOUND));
        }
        info!(user_id = %id, "individual updated");
        Ok(account)
    }

    async fn delete_individual(&self, principal: &Principal, id: &UserId) -> Result<(), Error> {
        require_self_or_super_admin(principal, id)?;
        self.require_account(id, |a| a.role == Role::Individual).await?;
        if !self.accounts.delete(id).await.map_err(account_error)? {
            return Err(Error::not_found(USER_NOT_FOUND));
        }
        info!(user_id = %id, deleted_by = %principal.user_id(), "individual deleted");
        Ok(())
    }
}

fn is_admin_of(account: &Account, org_id: &OrganizationId) -> bool {
    account.role == Role::OrgAdmin && account.org_id.as_ref() == Some(org_id)
}

fn require_self_or_super_admin(principal: &Principal, id: &UserId) -> Result<(), Error> {
    if principal.is_super_admin() || principal.user_id() == id {
        Ok(())
    } else {
        Err(Error::forbidden("Access denied"))
    }
}

#[async_trait]
impl<A, O, U, H> OrganizationsService for DirectoryService<A, O, U, H>
where
    A: AccountRepository,
    O: OrganizationRepository,
    U: OrgUserRepository,
    H: PasswordHasher,
{
    async fn list(&self, principal: &Principal) -> Result<Vec<Organization>, Error> {
        principal.require_super_admin()?;
        self.organizations.list().await.map_err(organization_error)
    }

    async fn get(
        &self,
        principal: &Principal,
        id: &OrganizationId,
    ) -> Result<Organization, Error> {
        principal.require_oversight_of(id)?;
        self.require_organization(id).await
    }

    async fn create(
        &self,
        principal: &Principal,
        request: CreateOrganizationRequest,
    ) -> Result<OrganizationCreated, Error> {
        principal.require_super_admin()?;
        let CreateOrganizationRequest {
            organization,
            initial_password,
        } = request;
        self.ensure_email_free(&organization.email).await?;
        let hash = self
            .hasher
            .hash(initial_password.expose())
            .map_err(hasher_error)?;

        let now = self.clock.utc();
        let organization = Organization::new(
            OrganizationId::generate(),
            organization,
            principal.user_id().clone(),
            now,
        );
        let admin = Account::org_admin(
            UserId::generate_for(Role::OrgAdmin),
            organization.id.clone(),
            format!("{} Admin", organization.name),
            organization.email.clone(),
            now,
        );
        self.store_new_account(&admin, &hash).await?;
        if let Err(err) = self.organizations.insert(&organization).await {
            if let Err(cleanup) = self.accounts.delete(&admin.id).await {
                warn!(admin_id = %admin.id, error = %cleanup, "orphaned org admin not removed");
            }
            return Err(organization_error(err));
        }

        info!(
            org_id = %organization.id,
            admin_id = %admin.id,
            created_by = %principal.user_id(),
            "organization created"
        );
        Ok(OrganizationCreated {
            organization_id: organization.id,
            admin_id: admin.id,
        })
    }

    async fn delete(&self, principal: &Principal, id: &OrganizationId) -> Result<(), Error> {
        principal.require_super_admin()?;
        if !self
            .organizations
            .delete(id)
            .await
            .map_err(organization_error)?
        {
            return Err(Error::not_found("Organization not found"));
        }
        info!(org_id = %id, "organization deleted");
        Ok(())
    }

    async fn list_members(
        &self,
        principal: &Principal,
        org_id: &OrganizationId,
    ) -> Result<Vec<OrgUser>, Error> {
        principal.require_oversight_of(org_id)?;
        self.org_users
            .list_for_org(org_id)
            .await
            .map_err(org_user_error)
    }

    async fn add_member(
        &self,
        principal: &Principal,
        org_id: &OrganizationId,
        draft: OrgUserDraft,
    ) -> Result<OrgUser, Error> {
        principal.require_org_admin_of(org_id)?;
        self.require_organization(org_id).await?;
        let user = OrgUser::new(
            UserId::generate_for(Role::OrgUser),
            org_id.clone(),
            draft,
            principal.user_id().clone(),
            self.clock.utc(),
        );
        self.org_users
            .insert(&user)
            .await
            .map_err(org_user_error)?;
        info!(org_id = %org_id, user_id = %user.id, "org user added");
        Ok(user)
    }

    async fn update_member(
        &self,
        principal: &Principal,
        org_id: &OrganizationId,
        user_id: &UserId,
        patch: OrgUserPatch,
    ) -> Result<OrgUser, Error> {
        principal.require_org_admin_of(org_id)?;
        let mut user = self.require_member(org_id, user_id).await?;
        user.apply(patch, self.clock.utc());
        if !self
            .org_users
            .update(&user)
            .await
            .map_err(org_user_error)?
        {
            return Err(Error::not_found(USER_NOT_FOUND));
        }
        info!(org_id = %org_id, user_id = %user_id, "org user updated");
        Ok(user)
    }

    async fn remove_member(
        &self,
        principal: &Principal,
        org_id: &OrganizationId,
        user_id: &UserId,
    ) -> Result<(), Error> {
        principal.require_org_admin_of(org_id)?;
        self.require_member(org_id, user_id).await?;
        if !self
            .org_users
            .delete(user_id)
            .await
            .map_err(org_user_error)?
        {
            return Err(Error::not_found(USER_NOT_FOUND));
        }
        info!(org_id = %org_id, user_id = %user_id, "org user removed");
        Ok(())
    }
}
