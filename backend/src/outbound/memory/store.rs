//! `MemoryStore`: every repository port over one lock-guarded [`Dataset`].
//!
//! Each call holds the lock for a single read or write. There are no
//! multi-call transactions; concurrent edits resolve as last write wins.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::debug;

use crate::domain::ports::{
    AccountRepository, AccountRepositoryError, MeasurementRepository, MeasurementRepositoryError,
    OrderRepository, OrderRepositoryError, OrgUserRepository, OrgUserRepositoryError,
    OrganizationRepository, OrganizationRepositoryError, PasswordHash, ProductRepository,
    ProductRepositoryError,
};
use crate::domain::{
    Account, Measurement, MeasurementId, Order, OrderId, OrgUser, Organization, OrganizationId,
    Product, ProductCategory, ProductId, UserId,
};

use super::Dataset;
use super::dataset::{remove_where, replace_where};

/// In-process store seeded at start-up and discarded on exit.
#[derive(Debug, Default)]
pub struct MemoryStore {
    data: RwLock<Dataset>,
}

impl MemoryStore {
    /// Wrap a prepared dataset.
    pub fn new(dataset: Dataset) -> Self {
        Self {
            data: RwLock::new(dataset),
        }
    }

    /// Copy of the current contents.
    pub async fn snapshot(&self) -> Dataset {
        self.data.read().await.clone()
    }
}

#[async_trait]
impl AccountRepository for MemoryStore {
    async fn list(&self) -> Result<Vec<Account>, AccountRepositoryError> {
        Ok(self.data.read().await.accounts.clone())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, AccountRepositoryError> {
        let data = self.data.read().await;
        Ok(data
            .accounts
            .iter()
            .find(|account| account.email.as_str() == email)
            .cloned())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<Account>, AccountRepositoryError> {
        let data = self.data.read().await;
        Ok(data.accounts.iter().find(|account| &account.id == id).cloned())
    }

    async fn insert(
        &self,
        account: &Account,
        password: &PasswordHash,
    ) -> Result<(), AccountRepositoryError> {
        let mut data = self.data.write().await;
        if data.accounts.iter().any(|a| a.email == account.email) {
            return Err(AccountRepositoryError::duplicate_email(account.email.as_str()));
        }
        data.accounts.push(account.clone());
        data.credentials.insert(account.id.clone(), password.clone());
        debug!(user_id = %account.id, "account stored");
        Ok(())
    }

    async fn update(&self, account: &Account) -> Result<bool, AccountRepositoryError> {
        let mut data = self.data.write().await;
        if data
            .accounts
            .iter()
            .any(|a| a.email == account.email && a.id != account.id)
        {
            return Err(AccountRepositoryError::duplicate_email(account.email.as_str()));
        }
        Ok(replace_where(&mut data.accounts, account, |a| a.id == account.id))
    }

    async fn delete(&self, id: &UserId) -> Result<bool, AccountRepositoryError> {
        let mut data = self.data.write().await;
        data.credentials.remove(id);
        Ok(remove_where(&mut data.accounts, |a| &a.id == id))
    }

    async fn password_hash(
        &self,
        id: &UserId,
    ) -> Result<Option<PasswordHash>, AccountRepositoryError> {
        Ok(self.data.read().await.credentials.get(id).cloned())
    }

    async fn replace_password(
        &self,
        id: &UserId,
        password: &PasswordHash,
        now: DateTime<Utc>,
    ) -> Result<bool, AccountRepositoryError> {
        let mut data = self.data.write().await;
        let Some(account) = data.accounts.iter_mut().find(|a| &a.id == id) else {
            return Ok(false);
        };
        account.is_first_login = false;
        account.updated_at = now;
        data.credentials.insert(id.clone(), password.clone());
        Ok(true)
    }

    async fn assign_password(
        &self,
        id: &UserId,
        password: &PasswordHash,
        now: DateTime<Utc>,
    ) -> Result<bool, AccountRepositoryError> {
        let mut data = self.data.write().await;
        let Some(account) = data.accounts.iter_mut().find(|a| &a.id == id) else {
            return Ok(false);
        };
        account.is_first_login = true;
        account.updated_at = now;
        data.credentials.insert(id.clone(), password.clone());
        Ok(true)
    }
}

#[async_trait]
impl OrganizationRepository for MemoryStore {
    async fn list(&self) -> Result<Vec<Organization>, OrganizationRepositoryError> {
        Ok(self.data.read().await.organizations.clone())
    }

    async fn find(
        &self,
        id: &OrganizationId,
    ) -> Result<Option<Organization>, OrganizationRepositoryError> {
        let data = self.data.read().await;
        Ok(data.organizations.iter().find(|org| &org.id == id).cloned())
    }

    async fn insert(&self, organization: &Organization) -> Result<(), OrganizationRepositoryError> {
        self.data
            .write()
            .await
            .organizations
            .push(organization.clone());
        Ok(())
    }

    async fn delete(&self, id: &OrganizationId) -> Result<bool, OrganizationRepositoryError> {
        let mut data = self.data.write().await;
        Ok(remove_where(&mut data.organizations, |org| &org.id == id))
    }
}

#[async_trait]
impl OrgUserRepository for MemoryStore {
    async fn list(&self) -> Result<Vec<OrgUser>, OrgUserRepositoryError> {
        Ok(self.data.read().await.org_users.clone())
    }

    async fn list_for_org(
        &self,
        org_id: &OrganizationId,
    ) -> Result<Vec<OrgUser>, OrgUserRepositoryError> {
        let data = self.data.read().await;
        Ok(data
            .org_users
            .iter()
            .filter(|user| &user.org_id == org_id)
            .cloned()
            .collect())
    }

    async fn find(&self, id: &UserId) -> Result<Option<OrgUser>, OrgUserRepositoryError> {
        let data = self.data.read().await;
        Ok(data.org_users.iter().find(|user| &user.id == id).cloned())
    }

    async fn insert(&self, user: &OrgUser) -> Result<(), OrgUserRepositoryError> {
        self.data.write().await.org_users.push(user.clone());
        Ok(())
    }

    async fn update(&self, user: &OrgUser) -> Result<bool, OrgUserRepositoryError> {
        let mut data = self.data.write().await;
        Ok(replace_where(&mut data.org_users, user, |u| u.id == user.id))
    }

    async fn delete(&self, id: &UserId) -> Result<bool, OrgUserRepositoryError> {
        let mut data = self.data.write().await;
        Ok(remove_where(&mut data.org_users, |user| &user.id == id))
    }
}

#[async_trait]
impl ProductRepository for MemoryStore {
    async fn list(
        &self,
        category: Option<ProductCategory>,
    ) -> Result<Vec<Product>, ProductRepositoryError> {
        let data = self.data.read().await;
        Ok(data
            .products
            .iter()
            .filter(|product| category.is_none_or(|c| product.category == c))
            .cloned()
            .collect())
    }

    async fn find(&self, id: &ProductId) -> Result<Option<Product>, ProductRepositoryError> {
        let data = self.data.read().await;
        Ok(data.products.iter().find(|p| &p.id == id).cloned())
    }

    async fn insert(&self, product: &Product) -> Result<(), ProductRepositoryError> {
        self.data.write().await.products.push(product.clone());
        Ok(())
    }

    async fn update(&self, product: &Product) -> Result<bool, ProductRepositoryError> {
        let mut data = self.data.write().await;
        Ok(replace_where(&mut data.products, product, |p| p.id == product.id))
    }

    async fn delete(&self, id: &ProductId) -> Result<bool, ProductRepositoryError> {
        let mut data = self.data.write().await;
        Ok(remove_where(&mut data.products, |p| &p.id == id))
    }
}

#[async_trait]
impl OrderRepository for MemoryStore {
    async fn list(&self) -> Result<Vec<Order>, OrderRepositoryError> {
        Ok(self.data.read().await.orders.clone())
    }

    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<Order>, OrderRepositoryError> {
        let data = self.data.read().await;
        Ok(data
            .orders
            .iter()
            .filter(|order| &order.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn find(&self, id: &OrderId) -> Result<Option<Order>, OrderRepositoryError> {
        let data = self.data.read().await;
        Ok(data.orders.iter().find(|o| &o.id == id).cloned())
    }

    async fn insert(&self, order: &Order) -> Result<(), OrderRepositoryError> {
        self.data.write().await.orders.push(order.clone());
        Ok(())
    }

    async fn update(&self, order: &Order) -> Result<bool, OrderRepositoryError> {
        let mut data = self.data.write().await;
        Ok(replace_where(&mut data.orders, order, |o| o.id == order.id))
    }
}

#[async_trait]
impl MeasurementRepository for MemoryStore {
    async fn list(&self) -> Result<Vec<Measurement>, MeasurementRepositoryError> {
        Ok(self.data.read().await.measurements.clone())
    }

    async fn list_for_subject(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<Measurement>, MeasurementRepositoryError> {
        let data = self.data.read().await;
        Ok(data
            .measurements
            .iter()
            .filter(|m| &m.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn find(
        &self,
        id: &MeasurementId,
    ) -> Result<Option<Measurement>, MeasurementRepositoryError> {
        let data = self.data.read().await;
        Ok(data.measurements.iter().find(|m| &m.id == id).cloned())
    }

    async fn insert(&self, measurement: &Measurement) -> Result<(), MeasurementRepositoryError> {
        self.data
            .write()
            .await
            .measurements
            .push(measurement.clone());
        Ok(())
    }

    async fn update(&self, measurement: &Measurement) -> Result<bool, MeasurementRepositoryError> {
        let mut data = self.data.write().await;
        Ok(replace_where(&mut data.measurements, measurement, |m| {
            m.id == measurement.id
        }))
    }

    async fn delete(&self, id: &MeasurementId) -> Result<bool, MeasurementRepositoryError> {
        let mut data = self.data.write().await;
        Ok(remove_where(&mut data.measurements, |m| &m.id == id))
    }
}
