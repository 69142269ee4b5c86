//! The full set of records held by the in-memory store.

use std::collections::HashMap;

use crate::domain::ports::PasswordHash;
use crate::domain::{Account, Measurement, Order, OrgUser, Organization, Product, UserId};

/// Every record kind, each kept in insertion order.
///
/// Credentials live beside the accounts, keyed by account id, so account
/// records never carry password material.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    /// Super admins, org admins and individuals.
    pub accounts: Vec<Account>,
    /// Password hashes keyed by account id.
    pub credentials: HashMap<UserId, PasswordHash>,
    /// Client organizations.
    pub organizations: Vec<Organization>,
    /// Organization employees without credentials.
    pub org_users: Vec<OrgUser>,
    /// Catalogue entries.
    pub products: Vec<Product>,
    /// Placed orders.
    pub orders: Vec<Order>,
    /// Measurement records.
    pub measurements: Vec<Measurement>,
}

/// Overwrite the record matching `matches`, returning whether one existed.
pub(super) fn replace_where<T, F>(records: &mut [T], record: &T, matches: F) -> bool
where
    T: Clone,
    F: Fn(&T) -> bool,
{
    match records.iter_mut().find(|existing| matches(existing)) {
        Some(slot) => {
            *slot = record.clone();
            true
        }
        None => false,
    }
}

/// Remove the record matching `matches`, returning whether one existed.
pub(super) fn remove_where<T, F>(records: &mut Vec<T>, matches: F) -> bool
where
    F: Fn(&T) -> bool,
{
    let before = records.len();
    records.retain(|record| !matches(record));
    records.len() != before
}
