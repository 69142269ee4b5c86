//! Client organisations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::account::required_text;
use super::{AccountValidationError, Email, OrganizationId, UserId};

/// Business customer owning org admins and org users.
///
/// Deleting an organisation does not cascade: its admins, employees, orders
/// and measurements stay in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Organization {
    pub id: OrganizationId,
    pub name: String,
    /// Permanent account number (tax identifier).
    pub pan: String,
    pub email: Email,
    pub phone: String,
    pub address: String,
    /// Goods and services tax identification number.
    pub gstin: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
    pub created_by: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Raw organisation fields as received from a client.
#[derive(Debug, Clone, Copy)]
pub struct OrganizationFields<'a> {
    pub name: &'a str,
    pub pan: &'a str,
    pub email: &'a str,
    pub phone: &'a str,
    pub address: &'a str,
    pub gstin: &'a str,
    pub logo: Option<&'a str>,
}

/// Validated input for a new organisation.
#[derive(Debug, Clone, PartialEq)]
pub struct OrganizationDraft {
    pub name: String,
    pub pan: String,
    pub email: Email,
    pub phone: String,
    pub address: String,
    pub gstin: String,
    pub logo: Option<String>,
}

impl OrganizationDraft {
    /// Validate raw fields. Tax identifiers are upper-cased.
    pub fn try_from_fields(fields: OrganizationFields<'_>) -> Result<Self, AccountValidationError> {
        let logo = fields
            .logo
            .map(str::trim)
            .filter(|logo| !logo.is_empty())
            .map(str::to_owned);
        Ok(Self {
            name: required_text(fields.name, "name")?,
            pan: required_text(fields.pan, "pan")?.to_uppercase(),
            email: Email::new(fields.email)?,
            phone: required_text(fields.phone, "phone")?,
            address: required_text(fields.address, "address")?,
            gstin: required_text(fields.gstin, "gstin")?.to_uppercase(),
            logo,
        })
    }
}

impl Organization {
    /// Create a record from a validated draft.
    pub fn new(
        id: OrganizationId,
        draft: OrganizationDraft,
        created_by: UserId,
        now: DateTime<Utc>,
    ) -> Self {
        let OrganizationDraft {
            name,
            pan,
            email,
            phone,
            address,
            gstin,
            logo,
        } = draft;
        Self {
            id,
            name,
            pan,
            email,
            phone,
            address,
            gstin,
            logo,
            created_by,
            created_at: now,
            updated_at: now,
        }
    }
}
