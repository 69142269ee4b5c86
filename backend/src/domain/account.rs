//! People known to the system: login-capable accounts and organisation users.
//!
//! Super admins, org admins and individuals can log in and are modelled as
//! [`Account`] records tagged with a [`Role`]. Organisation users are the
//! employees an org admin orders and measures for; they never log in and are
//! modelled separately as [`OrgUser`].

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{OrganizationId, UserId};

/// Role tag carried by accounts and bearer tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Platform operator with access to everything.
    SuperAdmin,
    /// Manages one organisation's employees and orders.
    OrgAdmin,
    /// An organisation's employee.
    OrgUser,
    /// Self-service retail customer.
    Individual,
}

impl Role {
    /// Wire representation, matching the serde form.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::SuperAdmin => "super_admin",
            Self::OrgAdmin => "org_admin",
            Self::OrgUser => "org_user",
            Self::Individual => "individual",
        }
    }

    /// Identifier prefix used for records of this role.
    pub fn id_prefix(self) -> &'static str {
        match self {
            Self::SuperAdmin => "sa",
            Self::OrgAdmin => "oa",
            Self::OrgUser => "ou",
            Self::Individual => "ind",
        }
    }

    /// Whether accounts with this role may obtain a token.
    pub fn can_log_in(self) -> bool {
        !matches!(self, Self::OrgUser)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validation failures for account and org-user inputs.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AccountValidationError {
    /// A required text field was blank.
    #[error("{field} must not be empty")]
    EmptyField {
        /// Wire name of the offending field.
        field: &'static str,
    },
    /// The email address was not plausibly formed.
    #[error("email must contain a single '@' with text on both sides")]
    InvalidEmail,
    /// Age outside the accepted range.
    #[error("age must be between {min} and {max}")]
    AgeOutOfRange {
        /// Inclusive lower bound.
        min: u32,
        /// Inclusive upper bound.
        max: u32,
    },
}

impl AccountValidationError {
    /// Wire name of the field the failure refers to.
    pub fn field(&self) -> &'static str {
        match self {
            Self::EmptyField { field } => field,
            Self::InvalidEmail => "email",
            Self::AgeOutOfRange { .. } => "age",
        }
    }
}

/// Youngest accepted age.
pub const AGE_MIN: u32 = 1;
/// Oldest accepted age.
pub const AGE_MAX: u32 = 120;

/// Email address normalised to trimmed lower case.
///
/// # Examples
/// ```
/// use tailor_backend::domain::Email;
///
/// let email = Email::new("  Jane@ABCcorp.com ").unwrap();
/// assert_eq!(email.as_str(), "jane@abccorp.com");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
    /// Normalise and validate an address.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, AccountValidationError> {
        let normalised = raw.as_ref().trim().to_lowercase();
        if normalised.is_empty() {
            return Err(AccountValidationError::EmptyField { field: "email" });
        }
        let mut parts = normalised.split('@');
        let well_formed = matches!(
            (parts.next(), parts.next(), parts.next()),
            (Some(local), Some(domain), None) if !local.is_empty() && !domain.is_empty()
        );
        if !well_formed || normalised.chars().any(char::is_whitespace) {
            return Err(AccountValidationError::InvalidEmail);
        }
        Ok(Self(normalised))
    }

    /// Borrow the normalised address.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Email> for String {
    fn from(value: Email) -> Self {
        value.0
    }
}

impl TryFrom<String> for Email {
    type Error = AccountValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

pub(crate) fn required_text(
    value: &str,
    field: &'static str,
) -> Result<String, AccountValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AccountValidationError::EmptyField { field });
    }
    Ok(trimmed.to_owned())
}

pub(crate) fn checked_age(age: u32) -> Result<u32, AccountValidationError> {
    if (AGE_MIN..=AGE_MAX).contains(&age) {
        Ok(age)
    } else {
        Err(AccountValidationError::AgeOutOfRange {
            min: AGE_MIN,
            max: AGE_MAX,
        })
    }
}

/// Login-capable account. Never carries password material.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: UserId,
    pub email: Email,
    pub name: String,
    pub role: Role,
    /// Organisation managed by an org admin.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub org_id: Option<OrganizationId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    /// Set for accounts created with an initial password until it is changed.
    #[serde(default)]
    pub is_first_login: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated signup input for an individual account.
#[derive(Debug, Clone, PartialEq)]
pub struct IndividualDraft {
    pub name: String,
    pub email: Email,
    pub phone: String,
    pub address: String,
    pub age: Option<u32>,
}

impl IndividualDraft {
    /// Validate raw signup fields.
    pub fn try_from_parts(
        name: &str,
        email: &str,
        phone: &str,
        address: &str,
        age: Option<u32>,
    ) -> Result<Self, AccountValidationError> {
        Ok(Self {
            name: required_text(name, "name")?,
            email: Email::new(email)?,
            phone: required_text(phone, "phone")?,
            address: required_text(address, "address")?,
            age: age.map(checked_age).transpose()?,
        })
    }
}

/// Validated input for a new super admin or org admin.
#[derive(Debug, Clone, PartialEq)]
pub struct AdminDraft {
    pub name: String,
    pub email: Email,
}

impl AdminDraft {
    /// Validate raw admin fields.
    pub fn try_from_parts(name: &str, email: &str) -> Result<Self, AccountValidationError> {
        Ok(Self {
            name: required_text(name, "name")?,
            email: Email::new(email)?,
        })
    }
}

/// Partial update for an account; `None` leaves a field unchanged.
///
/// Admin accounts only ever receive `name` and `email`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AccountPatch {
    pub name: Option<String>,
    pub email: Option<Email>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub age: Option<u32>,
}

/// Raw partial account fields as received from a client.
#[derive(Debug, Clone, Copy, Default)]
pub struct AccountPatchFields<'a> {
    pub name: Option<&'a str>,
    pub email: Option<&'a str>,
    pub phone: Option<&'a str>,
    pub address: Option<&'a str>,
    pub age: Option<u32>,
}

impl AccountPatch {
    /// Validate the supplied fields of a partial update.
    pub fn try_from_fields(fields: AccountPatchFields<'_>) -> Result<Self, AccountValidationError> {
        Ok(Self {
            name: fields.name.map(|v| required_text(v, "name")).transpose()?,
            email: fields.email.map(Email::new).transpose()?,
            phone: fields.phone.map(|v| required_text(v, "phone")).transpose()?,
            address: fields
                .address
                .map(|v| required_text(v, "address"))
                .transpose()?,
            age: fields.age.map(checked_age).transpose()?,
        })
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

impl Account {
    /// Build an individual account from a validated draft.
    pub fn individual(id: UserId, draft: IndividualDraft, now: DateTime<Utc>) -> Self {
        let IndividualDraft {
            name,
            email,
            phone,
            address,
            age,
        } = draft;
        Self {
            id,
            email,
            name,
            role: Role::Individual,
            org_id: None,
            phone: Some(phone),
            address: Some(address),
            age,
            is_first_login: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Build a super admin who must change the assigned password.
    pub fn super_admin(id: UserId, draft: AdminDraft, now: DateTime<Utc>) -> Self {
        Self {
            id,
            email: draft.email,
            name: draft.name,
            role: Role::SuperAdmin,
            org_id: None,
            phone: None,
            address: None,
            age: None,
            is_first_login: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// Build an admin of `org_id` who must change the assigned password.
    pub fn org_admin(
        id: UserId,
        org_id: OrganizationId,
        name: String,
        email: Email,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            email,
            name,
            role: Role::OrgAdmin,
            org_id: Some(org_id),
            phone: None,
            address: None,
            age: None,
            is_first_login: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply a partial update, stamping `updated_at`.
    pub fn apply(&mut self, patch: AccountPatch, now: DateTime<Utc>) {
        let AccountPatch {
            name,
            email,
            phone,
            address,
            age,
        } = patch;
        if let Some(name) = name {
            self.name = name;
        }
        if let Some(email) = email {
            self.email = email;
        }
        if phone.is_some() {
            self.phone = phone;
        }
        if address.is_some() {
            self.address = address;
        }
        if age.is_some() {
            self.age = age;
        }
        self.updated_at = now;
    }
}

/// Organisation employee: a measurement and order subject without a login.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrgUser {
    pub id: UserId,
    pub org_id: OrganizationId,
    pub name: String,
    pub email: Email,
    pub phone: String,
    pub address: String,
    pub age: u32,
    pub department: String,
    pub created_by: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated input for a new organisation user.
#[derive(Debug, Clone, PartialEq)]
pub struct OrgUserDraft {
    pub name: String,
    pub email: Email,
    pub phone: String,
    pub address: String,
    pub age: u32,
    pub department: String,
}

/// Raw, unvalidated org-user fields as received from a client.
#[derive(Debug, Clone, Copy)]
pub struct OrgUserFields<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub phone: &'a str,
    pub address: &'a str,
    pub age: u32,
    pub department: &'a str,
}

impl OrgUserDraft {
    /// Validate raw org-user fields.
    pub fn try_from_fields(fields: OrgUserFields<'_>) -> Result<Self, AccountValidationError> {
        Ok(Self {
            name: required_text(fields.name, "name")?,
            email: Email::new(fields.email)?,
            phone: required_text(fields.phone, "phone")?,
            address: required_text(fields.address, "address")?,
            age: checked_age(fields.age)?,
            department: required_text(fields.department, "department")?,
        })
    }
}

/// Partial update for an organisation user; `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrgUserPatch {
    pub name: Option<String>,
    pub email: Option<Email>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub age: Option<u32>,
    pub department: Option<String>,
}

/// Raw partial org-user fields as received from a client.
#[derive(Debug, Clone, Copy, Default)]
pub struct OrgUserPatchFields<'a> {
    pub name: Option<&'a str>,
    pub email: Option<&'a str>,
    pub phone: Option<&'a str>,
    pub address: Option<&'a str>,
    pub age: Option<u32>,
    pub department: Option<&'a str>,
}

impl OrgUserPatch {
    /// Validate the supplied fields of a partial update.
    pub fn try_from_fields(fields: OrgUserPatchFields<'_>) -> Result<Self, AccountValidationError> {
        Ok(Self {
            name: fields.name.map(|v| required_text(v, "name")).transpose()?,
            email: fields.email.map(Email::new).transpose()?,
            phone: fields.phone.map(|v| required_text(v, "phone")).transpose()?,
            address: fields
                .address
                .map(|v| required_text(v, "address"))
                .transpose()?,
            age: fields.age.map(checked_age).transpose()?,
            department: fields
                .department
                .map(|v| required_text(v, "department"))
                .transpose()?,
        })
    }

    /// Whether applying the patch would change nothing.
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

impl OrgUser {
    /// Create a record from a validated draft.
    pub fn new(
        id: UserId,
        org_id: OrganizationId,
        draft: OrgUserDraft,
        created_by: UserId,
        now: DateTime<Utc>,
    ) -> Self {
        let OrgUserDraft {
            name,
            email,
            phone,
            address,
            age,
            department,
        } = draft;
        Self {
            id,
            org_id,
            name,
            email,
            phone,
            address,
            age,
            department,
            created_by,
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply a partial update, stamping `updated_at`.
    pub fn apply(&mut self, patch: OrgUserPatch, now: DateTime<Utc>) {
        let OrgUserPatch {
            name,
            email,
            phone,
            address,
            age,
            department,
        } = patch;
        if let Some(name) = name {
            self.name = name;
        }
        if let Some(email) = email {
            self.email = email;
        }
        if let Some(phone) = phone {
            self.phone = phone;
        }
        if let Some(address) = address {
            self.address = address;
        }
        if let Some(age) = age {
            self.age = age;
        }
        if let Some(department) = department {
            self.department = department;
        }
        self.updated_at = now;
    }
}
