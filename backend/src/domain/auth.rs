//! Authentication inputs: login credentials, signup passwords and password
//! changes.
//!
//! Handlers build these from raw payload strings before calling the
//! authentication service, so the service only ever sees validated input.
//! Password material is held in [`Zeroizing`] buffers.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use zeroize::Zeroizing;

use super::Account;

/// Shortest password accepted for new credentials.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Validation failures for authentication payloads.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthValidationError {
    /// Email was missing or blank once trimmed.
    #[error("email must not be empty")]
    EmptyEmail,
    /// Password was blank.
    #[error("password must not be empty")]
    EmptyPassword,
    /// Current password was blank during a password change.
    #[error("current password must not be empty")]
    EmptyCurrentPassword,
    /// New password is shorter than [`MIN_PASSWORD_LEN`].
    #[error("password must be at least {min} characters")]
    PasswordTooShort {
        /// Minimum accepted length in characters.
        min: usize,
    },
    /// Confirmation did not match the new password.
    #[error("passwords do not match")]
    PasswordMismatch,
}

impl AuthValidationError {
    /// Wire name of the field the failure refers to.
    pub fn field(&self) -> &'static str {
        match self {
            Self::EmptyEmail => "email",
            Self::EmptyPassword | Self::PasswordTooShort { .. } => "password",
            Self::EmptyCurrentPassword => "currentPassword",
            Self::PasswordMismatch => "confirmPassword",
        }
    }

    /// Stable machine-readable code for error details.
    pub fn code(&self) -> &'static str {
        match self {
            Self::EmptyEmail | Self::EmptyPassword | Self::EmptyCurrentPassword => "empty",
            Self::PasswordTooShort { .. } => "too_short",
            Self::PasswordMismatch => "mismatch",
        }
    }
}

/// Validated login credentials.
///
/// The email is trimmed and lower-cased for lookups; the password keeps any
/// whitespace the caller supplied.
///
/// # Examples
/// ```
/// use tailor_backend::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts(" John@Example.com ", "password123").unwrap();
/// assert_eq!(creds.email(), "john@example.com");
/// assert_eq!(creds.password(), "password123");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    email: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw email/password inputs.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, AuthValidationError> {
        let normalized = email.trim().to_lowercase();
        if normalized.is_empty() {
            return Err(AuthValidationError::EmptyEmail);
        }
        if password.is_empty() {
            return Err(AuthValidationError::EmptyPassword);
        }
        Ok(Self {
            email: normalized,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Normalised email suitable for account lookups.
    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    /// Password as provided by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// A password chosen for new credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPassword(Zeroizing<String>);

impl NewPassword {
    /// Check length and, when supplied, the confirmation.
    pub fn try_new(password: &str, confirmation: Option<&str>) -> Result<Self, AuthValidationError> {
        if password.is_empty() {
            return Err(AuthValidationError::EmptyPassword);
        }
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AuthValidationError::PasswordTooShort {
                min: MIN_PASSWORD_LEN,
            });
        }
        if confirmation.is_some_and(|confirm| confirm != password) {
            return Err(AuthValidationError::PasswordMismatch);
        }
        Ok(Self(Zeroizing::new(password.to_owned())))
    }

    /// Borrow the plaintext for hashing.
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

/// Validated password change request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordChange {
    current: Zeroizing<String>,
    replacement: NewPassword,
}

impl PasswordChange {
    /// Validate a change request. The confirmation is mandatory here.
    pub fn try_from_parts(
        current: &str,
        new_password: &str,
        confirmation: &str,
    ) -> Result<Self, AuthValidationError> {
        if current.is_empty() {
            return Err(AuthValidationError::EmptyCurrentPassword);
        }
        Ok(Self {
            current: Zeroizing::new(current.to_owned()),
            replacement: NewPassword::try_new(new_password, Some(confirmation))?,
        })
    }

    /// The password the caller claims to hold today.
    pub fn current(&self) -> &str {
        self.current.as_str()
    }

    /// The password to store.
    pub fn replacement(&self) -> &NewPassword {
        &self.replacement
    }
}

/// Signed bearer token handed to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct AccessToken(String);

impl AccessToken {
    /// Wrap an encoded token.
    pub fn new(encoded: impl Into<String>) -> Self {
        Self(encoded.into())
    }

    /// Encoded token text.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Result of a successful login.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct LoginOutcome {
    pub user: Account,
    pub token: AccessToken,
}
