//! Prefixed string identifiers for stored records.
//!
//! Identifiers look like `prod-001` or `order-<uuid>`: the prefix names the
//! record kind and the rest is opaque. Seeded records use short suffixes;
//! records created at runtime use a UUID v4.

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Validation failures for identifier strings.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdValidationError {
    /// The identifier was empty.
    #[error("identifier must not be empty")]
    Empty,
    /// The identifier contained whitespace.
    #[error("identifier must not contain whitespace")]
    ContainsWhitespace,
}

fn validate(raw: String) -> Result<String, IdValidationError> {
    if raw.is_empty() {
        return Err(IdValidationError::Empty);
    }
    if raw.chars().any(char::is_whitespace) {
        return Err(IdValidationError::ContainsWhitespace);
    }
    Ok(raw)
}

fn prefixed(prefix: &str) -> String {
    format!("{prefix}-{}", Uuid::new_v4())
}

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema,
        )]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Validate and wrap an identifier string.
            pub fn new(id: impl Into<String>) -> Result<Self, IdValidationError> {
                validate(id.into()).map(Self)
            }

            /// Borrow the raw identifier.
            pub fn as_str(&self) -> &str {
                self.0.as_str()
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                self.as_str()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = IdValidationError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }
    };
    ($(#[$meta:meta])* $name:ident, prefix = $prefix:literal) => {
        define_id!($(#[$meta])* $name);

        impl $name {
            /// Prefix shared by every identifier of this kind.
            pub const PREFIX: &'static str = $prefix;

            /// Mint a fresh identifier.
            pub fn generate() -> Self {
                Self(prefixed(Self::PREFIX))
            }
        }
    };
}

define_id!(
    /// Identifier of any person record: super admins, org admins, org users
    /// and individuals share one id space.
    UserId
);
define_id!(
    /// Organisation identifier.
    OrganizationId,
    prefix = "org"
);
define_id!(
    /// Catalogue product identifier.
    ProductId,
    prefix = "prod"
);
define_id!(
    /// Order identifier.
    OrderId,
    prefix = "order"
);
define_id!(
    /// Measurement record identifier.
    MeasurementId,
    prefix = "meas"
);

impl UserId {
    /// Mint a fresh identifier using the prefix for `role`.
    pub fn generate_for(role: super::Role) -> Self {
        Self(prefixed(role.id_prefix()))
    }
}
