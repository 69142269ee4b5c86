//! Seed fixture parsing.
//!
//! The fixture is a versioned JSON document holding every record kind plus
//! plaintext development credentials, which are hashed while the dataset is
//! built. The default fixture is compiled into the binary; an override file
//! can be supplied at start-up.

use std::collections::{HashMap, HashSet};
use std::io;
use std::path::Path;

use cap_std::{ambient_authority, fs::Dir};
use serde::Deserialize;

use crate::domain::ports::PasswordHasher;
use crate::domain::{
    Account, Measurement, Order, OrgUser, Organization, Product, UserId, order_total,
};

use super::Dataset;

/// Seed document compiled into the binary.
pub const DEFAULT_SEED: &str = include_str!("../../../fixtures/seed.json");

const SUPPORTED_VERSION: u32 = 1;

/// Errors raised while loading seed data.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SeedError {
    /// The override file could not be read.
    #[error("failed to read seed file {path}: {message}")]
    Io {
        /// Path that was requested.
        path: String,
        /// Underlying I/O failure.
        message: String,
    },
    /// The document was not valid seed JSON.
    #[error("failed to parse seed data: {message}")]
    Parse {
        /// Parser diagnostic.
        message: String,
    },
    /// The document declares a version this build cannot read.
    #[error("unsupported seed version {found}")]
    UnsupportedVersion {
        /// Version declared by the document.
        found: u32,
    },
    /// Two accounts share an email address.
    #[error("duplicate account email in seed data: {email}")]
    DuplicateEmail {
        /// The repeated address.
        email: String,
    },
    /// A credential names no account, or an account has no credential.
    #[error("credentials and accounts disagree for {user_id}")]
    CredentialMismatch {
        /// The account id without a partner.
        user_id: String,
    },
    /// An order's stored total disagrees with its lines.
    #[error("order {order_id} total is {stored} but its lines sum to {computed}")]
    TotalMismatch {
        /// Offending order.
        order_id: String,
        /// Total recorded in the document.
        stored: u64,
        /// Total computed from the lines.
        computed: u64,
    },
    /// An order's lines are invalid.
    #[error("order {order_id} is invalid: {message}")]
    InvalidOrder {
        /// Offending order.
        order_id: String,
        /// Validation failure.
        message: String,
    },
    /// A development password could not be hashed.
    #[error("failed to hash seed password: {message}")]
    Hash {
        /// Hasher diagnostic.
        message: String,
    },
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawCredential {
    user_id: UserId,
    password: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct RawSeed {
    version: u32,
    #[serde(default)]
    accounts: Vec<Account>,
    #[serde(default)]
    credentials: Vec<RawCredential>,
    #[serde(default)]
    organizations: Vec<Organization>,
    #[serde(default)]
    org_users: Vec<OrgUser>,
    #[serde(default)]
    products: Vec<Product>,
    #[serde(default)]
    orders: Vec<Order>,
    #[serde(default)]
    measurements: Vec<Measurement>,
}

/// Parsed and cross-checked seed data, with plaintext credentials.
///
/// # Examples
/// ```
/// use tailor_backend::outbound::memory::{DEFAULT_SEED, SeedData};
///
/// let seed = SeedData::from_json(DEFAULT_SEED).expect("bundled seed parses");
/// assert_eq!(seed.product_count(), 5);
/// ```
#[derive(Debug)]
pub struct SeedData {
    raw: RawSeed,
}

impl SeedData {
    /// Parse and validate a seed document.
    pub fn from_json(json: &str) -> Result<Self, SeedError> {
        let raw: RawSeed = serde_json::from_str(json).map_err(|e| SeedError::Parse {
            message: e.to_string(),
        })?;
        if raw.version != SUPPORTED_VERSION {
            return Err(SeedError::UnsupportedVersion { found: raw.version });
        }
        validate(&raw)?;
        Ok(Self { raw })
    }

    /// Read and parse a seed document through `cap_std`.
    pub fn from_file(path: &Path) -> Result<Self, SeedError> {
        let contents = read_file_to_string(path).map_err(|e| SeedError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_json(&contents)
    }

    /// Number of products in the document.
    pub fn product_count(&self) -> usize {
        self.raw.products.len()
    }

    /// Hash the credentials and assemble a [`Dataset`].
    pub fn into_dataset<H>(self, hasher: &H) -> Result<Dataset, SeedError>
    where
        H: PasswordHasher + ?Sized,
    {
        let RawSeed {
            accounts,
            credentials,
            organizations,
            org_users,
            products,
            orders,
            measurements,
            ..
        } = self.raw;
        let mut hashed = HashMap::with_capacity(credentials.len());
        for RawCredential { user_id, password } in credentials {
            let hash = hasher.hash(&password).map_err(|e| SeedError::Hash {
                message: e.to_string(),
            })?;
            hashed.insert(user_id, hash);
        }
        Ok(Dataset {
            accounts,
            credentials: hashed,
            organizations,
            org_users,
            products,
            orders,
            measurements,
        })
    }
}

fn validate(raw: &RawSeed) -> Result<(), SeedError> {
    let mut emails = HashSet::new();
    for account in &raw.accounts {
        if !emails.insert(account.email.as_str()) {
            return Err(SeedError::DuplicateEmail {
                email: account.email.to_string(),
            });
        }
    }

    let account_ids: HashSet<&UserId> = raw.accounts.iter().map(|a| &a.id).collect();
    let credential_ids: HashSet<&UserId> = raw.credentials.iter().map(|c| &c.user_id).collect();
    if let Some(orphan) = account_ids.symmetric_difference(&credential_ids).next() {
        return Err(SeedError::CredentialMismatch {
            user_id: orphan.to_string(),
        });
    }

    for order in &raw.orders {
        let computed = order_total(&order.products).map_err(|e| SeedError::InvalidOrder {
            order_id: order.id.to_string(),
            message: e.to_string(),
        })?;
        if computed != order.total_amount {
            return Err(SeedError::TotalMismatch {
                order_id: order.id.to_string(),
                stored: order.total_amount,
                computed,
            });
        }
    }
    Ok(())
}

fn read_file_to_string(path: &Path) -> io::Result<String> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let file_name = path.file_name().ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("seed path has no file name: {}", path.display()),
        )
    })?;
    let directory = Dir::open_ambient_dir(parent, ambient_authority())?;
    directory.read_to_string(Path::new(file_name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{PasswordHash, PasswordHasherError};
    use rstest::rstest;

    struct PlainHasher;

    impl PasswordHasher for PlainHasher {
        fn hash(&self, password: &str) -> Result<PasswordHash, PasswordHasherError> {
            Ok(PasswordHash::new(format!("plain:{password}")))
        }

        fn verify(&self, password: &str, hash: &PasswordHash) -> Result<bool, PasswordHasherError> {
            Ok(hash.as_str() == format!("plain:{password}"))
        }
    }

    #[rstest]
    fn bundled_seed_builds_a_dataset() {
        let dataset = SeedData::from_json(DEFAULT_SEED)
            .expect("seed parses")
            .into_dataset(&PlainHasher)
            .expect("dataset");
        assert_eq!(dataset.accounts.len(), 4);
        assert_eq!(dataset.org_users.len(), 2);
        assert_eq!(dataset.orders.len(), 2);
        assert_eq!(dataset.measurements.len(), 2);
        let admin = UserId::new("sa-001").expect("id");
        assert_eq!(
            dataset.credentials.get(&admin).map(PasswordHash::as_str),
            Some("plain:mk@admin")
        );
    }

    #[rstest]
    #[case(r#"{"version": 2}"#, "unsupported seed version")]
    #[case(r#"{"version": 1, "widgets": []}"#, "failed to parse")]
    #[case(
        r#"{"version": 1, "credentials": [{"userId": "ind-009", "password": "x"}]}"#,
        "credentials and accounts disagree"
    )]
    fn rejects_inconsistent_documents(#[case] json: &str, #[case] expected: &str) {
        let err = SeedData::from_json(json).expect_err("invalid seed");
        assert!(err.to_string().contains(expected), "unexpected error: {err}");
    }

    #[rstest]
    fn rejects_orders_whose_total_disagrees() {
        let json = r#"{
            "version": 1,
            "orders": [{
                "id": "order-009", "userId": "ind-001", "userType": "individual",
                "status": "pending",
                "products": [{"productId": "prod-005", "productName": "Tee", "quantity": 3, "price": 600}],
                "totalAmount": 1700,
                "createdAt": "2024-01-01T00:00:00Z", "updatedAt": "2024-01-01T00:00:00Z"
            }]
        }"#;
        let err = SeedData::from_json(json).expect_err("mismatch");
        assert_eq!(
            err,
            SeedError::TotalMismatch {
                order_id: "order-009".into(),
                stored: 1700,
                computed: 1800,
            }
        );
    }

    #[rstest]
    fn missing_override_file_is_an_io_error() {
        let path = std::env::temp_dir().join("tailor-seed-does-not-exist.json");
        let err = SeedData::from_file(&path).expect_err("missing file");
        assert!(matches!(err, SeedError::Io { .. }));
    }
}
