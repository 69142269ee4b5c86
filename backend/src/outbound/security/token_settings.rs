//! Token signing configuration parsing and validation.
//!
//! The signing secret is read from a file named by `TOKEN_SECRET_FILE`.
//! Debug builds fall back to a built-in development secret when the file is
//! missing; release builds refuse it unless the file is present and long
//! enough.

use std::path::PathBuf;

use chrono::Duration;
use mockable::Env;
use sha2::{Digest, Sha256};
use tracing::{info, warn};
use zeroize::Zeroizing;

use super::JwtTokenCodec;

const SECRET_DEFAULT_PATH: &str = "/var/run/secrets/token_secret";
const SECRET_MIN_LEN: usize = 32;
const SECRET_FILE_ENV: &str = "TOKEN_SECRET_FILE";
const TTL_ENV: &str = "TOKEN_TTL_SECS";
const ALLOW_DEV_SECRET_ENV: &str = "TOKEN_ALLOW_DEV_SECRET";
const DEFAULT_TTL_SECS: i64 = 3600;
const BOOL_EXPECTED: &str = "1|0|true|false|yes|no|y|n";
const TTL_EXPECTED: &str = "a positive number of seconds";
const FINGERPRINT_BYTES: usize = 8;

/// Development-only signing secret.
const DEV_SECRET: &[u8] = b"tailor-development-token-secret-do-not-deploy";

/// Build mode for token configuration validation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildMode {
    /// Tolerates missing settings with warnings.
    Debug,
    /// Requires an explicit secret file.
    Release,
}

impl BuildMode {
    /// Determine the build mode from `cfg!(debug_assertions)`.
    #[must_use]
    pub fn from_debug_assertions() -> Self {
        if cfg!(debug_assertions) {
            Self::Debug
        } else {
            Self::Release
        }
    }

    fn is_debug(self) -> bool {
        matches!(self, Self::Debug)
    }
}

/// Validated token settings. The secret is wiped on drop.
pub struct TokenSettings {
    secret: Zeroizing<Vec<u8>>,
    ttl: Duration,
}

impl TokenSettings {
    /// Token lifetime.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Truncated SHA-256 of the secret, safe to log.
    #[must_use]
    pub fn fingerprint(&self) -> String {
        let digest = Sha256::digest(self.secret.as_slice());
        hex::encode(&digest[..FINGERPRINT_BYTES])
    }

    /// Build the codec these settings describe.
    pub fn codec(&self) -> JwtTokenCodec {
        JwtTokenCodec::new(&self.secret, self.ttl)
    }
}

impl std::fmt::Debug for TokenSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenSettings")
            .field("fingerprint", &self.fingerprint())
            .field("ttl", &self.ttl)
            .finish()
    }
}

/// Errors raised while validating token configuration.
#[derive(thiserror::Error, Debug)]
pub enum TokenConfigError {
    /// A variable is present but contains an invalid value.
    #[error("invalid value for {name}='{value}'; expected {expected}")]
    InvalidEnv {
        name: &'static str,
        value: String,
        expected: &'static str,
    },
    /// Reading the secret file failed.
    #[error("failed to read token secret at {path}: {source}")]
    SecretRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The secret file is too short for release builds.
    #[error("token secret at {path} too short: need >= {min_len} bytes, got {length}")]
    SecretTooShort {
        path: PathBuf,
        length: usize,
        min_len: usize,
    },
    /// Release builds must not use the development secret.
    #[error("TOKEN_ALLOW_DEV_SECRET must be 0 in release builds")]
    DevSecretNotAllowed,
}

/// Build token settings from environment variables and build mode.
///
/// # Examples
///
/// ```rust
/// use mockable::MockEnv;
/// use tailor_backend::outbound::security::{BuildMode, token_settings_from_env};
///
/// let mut env = MockEnv::new();
/// env.expect_string().returning(|name| match name {
///     "TOKEN_TTL_SECS" => Some("600".to_string()),
///     _ => None,
/// });
///
/// let settings = token_settings_from_env(&env, BuildMode::Debug).expect("debug defaults");
/// assert_eq!(settings.ttl().num_seconds(), 600);
/// ```
pub fn token_settings_from_env<E: Env>(
    env: &E,
    mode: BuildMode,
) -> Result<TokenSettings, TokenConfigError> {
    let ttl = ttl_from_env(env, mode)?;
    let allow_dev = allow_dev_secret_from_env(env, mode)?;
    let secret = secret_from_env(env, mode, allow_dev)?;
    let settings = TokenSettings { secret, ttl };
    info!(
        fingerprint = %settings.fingerprint(),
        ttl_secs = ttl.num_seconds(),
        "token signing configured"
    );
    Ok(settings)
}

fn ttl_from_env<E: Env>(env: &E, mode: BuildMode) -> Result<Duration, TokenConfigError> {
    let Some(value) = env.string(TTL_ENV) else {
        return Ok(Duration::seconds(DEFAULT_TTL_SECS));
    };
    match value.trim().parse::<i64>() {
        Ok(secs) if secs > 0 => Ok(Duration::seconds(secs)),
        _ if mode.is_debug() => {
            warn!(value = %value, "invalid TOKEN_TTL_SECS; using default");
            Ok(Duration::seconds(DEFAULT_TTL_SECS))
        }
        _ => Err(TokenConfigError::InvalidEnv {
            name: TTL_ENV,
            value,
            expected: TTL_EXPECTED,
        }),
    }
}

fn allow_dev_secret_from_env<E: Env>(env: &E, mode: BuildMode) -> Result<bool, TokenConfigError> {
    let Some(value) = env.string(ALLOW_DEV_SECRET_ENV) else {
        return Ok(false);
    };
    match parse_bool(&value) {
        Some(true) if mode.is_debug() => Ok(true),
        Some(true) => Err(TokenConfigError::DevSecretNotAllowed),
        Some(false) => Ok(false),
        None if mode.is_debug() => {
            warn!(value = %value, "invalid TOKEN_ALLOW_DEV_SECRET; defaulting to disabled");
            Ok(false)
        }
        None => Err(TokenConfigError::InvalidEnv {
            name: ALLOW_DEV_SECRET_ENV,
            value,
            expected: BOOL_EXPECTED,
        }),
    }
}

fn secret_from_env<E: Env>(
    env: &E,
    mode: BuildMode,
    allow_dev: bool,
) -> Result<Zeroizing<Vec<u8>>, TokenConfigError> {
    let path = PathBuf::from(
        env.string(SECRET_FILE_ENV)
            .unwrap_or_else(|| SECRET_DEFAULT_PATH.to_owned()),
    );
    match std::fs::read(&path) {
        Ok(bytes) => {
            let bytes = Zeroizing::new(bytes);
            let length = bytes.len();
            if mode == BuildMode::Release && length < SECRET_MIN_LEN {
                return Err(TokenConfigError::SecretTooShort {
                    path,
                    length,
                    min_len: SECRET_MIN_LEN,
                });
            }
            Ok(bytes)
        }
        Err(error) if mode.is_debug() || allow_dev => {
            warn!(
                path = %path.display(),
                error = %error,
                "using development token secret (dev only)"
            );
            Ok(Zeroizing::new(DEV_SECRET.to_vec()))
        }
        Err(source) => Err(TokenConfigError::SecretRead { path, source }),
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "y" => Some(true),
        "0" | "false" | "no" | "n" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests;
