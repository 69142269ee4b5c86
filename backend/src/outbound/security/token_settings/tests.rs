//! Unit tests for token configuration parsing.

use super::*;
use mockable::MockEnv;
use rstest::rstest;
use std::collections::HashMap;
use uuid::Uuid;

#[derive(Debug)]
struct TempSecretFile {
    path: PathBuf,
}

impl TempSecretFile {
    fn new(len: usize) -> std::io::Result<Self> {
        let path = std::env::temp_dir().join(format!("token-secret-{}", Uuid::new_v4()));
        std::fs::write(&path, vec![b's'; len])?;
        Ok(Self { path })
    }

    fn path_str(&self) -> &str {
        self.path
            .to_str()
            .expect("temporary path should be valid UTF-8")
    }
}

impl Drop for TempSecretFile {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.path);
    }
}

fn mock_env(vars: HashMap<&'static str, String>) -> MockEnv {
    let mut env = MockEnv::new();
    env.expect_string()
        .times(0..)
        .returning(move |key| vars.get(key).cloned());
    env
}

fn missing_secret_path() -> String {
    std::env::temp_dir()
        .join(format!("absent-{}", Uuid::new_v4()))
        .to_string_lossy()
        .into_owned()
}

#[rstest]
fn release_reads_a_long_enough_secret_file() {
    let secret = TempSecretFile::new(SECRET_MIN_LEN).expect("secret file");
    let env = mock_env(HashMap::from([
        (SECRET_FILE_ENV, secret.path_str().to_owned()),
        (TTL_ENV, "120".to_owned()),
    ]));
    let settings = token_settings_from_env(&env, BuildMode::Release).expect("valid settings");
    assert_eq!(settings.ttl(), Duration::seconds(120));
    assert_eq!(settings.fingerprint().len(), FINGERPRINT_BYTES * 2);
    assert_ne!(
        settings.fingerprint(),
        TokenSettings {
            secret: Zeroizing::new(DEV_SECRET.to_vec()),
            ttl: Duration::seconds(1),
        }
        .fingerprint()
    );
}

#[rstest]
fn release_rejects_short_secrets() {
    let secret = TempSecretFile::new(SECRET_MIN_LEN - 1).expect("secret file");
    let env = mock_env(HashMap::from([(SECRET_FILE_ENV, secret.path_str().to_owned())]));
    let err = token_settings_from_env(&env, BuildMode::Release).expect_err("too short");
    assert!(matches!(err, TokenConfigError::SecretTooShort { length, .. } if length == SECRET_MIN_LEN - 1));
}

#[rstest]
fn release_refuses_the_development_secret() {
    let env = mock_env(HashMap::from([
        (SECRET_FILE_ENV, missing_secret_path()),
        (ALLOW_DEV_SECRET_ENV, "1".to_owned()),
    ]));
    let err = token_settings_from_env(&env, BuildMode::Release).expect_err("dev secret");
    assert!(matches!(err, TokenConfigError::DevSecretNotAllowed));
}

#[rstest]
fn release_fails_when_the_secret_is_missing() {
    let env = mock_env(HashMap::from([(SECRET_FILE_ENV, missing_secret_path())]));
    let err = token_settings_from_env(&env, BuildMode::Release).expect_err("missing secret");
    assert!(matches!(err, TokenConfigError::SecretRead { .. }));
}

#[rstest]
fn debug_falls_back_to_the_development_secret() {
    let env = mock_env(HashMap::from([(SECRET_FILE_ENV, missing_secret_path())]));
    let settings = token_settings_from_env(&env, BuildMode::Debug).expect("debug fallback");
    let dev = TokenSettings {
        secret: Zeroizing::new(DEV_SECRET.to_vec()),
        ttl: Duration::seconds(DEFAULT_TTL_SECS),
    };
    assert_eq!(settings.fingerprint(), dev.fingerprint());
    assert_eq!(settings.ttl(), Duration::seconds(DEFAULT_TTL_SECS));
}

#[rstest]
#[case("0")]
#[case("-5")]
#[case("soon")]
fn release_rejects_invalid_ttls(#[case] value: &str) {
    let secret = TempSecretFile::new(SECRET_MIN_LEN).expect("secret file");
    let env = mock_env(HashMap::from([
        (SECRET_FILE_ENV, secret.path_str().to_owned()),
        (TTL_ENV, value.to_owned()),
    ]));
    let err = token_settings_from_env(&env, BuildMode::Release).expect_err("invalid ttl");
    assert!(matches!(err, TokenConfigError::InvalidEnv { name: TTL_ENV, .. }));
}

#[rstest]
fn debug_tolerates_invalid_ttls() {
    let env = mock_env(HashMap::from([
        (SECRET_FILE_ENV, missing_secret_path()),
        (TTL_ENV, "soon".to_owned()),
    ]));
    let settings = token_settings_from_env(&env, BuildMode::Debug).expect("debug default");
    assert_eq!(settings.ttl(), Duration::seconds(DEFAULT_TTL_SECS));
}

#[rstest]
fn debug_output_never_contains_the_secret() {
    let settings = TokenSettings {
        secret: Zeroizing::new(DEV_SECRET.to_vec()),
        ttl: Duration::seconds(60),
    };
    let rendered = format!("{settings:?}");
    assert!(!rendered.contains("tailor-development"));
    assert!(rendered.contains(&settings.fingerprint()));
}
