//! Credential adapters: password hashing, bearer token signing and the
//! environment-driven token configuration.

mod argon2_hasher;
mod jwt_codec;
mod token_settings;

pub use argon2_hasher::Argon2PasswordHasher;
pub use jwt_codec::JwtTokenCodec;
pub use token_settings::{BuildMode, TokenConfigError, TokenSettings, token_settings_from_env};
