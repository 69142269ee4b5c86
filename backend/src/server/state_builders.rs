//! Builders turning settings into the seeded store and handler state.

use std::sync::Arc;

use actix_web::web;
use mockable::{DefaultClock, DefaultEnv};
use tracing::info;

use tailor_backend::inbound::http::state::HttpState;
use tailor_backend::outbound::memory::{DEFAULT_SEED, MemoryStore, SeedData};
use tailor_backend::outbound::security::{
    Argon2PasswordHasher, BuildMode, token_settings_from_env,
};
use tailor_backend::wiring;

use super::ServerSettings;

fn load_seed(settings: &ServerSettings) -> std::io::Result<SeedData> {
    let seed = match &settings.seed_path {
        Some(path) => {
            info!(path = %path.display(), "loading seed override");
            SeedData::from_file(path)
        }
        None => SeedData::from_json(DEFAULT_SEED),
    };
    seed.map_err(std::io::Error::other)
}

/// Seed the store and wire the services.
///
/// # Errors
/// Returns [`std::io::Error`] when the seed cannot be read or hashed, or the
/// token configuration is invalid for the build mode.
pub fn build_http_state(settings: &ServerSettings) -> std::io::Result<web::Data<HttpState>> {
    let tokens = token_settings_from_env(&DefaultEnv::new(), BuildMode::from_debug_assertions())
        .map_err(std::io::Error::other)?;
    let hasher = Arc::new(Argon2PasswordHasher::new());
    let dataset = load_seed(settings)?
        .into_dataset(hasher.as_ref())
        .map_err(std::io::Error::other)?;
    info!(
        accounts = dataset.accounts.len(),
        products = dataset.products.len(),
        "store seeded"
    );
    let state = wiring::build_http_state(
        Arc::new(MemoryStore::new(dataset)),
        hasher,
        Arc::new(tokens.codec()),
        Arc::new(DefaultClock),
    );
    Ok(web::Data::new(state))
}
