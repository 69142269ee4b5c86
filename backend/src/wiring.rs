//! Assembly of domain services over the in-memory store.
//!
//! Shared by the server binary and the end-to-end tests so both exercise the
//! same object graph.

use std::sync::Arc;

use mockable::Clock;

use crate::domain::ports::{PasswordHasher, TokenCodec};
use crate::domain::{
    AccountAuthService, CatalogueService, DirectoryService, MeasuringService, OrderingService,
};
use crate::inbound::http::state::HttpState;
use crate::outbound::memory::MemoryStore;

/// Wire every driving port onto one [`MemoryStore`].
///
/// # Examples
///
/// ```rust
/// use std::sync::Arc;
///
/// use chrono::Duration;
/// use mockable::DefaultClock;
/// use tailor_backend::outbound::memory::{DEFAULT_SEED, MemoryStore, SeedData};
/// use tailor_backend::outbound::security::{Argon2PasswordHasher, JwtTokenCodec};
/// use tailor_backend::wiring::build_http_state;
///
/// let hasher = Arc::new(Argon2PasswordHasher::new());
/// let dataset = SeedData::from_json(DEFAULT_SEED)
///     .and_then(|seed| seed.into_dataset(hasher.as_ref()))
///     .expect("bundled seed loads");
/// let state = build_http_state(
///     Arc::new(MemoryStore::new(dataset)),
///     hasher,
///     Arc::new(JwtTokenCodec::new(b"example-secret", Duration::hours(1))),
///     Arc::new(DefaultClock),
/// );
/// assert_eq!(state.products.categories().len(), 4);
/// ```
pub fn build_http_state<H, T>(
    store: Arc<MemoryStore>,
    hasher: Arc<H>,
    tokens: Arc<T>,
    clock: Arc<dyn Clock>,
) -> HttpState
where
    H: PasswordHasher + 'static,
    T: TokenCodec + 'static,
{
    let auth = AccountAuthService::new(store.clone(), hasher.clone(), tokens, clock.clone());
    let directory = Arc::new(DirectoryService::new(
        store.clone(),
        store.clone(),
        store.clone(),
        hasher,
        clock.clone(),
    ));
    HttpState {
        auth: Arc::new(auth),
        users: directory.clone(),
        accounts: directory.clone(),
        organizations: directory,
        products: Arc::new(CatalogueService::new(store.clone(), clock.clone())),
        orders: Arc::new(OrderingService::new(
            store.clone(),
            store.clone(),
            store.clone(),
            clock.clone(),
        )),
        measurements: Arc::new(MeasuringService::new(store.clone(), store, clock)),
    }
}
