//! In-memory persistence adapter.
//!
//! All repository ports are served by a single [`MemoryStore`] built from a
//! seed document at start-up. Nothing survives a restart.

mod dataset;
mod seed;
mod store;

pub use dataset::Dataset;
pub use seed::{DEFAULT_SEED, SeedData, SeedError};
pub use store::MemoryStore;
