//! Outbound adapters implementing domain ports.
//!
//! - **memory**: the seeded in-process store backing every repository port
//! - **security**: Argon2 password hashing and HS256 token signing
//!
//! Adapters translate between domain types and their storage or wire
//! representation. They contain no business logic.

pub mod memory;
pub mod security;
