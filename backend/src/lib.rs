//! Order-management backend for a tailoring business.
//!
//! The crate follows a hexagonal layout: [`domain`] holds records, ports and
//! services; [`inbound`] adapts HTTP requests onto driving ports;
//! [`outbound`] implements the driven ports over an in-memory store with
//! Argon2 password hashes and HS256 tokens.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod wiring;

pub use doc::ApiDoc;
pub use middleware::Trace;
