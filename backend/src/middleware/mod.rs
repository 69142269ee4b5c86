//! Request middleware.
//!
//! [`Trace`] assigns each request a trace identifier and echoes it back as a
//! response header.

pub mod trace;

pub use trace::Trace;
