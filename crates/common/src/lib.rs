//! Domain-agnostic utilities shared across Scribe MI crates.
//!
//! # Feature Tiers
//!
//! Enable cargo features to opt into the tiers you need:
//! - `foundation`: the transfer checksum codec
//! - `observability`: tracing subscriber setup (not included by default)

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::complexity, clippy::suspicious)]

// Foundation tier
// -----------------------------------------------------------------
#[cfg(feature = "foundation")]
pub mod crypto;

// Observability tier
// --------------------------------------------------------------
#[cfg(feature = "observability")]
pub mod observability;

// Re-export commonly used types for convenience
// ------------------------
#[cfg(feature = "foundation")]
pub use crypto::{Checksum, ChecksumError};
#[cfg(feature = "observability")]
pub use observability::{init_tracing, TracingOptions};
