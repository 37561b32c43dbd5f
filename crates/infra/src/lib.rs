//! # Scribe MI Infrastructure
//!
//! Infrastructure implementations for the Scribe MI client.
//!
//! This crate contains:
//! - The reqwest-based HTTP client
//! - The API client: request dispatch, task endpoints, file transfers
//! - Environment loading from variables and config files
//!
//! ## Architecture
//! - Drives the session state machine defined in `scribe-mi-core`
//! - Contains all "impure" code (network and filesystem I/O)

pub mod api;
pub mod config;
pub mod errors;
pub mod http;

// Re-export commonly used items
pub use api::{MiClient, MiClientBuilder, RequestOptions};
pub use errors::InfraError;
pub use http::{HttpClient, HttpClientBuilder};
