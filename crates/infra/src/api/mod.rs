//! MI API client
//!
//! Request dispatch, endpoint operations and integrity-checked file
//! transfers for one MI environment.
//!
//! # Architecture
//!
//! - Uses the shared [`HttpClient`](crate::http::HttpClient) (no direct reqwest clients)
//! - Session lifecycle is delegated to `scribe_mi_core::SessionManager`
//! - Only status 200 counts as API success; no retries

pub mod client;
pub mod errors;
pub mod transfer;

pub use client::{MiClient, MiClientBuilder, RequestOptions};
pub use errors::{normalize_failure, ErrorBody};
