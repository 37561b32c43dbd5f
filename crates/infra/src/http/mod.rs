//! HTTP transport shared by the API dispatcher and file transfers.

pub mod client;

pub use client::{HttpClient, HttpClientBuilder};
