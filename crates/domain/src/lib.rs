//! # Scribe MI Domain
//!
//! Business domain types and models for the Scribe MI client.
//!
//! This crate contains:
//! - Task, file type and extracted-model types returned by the MI API
//! - Session credential types (tokens, federated credentials)
//! - The client error taxonomy and Result definition
//! - The environment record supplying API host and identity identifiers
//!
//! ## Architecture
//! - No dependencies on other Scribe MI crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures

pub mod config;
pub mod constants;
pub mod errors;
pub mod types;
pub mod validation;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
pub use validation::{Validate, ValidationError};
