//! Configuration loading
//!
//! This module loads the MI environment record from environment variables,
//! `.env` files and config files.

pub mod loader;

// Re-export commonly used items
pub use loader::{load, load_from_env, load_from_file, load_from_lookup, probe_config_paths};
