//! Configuration loader
//!
//! Loads the MI environment record from environment variables or files.
//!
//! ## Loading Strategy
//! 1. Reads a `.env` file from the working directory, if present
//! 2. Attempts to load from environment variables
//! 3. If incomplete, falls back to loading from file
//! 4. Probes multiple paths for config files
//! 5. Supports JSON and TOML formats
//!
//! ## Environment Variables
//! - `API_URL`: API host, optionally with a scheme
//! - `USER_POOL_ID`: Identity-provider user pool
//! - `CLIENT_ID`: Identity-provider application client
//! - `IDENTITY_POOL_ID`: Federated identity pool (optional; enables signing)
//! - `REGION`: Signing region (optional, defaults to `eu-west-2`)
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./scribe-mi.json` or `./scribe-mi.toml` (current working directory)
//! 2. `./config.json` or `./config.toml` (current working directory)
//! 3. The same names relative to the executable location

use std::path::{Path, PathBuf};

use scribe_mi_domain::{Environment, MiError, Result};

const CONFIG_FILE_NAMES: [&str; 4] =
    ["scribe-mi.json", "scribe-mi.toml", "config.json", "config.toml"];

/// Load configuration with automatic fallback strategy
///
/// Reads `.env` into the process environment, then attempts environment
/// variables. If any required variable is missing, falls back to a config
/// file.
///
/// # Errors
/// Returns `MiError::Config` if:
/// - Configuration cannot be loaded from either source
/// - File format is invalid
/// - Required fields are missing or empty
pub fn load() -> Result<Environment> {
    match dotenvy::dotenv() {
        Ok(path) => tracing::debug!(path = %path.display(), "Loaded .env file"),
        Err(e) if e.not_found() => {}
        Err(e) => tracing::warn!(error = %e, "Ignoring unreadable .env file"),
    }

    match load_from_env() {
        Ok(environment) => {
            tracing::info!("Configuration loaded from environment variables");
            Ok(environment)
        }
        Err(e) => {
            tracing::debug!(error = ?e, "Failed to load from environment, trying file");
            load_from_file(None)
        }
    }
}

/// Load configuration from environment variables
///
/// # Errors
/// Returns `MiError::Config` if a required variable is missing or empty.
pub fn load_from_env() -> Result<Environment> {
    load_from_lookup(|key| std::env::var(key).ok())
}

/// Load configuration through an arbitrary variable lookup
///
/// Empty optional values count as unset.
///
/// # Errors
/// Returns `MiError::Config` if a required variable is missing or empty.
pub fn load_from_lookup<F>(lookup: F) -> Result<Environment>
where
    F: Fn(&str) -> Option<String>,
{
    let required = |key: &str| {
        lookup(key).filter(|v| !v.trim().is_empty()).ok_or_else(|| {
            MiError::Config(format!("Missing required environment variable: {key}"))
        })
    };
    let optional = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    let environment = Environment {
        api_url: required("API_URL")?,
        user_pool_id: required("USER_POOL_ID")?,
        client_id: required("CLIENT_ID")?,
        identity_pool_id: optional("IDENTITY_POOL_ID"),
        region: optional("REGION"),
    };
    environment.validate()?;
    Ok(environment)
}

/// Load configuration from a file
///
/// If `path` is `None`, probes the standard locations.
/// Supports both JSON and TOML formats (detected by file extension).
///
/// # Errors
/// Returns `MiError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
/// - Required fields are missing or empty
pub fn load_from_file(path: Option<PathBuf>) -> Result<Environment> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(MiError::Config(format!("Config file not found: {}", p.display())));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            MiError::Config("No config file found in any of the standard locations".to_string())
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| MiError::Config(format!("Failed to read config file: {e}")))?;

    let environment = parse_config(&contents, &config_path)?;
    environment.validate()?;
    Ok(environment)
}

/// Parse configuration from string content
///
/// Format is detected by file extension (`.json` or `.toml`).
fn parse_config(contents: &str, path: &Path) -> Result<Environment> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| MiError::Config(format!("Invalid TOML format: {e}"))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| MiError::Config(format!("Invalid JSON format: {e}"))),
        _ => Err(MiError::Config(format!("Unsupported config format: {extension}"))),
    }
}

/// Probe the standard locations for a configuration file
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut dirs = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        dirs.push(cwd);
    }
    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            dirs.push(exe_dir.to_path_buf());
        }
    }

    dirs.iter().find_map(|dir| probe_dir(dir))
}

fn probe_dir(dir: &Path) -> Option<PathBuf> {
    CONFIG_FILE_NAMES.iter().map(|name| dir.join(name)).find(|path| path.exists())
}
