//! Tracing subscriber setup
//!
//! Library crates only emit `tracing` events; binaries and test harnesses
//! call [`init_tracing`] once to route them somewhere.

use tracing_subscriber::fmt;
use tracing_subscriber::EnvFilter;

/// Default directive used when `RUST_LOG` is unset or invalid
pub const DEFAULT_FILTER: &str = "info";

/// Options for [`init_tracing`]
#[derive(Debug, Clone)]
pub struct TracingOptions {
    /// Filter directive used when `RUST_LOG` is not set
    pub default_filter: String,
    /// Emit newline-delimited JSON instead of human-readable lines
    pub json: bool,
    /// Include the event target (module path)
    pub with_target: bool,
}

impl Default for TracingOptions {
    fn default() -> Self {
        Self { default_filter: DEFAULT_FILTER.to_string(), json: false, with_target: true }
    }
}

impl TracingOptions {
    #[must_use]
    pub fn json(mut self) -> Self {
        self.json = true;
        self
    }

    #[must_use]
    pub fn with_default_filter(mut self, directive: impl Into<String>) -> Self {
        self.default_filter = directive.into();
        self
    }

    /// Build the filter: `RUST_LOG` if it parses, the default directive otherwise
    pub fn env_filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(self.default_filter.as_str()))
    }
}

/// Install a global fmt subscriber
///
/// Returns `false` if a global subscriber was already installed; the
/// existing one is left in place.
pub fn init_tracing(options: TracingOptions) -> bool {
    let builder = fmt().with_env_filter(options.env_filter()).with_target(options.with_target);

    let installed = if options.json {
        builder.json().try_init().is_ok()
    } else {
        builder.try_init().is_ok()
    };

    if installed {
        tracing::debug!(json = options.json, "tracing subscriber installed");
    }
    installed
}
