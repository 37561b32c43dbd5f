//! Client constants
//!
//! Centralized location for wire-level constants shared between the session
//! layer and the transfer protocol.

// Request signing
pub const SIGNING_SERVICE: &str = "execute-api";
pub const DEFAULT_SIGNING_REGION: &str = "eu-west-2";

// HTTP
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const CONTENT_TYPE_JSON: &str = "application/json";

// Transfer integrity
pub const CHECKSUM_HEADER: &str = "Content-MD5";
pub const INTEGRITY_TAG_HEADER: &str = "ETag";

// Endpoint paths
pub const TASKS_PATH: &str = "/tasks";
pub const FUND_PORTFOLIO_PATH: &str = "/fund-portfolio";
pub const JOBID_SEPARATOR: &str = ";";
