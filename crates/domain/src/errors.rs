//! Error types used throughout the client

use thiserror::Error;

use crate::validation::ValidationError;

/// Main error type for Scribe MI operations
///
/// Every variant is terminal for the call that raised it. The only automatic
/// recovery anywhere in the client is the single reauthentication performed
/// by the request dispatcher when the session credential has expired.
#[derive(Error, Debug)]
pub enum MiError {
    /// No session has been established (or reauthentication was requested
    /// before any authentication).
    #[error("Not authenticated")]
    NotAuthenticated,

    /// The identity provider answered with an interactive challenge.
    #[error("Unsupported authentication challenge: {0}")]
    UnsupportedChallenge(String),

    /// A 200 response whose body did not match the expected shape.
    #[error("Response does not match expected schema: {0}")]
    SchemaValidation(String),

    /// A non-200 response carrying an `{errorType, errorMessage}` body.
    #[error("{status} {message}")]
    Api { status: u16, error_type: String, message: String },

    /// A non-200 response whose body could not be interpreted.
    #[error("Unknown error ({status})")]
    Unknown { status: u16 },

    #[error("Failed to upload file: {status} {reason}")]
    UploadFailed { status: u16, reason: String },

    #[error("Failed to download model: {status} {reason}")]
    DownloadFailed { status: u16, reason: String },

    #[error("Cannot load model for task {jobid}: model is not ready to export")]
    ModelNotReady { jobid: String },

    /// Downloaded content does not hash to the server-declared tag.
    #[error(
        "Model integrity check failed: expected {}, computed {actual}",
        .expected.as_deref().unwrap_or("<no tag>")
    )]
    Integrity { expected: Option<String>, actual: String },

    #[error("Model does not match expected format")]
    ModelShapeMismatch,

    #[error("Identity provider error: {0}")]
    Identity(String),

    #[error("Request signing error: {0}")]
    Signing(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl MiError {
    /// HTTP status carried by the error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. }
            | Self::Unknown { status }
            | Self::UploadFailed { status, .. }
            | Self::DownloadFailed { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the caller has to (re)establish a session before retrying.
    pub fn requires_authentication(&self) -> bool {
        matches!(self, Self::NotAuthenticated | Self::UnsupportedChallenge(_) | Self::Identity(_))
    }
}

impl From<ValidationError> for MiError {
    fn from(err: ValidationError) -> Self {
        Self::SchemaValidation(err.to_string())
    }
}

/// Result type alias for Scribe MI operations
pub type Result<T> = std::result::Result<T, MiError>;
