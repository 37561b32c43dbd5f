//! Conversions from external infrastructure errors into domain errors.

use reqwest::Error as HttpError;
use scribe_mi_domain::MiError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub MiError);

impl From<InfraError> for MiError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<MiError> for InfraError {
    fn from(value: MiError) -> Self {
        InfraError(value)
    }
}

/// Extension trait to make the conversion logic explicit in tests and within
/// this module.
trait IntoMiError {
    fn into_mi(self) -> MiError;
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → MiError */
/* -------------------------------------------------------------------------- */

impl IntoMiError for HttpError {
    fn into_mi(self) -> MiError {
        if self.is_timeout() {
            return MiError::Network("HTTP request timed out".into());
        }

        #[cfg(not(target_arch = "wasm32"))]
        if self.is_connect() {
            return MiError::Network("HTTP connection failure".into());
        }

        if self.is_builder() {
            return MiError::Internal(format!("invalid HTTP request: {self}"));
        }

        if self.is_decode() || self.is_body() {
            return MiError::Network(format!("failed to read HTTP response body: {self}"));
        }

        MiError::Network(self.to_string())
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(value.into_mi())
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */
