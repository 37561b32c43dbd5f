//! API failure normalization
//!
//! Any status other than 200 is a failure. A body of the form
//! `{errorType, errorMessage}` becomes `MiError::Api`; anything else becomes
//! `MiError::Unknown` carrying only the status.

use serde::Deserialize;
use scribe_mi_domain::MiError;

/// Error body returned by the MI API
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub error_type: String,
    pub error_message: String,
}

/// Turn a failed response into the matching error
pub fn normalize_failure(status: u16, body: &[u8]) -> MiError {
    match serde_json::from_slice::<ErrorBody>(body) {
        Ok(ErrorBody { error_type, error_message }) => {
            MiError::Api { status, error_type, message: error_message }
        }
        Err(_) => MiError::Unknown { status },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_schema_becomes_api_error() {
        let body = br#"{"errorType":"NotFound","errorMessage":"Task abc not found"}"#;
        match normalize_failure(404, body) {
            MiError::Api { status, error_type, message } => {
                assert_eq!(status, 404);
                assert_eq!(error_type, "NotFound");
                assert_eq!(message, "Task abc not found");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn unparseable_bodies_become_unknown_errors() {
        for body in [&b"<html>Bad Gateway</html>"[..], b"", br#"{"message":"nope"}"#] {
            assert!(matches!(normalize_failure(502, body), MiError::Unknown { status: 502 }));
        }
    }

    #[test]
    fn error_body_ignores_extra_fields() {
        let body = br#"{"errorType":"Validation","errorMessage":"bad filetype","requestId":"r1"}"#;
        assert_eq!(normalize_failure(400, body).to_string(), "400 bad filetype");
    }
}
