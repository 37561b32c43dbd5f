//! Transfer integrity rules
//!
//! Pure checks applied around the out-of-band file transfers. The HTTP side
//! lives in `scribe-mi-infra::api::transfer`.

use scribe_mi_common::Checksum;
use scribe_mi_domain::{MiError, Model, Result, Task};
use tracing::{debug, warn};

/// Checksum declared for an upload, as sent in the body and `Content-MD5`
pub fn upload_checksum(file: &[u8]) -> String {
    Checksum::of_bytes(file).to_base64()
}

/// Strip the quoting storage services put around entity tags
///
/// Weak validators (`W/"..."`) lose their prefix as well.
pub fn strip_tag_quotes(tag: &str) -> &str {
    let tag = tag.trim();
    let tag = tag.strip_prefix("W/").unwrap_or(tag);
    tag.trim_matches('"')
}

/// Location of the task's model, or `ModelNotReady`
///
/// # Errors
/// `ModelNotReady` if the task carries no model URL.
pub fn model_location(task: &Task) -> Result<&str> {
    task.model_url.as_deref().ok_or_else(|| MiError::ModelNotReady { jobid: task.jobid.clone() })
}

/// Check downloaded bytes against the declared integrity tag
///
/// A missing tag is treated as a mismatch.
///
/// # Errors
/// `Integrity` carrying the declared tag and the computed digest.
pub fn verify_download(content: &[u8], declared_tag: Option<&str>) -> Result<()> {
    let actual = Checksum::of_bytes(content);
    let expected = declared_tag.map(strip_tag_quotes);

    match expected {
        Some(tag) if actual.matches_hex(tag) => {
            debug!(checksum = %actual, "Download integrity verified");
            Ok(())
        }
        _ => Err(MiError::Integrity {
            expected: expected.map(str::to_owned),
            actual: actual.to_hex(),
        }),
    }
}

/// Parse verified content as a model
///
/// The detailed parse failure is logged; callers only see
/// `ModelShapeMismatch`.
///
/// # Errors
/// `ModelShapeMismatch` if the content is not JSON or fits neither shape.
pub fn decode_model(content: &[u8]) -> Result<Model> {
    serde_json::from_slice::<Model>(content).map_err(|err| {
        warn!(error = %err, "Model validation failed");
        MiError::ModelShapeMismatch
    })
}

#[cfg(test)]
mod tests {
    use scribe_mi_domain::TaskStatus;

    use super::*;

    const MODEL: &str = r#"{"company":"EXAMPLE CO LTD","dateReporting":"2024-01-01","covering":"year","items":[]}"#;
    const MODEL_TAG: &str = "3f627dbbd74547377281ff090bf313eb";

    fn task(model_url: Option<&str>) -> Task {
        Task {
            jobid: "job-1".into(),
            client: "Scribe".into(),
            company_name: None,
            client_filename: None,
            original_filename: None,
            client_model_filename: None,
            model_filename: None,
            status: TaskStatus::Success,
            submitted: 1,
            model_url: model_url.map(str::to_owned),
        }
    }

    #[test]
    fn quoted_tags_are_unwrapped() {
        assert_eq!(strip_tag_quotes("\"abc\""), "abc");
        assert_eq!(strip_tag_quotes("W/\"abc\""), "abc");
        assert_eq!(strip_tag_quotes("abc"), "abc");
    }

    #[test]
    fn matching_tag_verifies() {
        let quoted = format!("\"{MODEL_TAG}\"");
        assert!(verify_download(MODEL.as_bytes(), Some(&quoted)).is_ok());
        assert!(verify_download(MODEL.as_bytes(), Some(&MODEL_TAG.to_uppercase())).is_ok());
    }

    #[test]
    fn mismatched_tag_reports_both_digests() {
        let err = verify_download(MODEL.as_bytes(), Some("\"deadbeef\"")).unwrap_err();
        match err {
            MiError::Integrity { expected, actual } => {
                assert_eq!(expected.as_deref(), Some("deadbeef"));
                assert_eq!(actual, MODEL_TAG);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn missing_tag_is_a_mismatch() {
        let err = verify_download(MODEL.as_bytes(), None).unwrap_err();
        assert!(matches!(err, MiError::Integrity { expected: None, .. }));
    }

    #[test]
    fn model_location_requires_url() {
        assert!(matches!(
            model_location(&task(None)),
            Err(MiError::ModelNotReady { ref jobid }) if jobid == "job-1"
        ));
        assert_eq!(model_location(&task(Some("https://s3/model.json"))).unwrap(), "https://s3/model.json");
    }

    #[test]
    fn decode_distinguishes_shape_failures() {
        assert!(decode_model(MODEL.as_bytes()).unwrap().as_financials().is_some());
        assert!(matches!(decode_model(b"{\"unexpected\":1}"), Err(MiError::ModelShapeMismatch)));
        assert!(matches!(decode_model(b"not json"), Err(MiError::ModelShapeMismatch)));
    }

    #[test]
    fn upload_checksum_is_base64_md5() {
        assert_eq!(upload_checksum(b"hello world"), "XrY7u+Ae7tCTyyK7j1rNww==");
    }
}
