//! Integration tests for the transfer checksum codec
//!
//! Pins the digests the MI storage layer is known to produce so that upload
//! declarations and download integrity tags stay bit-compatible.

#![cfg(feature = "foundation")]

use scribe_mi_common::{Checksum, ChecksumError};

/// The storage integrity tag recorded for a minimal financials model.
#[test]
fn model_document_matches_recorded_storage_tag() {
    let body = r#"{"company":"EXAMPLE CO LTD","dateReporting":"2024-01-01","covering":"year","items":[]}"#;
    let sum = Checksum::of_text(body);
    assert_eq!(sum.to_hex(), "3f627dbbd74547377281ff090bf313eb");
    assert!(sum.matches_hex("3F627DBBD74547377281FF090BF313EB"));
}

/// A single changed byte must produce a different digest.
#[test]
fn single_byte_change_alters_digest() {
    let original = Checksum::of_bytes(b"%PDF-1.7 original");
    let tampered = Checksum::of_bytes(b"%PDF-1.7 originaL");
    assert_ne!(original, tampered);
    assert!(!original.matches_hex(&tampered.to_hex()));
}

#[test]
fn upload_declaration_and_header_agree() {
    let file = vec![7u8; 64 * 1024];
    let declared = Checksum::of_bytes(&file).to_base64();
    let header = Checksum::of_bytes(file.as_slice()).to_base64();
    assert_eq!(declared, header);
    assert_eq!(Checksum::from_base64(&declared).map(|c| c.to_hex()), Ok(Checksum::of_bytes(&file).to_hex()));
}

#[test]
fn length_errors_report_decoded_size() {
    let err = Checksum::from_base64("AAAA").unwrap_err();
    assert_eq!(err, ChecksumError::InvalidLength(3));
    assert_eq!(err.to_string(), "checksum must be 16 bytes, got 3");
}
