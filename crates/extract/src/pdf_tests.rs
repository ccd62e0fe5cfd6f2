// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use tempfile::NamedTempFile;
use std::io::Write;

fn write_temp(bytes: &[u8]) -> NamedTempFile {
    let mut f = NamedTempFile::new().unwrap();
    f.write_all(bytes).unwrap();
    f
}

#[test]
fn recovers_printable_text_behind_pdf_header() {
    let f = write_temp(b"%PDF-1.4\nhello world this is recoverable text");
    let outcome = extract(f.path()).unwrap();
    assert_eq!(outcome.text, "hello world this is recoverable text");
    assert_eq!(outcome.fallback(), Some("text_stub"));
    assert_eq!(outcome.extraction_confidence(), 0.25);
}

#[test]
fn empty_file_yields_empty_stub() {
    let f = write_temp(b"");
    let outcome = extract(f.path()).unwrap();
    assert_eq!(outcome.text, "");
    assert_eq!(outcome.fallback(), Some("empty_stub"));
    assert_eq!(outcome.extraction_confidence(), 0.0);
}

#[test]
fn pdf_header_with_no_recoverable_payload_is_corrupt() {
    let f = write_temp(b"%PDF-1.4\n");
    let err = extract(f.path()).unwrap_err();
    assert!(matches!(err, ExtractError::CorruptInput { .. }));
}

#[test]
fn binary_payload_under_pdf_header_is_not_recoverable() {
    let mut bytes = b"%PDF\n".to_vec();
    bytes.extend_from_slice(&[0xC3, 0x28, 0xA0, 0x00, 0xFF, 0xFE]);
    let f = write_temp(&bytes);
    let err = extract(f.path()).unwrap_err();
    assert!(matches!(err, ExtractError::CorruptInput { .. }));
}

#[test]
fn no_alphanumeric_payload_is_rejected() {
    let f = write_temp(b"%PDF-1.4\n!!! ... ??? ---");
    let err = extract(f.path()).unwrap_err();
    assert!(matches!(err, ExtractError::CorruptInput { .. }));
}
