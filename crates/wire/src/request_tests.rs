// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn defaults_match_spec() {
    let req = ProcessJobRequest::new("/in");
    assert_eq!(req.output_format, "json");
    assert_eq!(req.chunk_size, 512);
    assert!(!req.recursive);
    assert!(req.continue_on_error);
}

#[test]
fn deserializes_with_missing_optional_fields() {
    let json = r#"{"input_path": "/data"}"#;
    let req: ProcessJobRequest = serde_json::from_str(json).unwrap();
    assert_eq!(req.input_path, "/data");
    assert_eq!(req.chunk_size, 512);
    assert!(req.continue_on_error);
    assert!(req.source_files.is_empty());
}
