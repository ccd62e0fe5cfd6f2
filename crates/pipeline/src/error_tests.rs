// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn no_supported_files_maps_to_expected_kind() {
    let err = PipelineError::NoSupportedFiles { input_path: "/in".to_string() };
    assert_eq!(err.kind(), ErrorKind::NoSupportedFiles);
}

#[test]
fn invalid_glob_maps_to_configuration_error() {
    let err = PipelineError::InvalidGlob { pattern: "[".to_string(), reason: "unterminated class".to_string() };
    assert_eq!(err.kind(), ErrorKind::ConfigurationError);
}
