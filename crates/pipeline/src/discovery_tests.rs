// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::fs;
use tempfile::tempdir;

#[test]
fn discovers_single_supported_file() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("a.txt");
    fs::write(&file, "hello").unwrap();

    let result = discover(file.to_str().unwrap(), false, Path::new("/nonexistent-output")).unwrap();
    assert_eq!(result.files, vec![file]);
    assert_eq!(result.source_root, dir.path());
}

#[test]
fn non_recursive_directory_excludes_nested_files() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("top.txt"), "x").unwrap();
    let nested = dir.path().join("nested");
    fs::create_dir(&nested).unwrap();
    fs::write(nested.join("inner.txt"), "y").unwrap();

    let result = discover(dir.path().to_str().unwrap(), false, Path::new("/nonexistent-output")).unwrap();
    assert_eq!(result.files.len(), 1);
    assert_eq!(result.files[0].file_name().unwrap(), "top.txt");
}

#[test]
fn recursive_directory_includes_nested_files() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("top.txt"), "x").unwrap();
    let nested = dir.path().join("nested");
    fs::create_dir(&nested).unwrap();
    fs::write(nested.join("inner.txt"), "y").unwrap();

    let result = discover(dir.path().to_str().unwrap(), true, Path::new("/nonexistent-output")).unwrap();
    assert_eq!(result.files.len(), 2);
}

#[test]
fn excludes_files_under_output_dir() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("out");
    fs::create_dir(&out).unwrap();
    fs::write(dir.path().join("a.txt"), "x").unwrap();
    fs::write(out.join("b.txt"), "y").unwrap();

    let result = discover(dir.path().to_str().unwrap(), true, &out).unwrap();
    assert_eq!(result.files.len(), 1);
    assert_eq!(result.files[0].file_name().unwrap(), "a.txt");
}

#[test]
fn fails_with_no_supported_files_when_empty() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.bin"), "x").unwrap();

    let err = discover(dir.path().to_str().unwrap(), false, Path::new("/nonexistent-output")).unwrap_err();
    assert!(matches!(err, PipelineError::NoSupportedFiles { .. }));
}

#[test]
fn unsupported_single_file_fails() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("a.bin");
    fs::write(&file, "x").unwrap();

    let err = discover(file.to_str().unwrap(), false, Path::new("/nonexistent-output")).unwrap_err();
    assert!(matches!(err, PipelineError::NoSupportedFiles { .. }));
}
