// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::fs;
use tempfile::tempdir;

#[test]
fn processes_a_single_text_file_into_two_chunks() {
    let dir = tempdir().unwrap();
    let source = dir.path().join("sample.txt");
    fs::write(&source, "one two three four five six").unwrap();
    let out = dir.path().join("out");

    let mut used = HashSet::new();
    let outcome =
        process_file(&source, &out, OutputFormat::Json, 3, false, dir.path(), &mut used).unwrap();

    assert_eq!(outcome.chunk_count, 2);
    assert!(Path::new(&outcome.output_path).exists());
}

#[test]
fn unsupported_extension_produces_a_failure_not_a_panic() {
    let dir = tempdir().unwrap();
    let source = dir.path().join("bad.xyz");
    fs::write(&source, "whatever").unwrap();
    let out = dir.path().join("out");

    let mut used = HashSet::new();
    let failure = process_file(&source, &out, OutputFormat::Json, 3, false, dir.path(), &mut used).unwrap_err();
    assert_eq!(failure.error_type, "UnsupportedExtension");
}

#[test]
fn non_json_format_marks_semantic_as_skipped() {
    let dir = tempdir().unwrap();
    let source = dir.path().join("a.txt");
    fs::write(&source, "hello there").unwrap();
    let out = dir.path().join("out");

    let mut used = HashSet::new();
    let outcome = process_file(&source, &out, OutputFormat::Txt, 512, true, dir.path(), &mut used).unwrap();
    assert_eq!(outcome.semantic_status, "skipped");
    assert_eq!(outcome.semantic_reason_code.as_deref(), Some("semantic_output_format_incompatible"));
}

#[test]
fn duplicate_stems_in_sibling_directories_get_distinct_outputs() {
    let dir = tempdir().unwrap();
    let a = dir.path().join("a");
    let b = dir.path().join("b");
    fs::create_dir_all(&a).unwrap();
    fs::create_dir_all(&b).unwrap();
    fs::write(a.join("same.txt"), "alpha").unwrap();
    fs::write(b.join("same.txt"), "beta").unwrap();
    let out = dir.path().join("out");

    let files = vec![a.join("same.txt"), b.join("same.txt")];
    let run = process_files(&files, &out, OutputFormat::Json, 512, false, dir.path(), 1, true);

    assert_eq!(run.processed.len(), 2);
    let paths: HashSet<_> = run.processed.iter().map(|p| p.output_path.clone()).collect();
    assert_eq!(paths.len(), 2);
}

#[test]
fn continue_on_error_collects_failures_and_keeps_processing() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("good-a.txt"), "a").unwrap();
    fs::write(dir.path().join("bad.xyz"), "x").unwrap();
    fs::write(dir.path().join("good-b.txt"), "b").unwrap();
    let out = dir.path().join("out");

    let files = vec![
        dir.path().join("good-a.txt"),
        dir.path().join("bad.xyz"),
        dir.path().join("good-b.txt"),
    ];
    let run = process_files(&files, &out, OutputFormat::Json, 512, false, dir.path(), 1, true);

    assert_eq!(run.processed.len(), 2);
    assert_eq!(run.failed.len(), 1);
    assert_eq!(run.failed[0].error_type, "UnsupportedExtension");
}

#[test]
fn stop_on_first_error_halts_sequential_processing() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("bad.xyz"), "x").unwrap();
    fs::write(dir.path().join("good.txt"), "a").unwrap();
    let out = dir.path().join("out");

    let files = vec![dir.path().join("bad.xyz"), dir.path().join("good.txt")];
    let run = process_files(&files, &out, OutputFormat::Json, 512, false, dir.path(), 1, false);

    assert_eq!(run.failed.len(), 1);
    assert_eq!(run.processed.len(), 0);
}

#[test]
fn worker_pool_processes_all_files_concurrently() {
    let dir = tempdir().unwrap();
    for i in 0..6 {
        fs::write(dir.path().join(format!("f{i}.txt")), format!("text {i}")).unwrap();
    }
    let files: Vec<_> = (0..6).map(|i| dir.path().join(format!("f{i}.txt"))).collect();
    let out = dir.path().join("out");

    let run = process_files(&files, &out, OutputFormat::Json, 512, false, dir.path(), 3, true);
    assert_eq!(run.processed.len(), 6);
    assert!(run.failed.is_empty());
}
