// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use dx_storage::Store;
use std::fs;
use tempfile::tempdir;

#[test]
fn run_process_generates_real_output_for_a_directory_of_one_file() {
    let tmp = tempdir().unwrap();
    let source_dir = tmp.path().join("source");
    let output_dir = tmp.path().join("output");
    fs::create_dir_all(&source_dir).unwrap();
    fs::write(source_dir.join("sample.txt"), "alpha beta gamma").unwrap();

    let mut request = ProcessJobRequest::new(source_dir.display().to_string());
    request.output_path = Some(output_dir.display().to_string());
    request.output_format = "json".to_string();
    request.chunk_size = 16;

    let store = Store::open_in_memory().unwrap();
    let result = run_process(&store, &request, tmp.path(), 1).unwrap();

    assert_eq!(result.processed_count, 1);
    assert_eq!(result.failed_count, 0);
    assert!(output_dir.join("sample.json").exists());
    assert!(store.get_job(&JobId::new(result.job_id.clone())).unwrap().is_some());
}

#[test]
fn run_process_avoids_output_collisions_for_duplicate_stems() {
    let tmp = tempdir().unwrap();
    let source_dir = tmp.path().join("source-dupes");
    let output_dir = tmp.path().join("output-dupes");
    fs::create_dir_all(source_dir.join("a")).unwrap();
    fs::create_dir_all(source_dir.join("b")).unwrap();
    fs::write(source_dir.join("a").join("same.txt"), "alpha").unwrap();
    fs::write(source_dir.join("b").join("same.txt"), "beta").unwrap();

    let mut request = ProcessJobRequest::new(source_dir.display().to_string());
    request.output_path = Some(output_dir.display().to_string());
    request.chunk_size = 16;
    request.recursive = true;

    let store = Store::open_in_memory().unwrap();
    let result = run_process(&store, &request, tmp.path(), 1).unwrap();

    assert_eq!(result.processed_count, 2);
    assert!(output_dir.join("a").join("same.json").exists());
    assert!(output_dir.join("b").join("same.json").exists());
    assert!(result.processed_files.iter().all(|f| !f.source_key.is_empty()));
}

#[test]
fn run_process_with_no_matching_files_returns_no_supported_files_without_persisting_a_job() {
    let tmp = tempdir().unwrap();
    let source_dir = tmp.path().join("empty-source");
    fs::create_dir_all(&source_dir).unwrap();

    let mut request = ProcessJobRequest::new(source_dir.display().to_string());
    request.output_path = Some(tmp.path().join("output").display().to_string());

    let store = Store::open_in_memory().unwrap();
    let err = run_process(&store, &request, tmp.path(), 1).unwrap_err();
    assert_eq!(err.kind(), dx_core::ErrorKind::NoSupportedFiles);
    assert!(store.list_jobs_by_status(JobStatus::Queued).unwrap().is_empty());
}

#[test]
fn idempotent_resubmission_replays_the_existing_job_result() {
    let tmp = tempdir().unwrap();
    let source_dir = tmp.path().join("source");
    fs::create_dir_all(&source_dir).unwrap();
    fs::write(source_dir.join("a.txt"), "one two").unwrap();

    let mut request = ProcessJobRequest::new(source_dir.display().to_string());
    request.output_path = Some(tmp.path().join("output").display().to_string());
    request.idempotency_key = Some("fixed-key".to_string());

    let store = Store::open_in_memory().unwrap();
    let first = run_process(&store, &request, tmp.path(), 1).unwrap();
    let second = run_process(&store, &request, tmp.path(), 1).unwrap();

    assert_eq!(first.job_id, second.job_id);
    assert_eq!(store.list_jobs_by_status(JobStatus::Completed).unwrap().len(), 1);
}

#[test]
fn mixed_success_and_failure_yields_partial_status() {
    let tmp = tempdir().unwrap();
    let source_dir = tmp.path().join("source");
    fs::create_dir_all(&source_dir).unwrap();
    fs::write(source_dir.join("good.txt"), "hello world").unwrap();
    fs::write(source_dir.join("bad.unknownext"), "whatever").unwrap();

    let mut request = ProcessJobRequest::new(source_dir.display().to_string());
    request.output_path = Some(tmp.path().join("output").display().to_string());
    request.source_files = vec![
        source_dir.join("good.txt").display().to_string(),
        source_dir.join("bad.unknownext").display().to_string(),
    ];

    let store = Store::open_in_memory().unwrap();
    let result = run_process(&store, &request, tmp.path(), 1).unwrap();

    assert_eq!(result.processed_count, 1);
    assert_eq!(result.failed_count, 1);
    assert_eq!(result.status, JobStatus::Partial);
    assert_eq!(result.exit_code, 1);
}
