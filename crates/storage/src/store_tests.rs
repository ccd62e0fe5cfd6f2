// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use dx_core::{JobFileStatus, OutputFormat};
use chrono::TimeZone;

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap()
}

fn sample_job(id: &str) -> Job {
    Job::new_queued(JobId::new(id), "/in", "/out", OutputFormat::Json, 512, "{}", now())
}

#[test]
fn inserts_and_fetches_a_job() {
    let store = Store::open_in_memory().unwrap();
    let job = sample_job("job-a");
    store.insert_job(&job).unwrap();

    let fetched = store.get_job(&JobId::new("job-a")).unwrap().unwrap();
    assert_eq!(fetched.id.as_str(), "job-a");
    assert_eq!(fetched.status, JobStatus::Queued);
}

#[test]
fn missing_job_returns_none() {
    let store = Store::open_in_memory().unwrap();
    assert!(store.get_job(&JobId::new("nope")).unwrap().is_none());
}

#[test]
fn update_job_persists_status_transition() {
    let store = Store::open_in_memory().unwrap();
    let mut job = sample_job("job-b");
    store.insert_job(&job).unwrap();

    job.status = JobStatus::Running;
    job.started_at = Some(now());
    job.updated_at = now();
    store.update_job(&job).unwrap();

    let fetched = store.get_job(&JobId::new("job-b")).unwrap().unwrap();
    assert_eq!(fetched.status, JobStatus::Running);
    assert!(fetched.started_at.is_some());
}

#[test]
fn idempotency_lookup_finds_matching_request_hash() {
    let store = Store::open_in_memory().unwrap();
    let mut job = sample_job("job-c");
    job.idempotency_key = Some("key-1".to_string());
    job.request_hash = Some("hash-1".to_string());
    store.insert_job(&job).unwrap();

    let found = store.find_job_by_idempotency("key-1", "hash-1").unwrap();
    assert!(found.is_some());
    assert!(store.find_job_by_idempotency("key-1", "other-hash").unwrap().is_none());
}

#[test]
fn duplicate_idempotency_pair_is_rejected() {
    let store = Store::open_in_memory().unwrap();
    let mut a = sample_job("job-d1");
    a.idempotency_key = Some("dupe".to_string());
    a.request_hash = Some("h".to_string());
    store.insert_job(&a).unwrap();

    let mut b = sample_job("job-d2");
    b.idempotency_key = Some("dupe".to_string());
    b.request_hash = Some("h".to_string());
    assert!(store.insert_job(&b).is_err());
}

#[test]
fn job_files_round_trip_and_update() {
    let store = Store::open_in_memory().unwrap();
    let job = sample_job("job-e");
    store.insert_job(&job).unwrap();

    let mut file = JobFile {
        job_id: job.id.clone(),
        source_path: "/in/a.txt".to_string(),
        normalized_source_path: "a.txt".to_string(),
        status: JobFileStatus::Pending,
        output_path: None,
        chunk_count: 0,
        retry_count: 0,
        error_type: None,
        error_message: None,
    };
    store.insert_job_file(&file).unwrap();

    file.status = JobFileStatus::Processed;
    file.chunk_count = 3;
    file.output_path = Some("/out/a.json".to_string());
    store.update_job_file(&file).unwrap();

    let files = store.list_job_files(&job.id).unwrap();
    assert_eq!(files.len(), 1);
    assert_eq!(files[0].status, JobFileStatus::Processed);
    assert_eq!(files[0].chunk_count, 3);
}

#[test]
fn job_events_are_append_only_and_ordered() {
    let store = Store::open_in_memory().unwrap();
    let job = sample_job("job-f");
    store.insert_job(&job).unwrap();

    for (i, kind) in ["queued", "started", "completed"].iter().enumerate() {
        store
            .append_job_event(&JobEvent {
                job_id: job.id.clone(),
                event_type: kind.to_string(),
                message: format!("event {i}"),
                payload: serde_json::json!({"i": i}),
                event_time: now(),
            })
            .unwrap();
    }

    let events = store.list_job_events(&job.id).unwrap();
    assert_eq!(events.len(), 3);
    assert_eq!(events[0].event_type, "queued");
    assert_eq!(events[2].event_type, "completed");
}

#[test]
fn session_upsert_overwrites_existing_row() {
    let store = Store::open_in_memory().unwrap();
    let session = Session {
        session_id: "sess-1".to_string(),
        source_directory: "/in".to_string(),
        status: "running".to_string(),
        total_files: 10,
        processed_count: 0,
        failed_count: 0,
        artifact_dir: None,
        is_archived: false,
        archived_at: None,
        projection_source: dx_core::ProjectionSource::Sidecar,
        projection_error: None,
        last_reconciled_at: None,
        updated_at: now(),
    };
    store.upsert_session(&session).unwrap();

    let mut updated = session.clone();
    updated.processed_count = 7;
    updated.status = "completed".to_string();
    store.upsert_session(&updated).unwrap();

    let fetched = store.get_session("sess-1").unwrap().unwrap();
    assert_eq!(fetched.processed_count, 7);
    assert_eq!(fetched.status, "completed");
}

#[test]
fn settings_roundtrip_and_upsert() {
    let store = Store::open_in_memory().unwrap();
    assert!(store.get_setting("schema_version").unwrap().is_none());

    store.set_setting("schema_version", "1", now()).unwrap();
    assert_eq!(store.get_setting("schema_version").unwrap().unwrap(), "1");

    store.set_setting("schema_version", "2", now()).unwrap();
    assert_eq!(store.get_setting("schema_version").unwrap().unwrap(), "2");
}

#[test]
fn retry_runs_are_recorded_and_updatable() {
    let store = Store::open_in_memory().unwrap();
    let job = sample_job("job-g");
    store.insert_job(&job).unwrap();

    let run = RetryRun {
        job_id: job.id.clone(),
        source_session_id: Some("sess-1".to_string()),
        status: "running".to_string(),
        requested_at: now(),
        completed_at: None,
    };
    let id = store.insert_retry_run(&run).unwrap();
    store.update_retry_run_status(id, "completed", Some(now())).unwrap();

    let runs = store.list_retry_runs(&job.id).unwrap();
    assert_eq!(runs.len(), 1);
    assert_eq!(runs[0].status, "completed");
    assert!(runs[0].completed_at.is_some());
}
