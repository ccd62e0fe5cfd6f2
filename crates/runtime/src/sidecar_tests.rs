// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use tempfile::tempdir;

fn sample(session_id: &str) -> SessionSidecar {
    SessionSidecar {
        session_id: session_id.to_string(),
        source_directory: "/tmp/source".to_string(),
        output_dir: "/tmp/output".to_string(),
        format: "json".to_string(),
        total_files: 1,
        processed_count: 1,
        failed_count: 0,
        status: "completed".to_string(),
        failed_files: Vec::new(),
        started_at: Utc::now(),
        completed_at: Some(Utc::now()),
    }
}

#[test]
fn save_and_load_round_trip() {
    let dir = tempdir().unwrap();
    let sidecar = sample("abc123");
    sidecar.save(dir.path()).unwrap();

    let loaded = SessionSidecar::load(dir.path(), "abc123").unwrap().unwrap();
    assert_eq!(loaded.session_id, "abc123");
    assert_eq!(loaded.processed_count, 1);
}

#[test]
fn load_missing_session_returns_none() {
    let dir = tempdir().unwrap();
    assert!(SessionSidecar::load(dir.path(), "nope").unwrap().is_none());
}

#[test]
fn load_last_picks_the_most_recently_modified_sidecar() {
    let dir = tempdir().unwrap();
    sample("first").save(dir.path()).unwrap();
    std::thread::sleep(std::time::Duration::from_millis(10));
    sample("second").save(dir.path()).unwrap();

    let last = SessionSidecar::load_last(dir.path()).unwrap().unwrap();
    assert_eq!(last.session_id, "second");
}

#[test]
fn load_last_with_no_sessions_returns_none() {
    let dir = tempdir().unwrap();
    assert!(SessionSidecar::load_last(dir.path()).unwrap().is_none());
}
