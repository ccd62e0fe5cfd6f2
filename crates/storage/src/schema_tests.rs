// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use rusqlite::Connection;

#[test]
fn migrate_is_idempotent() {
    let conn = Connection::open_in_memory().unwrap();
    migrate(&conn).unwrap();
    migrate(&conn).unwrap();
}

#[test]
fn creates_expected_tables() {
    let conn = Connection::open_in_memory().unwrap();
    migrate(&conn).unwrap();
    let mut stmt = conn.prepare("SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name").unwrap();
    let names: Vec<String> = stmt.query_map([], |r| r.get(0)).unwrap().collect::<Result<_, _>>().unwrap();
    for expected in ["jobs", "job_files", "job_events", "sessions", "retry_runs", "app_settings"] {
        assert!(names.iter().any(|n| n == expected), "missing table {expected}");
    }
}

#[test]
fn rejects_duplicate_idempotency_key_and_request_hash() {
    let conn = Connection::open_in_memory().unwrap();
    migrate(&conn).unwrap();
    let insert = |id: &str| {
        conn.execute(
            "INSERT INTO jobs (id, status, input_path, output_dir, requested_format, chunk_size,
                request_payload, dispatch_state, artifact_sync_state, dispatch_attempts,
                artifact_sync_attempts, attempt, idempotency_key, request_hash, created_at, updated_at)
             VALUES (?1, 'queued', '/in', '/out', 'json', 1000, '{}', 'pending_dispatch', 'pending',
                0, 0, 1, 'key-1', 'hash-1', '2026-01-01T00:00:00Z', '2026-01-01T00:00:00Z')",
            [id],
        )
    };
    insert("job-1").unwrap();
    let err = insert("job-2").unwrap_err();
    assert!(matches!(err, rusqlite::Error::SqliteFailure(..)));
}

#[test]
fn allows_multiple_jobs_without_idempotency_key() {
    let conn = Connection::open_in_memory().unwrap();
    migrate(&conn).unwrap();
    let insert = |id: &str| {
        conn.execute(
            "INSERT INTO jobs (id, status, input_path, output_dir, requested_format, chunk_size,
                request_payload, dispatch_state, artifact_sync_state, dispatch_attempts,
                artifact_sync_attempts, attempt, created_at, updated_at)
             VALUES (?1, 'queued', '/in', '/out', 'json', 1000, '{}', 'pending_dispatch', 'pending',
                0, 0, 1, '2026-01-01T00:00:00Z', '2026-01-01T00:00:00Z')",
            [id],
        )
    };
    insert("job-1").unwrap();
    insert("job-2").unwrap();
}
