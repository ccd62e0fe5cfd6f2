// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::schema;
use rusqlite::Connection;

fn conn() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    schema::migrate(&conn).unwrap();
    conn
}

#[test]
fn round_trips_a_job_row() {
    let conn = conn();
    conn.execute(
        "INSERT INTO jobs (id, status, input_path, output_dir, requested_format, chunk_size,
            request_payload, result_payload, session_id, request_hash, idempotency_key, attempt,
            artifact_dir, dispatch_state, dispatch_attempts, dispatch_next_attempt_at,
            dispatch_last_error, artifact_sync_state, artifact_sync_attempts, result_checksum,
            artifact_last_synced_at, created_at, started_at, finished_at, updated_at)
         VALUES ('abc123456789', 'queued', '/in', '/out', 'json', 1000, '{}', NULL, NULL, NULL,
            NULL, 1, NULL, 'pending_dispatch', 0, NULL, NULL, 'pending', 0, NULL, NULL,
            '2026-01-01T00:00:00Z', NULL, NULL, '2026-01-01T00:00:00Z')",
        [],
    )
    .unwrap();

    let job = conn
        .query_row("SELECT * FROM jobs WHERE id = 'abc123456789'", [], job_from_row)
        .unwrap();

    assert_eq!(job.id.as_str(), "abc123456789");
    assert_eq!(job.status, dx_core::JobStatus::Queued);
    assert_eq!(job.requested_format, dx_core::OutputFormat::Json);
    assert_eq!(job.dispatch_state, dx_core::DispatchState::PendingDispatch);
    assert_eq!(job.artifact_sync_state, dx_core::ArtifactSyncState::Pending);
    assert!(job.started_at.is_none());
}

#[test]
fn rejects_unknown_status_tag() {
    let conn = conn();
    conn.execute(
        "INSERT INTO jobs (id, status, input_path, output_dir, requested_format, chunk_size,
            request_payload, dispatch_state, artifact_sync_state, dispatch_attempts,
            artifact_sync_attempts, attempt, created_at, updated_at)
         VALUES ('x', 'bogus', '/in', '/out', 'json', 1000, '{}', 'pending_dispatch', 'pending',
            0, 0, 1, '2026-01-01T00:00:00Z', '2026-01-01T00:00:00Z')",
        [],
    )
    .unwrap();

    let err = conn.query_row("SELECT * FROM jobs WHERE id = 'x'", [], job_from_row).unwrap_err();
    assert!(matches!(err, SqlError::FromSqlConversionFailure(..)));
}

#[test]
fn round_trips_a_job_event_row() {
    let conn = conn();
    conn.execute(
        "INSERT INTO job_events (job_id, event_type, message, payload, event_time)
         VALUES ('abc', 'started', 'job started', '{\"attempt\":1}', '2026-01-01T00:00:00Z')",
        [],
    )
    .unwrap();

    let event = conn
        .query_row("SELECT * FROM job_events WHERE job_id = 'abc'", [], job_event_from_row)
        .unwrap();
    assert_eq!(event.event_type, "started");
    assert_eq!(event.payload["attempt"], 1);
}
