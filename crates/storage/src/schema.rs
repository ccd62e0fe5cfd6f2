// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Schema definition and migration. Tables per §3 of the specification;
//! indexes on `status`, `(idempotency_key, request_hash)`, `(job_id,
//! event_time)`, `(dispatch_state, dispatch_next_attempt_at)`, and
//! `(artifact_sync_state, updated_at)`.

use rusqlite::Connection;

const DDL: &str = r#"
CREATE TABLE IF NOT EXISTS jobs (
    id TEXT PRIMARY KEY,
    status TEXT NOT NULL,
    input_path TEXT NOT NULL,
    output_dir TEXT NOT NULL,
    requested_format TEXT NOT NULL,
    chunk_size INTEGER NOT NULL,
    request_payload TEXT NOT NULL,
    result_payload TEXT,
    session_id TEXT,
    request_hash TEXT,
    idempotency_key TEXT,
    attempt INTEGER NOT NULL,
    artifact_dir TEXT,
    dispatch_state TEXT NOT NULL,
    dispatch_attempts INTEGER NOT NULL,
    dispatch_next_attempt_at TEXT,
    dispatch_last_error TEXT,
    artifact_sync_state TEXT NOT NULL,
    artifact_sync_attempts INTEGER NOT NULL,
    result_checksum TEXT,
    artifact_last_synced_at TEXT,
    created_at TEXT NOT NULL,
    started_at TEXT,
    finished_at TEXT,
    updated_at TEXT NOT NULL
);

CREATE UNIQUE INDEX IF NOT EXISTS idx_jobs_idempotency
    ON jobs(idempotency_key, request_hash)
    WHERE idempotency_key IS NOT NULL;

CREATE INDEX IF NOT EXISTS idx_jobs_status ON jobs(status);
CREATE INDEX IF NOT EXISTS idx_jobs_dispatch ON jobs(dispatch_state, dispatch_next_attempt_at);
CREATE INDEX IF NOT EXISTS idx_jobs_artifact_sync ON jobs(artifact_sync_state, updated_at);

CREATE TABLE IF NOT EXISTS job_files (
    job_id TEXT NOT NULL,
    source_path TEXT NOT NULL,
    normalized_source_path TEXT NOT NULL,
    status TEXT NOT NULL,
    output_path TEXT,
    chunk_count INTEGER NOT NULL DEFAULT 0,
    retry_count INTEGER NOT NULL DEFAULT 0,
    error_type TEXT,
    error_message TEXT,
    PRIMARY KEY (job_id, normalized_source_path)
);

CREATE TABLE IF NOT EXISTS job_events (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    job_id TEXT NOT NULL,
    event_type TEXT NOT NULL,
    message TEXT NOT NULL,
    payload TEXT NOT NULL,
    event_time TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_job_events_job_time ON job_events(job_id, event_time);

CREATE TABLE IF NOT EXISTS sessions (
    session_id TEXT PRIMARY KEY,
    source_directory TEXT NOT NULL,
    status TEXT NOT NULL,
    total_files INTEGER NOT NULL,
    processed_count INTEGER NOT NULL,
    failed_count INTEGER NOT NULL,
    artifact_dir TEXT,
    is_archived INTEGER NOT NULL,
    archived_at TEXT,
    projection_source TEXT NOT NULL,
    projection_error TEXT,
    last_reconciled_at TEXT,
    updated_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS retry_runs (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    job_id TEXT NOT NULL,
    source_session_id TEXT,
    status TEXT NOT NULL,
    requested_at TEXT NOT NULL,
    completed_at TEXT
);

CREATE TABLE IF NOT EXISTS app_settings (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL,
    updated_at TEXT NOT NULL
);
"#;

pub(crate) fn migrate(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(DDL)
}

#[cfg(test)]
#[path = "schema_tests.rs"]
mod tests;
