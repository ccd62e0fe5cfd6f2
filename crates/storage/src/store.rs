// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `Store` — the single-writer handle onto the embedded relational store.
//! All writes funnel through [`LockRetryRegistry::with_lock_retry`] so
//! `SQLITE_BUSY`/`SQLITE_LOCKED` contention between the queue's worker
//! threads backs off instead of surfacing immediately.

use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use dx_core::{Job, JobEvent, JobFile, JobId, JobStatus, RetryRun, Session};
use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension};

use crate::error::StorageError;
use crate::lock_retry::{LockRetryPolicy, LockRetryRegistry, LockRetryStats};
use crate::rows::{job_event_from_row, job_file_from_row, job_from_row, retry_run_from_row, session_from_row};
use crate::schema;

/// Handle onto the embedded store. Cheap to clone: internally an
/// `Arc<Mutex<Connection>>` plus the retry-stat registry, mirroring the
/// teacher's single-writer-region convention.
#[derive(Clone)]
pub struct Store {
    conn: Arc<Mutex<Connection>>,
    retry: Arc<LockRetryRegistry>,
    policy: LockRetryPolicy,
}

impl Store {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let conn = Connection::open(path)?;
        Self::from_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self, StorageError> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self, StorageError> {
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "busy_timeout", 0)?;
        schema::migrate(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            retry: Arc::new(LockRetryRegistry::default()),
            policy: LockRetryPolicy::default(),
        })
    }

    pub fn lock_retry_stats(&self) -> std::collections::HashMap<String, LockRetryStats> {
        self.retry.all_stats()
    }

    fn write<T>(&self, operation: &str, f: impl FnMut(&Connection) -> rusqlite::Result<T>) -> Result<T, StorageError> {
        let conn = self.conn.lock();
        let mut f = f;
        self.retry.with_lock_retry(operation, self.policy, || f(&conn))
    }

    fn read<T>(&self, f: impl FnOnce(&Connection) -> rusqlite::Result<T>) -> Result<T, StorageError> {
        let conn = self.conn.lock();
        Ok(f(&conn)?)
    }

    pub fn insert_job(&self, job: &Job) -> Result<(), StorageError> {
        self.write("insert_job", |conn| {
            conn.execute(
                "INSERT INTO jobs (id, status, input_path, output_dir, requested_format, chunk_size,
                    request_payload, result_payload, session_id, request_hash, idempotency_key, attempt,
                    artifact_dir, dispatch_state, dispatch_attempts, dispatch_next_attempt_at,
                    dispatch_last_error, artifact_sync_state, artifact_sync_attempts, result_checksum,
                    artifact_last_synced_at, created_at, started_at, finished_at, updated_at)
                 VALUES (?1,?2,?3,?4,?5,?6,?7,?8,?9,?10,?11,?12,?13,?14,?15,?16,?17,?18,?19,?20,?21,?22,?23,?24,?25)",
                params![
                    job.id.as_str(),
                    job.status.as_str(),
                    job.input_path,
                    job.output_dir,
                    job.requested_format.as_str(),
                    job.chunk_size,
                    job.request_payload,
                    job.result_payload,
                    job.session_id,
                    job.request_hash,
                    job.idempotency_key,
                    job.attempt,
                    job.artifact_dir,
                    dispatch_state_str(job.dispatch_state),
                    job.dispatch_attempts,
                    job.dispatch_next_attempt_at.map(to_rfc3339),
                    job.dispatch_last_error,
                    artifact_sync_state_str(job.artifact_sync_state),
                    job.artifact_sync_attempts,
                    job.result_checksum,
                    job.artifact_last_synced_at.map(to_rfc3339),
                    to_rfc3339(job.created_at),
                    job.started_at.map(to_rfc3339),
                    job.finished_at.map(to_rfc3339),
                    to_rfc3339(job.updated_at),
                ],
            )
        })?;
        Ok(())
    }

    pub fn update_job(&self, job: &Job) -> Result<(), StorageError> {
        self.write("update_job", |conn| {
            conn.execute(
                "UPDATE jobs SET status=?2, result_payload=?3, session_id=?4, request_hash=?5,
                    attempt=?6, artifact_dir=?7, dispatch_state=?8, dispatch_attempts=?9,
                    dispatch_next_attempt_at=?10, dispatch_last_error=?11, artifact_sync_state=?12,
                    artifact_sync_attempts=?13, result_checksum=?14, artifact_last_synced_at=?15,
                    started_at=?16, finished_at=?17, updated_at=?18
                 WHERE id=?1",
                params![
                    job.id.as_str(),
                    job.status.as_str(),
                    job.result_payload,
                    job.session_id,
                    job.request_hash,
                    job.attempt,
                    job.artifact_dir,
                    dispatch_state_str(job.dispatch_state),
                    job.dispatch_attempts,
                    job.dispatch_next_attempt_at.map(to_rfc3339),
                    job.dispatch_last_error,
                    artifact_sync_state_str(job.artifact_sync_state),
                    job.artifact_sync_attempts,
                    job.result_checksum,
                    job.artifact_last_synced_at.map(to_rfc3339),
                    job.started_at.map(to_rfc3339),
                    job.finished_at.map(to_rfc3339),
                    to_rfc3339(job.updated_at),
                ],
            )
        })?;
        Ok(())
    }

    pub fn get_job(&self, id: &JobId) -> Result<Option<Job>, StorageError> {
        self.read(|conn| {
            conn.query_row("SELECT * FROM jobs WHERE id = ?1", params![id.as_str()], job_from_row).optional()
        })
    }

    pub fn find_job_by_idempotency(&self, idempotency_key: &str, request_hash: &str) -> Result<Option<Job>, StorageError> {
        self.read(|conn| {
            conn.query_row(
                "SELECT * FROM jobs WHERE idempotency_key = ?1 AND request_hash = ?2",
                params![idempotency_key, request_hash],
                job_from_row,
            )
            .optional()
        })
    }

    pub fn list_jobs_by_status(&self, status: JobStatus) -> Result<Vec<Job>, StorageError> {
        self.read(|conn| {
            let mut stmt = conn.prepare("SELECT * FROM jobs WHERE status = ?1 ORDER BY created_at")?;
            let rows = stmt.query_map(params![status.as_str()], job_from_row)?;
            rows.collect()
        })
    }

    pub fn list_jobs_due_for_dispatch(&self, now: DateTime<Utc>) -> Result<Vec<Job>, StorageError> {
        self.read(|conn| {
            let mut stmt = conn.prepare(
                "SELECT * FROM jobs WHERE dispatch_state IN ('pending_dispatch', 'retrying')
                 AND (dispatch_next_attempt_at IS NULL OR dispatch_next_attempt_at <= ?1)
                 ORDER BY created_at",
            )?;
            let rows = stmt.query_map(params![to_rfc3339(now)], job_from_row)?;
            rows.collect()
        })
    }

    pub fn insert_job_file(&self, file: &JobFile) -> Result<(), StorageError> {
        self.write("insert_job_file", |conn| {
            conn.execute(
                "INSERT INTO job_files (job_id, source_path, normalized_source_path, status,
                    output_path, chunk_count, retry_count, error_type, error_message)
                 VALUES (?1,?2,?3,?4,?5,?6,?7,?8,?9)",
                params![
                    file.job_id.as_str(),
                    file.source_path,
                    file.normalized_source_path,
                    file.status.as_str(),
                    file.output_path,
                    file.chunk_count,
                    file.retry_count,
                    file.error_type,
                    file.error_message,
                ],
            )
        })?;
        Ok(())
    }

    pub fn update_job_file(&self, file: &JobFile) -> Result<(), StorageError> {
        self.write("update_job_file", |conn| {
            conn.execute(
                "UPDATE job_files SET status=?3, output_path=?4, chunk_count=?5, retry_count=?6,
                    error_type=?7, error_message=?8
                 WHERE job_id=?1 AND normalized_source_path=?2",
                params![
                    file.job_id.as_str(),
                    file.normalized_source_path,
                    file.status.as_str(),
                    file.output_path,
                    file.chunk_count,
                    file.retry_count,
                    file.error_type,
                    file.error_message,
                ],
            )
        })?;
        Ok(())
    }

    pub fn list_job_files(&self, job_id: &JobId) -> Result<Vec<JobFile>, StorageError> {
        self.read(|conn| {
            let mut stmt =
                conn.prepare("SELECT * FROM job_files WHERE job_id = ?1 ORDER BY normalized_source_path")?;
            let rows = stmt.query_map(params![job_id.as_str()], job_file_from_row)?;
            rows.collect()
        })
    }

    pub fn append_job_event(&self, event: &JobEvent) -> Result<(), StorageError> {
        let payload = serde_json::to_string(&event.payload)?;
        self.write("append_job_event", |conn| {
            conn.execute(
                "INSERT INTO job_events (job_id, event_type, message, payload, event_time)
                 VALUES (?1,?2,?3,?4,?5)",
                params![event.job_id.as_str(), event.event_type, event.message, payload, to_rfc3339(event.event_time)],
            )
        })?;
        Ok(())
    }

    pub fn list_job_events(&self, job_id: &JobId) -> Result<Vec<JobEvent>, StorageError> {
        self.read(|conn| {
            let mut stmt = conn.prepare("SELECT * FROM job_events WHERE job_id = ?1 ORDER BY event_time, id")?;
            let rows = stmt.query_map(params![job_id.as_str()], job_event_from_row)?;
            rows.collect()
        })
    }

    pub fn upsert_session(&self, session: &Session) -> Result<(), StorageError> {
        self.write("upsert_session", |conn| {
            conn.execute(
                "INSERT INTO sessions (session_id, source_directory, status, total_files,
                    processed_count, failed_count, artifact_dir, is_archived, archived_at,
                    projection_source, projection_error, last_reconciled_at, updated_at)
                 VALUES (?1,?2,?3,?4,?5,?6,?7,?8,?9,?10,?11,?12,?13)
                 ON CONFLICT(session_id) DO UPDATE SET
                    status=excluded.status, total_files=excluded.total_files,
                    processed_count=excluded.processed_count, failed_count=excluded.failed_count,
                    artifact_dir=excluded.artifact_dir, is_archived=excluded.is_archived,
                    archived_at=excluded.archived_at, projection_source=excluded.projection_source,
                    projection_error=excluded.projection_error, last_reconciled_at=excluded.last_reconciled_at,
                    updated_at=excluded.updated_at",
                params![
                    session.session_id,
                    session.source_directory,
                    session.status,
                    session.total_files,
                    session.processed_count,
                    session.failed_count,
                    session.artifact_dir,
                    session.is_archived,
                    session.archived_at.map(to_rfc3339),
                    session.projection_source.as_str(),
                    session.projection_error,
                    session.last_reconciled_at.map(to_rfc3339),
                    to_rfc3339(session.updated_at),
                ],
            )
        })?;
        Ok(())
    }

    pub fn get_session(&self, session_id: &str) -> Result<Option<Session>, StorageError> {
        self.read(|conn| {
            conn.query_row("SELECT * FROM sessions WHERE session_id = ?1", params![session_id], session_from_row)
                .optional()
        })
    }

    pub fn insert_retry_run(&self, run: &RetryRun) -> Result<i64, StorageError> {
        self.write("insert_retry_run", |conn| {
            conn.execute(
                "INSERT INTO retry_runs (job_id, source_session_id, status, requested_at, completed_at)
                 VALUES (?1,?2,?3,?4,?5)",
                params![
                    run.job_id.as_str(),
                    run.source_session_id,
                    run.status,
                    to_rfc3339(run.requested_at),
                    run.completed_at.map(to_rfc3339),
                ],
            )?;
            Ok(conn.last_insert_rowid())
        })
    }

    pub fn update_retry_run_status(&self, id: i64, status: &str, completed_at: Option<DateTime<Utc>>) -> Result<(), StorageError> {
        self.write("update_retry_run_status", |conn| {
            conn.execute(
                "UPDATE retry_runs SET status=?2, completed_at=?3 WHERE id=?1",
                params![id, status, completed_at.map(to_rfc3339)],
            )
        })?;
        Ok(())
    }

    pub fn list_retry_runs(&self, job_id: &JobId) -> Result<Vec<RetryRun>, StorageError> {
        self.read(|conn| {
            let mut stmt = conn.prepare("SELECT * FROM retry_runs WHERE job_id = ?1 ORDER BY requested_at")?;
            let rows = stmt.query_map(params![job_id.as_str()], retry_run_from_row)?;
            rows.collect()
        })
    }

    pub fn get_setting(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.read(|conn| {
            conn.query_row("SELECT value FROM app_settings WHERE key = ?1", params![key], |r| r.get(0)).optional()
        })
    }

    pub fn set_setting(&self, key: &str, value: &str, now: DateTime<Utc>) -> Result<(), StorageError> {
        self.write("set_setting", |conn| {
            conn.execute(
                "INSERT INTO app_settings (key, value, updated_at) VALUES (?1,?2,?3)
                 ON CONFLICT(key) DO UPDATE SET value=excluded.value, updated_at=excluded.updated_at",
                params![key, value, to_rfc3339(now)],
            )
        })?;
        Ok(())
    }
}

fn to_rfc3339(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}

fn dispatch_state_str(s: dx_core::DispatchState) -> &'static str {
    use dx_core::DispatchState::*;
    match s {
        PendingDispatch => "pending_dispatch",
        Dispatched => "dispatched",
        Retrying => "retrying",
        FailedDispatch => "failed_dispatch",
    }
}

fn artifact_sync_state_str(s: dx_core::ArtifactSyncState) -> &'static str {
    use dx_core::ArtifactSyncState::*;
    match s {
        Pending => "pending",
        Synced => "synced",
        Error => "error",
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
