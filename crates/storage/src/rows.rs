// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Conversions between `rusqlite::Row` and the durable structs in
//! `dx_core::model`. Enums persist as their `snake_case` tag strings;
//! timestamps persist as RFC3339 text; `Job::request_payload` is stored
//! verbatim JSON text rather than re-parsed here, since callers already hold
//! a typed `ProcessJobRequest` before they ever reach the store.

use chrono::{DateTime, Utc};
use dx_core::{
    ArtifactSyncState, DispatchState, Job, JobEvent, JobFile, JobFileStatus, JobId, JobStatus,
    OutputFormat, ProjectionSource, RetryRun, Session,
};
use rusqlite::{Error as SqlError, Row};

use crate::error::StorageError;

fn malformed(table: &'static str, reason: impl Into<String>) -> StorageError {
    StorageError::MalformedRow { table, reason: reason.into() }
}

pub(crate) fn parse_timestamp(table: &'static str, column: &str, text: &str) -> Result<DateTime<Utc>, StorageError> {
    DateTime::parse_from_rfc3339(text)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| malformed(table, format!("column '{column}' is not RFC3339: {e}")))
}

pub(crate) fn parse_opt_timestamp(
    table: &'static str,
    column: &str,
    text: Option<String>,
) -> Result<Option<DateTime<Utc>>, StorageError> {
    text.map(|t| parse_timestamp(table, column, &t)).transpose()
}

pub(crate) fn job_status(table: &'static str, s: &str) -> Result<JobStatus, StorageError> {
    match s {
        "queued" => Ok(JobStatus::Queued),
        "running" => Ok(JobStatus::Running),
        "completed" => Ok(JobStatus::Completed),
        "partial" => Ok(JobStatus::Partial),
        "failed" => Ok(JobStatus::Failed),
        other => Err(malformed(table, format!("unknown status '{other}'"))),
    }
}

pub(crate) fn dispatch_state(table: &'static str, s: &str) -> Result<DispatchState, StorageError> {
    match s {
        "pending_dispatch" => Ok(DispatchState::PendingDispatch),
        "dispatched" => Ok(DispatchState::Dispatched),
        "retrying" => Ok(DispatchState::Retrying),
        "failed_dispatch" => Ok(DispatchState::FailedDispatch),
        other => Err(malformed(table, format!("unknown dispatch_state '{other}'"))),
    }
}

pub(crate) fn artifact_sync_state(table: &'static str, s: &str) -> Result<ArtifactSyncState, StorageError> {
    match s {
        "pending" => Ok(ArtifactSyncState::Pending),
        "synced" => Ok(ArtifactSyncState::Synced),
        "error" => Ok(ArtifactSyncState::Error),
        other => Err(malformed(table, format!("unknown artifact_sync_state '{other}'"))),
    }
}

pub(crate) fn output_format(table: &'static str, s: &str) -> Result<OutputFormat, StorageError> {
    OutputFormat::parse(s).ok_or_else(|| malformed(table, format!("unknown requested_format '{s}'")))
}

pub(crate) fn job_file_status(table: &'static str, s: &str) -> Result<JobFileStatus, StorageError> {
    match s {
        "pending" => Ok(JobFileStatus::Pending),
        "processed" => Ok(JobFileStatus::Processed),
        "failed" => Ok(JobFileStatus::Failed),
        "skipped" => Ok(JobFileStatus::Skipped),
        other => Err(malformed(table, format!("unknown job_file status '{other}'"))),
    }
}

pub(crate) fn projection_source(table: &'static str, s: &str) -> Result<ProjectionSource, StorageError> {
    match s {
        "sidecar" => Ok(ProjectionSource::Sidecar),
        "result_payload" => Ok(ProjectionSource::ResultPayload),
        "startup_reconcile" => Ok(ProjectionSource::StartupReconcile),
        other => Err(malformed(table, format!("unknown projection_source '{other}'"))),
    }
}

pub(crate) fn job_from_row(row: &Row<'_>) -> Result<Job, SqlError> {
    const T: &str = "jobs";
    let status_s: String = row.get("status")?;
    let format_s: String = row.get("requested_format")?;
    let dispatch_s: String = row.get("dispatch_state")?;
    let sync_s: String = row.get("artifact_sync_state")?;
    let created_s: String = row.get("created_at")?;
    let updated_s: String = row.get("updated_at")?;
    let started_s: Option<String> = row.get("started_at")?;
    let finished_s: Option<String> = row.get("finished_at")?;
    let next_attempt_s: Option<String> = row.get("dispatch_next_attempt_at")?;
    let synced_s: Option<String> = row.get("artifact_last_synced_at")?;

    let to_sql_err = |e: StorageError| SqlError::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e));

    Ok(Job {
        id: JobId::new(row.get::<_, String>("id")?),
        status: job_status(T, &status_s).map_err(to_sql_err)?,
        input_path: row.get("input_path")?,
        output_dir: row.get("output_dir")?,
        requested_format: output_format(T, &format_s).map_err(to_sql_err)?,
        chunk_size: row.get("chunk_size")?,
        request_payload: row.get("request_payload")?,
        result_payload: row.get("result_payload")?,
        session_id: row.get("session_id")?,
        request_hash: row.get("request_hash")?,
        idempotency_key: row.get("idempotency_key")?,
        attempt: row.get("attempt")?,
        artifact_dir: row.get("artifact_dir")?,
        dispatch_state: dispatch_state(T, &dispatch_s).map_err(to_sql_err)?,
        dispatch_attempts: row.get("dispatch_attempts")?,
        dispatch_next_attempt_at: parse_opt_timestamp(T, "dispatch_next_attempt_at", next_attempt_s)
            .map_err(to_sql_err)?,
        dispatch_last_error: row.get("dispatch_last_error")?,
        artifact_sync_state: artifact_sync_state(T, &sync_s).map_err(to_sql_err)?,
        artifact_sync_attempts: row.get("artifact_sync_attempts")?,
        result_checksum: row.get("result_checksum")?,
        artifact_last_synced_at: parse_opt_timestamp(T, "artifact_last_synced_at", synced_s).map_err(to_sql_err)?,
        created_at: parse_timestamp(T, "created_at", &created_s).map_err(to_sql_err)?,
        started_at: parse_opt_timestamp(T, "started_at", started_s).map_err(to_sql_err)?,
        finished_at: parse_opt_timestamp(T, "finished_at", finished_s).map_err(to_sql_err)?,
        updated_at: parse_timestamp(T, "updated_at", &updated_s).map_err(to_sql_err)?,
    })
}

pub(crate) fn job_file_from_row(row: &Row<'_>) -> Result<JobFile, SqlError> {
    const T: &str = "job_files";
    let status_s: String = row.get("status")?;
    let to_sql_err = |e: StorageError| SqlError::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e));
    Ok(JobFile {
        job_id: JobId::new(row.get::<_, String>("job_id")?),
        source_path: row.get("source_path")?,
        normalized_source_path: row.get("normalized_source_path")?,
        status: job_file_status(T, &status_s).map_err(to_sql_err)?,
        output_path: row.get("output_path")?,
        chunk_count: row.get("chunk_count")?,
        retry_count: row.get("retry_count")?,
        error_type: row.get("error_type")?,
        error_message: row.get("error_message")?,
    })
}

pub(crate) fn job_event_from_row(row: &Row<'_>) -> Result<JobEvent, SqlError> {
    const T: &str = "job_events";
    let payload_s: String = row.get("payload")?;
    let time_s: String = row.get("event_time")?;
    let to_sql_err = |e: StorageError| SqlError::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e));
    let payload: serde_json::Value = serde_json::from_str(&payload_s)
        .map_err(|e| malformed(T, format!("column 'payload' is not valid JSON: {e}")))
        .map_err(to_sql_err)?;
    Ok(JobEvent {
        job_id: JobId::new(row.get::<_, String>("job_id")?),
        event_type: row.get("event_type")?,
        message: row.get("message")?,
        payload,
        event_time: parse_timestamp(T, "event_time", &time_s).map_err(to_sql_err)?,
    })
}

pub(crate) fn session_from_row(row: &Row<'_>) -> Result<Session, SqlError> {
    const T: &str = "sessions";
    let projection_s: String = row.get("projection_source")?;
    let archived_s: Option<String> = row.get("archived_at")?;
    let reconciled_s: Option<String> = row.get("last_reconciled_at")?;
    let updated_s: String = row.get("updated_at")?;
    let to_sql_err = |e: StorageError| SqlError::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e));
    Ok(Session {
        session_id: row.get("session_id")?,
        source_directory: row.get("source_directory")?,
        status: row.get("status")?,
        total_files: row.get("total_files")?,
        processed_count: row.get("processed_count")?,
        failed_count: row.get("failed_count")?,
        artifact_dir: row.get("artifact_dir")?,
        is_archived: row.get("is_archived")?,
        archived_at: parse_opt_timestamp(T, "archived_at", archived_s).map_err(to_sql_err)?,
        projection_source: projection_source(T, &projection_s).map_err(to_sql_err)?,
        projection_error: row.get("projection_error")?,
        last_reconciled_at: parse_opt_timestamp(T, "last_reconciled_at", reconciled_s).map_err(to_sql_err)?,
        updated_at: parse_timestamp(T, "updated_at", &updated_s).map_err(to_sql_err)?,
    })
}

pub(crate) fn retry_run_from_row(row: &Row<'_>) -> Result<RetryRun, SqlError> {
    const T: &str = "retry_runs";
    let requested_s: String = row.get("requested_at")?;
    let completed_s: Option<String> = row.get("completed_at")?;
    let to_sql_err = |e: StorageError| SqlError::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e));
    Ok(RetryRun {
        job_id: JobId::new(row.get::<_, String>("job_id")?),
        source_session_id: row.get("source_session_id")?,
        status: row.get("status")?,
        requested_at: parse_timestamp(T, "requested_at", &requested_s).map_err(to_sql_err)?,
        completed_at: parse_opt_timestamp(T, "completed_at", completed_s).map_err(to_sql_err)?,
    })
}

#[cfg(test)]
#[path = "rows_tests.rs"]
mod tests;
