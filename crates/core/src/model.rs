// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Durable entities persisted by the storage layer: `Job`, `JobFile`,
//! `JobEvent`, `Session`, `RetryRun`, `AppSetting`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// Opaque 12-hex job identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JobId(pub String);

impl JobId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a fresh 12-hex id from a uuid v4.
    pub fn generate() -> Self {
        let full = uuid::Uuid::new_v4().simple().to_string();
        Self(full[..12].to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for JobId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for JobId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl Borrow<str> for JobId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Queued,
    Running,
    Completed,
    Partial,
    Failed,
}

impl JobStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Partial | Self::Failed)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Queued => "queued",
            Self::Running => "running",
            Self::Completed => "completed",
            Self::Partial => "partial",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DispatchState {
    PendingDispatch,
    Dispatched,
    Retrying,
    FailedDispatch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactSyncState {
    Pending,
    Synced,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    Json,
    Txt,
    Csv,
}

impl OutputFormat {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Some(Self::Json),
            "txt" => Some(Self::Txt),
            "csv" => Some(Self::Csv),
            _ => None,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Txt => "txt",
            Self::Csv => "csv",
        }
    }

    pub fn as_str(&self) -> &'static str {
        self.extension()
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single processing request's durable record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    pub id: JobId,
    pub status: JobStatus,
    pub input_path: String,
    pub output_dir: String,
    pub requested_format: OutputFormat,
    pub chunk_size: u32,
    pub request_payload: String,
    pub result_payload: Option<String>,
    pub session_id: Option<String>,
    pub request_hash: Option<String>,
    pub idempotency_key: Option<String>,
    pub attempt: u32,
    pub artifact_dir: Option<String>,
    pub dispatch_state: DispatchState,
    pub dispatch_attempts: u32,
    pub dispatch_next_attempt_at: Option<DateTime<Utc>>,
    pub dispatch_last_error: Option<String>,
    pub artifact_sync_state: ArtifactSyncState,
    pub artifact_sync_attempts: u32,
    pub result_checksum: Option<String>,
    pub artifact_last_synced_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub started_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}

impl Job {
    /// Construct a freshly queued job. `attempt` starts at 1 per the §3 invariant.
    pub fn new_queued(
        id: JobId,
        input_path: impl Into<String>,
        output_dir: impl Into<String>,
        requested_format: OutputFormat,
        chunk_size: u32,
        request_payload: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            status: JobStatus::Queued,
            input_path: input_path.into(),
            output_dir: output_dir.into(),
            requested_format,
            chunk_size,
            request_payload: request_payload.into(),
            result_payload: None,
            session_id: None,
            request_hash: None,
            idempotency_key: None,
            attempt: 1,
            artifact_dir: None,
            dispatch_state: DispatchState::PendingDispatch,
            dispatch_attempts: 0,
            dispatch_next_attempt_at: None,
            dispatch_last_error: None,
            artifact_sync_state: ArtifactSyncState::Pending,
            artifact_sync_attempts: 0,
            result_checksum: None,
            artifact_last_synced_at: None,
            created_at: now,
            started_at: None,
            finished_at: None,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobFileStatus {
    Pending,
    Processed,
    Failed,
    Skipped,
}

impl JobFileStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processed => "processed",
            Self::Failed => "failed",
            Self::Skipped => "skipped",
        }
    }
}

/// One row per source file considered for a Job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobFile {
    pub job_id: JobId,
    pub source_path: String,
    pub normalized_source_path: String,
    pub status: JobFileStatus,
    pub output_path: Option<String>,
    pub chunk_count: u32,
    pub retry_count: u32,
    pub error_type: Option<String>,
    pub error_message: Option<String>,
}

/// Append-only progress log row. Never mutated once inserted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobEvent {
    pub job_id: JobId,
    pub event_type: String,
    pub message: String,
    pub payload: serde_json::Value,
    pub event_time: DateTime<Utc>,
}

/// How a [`Session`] row was materialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectionSource {
    Sidecar,
    ResultPayload,
    StartupReconcile,
}

impl ProjectionSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sidecar => "sidecar",
            Self::ResultPayload => "result_payload",
            Self::StartupReconcile => "startup_reconcile",
        }
    }
}

/// Cross-job projection of a logical batch over one source tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub session_id: String,
    pub source_directory: String,
    pub status: String,
    pub total_files: u32,
    pub processed_count: u32,
    pub failed_count: u32,
    pub artifact_dir: Option<String>,
    pub is_archived: bool,
    pub archived_at: Option<DateTime<Utc>>,
    pub projection_source: ProjectionSource,
    pub projection_error: Option<String>,
    pub last_reconciled_at: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}

/// Audit row for a retry invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryRun {
    pub job_id: JobId,
    pub source_session_id: Option<String>,
    pub status: String,
    pub requested_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

/// Opaque key/value application setting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSetting {
    pub key: String,
    pub value: String,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
#[path = "model_tests.rs"]
mod tests;
