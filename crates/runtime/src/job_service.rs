// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job Service (§4.8): turns a `ProcessJobRequest` into a durable `Job`,
//! applies idempotency, drives discovery and the pipeline, and projects the
//! terminal result into `Job`/`JobFile`/`JobEvent`/`Session` rows.

use std::path::{Path, PathBuf};

use chrono::Utc;
use dx_core::{
    file_hash, normalized_path_text, Job, JobEvent, JobFile, JobFileStatus, JobId, JobStatus,
    OutputFormat, ProjectionSource, Session,
};
use dx_pipeline::IncrementalState;
use dx_storage::Store;
use dx_wire::{request_hash, FileFailure, ProcessJobRequest, ProcessedFileOutcome, ProcessJobResult, StageTimingsMs};
use serde_json::json;

use crate::error::RuntimeError;
use crate::sidecar::SessionSidecar;

/// Build a durable `Job` from `request` and run it to completion against
/// `store`, using `work_dir` for sidecar/incremental state and
/// `pipeline_workers` parallel workers for file processing.
pub fn run_process(
    store: &Store,
    request: &ProcessJobRequest,
    work_dir: &Path,
    pipeline_workers: usize,
) -> Result<ProcessJobResult, RuntimeError> {
    run_process_with_attempt(store, request, work_dir, pipeline_workers, 1)
}

/// Entry point used by the Retry Service (§4.9), which needs to set
/// `attempt = prior_attempt + 1` on the resulting Job.
pub fn run_process_with_attempt(
    store: &Store,
    request: &ProcessJobRequest,
    work_dir: &Path,
    pipeline_workers: usize,
    attempt: u32,
) -> Result<ProcessJobResult, RuntimeError> {
    if request.chunk_size == 0 {
        return Err(RuntimeError::InvalidChunkSize { chunk_size: request.chunk_size });
    }
    let output_format = OutputFormat::parse(&request.output_format)
        .ok_or_else(|| RuntimeError::InvalidOutputFormat { format: request.output_format.clone() })?;

    let hash = request_hash(request);

    if let Some(key) = &request.idempotency_key {
        if let Some(existing) = store.find_job_by_idempotency(key, &hash)? {
            return Ok(replay_result(&existing));
        }
    }

    let output_dir = resolve_output_dir(request, work_dir);
    let (files, source_root) = discover_for_request(request, &output_dir)?;

    let now = Utc::now();
    let job_id = JobId::generate();
    let mut job = Job::new_queued(
        job_id.clone(),
        request.input_path.clone(),
        output_dir.display().to_string(),
        output_format,
        request.chunk_size,
        serde_json::to_string(request)?,
        now,
    );
    job.attempt = attempt;
    job.request_hash = Some(hash.clone());
    job.idempotency_key = request.idempotency_key.clone();
    store.insert_job(&job)?;
    append_event(store, &job_id, "job_queued", "job queued", now)?;

    job.status = JobStatus::Running;
    job.started_at = Some(now);
    job.updated_at = now;
    store.update_job(&job)?;

    let mut incremental_state = if request.incremental {
        IncrementalState::load(work_dir)?
            .unwrap_or_else(|| IncrementalState::new(source_root.display().to_string(), output_dir.display().to_string(), hash.clone(), now))
    } else {
        IncrementalState::new(source_root.display().to_string(), output_dir.display().to_string(), hash.clone(), now)
    };

    let mut to_process = Vec::new();
    let mut skipped = Vec::new();
    for file in &files {
        let normalized = normalized_path_text(file);
        if request.incremental && !request.force {
            let content_hash = file_hash(file).unwrap_or_default();
            if !incremental_state.is_stale(&normalized, &content_hash) {
                skipped.push(file.clone());
                continue;
            }
        }
        to_process.push(file.clone());
    }

    for file in &skipped {
        let job_file = JobFile {
            job_id: job_id.clone(),
            source_path: file.display().to_string(),
            normalized_source_path: normalized_path_text(file),
            status: JobFileStatus::Skipped,
            output_path: None,
            chunk_count: 0,
            retry_count: 0,
            error_type: None,
            error_message: None,
        };
        store.insert_job_file(&job_file)?;
    }
    for file in &to_process {
        let job_file = JobFile {
            job_id: job_id.clone(),
            source_path: file.display().to_string(),
            normalized_source_path: normalized_path_text(file),
            status: JobFileStatus::Pending,
            output_path: None,
            chunk_count: 0,
            retry_count: 0,
            error_type: None,
            error_message: None,
        };
        store.insert_job_file(&job_file)?;
        append_event(store, &job_id, "file_started", &file.display().to_string(), Utc::now())?;
    }

    let run = dx_pipeline::process_files(
        &to_process,
        &output_dir,
        output_format,
        request.chunk_size,
        request.include_semantic,
        &source_root,
        pipeline_workers,
        request.continue_on_error,
    );

    for outcome in &run.processed {
        let job_file = JobFile {
            job_id: job_id.clone(),
            source_path: outcome.path.clone(),
            normalized_source_path: normalized_path_text(&outcome.path),
            status: JobFileStatus::Processed,
            output_path: Some(outcome.output_path.clone()),
            chunk_count: outcome.chunk_count,
            retry_count: 0,
            error_type: None,
            error_message: None,
        };
        store.update_job_file(&job_file)?;
        append_event(store, &job_id, "file_completed", &outcome.path, Utc::now())?;

        let content_hash = file_hash(&outcome.path).unwrap_or_default();
        let size_bytes = std::fs::metadata(&outcome.path).map(|m| m.len()).unwrap_or(0);
        incremental_state.record(normalized_path_text(&outcome.path), content_hash, outcome.output_path.clone(), size_bytes, Utc::now());
    }
    for failure in &run.failed {
        let job_file = JobFile {
            job_id: job_id.clone(),
            source_path: failure.path.clone(),
            normalized_source_path: normalized_path_text(&failure.path),
            status: JobFileStatus::Failed,
            output_path: None,
            chunk_count: 0,
            retry_count: failure.retry_count,
            error_type: Some(failure.error_type.clone()),
            error_message: Some(failure.error_message.clone()),
        };
        store.update_job_file(&job_file)?;
        append_event(store, &job_id, "file_failed", &format!("{}: {}", failure.path, failure.error_message), Utc::now())?;
    }

    if request.incremental {
        incremental_state.save(work_dir)?;
    }

    let processed_count = run.processed.len() as u32;
    let failed_count = run.failed.len() as u32;
    let skipped_count = skipped.len() as u32;
    let total_files = files.len() as u32;

    let status = terminal_status(processed_count, failed_count, total_files);
    let finished_at = Utc::now();
    let exit_code = dx_wire::determine_exit_code(total_files, processed_count, failed_count, false).code();

    let session_id = job_id.as_str().to_string();
    let result = ProcessJobResult {
        job_id: job_id.as_str().to_string(),
        status,
        total_files,
        processed_count,
        failed_count,
        skipped_count,
        output_dir: output_dir.display().to_string(),
        session_id: Some(session_id.clone()),
        processed_files: run.processed,
        failed_files: run.failed,
        stage_totals_ms: run.stage_totals_ms,
        started_at: now,
        finished_at,
        exit_code,
    };

    job.status = status;
    job.result_payload = Some(serde_json::to_string(&result)?);
    job.session_id = Some(session_id.clone());
    job.finished_at = Some(finished_at);
    job.updated_at = finished_at;
    job.artifact_sync_state = dx_core::ArtifactSyncState::Synced;
    job.artifact_last_synced_at = Some(finished_at);
    store.update_job(&job)?;
    append_event(store, &job_id, "job_finished", status.as_str(), finished_at)?;

    project_session(store, work_dir, &result, &source_root)?;

    Ok(result)
}

fn terminal_status(processed_count: u32, failed_count: u32, total_files: u32) -> JobStatus {
    if failed_count == 0 && processed_count > 0 {
        JobStatus::Completed
    } else if processed_count > 0 && failed_count > 0 {
        JobStatus::Partial
    } else if processed_count == 0 && failed_count > 0 {
        JobStatus::Failed
    } else {
        // Every discovered file was skipped by incremental reprocessing: a
        // no-op run, not a failure.
        let _ = total_files;
        JobStatus::Completed
    }
}

/// An existing Job matched on `(idempotency_key, request_hash)` is replayed
/// verbatim (§3's uniqueness invariant means this is the only sound reading
/// of a repeat submission, terminal or not).
fn replay_result(job: &Job) -> ProcessJobResult {
    if let Some(payload) = &job.result_payload {
        if let Ok(result) = serde_json::from_str::<ProcessJobResult>(payload) {
            return result;
        }
    }
    ProcessJobResult {
        job_id: job.id.as_str().to_string(),
        status: job.status,
        total_files: 0,
        processed_count: 0,
        failed_count: 0,
        skipped_count: 0,
        output_dir: job.output_dir.clone(),
        session_id: job.session_id.clone(),
        processed_files: Vec::new(),
        failed_files: Vec::new(),
        stage_totals_ms: StageTimingsMs::default(),
        started_at: job.started_at.unwrap_or(job.created_at),
        finished_at: job.finished_at.unwrap_or(job.created_at),
        exit_code: 0,
    }
}

fn resolve_output_dir(request: &ProcessJobRequest, work_dir: &Path) -> PathBuf {
    match &request.output_path {
        Some(path) => PathBuf::from(path),
        None => work_dir.join("output"),
    }
}

fn discover_for_request(request: &ProcessJobRequest, output_dir: &Path) -> Result<(Vec<PathBuf>, PathBuf), RuntimeError> {
    if !request.source_files.is_empty() {
        let source_root = PathBuf::from(&request.input_path);
        let files: Vec<PathBuf> = request.source_files.iter().map(PathBuf::from).filter(|p| p.is_file()).collect();
        if files.is_empty() {
            return Err(RuntimeError::NoSupportedFiles);
        }
        return Ok((files, source_root));
    }
    let discovery = dx_pipeline::discover(&request.input_path, request.recursive, output_dir)?;
    Ok((discovery.files, discovery.source_root))
}

fn append_event(store: &Store, job_id: &JobId, event_type: &str, message: &str, now: chrono::DateTime<Utc>) -> Result<(), RuntimeError> {
    store.append_job_event(&JobEvent {
        job_id: job_id.clone(),
        event_type: event_type.to_string(),
        message: message.to_string(),
        payload: json!({}),
        event_time: now,
    })?;
    Ok(())
}

fn project_session(store: &Store, work_dir: &Path, result: &ProcessJobResult, source_root: &Path) -> Result<(), RuntimeError> {
    let Some(session_id) = &result.session_id else { return Ok(()) };

    let (source_directory, projection_source) = match SessionSidecar::load(work_dir, session_id)? {
        Some(sidecar) => (sidecar.source_directory, ProjectionSource::Sidecar),
        None => (source_root.display().to_string(), ProjectionSource::ResultPayload),
    };

    store.upsert_session(&Session {
        session_id: session_id.clone(),
        source_directory,
        status: result.status.as_str().to_string(),
        total_files: result.total_files,
        processed_count: result.processed_count,
        failed_count: result.failed_count,
        artifact_dir: Some(result.output_dir.clone()),
        is_archived: false,
        archived_at: None,
        projection_source,
        projection_error: None,
        last_reconciled_at: None,
        updated_at: result.finished_at,
    })?;
    Ok(())
}

#[cfg(test)]
#[path = "job_service_tests.rs"]
mod tests;
