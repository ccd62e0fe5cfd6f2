// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Retry Service (§4.9): reopens a prior session's failed files and
//! reinvokes the Job Service against them, relative to the session's
//! recorded `source_directory` rather than the current working directory.

use std::path::Path;

use chrono::Utc;
use dx_core::JobId;
use dx_storage::Store;
use dx_wire::{FileFailure, ProcessJobRequest, ProcessJobResult};

use crate::error::RuntimeError;
use crate::job_service;
use crate::sidecar::SessionSidecar;

struct ResolvedSession {
    source_directory: String,
    output_dir: String,
    format: String,
    failed_files: Vec<FileFailure>,
    prior_attempt: u32,
}

pub fn run_retry(store: &Store, request: &dx_wire::RetryRequest, work_dir: &Path) -> Result<ProcessJobResult, RuntimeError> {
    let session = locate_session(store, work_dir, request)?;
    let session_id = request.session.clone();

    let filtered = filter_failed_files(&session, request.file.as_deref());
    if filtered.is_empty() {
        return Err(RuntimeError::NothingToRetry { session_id: session_id.clone().unwrap_or_default() });
    }

    let mut process_request = ProcessJobRequest::new(session.source_directory.clone());
    process_request.output_path = Some(session.output_dir.clone());
    process_request.output_format =
        if request.output_format.is_empty() { session.format.clone() } else { request.output_format.clone() };
    process_request.chunk_size = if request.chunk_size == 0 { 512 } else { request.chunk_size };
    process_request.non_interactive = request.non_interactive;
    process_request.source_files = filtered;

    let requested_at = Utc::now();
    let outcome = job_service::run_process_with_attempt(store, &process_request, work_dir, 1, session.prior_attempt + 1);

    let (run_job_id, run_status) = match &outcome {
        Ok(result) => (JobId::new(result.job_id.clone()), result.status.as_str().to_string()),
        Err(_) => (JobId::generate(), "failed".to_string()),
    };
    store.insert_retry_run(&dx_core::RetryRun {
        job_id: run_job_id,
        source_session_id: session_id,
        status: run_status,
        requested_at,
        completed_at: Some(Utc::now()),
    })?;

    outcome
}

fn locate_session(store: &Store, work_dir: &Path, request: &dx_wire::RetryRequest) -> Result<ResolvedSession, RuntimeError> {
    let sidecar = if let Some(session_id) = &request.session {
        SessionSidecar::load(work_dir, session_id)?
    } else if request.last {
        SessionSidecar::load_last(work_dir)?
    } else {
        None
    };

    if let Some(sidecar) = sidecar {
        return Ok(ResolvedSession {
            source_directory: sidecar.source_directory,
            output_dir: sidecar.output_dir,
            format: sidecar.format,
            failed_files: sidecar.failed_files,
            prior_attempt: 1,
        });
    }

    // Fall back to the canonical `result_payload.session_id` carried on a Job row.
    let session_id = request.session.as_deref().ok_or(RuntimeError::SessionNotFound)?;
    let job = find_job_by_session_id(store, session_id)?.ok_or(RuntimeError::SessionNotFound)?;
    let result: ProcessJobResult =
        serde_json::from_str(job.result_payload.as_deref().ok_or(RuntimeError::SessionNotFound)?)?;

    Ok(ResolvedSession {
        source_directory: job.input_path.clone(),
        output_dir: result.output_dir,
        format: job.requested_format.as_str().to_string(),
        failed_files: result.failed_files,
        prior_attempt: job.attempt,
    })
}

fn find_job_by_session_id(store: &Store, session_id: &str) -> Result<Option<dx_core::Job>, RuntimeError> {
    use dx_core::JobStatus::*;
    for status in [Queued, Running, Completed, Partial, Failed] {
        for job in store.list_jobs_by_status(status)? {
            if job.session_id.as_deref() == Some(session_id) {
                return Ok(Some(job));
            }
        }
    }
    Ok(None)
}

fn filter_failed_files(session: &ResolvedSession, filter: Option<&str>) -> Vec<String> {
    let Some(filter) = filter else {
        return session.failed_files.iter().map(|f| f.path.clone()).collect();
    };
    let filter = filter.replace('\\', "/");
    session
        .failed_files
        .iter()
        .filter(|f| {
            let relative = Path::new(&f.path)
                .strip_prefix(&session.source_directory)
                .map(|p| p.to_string_lossy().replace('\\', "/"))
                .unwrap_or_else(|_| f.path.clone());
            relative == filter || f.path.replace('\\', "/").ends_with(&filter)
        })
        .map(|f| f.path.clone())
        .collect()
}

#[cfg(test)]
#[path = "retry_service_tests.rs"]
mod tests;
