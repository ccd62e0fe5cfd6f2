// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! API Runtime (§4.11): the collaborator-facing facade. Owns the queue
//! singleton plus the persistence handles, and performs startup recovery —
//! reified per the teacher's `lifecycle::startup` pattern, generalized from
//! its async WAL-replay into a synchronous Job-row reconciliation pass.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::Utc;
use dx_core::{Job, JobEvent, JobId, JobStatus, ProjectionSource, Session};
use dx_queue::LocalJobQueue;
use dx_storage::Store;
use dx_wire::{ProcessJobRequest, ProcessJobResult, RetryRequest};
use parking_lot::Mutex;

use crate::config::Config;
use crate::error::RuntimeError;
use crate::{job_service, retry_service};

/// Tallies produced by the startup recovery pass (§4.11).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecoveryStats {
    pub failed: u32,
    pub requeued: u32,
}

/// A readiness summary the embedding process can publish (e.g. over a health
/// endpoint); tracked in-memory only, mirroring the source's module-level
/// "readiness report" singleton.
#[derive(Debug, Clone, Default)]
pub struct ReadinessReport {
    pub ready: bool,
    pub detail: String,
}

/// Owns the queue and persistence handles for one process. Construct once at
/// startup; `start()` launches workers and runs recovery.
pub struct ApiRuntime {
    store: Arc<Store>,
    queue: Arc<LocalJobQueue>,
    config: Config,
    readiness: Mutex<ReadinessReport>,
}

impl ApiRuntime {
    pub fn new(store: Store, config: Config) -> Self {
        let queue = LocalJobQueue::new(config.queue_max_backlog, config.queue_restart_budget);
        Self { store: Arc::new(store), queue: Arc::new(queue), config, readiness: Mutex::new(ReadinessReport::default()) }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn set_readiness_report(&self, ready: bool, detail: impl Into<String>) {
        *self.readiness.lock() = ReadinessReport { ready, detail: detail.into() };
    }

    pub fn readiness_report(&self) -> ReadinessReport {
        self.readiness.lock().clone()
    }

    /// Launch queue workers and run startup recovery (§4.11). Must be called
    /// once before `enqueue_process`/`enqueue_retry` can make progress.
    pub fn start(&self) -> Result<RecoveryStats, RuntimeError> {
        let store = Arc::clone(&self.store);
        let work_dir = self.config.work_dir.clone();
        let pipeline_workers = self.config.pipeline_workers;
        self.queue.start(
            self.config.queue_worker_count,
            move |_job_id, payload| {
                let request: ProcessJobRequest = serde_json::from_value(payload.clone())
                    .map_err(|e| format!("malformed queued payload: {e}"))?;
                job_service::run_process(&store, &request, &work_dir, pipeline_workers)
                    .map(|_| ())
                    .map_err(|e| e.to_string())
            },
            |job_id, message| {
                tracing::error!(job_id, error = message, "queued job failed");
            },
        );

        recover(&self.store, &self.queue, &self.config.work_dir)
    }

    pub fn stop(&self) {
        self.queue.stop();
    }

    /// Submit a process request to the queue and return immediately with the
    /// `job_id` the caller can poll for completion.
    pub fn enqueue_process(&self, request: &ProcessJobRequest) -> Result<String, RuntimeError> {
        if request.chunk_size == 0 {
            return Err(RuntimeError::InvalidChunkSize { chunk_size: request.chunk_size });
        }
        dx_core::OutputFormat::parse(&request.output_format)
            .ok_or_else(|| RuntimeError::InvalidOutputFormat { format: request.output_format.clone() })?;

        let job_id = JobId::generate();
        let payload = serde_json::to_value(request)?;
        self.queue.submit(job_id.as_str(), payload)?;
        Ok(job_id.as_str().to_string())
    }

    /// Run a retry synchronously; retries are driven by an operator action,
    /// not queued, per §4.9.
    pub fn enqueue_retry(&self, request: &RetryRequest) -> Result<ProcessJobResult, RuntimeError> {
        retry_service::run_retry(&self.store, request, &self.config.work_dir)
    }
}

/// Startup recovery pass (§4.11): abandon `running` Jobs, re-submit `queued`
/// Jobs to the freshly started queue, and rehydrate Session projections.
fn recover(store: &Store, queue: &LocalJobQueue, work_dir: &PathBuf) -> Result<RecoveryStats, RuntimeError> {
    let mut stats = RecoveryStats::default();
    let now = Utc::now();

    for mut job in store.list_jobs_by_status(JobStatus::Running)? {
        job.status = JobStatus::Failed;
        job.finished_at = Some(now);
        job.updated_at = now;
        store.update_job(&job)?;
        store.append_job_event(&JobEvent {
            job_id: job.id.clone(),
            event_type: "error".to_string(),
            message: "abandoned on restart".to_string(),
            payload: serde_json::json!({}),
            event_time: now,
        })?;
        stats.failed += 1;
        reconcile_session(store, work_dir, &job)?;
    }

    for job in store.list_jobs_by_status(JobStatus::Queued)? {
        let payload: ProcessJobRequest = serde_json::from_str(&job.request_payload)?;
        if queue.submit(job.id.as_str(), serde_json::to_value(&payload)?).is_ok() {
            stats.requeued += 1;
        }
    }

    Ok(stats)
}

/// Rehydrate a `Session` row for a Job that has a result payload but no
/// corresponding Session, tagging the projection as `startup_reconcile`.
fn reconcile_session(store: &Store, _work_dir: &std::path::Path, job: &Job) -> Result<(), RuntimeError> {
    let Some(session_id) = &job.session_id else { return Ok(()) };
    if store.get_session(session_id)?.is_some() {
        return Ok(());
    }
    let now = Utc::now();
    store.upsert_session(&Session {
        session_id: session_id.clone(),
        source_directory: job.input_path.clone(),
        status: job.status.as_str().to_string(),
        total_files: 0,
        processed_count: 0,
        failed_count: 0,
        artifact_dir: job.artifact_dir.clone(),
        is_archived: false,
        archived_at: None,
        projection_source: ProjectionSource::StartupReconcile,
        projection_error: Some("abandoned on restart".to_string()),
        last_reconciled_at: Some(now),
        updated_at: now,
    })?;
    Ok(())
}

#[cfg(test)]
#[path = "runtime_tests.rs"]
mod tests;
