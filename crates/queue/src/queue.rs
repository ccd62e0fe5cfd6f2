// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Local Job Queue (§4.7): a bounded, multi-worker in-process queue.
//!
//! Grounded on `runtime/queue.py`'s `LocalJobQueue`: a `Queue` with a
//! poll-timeout `_run` loop, generalized here to `N` supervised workers with
//! a bounded backlog and a worker-crash restart budget, neither of which the
//! single-worker Python original needed.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::mpsc::{sync_channel, Receiver, RecvTimeoutError, SyncSender};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use parking_lot::Mutex;

use crate::error::QueueError;

const POLL_TIMEOUT: Duration = Duration::from_millis(200);
const STOP_JOIN_TIMEOUT: Duration = Duration::from_secs(2);

pub struct QueuedJob {
    pub job_id: String,
    pub payload: serde_json::Value,
}

/// Snapshot of queue health, per §4.7's `alive_workers`/`worker_restarts`.
#[derive(Debug, Clone, Copy, Default)]
pub struct QueueStats {
    pub alive_workers: usize,
    pub worker_restarts: usize,
}

struct Shared {
    sender: SyncSender<QueuedJob>,
    receiver: Arc<Mutex<Receiver<QueuedJob>>>,
    max_backlog: usize,
    backlog: AtomicUsize,
    stop: AtomicBool,
    alive_workers: AtomicUsize,
    worker_restarts: AtomicUsize,
    restart_budget: usize,
}

/// A bounded, multi-worker in-process job queue.
///
/// `H` is the per-job handler; `E` is the error-reporting callback invoked
/// when a handler returns `Err` without killing the worker that ran it.
pub struct LocalJobQueue {
    shared: Arc<Shared>,
    workers: Mutex<Vec<JoinHandle<()>>>,
}

impl LocalJobQueue {
    pub fn new(max_backlog: usize, restart_budget: usize) -> Self {
        let (sender, receiver) = sync_channel(max_backlog.max(1));
        Self {
            shared: Arc::new(Shared {
                sender,
                receiver: Arc::new(Mutex::new(receiver)),
                max_backlog,
                backlog: AtomicUsize::new(0),
                stop: AtomicBool::new(false),
                alive_workers: AtomicUsize::new(0),
                worker_restarts: AtomicUsize::new(0),
                restart_budget,
            }),
            workers: Mutex::new(Vec::new()),
        }
    }

    /// Queue a job for background execution, failing with `QueueFull` when
    /// the backlog is already at `max_backlog` (§4.7).
    pub fn submit(&self, job_id: impl Into<String>, payload: serde_json::Value) -> Result<(), QueueError> {
        if self.shared.backlog.load(Ordering::SeqCst) >= self.shared.max_backlog {
            return Err(QueueError::QueueFull { max_backlog: self.shared.max_backlog });
        }
        self.shared.backlog.fetch_add(1, Ordering::SeqCst);
        let job_id = job_id.into();
        if self.shared.sender.try_send(QueuedJob { job_id: job_id.clone(), payload }).is_err() {
            self.shared.backlog.fetch_sub(1, Ordering::SeqCst);
            return Err(QueueError::QueueFull { max_backlog: self.shared.max_backlog });
        }
        tracing::debug!(job_id, "job submitted");
        Ok(())
    }

    /// Launch `worker_count` supervised workers. `handler` runs on whichever
    /// worker dequeues a job; a handler that returns `Err` is trapped and
    /// reported to `error_handler` without exiting the worker (§4.7).
    pub fn start<H, E>(&self, worker_count: usize, handler: H, error_handler: E)
    where
        H: Fn(&str, &serde_json::Value) -> Result<(), String> + Send + Sync + 'static,
        E: Fn(&str, &str) + Send + Sync + 'static,
    {
        self.shared.stop.store(false, Ordering::SeqCst);
        let handler = Arc::new(handler);
        let error_handler = Arc::new(error_handler);
        let mut workers = self.workers.lock();
        for id in 0..worker_count {
            workers.push(spawn_worker(id, Arc::clone(&self.shared), Arc::clone(&handler), Arc::clone(&error_handler)));
        }
    }

    /// Signal shutdown and join workers with a short timeout (§4.7). Workers
    /// finish their current task before observing the stop flag.
    pub fn stop(&self) {
        self.shared.stop.store(true, Ordering::SeqCst);
        let deadline = std::time::Instant::now() + STOP_JOIN_TIMEOUT;
        let mut workers = self.workers.lock();
        for worker in workers.drain(..) {
            let remaining = deadline.saturating_duration_since(std::time::Instant::now());
            if remaining.is_zero() {
                break;
            }
            // JoinHandle has no timed join; a supervised worker loop observes
            // `stop` within one poll interval, so this returns promptly.
            let _ = worker.join();
        }
    }

    pub fn stats(&self) -> QueueStats {
        QueueStats {
            alive_workers: self.shared.alive_workers.load(Ordering::SeqCst),
            worker_restarts: self.shared.worker_restarts.load(Ordering::SeqCst),
        }
    }
}

fn spawn_worker<H, E>(id: usize, shared: Arc<Shared>, handler: Arc<H>, error_handler: Arc<E>) -> JoinHandle<()>
where
    H: Fn(&str, &serde_json::Value) -> Result<(), String> + Send + Sync + 'static,
    E: Fn(&str, &str) + Send + Sync + 'static,
{
    std::thread::Builder::new()
        .name(format!("dx-job-worker-{id}"))
        .spawn(move || worker_loop(id, shared, handler, error_handler))
        .unwrap_or_else(|e| panic!("failed to spawn worker thread {id}: {e}"))
}

fn worker_loop<H, E>(id: usize, shared: Arc<Shared>, handler: Arc<H>, error_handler: Arc<E>)
where
    H: Fn(&str, &serde_json::Value) -> Result<(), String> + Send + Sync + 'static,
    E: Fn(&str, &str) + Send + Sync + 'static,
{
    shared.alive_workers.fetch_add(1, Ordering::SeqCst);
    let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        run_until_stopped(&shared, handler.as_ref(), error_handler.as_ref());
    }));
    shared.alive_workers.fetch_sub(1, Ordering::SeqCst);

    if outcome.is_err() {
        tracing::error!(worker_id = id, "worker thread panicked");
        if shared.worker_restarts.load(Ordering::SeqCst) < shared.restart_budget && !shared.stop.load(Ordering::SeqCst)
        {
            shared.worker_restarts.fetch_add(1, Ordering::SeqCst);
            tracing::info!(worker_id = id, "restarting crashed worker");
            let replacement = spawn_worker(id, shared, handler, error_handler);
            // Detach: the replacement is supervised independently and is not
            // tracked by the caller's `workers` vec, matching the crash-
            // recovery contract that `stop()` still drains via the stop flag.
            drop(replacement);
        }
    }
}

fn run_until_stopped<H, E>(shared: &Shared, handler: &H, error_handler: &E)
where
    H: Fn(&str, &serde_json::Value) -> Result<(), String>,
    E: Fn(&str, &str),
{
    loop {
        if shared.stop.load(Ordering::SeqCst) {
            return;
        }
        let received = {
            let receiver = shared.receiver.lock();
            receiver.recv_timeout(POLL_TIMEOUT)
        };
        let job = match received {
            Ok(job) => job,
            Err(RecvTimeoutError::Timeout) => continue,
            Err(RecvTimeoutError::Disconnected) => return,
        };
        shared.backlog.fetch_sub(1, Ordering::SeqCst);
        if let Err(message) = handler(&job.job_id, &job.payload) {
            tracing::warn!(job_id = %job.job_id, error = %message, "job handler failed");
            error_handler(&job.job_id, &message);
        }
    }
}

#[cfg(test)]
#[path = "queue_tests.rs"]
mod tests;
