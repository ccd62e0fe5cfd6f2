// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `with_lock_retry(op, retries, backoff_ms, operation_name)` — replaces the
//! "retry and backoff as decorators" pattern of the original implementation
//! with an explicit helper the single-writer region invokes (see design notes).

use parking_lot::Mutex;
use rusqlite::ErrorCode;
use std::collections::HashMap;
use std::thread;
use std::time::Duration;

use crate::error::StorageError;

/// Bounded retry schedule for write operations that collide with another
/// writer. Fixed at 5 retries, exponential backoff starting at 10ms per the
/// Open Question decision recorded in SPEC_FULL.md.
#[derive(Debug, Clone, Copy)]
pub struct LockRetryPolicy {
    pub max_retries: u32,
    pub base_backoff_ms: u64,
}

impl Default for LockRetryPolicy {
    fn default() -> Self {
        Self { max_retries: 5, base_backoff_ms: 10 }
    }
}

/// Observable counters for one named operation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LockRetryStats {
    pub retries: u64,
    pub successes: u64,
    pub failures: u64,
}

#[derive(Debug, Default)]
pub(crate) struct LockRetryRegistry {
    stats: Mutex<HashMap<String, LockRetryStats>>,
}

impl LockRetryRegistry {
    pub(crate) fn stats_for(&self, operation: &str) -> LockRetryStats {
        self.stats.lock().get(operation).copied().unwrap_or_default()
    }

    pub(crate) fn all_stats(&self) -> HashMap<String, LockRetryStats> {
        self.stats.lock().clone()
    }

    fn record_retry(&self, operation: &str) {
        self.stats.lock().entry(operation.to_string()).or_default().retries += 1;
    }

    fn record_success(&self, operation: &str) {
        self.stats.lock().entry(operation.to_string()).or_default().successes += 1;
    }

    fn record_failure(&self, operation: &str) {
        self.stats.lock().entry(operation.to_string()).or_default().failures += 1;
    }

    /// Run `f`, retrying on `SQLITE_BUSY`/`SQLITE_LOCKED` with exponential
    /// backoff up to `policy.max_retries` attempts.
    pub(crate) fn with_lock_retry<T>(
        &self,
        operation: &str,
        policy: LockRetryPolicy,
        mut f: impl FnMut() -> Result<T, rusqlite::Error>,
    ) -> Result<T, StorageError> {
        let mut attempt = 0;
        loop {
            match f() {
                Ok(value) => {
                    self.record_success(operation);
                    return Ok(value);
                }
                Err(err) if is_contention(&err) && attempt < policy.max_retries => {
                    self.record_retry(operation);
                    let backoff = policy.base_backoff_ms * (1u64 << attempt);
                    tracing::debug!(operation, attempt, backoff_ms = backoff, "retrying contended write");
                    thread::sleep(Duration::from_millis(backoff));
                    attempt += 1;
                }
                Err(err) if is_contention(&err) => {
                    self.record_failure(operation);
                    return Err(StorageError::Contention { operation: operation.to_string(), retries: attempt });
                }
                Err(err) => {
                    self.record_failure(operation);
                    return Err(StorageError::Sqlite(err));
                }
            }
        }
    }
}

fn is_contention(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(ffi_err, _)
            if matches!(ffi_err.code, ErrorCode::DatabaseBusy | ErrorCode::DatabaseLocked)
    )
}

#[cfg(test)]
#[path = "lock_retry_tests.rs"]
mod tests;
