// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use rusqlite::ffi;

fn busy_error() -> rusqlite::Error {
    rusqlite::Error::SqliteFailure(
        ffi::Error { code: ErrorCode::DatabaseBusy, extended_code: 5 },
        Some("database is locked".to_string()),
    )
}

#[test]
fn succeeds_on_first_try_without_retry() {
    let registry = LockRetryRegistry::default();
    let result = registry.with_lock_retry("op", LockRetryPolicy::default(), || Ok::<_, rusqlite::Error>(42));
    assert_eq!(result.unwrap(), 42);
    assert_eq!(registry.stats_for("op"), LockRetryStats { retries: 0, successes: 1, failures: 0 });
}

#[test]
fn retries_on_contention_then_succeeds() {
    let registry = LockRetryRegistry::default();
    let policy = LockRetryPolicy { max_retries: 5, base_backoff_ms: 0 };
    let mut calls = 0;
    let result = registry.with_lock_retry("op", policy, || {
        calls += 1;
        if calls < 3 {
            Err(busy_error())
        } else {
            Ok(7)
        }
    });
    assert_eq!(result.unwrap(), 7);
    let stats = registry.stats_for("op");
    assert_eq!(stats.retries, 2);
    assert_eq!(stats.successes, 1);
}

#[test]
fn exhausts_budget_and_reports_contention() {
    let registry = LockRetryRegistry::default();
    let policy = LockRetryPolicy { max_retries: 2, base_backoff_ms: 0 };
    let result = registry.with_lock_retry("op", policy, || Err::<(), _>(busy_error()));
    assert!(matches!(result, Err(StorageError::Contention { retries: 2, .. })));
    let stats = registry.stats_for("op");
    assert_eq!(stats.retries, 2);
    assert_eq!(stats.failures, 1);
}

#[test]
fn non_contention_error_is_not_retried() {
    let registry = LockRetryRegistry::default();
    let mut calls = 0;
    let result: Result<(), _> = registry.with_lock_retry("op", LockRetryPolicy::default(), || {
        calls += 1;
        Err(rusqlite::Error::InvalidQuery)
    });
    assert!(result.is_err());
    assert_eq!(calls, 1);
}
