// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn job_id_generate_is_12_hex_chars() {
    let id = JobId::generate();
    assert_eq!(id.as_str().len(), 12);
    assert!(id.as_str().chars().all(|c| c.is_ascii_hexdigit()));
}

#[test]
fn job_status_terminal_states() {
    assert!(!JobStatus::Queued.is_terminal());
    assert!(!JobStatus::Running.is_terminal());
    assert!(JobStatus::Completed.is_terminal());
    assert!(JobStatus::Partial.is_terminal());
    assert!(JobStatus::Failed.is_terminal());
}

#[test]
fn output_format_parses_case_insensitively() {
    assert_eq!(OutputFormat::parse("JSON"), Some(OutputFormat::Json));
    assert_eq!(OutputFormat::parse("txt"), Some(OutputFormat::Txt));
    assert_eq!(OutputFormat::parse("csv"), Some(OutputFormat::Csv));
    assert_eq!(OutputFormat::parse("xml"), None);
}

#[test]
fn new_queued_job_starts_at_attempt_one() {
    let job = Job::new_queued(
        JobId::new("abc123"),
        "/in",
        "/out",
        OutputFormat::Json,
        512,
        "{}",
        Utc::now(),
    );
    assert_eq!(job.attempt, 1);
    assert_eq!(job.status, JobStatus::Queued);
    assert!(job.started_at.is_none());
    assert!(job.finished_at.is_none());
}
