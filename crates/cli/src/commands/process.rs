// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `dx process` — submits a `ProcessJobRequest` to the Local Job Queue via
//! the `ApiRuntime`, then blocks until the Job reaches a terminal state so
//! the CLI's single invocation behaves synchronously even though the same
//! queued code path an HTTP layer would hit is exercised.

use std::time::Duration;

use clap::Args;
use dx_core::{JobId, JobStatus};
use dx_runtime::ApiRuntime;
use dx_wire::ProcessJobRequest;

use crate::exit_error::ExitError;
use crate::summary::print_process_summary;

const POLL_INTERVAL: Duration = Duration::from_millis(50);

#[derive(Args)]
pub struct ProcessArgs {
    /// Path, directory, or glob to process
    pub input_path: String,

    #[arg(long = "output")]
    pub output: Option<String>,

    #[arg(long = "format", default_value = "json")]
    pub format: String,

    #[arg(long = "chunk-size", default_value_t = 512)]
    pub chunk_size: u32,

    #[arg(long)]
    pub recursive: bool,

    #[arg(long)]
    pub incremental: bool,

    #[arg(long)]
    pub force: bool,

    #[arg(long = "include-semantic")]
    pub include_semantic: bool,

    #[arg(long = "stop-on-error")]
    pub stop_on_error: bool,

    #[arg(long = "idempotency-key")]
    pub idempotency_key: Option<String>,

    #[arg(long, default_value_t = 4)]
    pub workers: usize,
}

pub fn run(args: ProcessArgs, runtime: &ApiRuntime) -> Result<i32, ExitError> {
    let mut request = ProcessJobRequest::new(args.input_path);
    request.output_path = args.output;
    request.output_format = args.format;
    request.chunk_size = args.chunk_size;
    request.recursive = args.recursive;
    request.incremental = args.incremental;
    request.force = args.force;
    request.include_semantic = args.include_semantic;
    request.continue_on_error = !args.stop_on_error;
    request.idempotency_key = args.idempotency_key;
    request.non_interactive = true;

    let job_id = runtime.enqueue_process(&request).map_err(|e| ExitError::new(3, e.to_string()))?;

    let result = wait_for_completion(runtime, &job_id)?;
    print_process_summary(&result);
    Ok(result.exit_code)
}

fn wait_for_completion(runtime: &ApiRuntime, job_id: &str) -> Result<dx_wire::ProcessJobResult, ExitError> {
    loop {
        let job = runtime
            .store()
            .get_job(&JobId::new(job_id))
            .map_err(|e| ExitError::new(2, format!("failed to read job state: {e}")))?
            .ok_or_else(|| ExitError::new(2, format!("job '{job_id}' disappeared from the store")))?;

        if job.status != JobStatus::Queued && job.status != JobStatus::Running {
            let payload = job
                .result_payload
                .ok_or_else(|| ExitError::new(2, format!("job '{job_id}' finished without a result payload")))?;
            return serde_json::from_str(&payload).map_err(|e| ExitError::new(2, format!("malformed result payload: {e}")));
        }
        std::thread::sleep(POLL_INTERVAL);
    }
}

#[cfg(test)]
#[path = "process_tests.rs"]
mod tests;
