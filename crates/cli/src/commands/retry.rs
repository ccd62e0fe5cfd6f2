// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `dx retry` — reopens a prior session's failed files via the Retry Service.

use clap::Args;
use dx_runtime::ApiRuntime;
use dx_wire::RetryRequest;

use crate::exit_error::ExitError;
use crate::summary::print_process_summary;

#[derive(Args)]
pub struct RetryArgs {
    #[arg(long)]
    pub session: Option<String>,

    #[arg(long)]
    pub last: bool,

    /// Limit the retry to one file, relative to the session's source directory
    #[arg(long)]
    pub file: Option<String>,
}

pub fn run(args: RetryArgs, runtime: &ApiRuntime) -> Result<i32, ExitError> {
    let request = RetryRequest {
        last: args.last,
        session: args.session,
        file: args.file,
        backoff: false,
        non_interactive: true,
        output_format: "json".to_string(),
        chunk_size: 512,
    };

    let result = runtime.enqueue_retry(&request).map_err(|e| ExitError::new(2, e.to_string()))?;
    print_process_summary(&result);
    Ok(result.exit_code)
}
