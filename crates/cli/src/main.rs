// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `dx` — thin CLI entry point over the Job/Retry/Status services (§4.13).
//! Argument parsing beyond this surface and any TUI rendering are out of
//! scope; this binary exists to exercise the orchestration substrate
//! end to end, mirroring the teacher's `oj` binary structure.

mod commands;
mod exit_error;
mod summary;

use clap::{Parser, Subcommand};
use dx_runtime::{ApiRuntime, Config};
use dx_storage::Store;

use exit_error::ExitError;

#[derive(Parser)]
#[command(name = "dx", about = "Local document-extraction job orchestration")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Process a file, directory, or glob into chunked output
    Process(commands::process::ProcessArgs),
    /// Retry a prior session's failed files
    Retry(commands::retry::RetryArgs),
    /// Report orphaned outputs and source sync state
    Status(commands::status::StatusArgs),
}

fn main() {
    tracing_subscriber::fmt().with_env_filter(tracing_subscriber::EnvFilter::from_default_env()).init();

    match run() {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(err.code);
        }
    }
}

fn run() -> Result<i32, ExitError> {
    let cli = Cli::parse();

    match cli.command {
        Command::Process(args) => {
            let runtime = build_runtime()?;
            runtime.start().map_err(|e| ExitError::new(2, format!("startup recovery failed: {e}")))?;
            let code = commands::process::run(args, &runtime)?;
            runtime.stop();
            Ok(code)
        }
        Command::Retry(args) => {
            let runtime = build_runtime()?;
            runtime.start().map_err(|e| ExitError::new(2, format!("startup recovery failed: {e}")))?;
            let code = commands::retry::run(args, &runtime)?;
            runtime.stop();
            Ok(code)
        }
        Command::Status(args) => commands::status::run(args),
    }
}

fn build_runtime() -> Result<ApiRuntime, ExitError> {
    let config = Config::resolve();
    if let Some(parent) = config.db_path().parent() {
        std::fs::create_dir_all(parent).map_err(|e| ExitError::new(2, format!("failed to create app-home: {e}")))?;
    }
    let store = Store::open(config.db_path()).map_err(|e| ExitError::new(2, format!("failed to open store: {e}")))?;
    Ok(ApiRuntime::new(store, config))
}
