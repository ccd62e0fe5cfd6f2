// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `dx status` — reports orphaned outputs and source sync state via the
//! Status Service.

use std::path::PathBuf;

use clap::Args;

use crate::exit_error::ExitError;

#[derive(Args)]
pub struct StatusArgs {
    pub source_dir: PathBuf,
    pub output_dir: PathBuf,

    /// Delete orphaned outputs instead of only reporting them
    #[arg(long)]
    pub cleanup: bool,
}

pub fn run(args: StatusArgs) -> Result<i32, ExitError> {
    let report = dx_runtime::get_status(&args.source_dir, &args.output_dir, args.cleanup)
        .map_err(|e| ExitError::new(2, e.to_string()))?;

    println!("╭── data-extract status ──");
    println!("│ new:       {}", report.new_sources.len());
    println!("│ stale:     {}", report.stale_sources.len());
    println!("│ in_sync:   {}", report.in_sync_sources.len());
    println!("│ orphaned:  {}", report.orphaned_count);
    if args.cleanup {
        println!("│ cleaned:   {}", report.cleaned_count);
    }
    for orphan in &report.orphaned_outputs {
        println!("│   ✗ {orphan}");
    }
    println!("╰──");

    Ok(if report.orphaned_count > 0 && !args.cleanup { 1 } else { 0 })
}
