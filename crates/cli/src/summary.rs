// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Summary panel printed after `dx process`/`dx retry`, grounded on
//! `cli/summary.py`'s panel rendering but reduced to the thin text surface
//! this crate owns (no quality-distribution or HTML/TXT export, those live
//! in the out-of-scope semantic-analysis stages).

use dx_wire::ProcessJobResult;

pub fn print_process_summary(result: &ProcessJobResult) {
    println!("╭── data-extract job {} ──", result.job_id);
    println!("│ status:     {}", result.status.as_str());
    println!("│ total:      {}", result.total_files);
    println!("│ processed:  {}", result.processed_count);
    println!("│ failed:     {}", result.failed_count);
    println!("│ skipped:    {}", result.skipped_count);
    println!("│ output_dir: {}", result.output_dir);
    if let Some(session_id) = &result.session_id {
        println!("│ session:    {session_id}");
    }
    for failure in &result.failed_files {
        println!("│   ✗ {} ({}: {})", failure.path, failure.error_type, failure.error_message);
    }
    let totals = &result.stage_totals_ms;
    println!(
        "│ stage totals (ms): extract={:.1} normalize={:.1} chunk={:.1} semantic={:.1} output={:.1}",
        totals.extract, totals.normalize, totals.chunk, totals.semantic, totals.output
    );
    println!("╰── exit code {} ──", result.exit_code);
}

#[cfg(test)]
#[path = "summary_tests.rs"]
mod tests;
