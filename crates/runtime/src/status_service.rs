// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Status Service (§4.10): scans `output_dir` for artifacts whose source no
//! longer exists, and classifies every source file's sync state against its
//! corresponding output.

use std::path::Path;

use crate::error::RuntimeError;

const OUTPUT_EXTENSIONS: &[&str] = &["json", "txt", "csv"];

#[derive(Debug, Clone, Default)]
pub struct StatusReport {
    pub orphaned_outputs: Vec<String>,
    pub orphaned_count: u32,
    pub cleaned_count: u32,
    pub new_sources: Vec<String>,
    pub stale_sources: Vec<String>,
    pub in_sync_sources: Vec<String>,
}

/// `source_dir`/`output_dir` scan; deletes orphans when `cleanup` is set.
pub fn get_status(source_dir: &Path, output_dir: &Path, cleanup: bool) -> Result<StatusReport, RuntimeError> {
    let mut report = StatusReport::default();

    if output_dir.exists() {
        for entry in walkdir::WalkDir::new(output_dir).into_iter().filter_map(Result::ok) {
            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.path();
            let Some(ext) = path.extension().and_then(|e| e.to_str()) else { continue };
            if !OUTPUT_EXTENSIONS.contains(&ext) {
                continue;
            }
            let rel = path.strip_prefix(output_dir).unwrap_or(path);
            let rel_stem = rel.with_extension("");
            if !source_exists_for_stem(source_dir, &rel_stem) {
                report.orphaned_outputs.push(path.display().to_string());
                if cleanup {
                    if std::fs::remove_file(path).is_ok() {
                        report.cleaned_count += 1;
                    }
                }
            }
        }
    }
    report.orphaned_count = report.orphaned_outputs.len() as u32;

    if source_dir.exists() {
        for entry in walkdir::WalkDir::new(source_dir).into_iter().filter_map(Result::ok) {
            if !entry.file_type().is_file() || !dx_extract::is_supported(entry.path()) {
                continue;
            }
            let path = entry.path();
            let rel = path.strip_prefix(source_dir).unwrap_or(path).with_extension("");

            match first_matching_output(output_dir, &rel) {
                None => report.new_sources.push(path.display().to_string()),
                Some(output_path) => {
                    let stale = is_stale(path, &output_path);
                    if stale {
                        report.stale_sources.push(path.display().to_string());
                    } else {
                        report.in_sync_sources.push(path.display().to_string());
                    }
                }
            }
        }
    }

    Ok(report)
}

fn source_exists_for_stem(source_dir: &Path, rel_stem: &Path) -> bool {
    dx_extract::SUPPORTED_EXTENSIONS.iter().any(|ext| source_dir.join(rel_stem).with_extension(ext).is_file())
}

fn first_matching_output(output_dir: &Path, rel_stem: &Path) -> Option<std::path::PathBuf> {
    OUTPUT_EXTENSIONS.iter().map(|ext| output_dir.join(rel_stem).with_extension(ext)).find(|p| p.is_file())
}

fn is_stale(source_path: &Path, output_path: &Path) -> bool {
    let source_modified = std::fs::metadata(source_path).and_then(|m| m.modified()).ok();
    let output_modified = std::fs::metadata(output_path).and_then(|m| m.modified()).ok();
    match (source_modified, output_modified) {
        (Some(source), Some(output)) => source > output,
        _ => false,
    }
}

#[cfg(test)]
#[path = "status_service_tests.rs"]
mod tests;
