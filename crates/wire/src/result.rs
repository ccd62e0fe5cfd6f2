// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Result contracts returned by the Job/Retry services.

use chrono::{DateTime, Utc};
use dx_core::JobStatus;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StageTimingsMs {
    pub extract: f64,
    pub normalize: f64,
    pub chunk: f64,
    pub semantic: f64,
    pub output: f64,
}

impl StageTimingsMs {
    pub fn add(&mut self, other: &StageTimingsMs) {
        self.extract += other.extract;
        self.normalize += other.normalize;
        self.chunk += other.chunk;
        self.semantic += other.semantic;
        self.output += other.output;
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessedFileOutcome {
    pub path: String,
    pub output_path: String,
    #[serde(default)]
    pub chunk_count: u32,
    #[serde(default)]
    pub stage_timings_ms: HashMap<String, f64>,
    pub source_key: String,
    /// `"skipped"` when the output format can't carry semantic enrichment
    /// (only JSON can); `"ok"` otherwise. The stage itself is a no-op either way.
    #[serde(default = "default_semantic_status")]
    pub semantic_status: String,
    #[serde(default)]
    pub semantic_reason_code: Option<String>,
}

fn default_semantic_status() -> String {
    "ok".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileFailure {
    pub path: String,
    pub error_type: String,
    pub error_message: String,
    #[serde(default)]
    pub retry_count: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessJobResult {
    pub job_id: String,
    pub status: JobStatus,
    pub total_files: u32,
    pub processed_count: u32,
    pub failed_count: u32,
    #[serde(default)]
    pub skipped_count: u32,
    pub output_dir: String,
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub processed_files: Vec<ProcessedFileOutcome>,
    #[serde(default)]
    pub failed_files: Vec<FileFailure>,
    #[serde(default)]
    pub stage_totals_ms: StageTimingsMs,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub exit_code: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSummary {
    pub session_id: String,
    pub status: String,
    pub source_directory: String,
    pub total_files: u32,
    pub processed_count: u32,
    pub failed_count: u32,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
#[path = "result_tests.rs"]
mod tests;
