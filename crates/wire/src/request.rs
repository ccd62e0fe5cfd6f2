// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Request contracts, field-precise per the `ProcessJobRequest`/`RetryRequest`
//! shapes defined by the original `contracts/models.py`.

use serde::{Deserialize, Serialize};

fn default_format() -> String {
    "json".to_string()
}

fn default_chunk_size() -> u32 {
    512
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessJobRequest {
    pub input_path: String,
    #[serde(default)]
    pub output_path: Option<String>,
    #[serde(default = "default_format")]
    pub output_format: String,
    #[serde(default = "default_chunk_size")]
    pub chunk_size: u32,
    #[serde(default)]
    pub recursive: bool,
    #[serde(default)]
    pub incremental: bool,
    #[serde(default)]
    pub force: bool,
    #[serde(default)]
    pub resume: bool,
    #[serde(default)]
    pub resume_session: Option<String>,
    #[serde(default)]
    pub preset: Option<String>,
    #[serde(default)]
    pub non_interactive: bool,
    #[serde(default)]
    pub include_semantic: bool,
    #[serde(default = "default_true")]
    pub continue_on_error: bool,
    #[serde(default)]
    pub source_files: Vec<String>,
    #[serde(default)]
    pub idempotency_key: Option<String>,
}

impl ProcessJobRequest {
    pub fn new(input_path: impl Into<String>) -> Self {
        Self {
            input_path: input_path.into(),
            output_path: None,
            output_format: default_format(),
            chunk_size: default_chunk_size(),
            recursive: false,
            incremental: false,
            force: false,
            resume: false,
            resume_session: None,
            preset: None,
            non_interactive: false,
            include_semantic: false,
            continue_on_error: true,
            source_files: Vec::new(),
            idempotency_key: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryRequest {
    #[serde(default)]
    pub last: bool,
    #[serde(default)]
    pub session: Option<String>,
    #[serde(default)]
    pub file: Option<String>,
    #[serde(default)]
    pub backoff: bool,
    #[serde(default)]
    pub non_interactive: bool,
    #[serde(default = "default_format")]
    pub output_format: String,
    #[serde(default = "default_chunk_size")]
    pub chunk_size: u32,
}

#[cfg(test)]
#[path = "request_tests.rs"]
mod tests;
