// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Incremental reprocessing: `<work_dir>/.data-extract-session/incremental-state.json`,
//! ported from the original's sidecar JSON state file so that a subsequent
//! `incremental=true` run can skip files whose content hash is unchanged.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::PipelineError;

const STATE_DIR: &str = ".data-extract-session";
const STATE_FILE: &str = "incremental-state.json";
const SCHEMA_VERSION: &str = "1.0";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileState {
    pub hash: String,
    pub processed_at: DateTime<Utc>,
    pub output_path: String,
    pub size_bytes: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncrementalState {
    pub version: String,
    pub source_dir: String,
    pub output_dir: String,
    pub config_hash: String,
    pub processed_at: DateTime<Utc>,
    #[serde(default)]
    pub files: HashMap<String, FileState>,
}

impl IncrementalState {
    pub fn new(source_dir: impl Into<String>, output_dir: impl Into<String>, config_hash: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            version: SCHEMA_VERSION.to_string(),
            source_dir: source_dir.into(),
            output_dir: output_dir.into(),
            config_hash: config_hash.into(),
            processed_at: now,
            files: HashMap::new(),
        }
    }

    fn state_path(work_dir: &Path) -> PathBuf {
        work_dir.join(STATE_DIR).join(STATE_FILE)
    }

    pub fn load(work_dir: &Path) -> Result<Option<Self>, PipelineError> {
        let path = Self::state_path(work_dir);
        if !path.exists() {
            return Ok(None);
        }
        let raw = fs::read_to_string(&path)?;
        Ok(Some(serde_json::from_str(&raw)?))
    }

    pub fn save(&self, work_dir: &Path) -> Result<(), PipelineError> {
        let path = Self::state_path(work_dir);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let body = serde_json::to_string_pretty(self)?;
        fs::write(path, body)?;
        Ok(())
    }

    /// True when `path` is new or its recorded hash differs from `hash`.
    pub fn is_stale(&self, path: &str, hash: &str) -> bool {
        match self.files.get(path) {
            Some(entry) => entry.hash != hash,
            None => true,
        }
    }

    pub fn record(&mut self, path: impl Into<String>, hash: impl Into<String>, output_path: impl Into<String>, size_bytes: u64, now: DateTime<Utc>) {
        self.files.insert(path.into(), FileState { hash: hash.into(), processed_at: now, output_path: output_path.into(), size_bytes });
    }
}

#[cfg(test)]
#[path = "incremental_tests.rs"]
mod tests;
