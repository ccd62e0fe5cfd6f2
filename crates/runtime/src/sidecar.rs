// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Session sidecar files: `<work_dir>/.data-extract-session/session-<id>.json`,
//! ported from the original `cli/session.py`'s `SessionManager`. The Job
//! Service writes one of these per run; the Retry Service reads them back to
//! locate a prior session by id without needing the relational store.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use dx_wire::FileFailure;
use serde::{Deserialize, Serialize};

use crate::error::RuntimeError;

const SESSION_DIR: &str = ".data-extract-session";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSidecar {
    pub session_id: String,
    pub source_directory: String,
    pub output_dir: String,
    pub format: String,
    pub total_files: u32,
    pub processed_count: u32,
    pub failed_count: u32,
    pub status: String,
    #[serde(default)]
    pub failed_files: Vec<FileFailure>,
    pub started_at: DateTime<Utc>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
}

impl SessionSidecar {
    fn path(work_dir: &Path, session_id: &str) -> PathBuf {
        work_dir.join(SESSION_DIR).join(format!("session-{session_id}.json"))
    }

    pub fn save(&self, work_dir: &Path) -> Result<(), RuntimeError> {
        let path = Self::path(work_dir, &self.session_id);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn load(work_dir: &Path, session_id: &str) -> Result<Option<Self>, RuntimeError> {
        let path = Self::path(work_dir, session_id);
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(serde_json::from_str(&fs::read_to_string(path)?)?))
    }

    /// Most recently modified sidecar file under `work_dir`'s session directory.
    pub fn load_last(work_dir: &Path) -> Result<Option<Self>, RuntimeError> {
        let dir = work_dir.join(SESSION_DIR);
        if !dir.exists() {
            return Ok(None);
        }
        let mut newest: Option<(std::time::SystemTime, PathBuf)> = None;
        for entry in fs::read_dir(&dir)? {
            let entry = entry?;
            let path = entry.path();
            let is_session_file = path
                .file_name()
                .and_then(|n| n.to_str())
                .map(|n| n.starts_with("session-") && n.ends_with(".json"))
                .unwrap_or(false);
            if !is_session_file {
                continue;
            }
            let modified = entry.metadata()?.modified()?;
            if newest.as_ref().map(|(t, _)| modified > *t).unwrap_or(true) {
                newest = Some((modified, path));
            }
        }
        match newest {
            Some((_, path)) => Ok(Some(serde_json::from_str(&fs::read_to_string(path)?)?)),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
#[path = "sidecar_tests.rs"]
mod tests;
