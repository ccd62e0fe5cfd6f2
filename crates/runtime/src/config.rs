// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access, mirroring the teacher's
//! `daemon::env` module. No cascading config-file/profile system is
//! implemented; this is the single env-driven resolution point.

use std::path::PathBuf;

/// App-home and work-directory resolution, plus the handful of tunables
/// the runtime needs (worker counts, queue backlog) that §4.7/§4.11 leave
/// to the embedding caller.
#[derive(Debug, Clone)]
pub struct Config {
    pub app_home: PathBuf,
    pub work_dir: PathBuf,
    pub queue_max_backlog: usize,
    pub queue_worker_count: usize,
    pub queue_restart_budget: usize,
    pub pipeline_workers: usize,
}

impl Config {
    pub fn resolve() -> Self {
        Self {
            app_home: app_home(),
            work_dir: work_dir(),
            queue_max_backlog: env_usize("DATA_EXTRACT_QUEUE_BACKLOG", 64),
            queue_worker_count: env_usize("DATA_EXTRACT_QUEUE_WORKERS", 2),
            queue_restart_budget: env_usize("DATA_EXTRACT_QUEUE_RESTART_BUDGET", 3),
            pipeline_workers: env_usize("DATA_EXTRACT_PIPELINE_WORKERS", 4),
        }
    }

    pub fn db_path(&self) -> PathBuf {
        self.app_home.join("data-extract.sqlite3")
    }

    pub fn session_dir(&self) -> PathBuf {
        self.work_dir.join(".data-extract-session")
    }
}

/// Resolve app-home: `DATA_EXTRACT_UI_HOME` > `dirs::data_dir()/data-extract`.
fn app_home() -> PathBuf {
    if let Ok(dir) = std::env::var("DATA_EXTRACT_UI_HOME") {
        return PathBuf::from(dir);
    }
    dirs::data_dir().unwrap_or_else(std::env::temp_dir).join("data-extract")
}

/// Resolve the session work directory: `DATA_EXTRACT_WORK_DIR` > current dir.
fn work_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("DATA_EXTRACT_WORK_DIR") {
        return PathBuf::from(dir);
    }
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}

fn env_usize(name: &str, default: usize) -> usize {
    std::env::var(name).ok().and_then(|s| s.parse::<usize>().ok()).unwrap_or(default)
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
