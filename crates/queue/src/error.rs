// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use dx_core::ErrorKind;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum QueueError {
    #[error("queue backlog is at capacity ({max_backlog})")]
    QueueFull { max_backlog: usize },
}

impl QueueError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::QueueFull { .. } => ErrorKind::QueueFull,
        }
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
