// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use dx_core::ErrorKind;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("payload serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("operation '{operation}' exceeded the lock-retry budget after {retries} retries")]
    Contention { operation: String, retries: u32 },

    #[error("malformed row in table '{table}': {reason}")]
    MalformedRow { table: &'static str, reason: String },
}

impl StorageError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Contention { .. } => ErrorKind::StoreContention,
            _ => ErrorKind::Fatal,
        }
    }
}
