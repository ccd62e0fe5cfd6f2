// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use dx_core::ErrorKind;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("no files matched the request")]
    NoSupportedFiles,

    #[error("invalid chunk_size: {chunk_size} (must be >= 1)")]
    InvalidChunkSize { chunk_size: u32 },

    #[error("unknown output format: {format}")]
    InvalidOutputFormat { format: String },

    #[error("no session found matching the retry request")]
    SessionNotFound,

    #[error("session '{session_id}' has no recorded failed files to retry")]
    NothingToRetry { session_id: String },

    #[error(transparent)]
    Storage(#[from] dx_storage::StorageError),

    #[error(transparent)]
    Pipeline(#[from] dx_pipeline::PipelineError),

    #[error(transparent)]
    Queue(#[from] dx_queue::QueueError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("payload serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl RuntimeError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NoSupportedFiles => ErrorKind::NoSupportedFiles,
            Self::InvalidChunkSize { .. } | Self::InvalidOutputFormat { .. } => ErrorKind::ConfigurationError,
            Self::SessionNotFound | Self::NothingToRetry { .. } => ErrorKind::ConfigurationError,
            Self::Storage(e) => e.kind(),
            Self::Pipeline(e) => e.kind(),
            Self::Queue(e) => e.kind(),
            Self::Io(_) | Self::Json(_) => ErrorKind::Fatal,
        }
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
