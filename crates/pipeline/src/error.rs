// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use dx_core::ErrorKind;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Extract(#[from] dx_extract::ExtractError),

    #[error("no supported files found under '{input_path}'")]
    NoSupportedFiles { input_path: String },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("glob pattern '{pattern}' is invalid: {reason}")]
    InvalidGlob { pattern: String, reason: String },

    #[error("output serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl PipelineError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Extract(e) => e.kind(),
            Self::NoSupportedFiles { .. } => ErrorKind::NoSupportedFiles,
            Self::Io(_) | Self::Json(_) => ErrorKind::Fatal,
            Self::InvalidGlob { .. } => ErrorKind::ConfigurationError,
        }
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
