// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use dx_core::ErrorKind;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("no extractor registered for extension '{extension}'")]
    UnsupportedExtension { extension: String },

    #[error("payload for '{path}' could not be decoded: {reason}")]
    CorruptInput { path: String, reason: String },

    #[error("io error reading '{path}': {source}")]
    Io { path: String, source: std::io::Error },
}

impl ExtractError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::UnsupportedExtension { .. } => ErrorKind::UnsupportedExtension,
            Self::CorruptInput { .. } => ErrorKind::CorruptInput,
            Self::Io { .. } => ErrorKind::Fatal,
        }
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
