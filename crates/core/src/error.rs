// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared error taxonomy tags.
//!
//! `ErrorKind` is not an error type in its own right — each crate defines its
//! own `thiserror` error enum for the failures it can produce. `ErrorKind` is
//! the small, stable vocabulary those errors map onto wherever a kind needs to
//! cross a persistence or wire boundary (`JobFile::error_type`, CLI summaries).

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    UnsupportedExtension,
    CorruptInput,
    NoSupportedFiles,
    QueueFull,
    StoreContention,
    RecoveryAbandoned,
    ConfigurationError,
    Fatal,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UnsupportedExtension => "UnsupportedExtension",
            Self::CorruptInput => "CorruptInput",
            Self::NoSupportedFiles => "NoSupportedFiles",
            Self::QueueFull => "QueueFull",
            Self::StoreContention => "StoreContention",
            Self::RecoveryAbandoned => "RecoveryAbandoned",
            Self::ConfigurationError => "ConfigurationError",
            Self::Fatal => "Fatal",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
