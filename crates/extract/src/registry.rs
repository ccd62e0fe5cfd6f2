// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Extractor registry: a tagged-variant enum over supported formats plus a
//! constant-time extension lookup, replacing the original's dynamic
//! extension-to-class dispatch per the Design Notes' re-architecture guidance.

use std::path::Path;

use crate::error::ExtractError;
use crate::office::OfficeKind;
use crate::outcome::ExtractOutcome;
use crate::{office, pdf, tabular, text};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractorKind {
    Text,
    Csv,
    Tsv,
    Docx,
    Pptx,
    Xlsx,
    Pdf,
}

impl ExtractorKind {
    pub fn format_tag(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Csv => "csv",
            Self::Tsv => "tsv",
            Self::Docx => "docx",
            Self::Pptx => "pptx",
            Self::Xlsx => "xlsx",
            Self::Pdf => "pdf",
        }
    }

    pub fn for_extension(extension: &str) -> Option<Self> {
        match extension.to_ascii_lowercase().as_str() {
            "txt" | "md" | "markdown" => Some(Self::Text),
            "csv" => Some(Self::Csv),
            "tsv" => Some(Self::Tsv),
            "docx" => Some(Self::Docx),
            "pptx" => Some(Self::Pptx),
            "xlsx" => Some(Self::Xlsx),
            "pdf" => Some(Self::Pdf),
            _ => None,
        }
    }

    pub fn extract(self, path: &Path) -> Result<ExtractOutcome, ExtractError> {
        match self {
            Self::Text => text::extract(path),
            Self::Csv => tabular::extract(path, b','),
            Self::Tsv => tabular::extract(path, b'\t'),
            Self::Docx => office::extract(path, OfficeKind::Docx),
            Self::Pptx => office::extract(path, OfficeKind::Pptx),
            Self::Xlsx => office::extract(path, OfficeKind::Xlsx),
            Self::Pdf => pdf::extract(path),
        }
    }
}

/// Registered extensions, lower-cased, no leading dot.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["txt", "md", "markdown", "csv", "tsv", "docx", "pptx", "xlsx", "pdf"];

pub fn is_supported(path: &Path) -> bool {
    extension_of(path).map(|ext| ExtractorKind::for_extension(&ext).is_some()).unwrap_or(false)
}

pub fn get(path: &Path) -> Result<ExtractorKind, ExtractError> {
    let extension = extension_of(path).unwrap_or_default();
    ExtractorKind::for_extension(&extension).ok_or(ExtractError::UnsupportedExtension { extension })
}

fn extension_of(path: &Path) -> Option<String> {
    path.extension().map(|e| e.to_string_lossy().to_ascii_lowercase())
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
