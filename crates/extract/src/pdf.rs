// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! PDF extraction. No PDF-parsing crate is pulled in (none appears anywhere
//! in the reference corpus); only the fallback "text stub" recovery policy
//! from the original `extract/pdf.py` is implemented. A payload that looks
//! like a genuine compressed/binary PDF (starts `%PDF` but isn't recoverable
//! as printable text) fails with `CorruptInput`, matching the original's
//! behavior when `pypdf` itself would have been required to decode it.

use std::fs;
use std::path::Path;

use serde_json::{Map, Value};
use std::collections::HashMap;

use crate::error::ExtractError;
use crate::outcome::ExtractOutcome;

pub fn extract(path: &Path) -> Result<ExtractOutcome, ExtractError> {
    let raw = fs::read(path).map_err(|source| ExtractError::Io { path: path.display().to_string(), source })?;
    extract_text_stub(path, &raw)
}

fn extract_text_stub(path: &Path, raw: &[u8]) -> Result<ExtractOutcome, ExtractError> {
    let path_str = || path.display().to_string();

    let has_pdf_version_header = raw.starts_with(b"%PDF-1.");
    let starts_like_other_pdf_header = raw.starts_with(b"%PDF");

    let payload: &[u8] = if has_pdf_version_header {
        match raw.iter().position(|&b| b == b'\n') {
            Some(idx) => &raw[idx + 1..],
            None => &[],
        }
    } else if starts_like_other_pdf_header {
        return Err(ExtractError::CorruptInput { path: path_str(), reason: "invalid PDF header".to_string() });
    } else {
        raw
    };

    if payload.is_empty() {
        if raw.is_empty() {
            let mut structure = Map::new();
            structure.insert("page_count".to_string(), Value::from(1));
            structure.insert("non_empty_pages".to_string(), Value::from(0));
            structure.insert("fallback".to_string(), Value::String("empty_stub".to_string()));
            let mut quality = HashMap::new();
            quality.insert("extraction_confidence".to_string(), 0.0);
            return Ok(ExtractOutcome { text: String::new(), structure, quality });
        }
        return Err(ExtractError::CorruptInput { path: path_str(), reason: "empty PDF payload".to_string() });
    }

    let decoded = std::str::from_utf8(payload)
        .map_err(|_| ExtractError::CorruptInput {
            path: path_str(),
            reason: "binary/truncated PDF payload is not recoverable".to_string(),
        })?;

    let printable = decoded.chars().filter(|&c| !c.is_control() || matches!(c, '\t' | '\n' | '\r')).count();
    let printable_ratio = printable as f64 / decoded.chars().count().max(1) as f64;
    if printable_ratio < 0.9 {
        return Err(ExtractError::CorruptInput {
            path: path_str(),
            reason: "binary/truncated PDF payload is not recoverable".to_string(),
        });
    }

    let text = collapse_whitespace(decoded);
    if !text.chars().any(|c| c.is_alphanumeric()) {
        return Err(ExtractError::CorruptInput {
            path: path_str(),
            reason: "PDF payload does not contain recoverable text".to_string(),
        });
    }

    let mut structure = Map::new();
    structure.insert("page_count".to_string(), Value::from(1));
    structure.insert("non_empty_pages".to_string(), Value::from(1));
    structure.insert("fallback".to_string(), Value::String("text_stub".to_string()));
    let mut quality = HashMap::new();
    quality.insert("extraction_confidence".to_string(), 0.25);
    Ok(ExtractOutcome { text, structure, quality })
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
#[path = "pdf_tests.rs"]
mod tests;
