// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Plain-text and Markdown extraction: the payload already is the text.

use std::collections::HashMap;
use std::path::Path;

use serde_json::{Map, Value};

use crate::error::ExtractError;
use crate::outcome::ExtractOutcome;

pub fn extract(path: &Path) -> Result<ExtractOutcome, ExtractError> {
    let raw = std::fs::read(path).map_err(|source| ExtractError::Io { path: path.display().to_string(), source })?;
    let text = String::from_utf8(raw).map_err(|e| ExtractError::CorruptInput {
        path: path.display().to_string(),
        reason: format!("not valid UTF-8: {e}"),
    })?;

    let mut structure = Map::new();
    structure.insert("line_count".to_string(), Value::from(text.lines().count()));
    let mut quality = HashMap::new();
    quality.insert("extraction_confidence".to_string(), 1.0);
    Ok(ExtractOutcome { text, structure, quality })
}

#[cfg(test)]
#[path = "text_tests.rs"]
mod tests;
