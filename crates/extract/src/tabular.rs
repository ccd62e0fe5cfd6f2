// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CSV/TSV extraction: each row is flattened to a space-joined line of cells
//! so downstream chunking sees ordinary word-tokenizable text, with the
//! header and row/column counts preserved in `structure`.

use std::path::Path;

use serde_json::{Map, Value};
use std::collections::HashMap;

use crate::error::ExtractError;
use crate::outcome::ExtractOutcome;

pub fn extract(path: &Path, delimiter: u8) -> Result<ExtractOutcome, ExtractError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_path(path)
        .map_err(|e| to_corrupt(path, e))?;

    let headers = reader.headers().map_err(|e| to_corrupt(path, e))?.clone();
    let mut lines = Vec::new();
    let mut row_count = 0u64;
    for record in reader.records() {
        let record = record.map_err(|e| to_corrupt(path, e))?;
        lines.push(record.iter().collect::<Vec<_>>().join(" "));
        row_count += 1;
    }

    let mut structure = Map::new();
    structure.insert("column_count".to_string(), Value::from(headers.len()));
    structure.insert("row_count".to_string(), Value::from(row_count));
    structure.insert(
        "headers".to_string(),
        Value::Array(headers.iter().map(|h| Value::String(h.to_string())).collect()),
    );

    let mut quality = HashMap::new();
    quality.insert("extraction_confidence".to_string(), 1.0);

    Ok(ExtractOutcome { text: lines.join("\n"), structure, quality })
}

fn to_corrupt(path: &Path, e: csv::Error) -> ExtractError {
    ExtractError::CorruptInput { path: path.display().to_string(), reason: e.to_string() }
}

#[cfg(test)]
#[path = "tabular_tests.rs"]
mod tests;
