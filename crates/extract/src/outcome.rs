// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `(text, structure, quality)` — the contract every extractor returns,
//! mirroring `ExtractorAdapter.extract()` in the original `extract/adapter.py`.

use serde_json::{Map, Value};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq)]
pub struct ExtractOutcome {
    pub text: String,
    pub structure: Map<String, Value>,
    pub quality: HashMap<String, f64>,
}

impl ExtractOutcome {
    pub fn extraction_confidence(&self) -> f64 {
        self.quality.get("extraction_confidence").copied().unwrap_or(1.0)
    }

    pub fn fallback(&self) -> Option<&str> {
        self.structure.get("fallback").and_then(Value::as_str)
    }
}

#[cfg(test)]
#[path = "outcome_tests.rs"]
mod tests;
