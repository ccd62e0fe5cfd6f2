// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Chunk schema shared between the pipeline writer and semantic consumers.
//!
//! Field set mirrors `chunk_to_dict`/`chunk_from_dict` in the original
//! `services/chunk_io.py`, which is the canonical enriched schema downstream
//! semantic-analysis stages (out of scope here) expect on disk.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    pub id: String,
    pub text: String,
    pub document_id: String,
    pub position_index: u32,
    pub token_count: u32,
    pub word_count: u32,
    #[serde(default)]
    pub entities: Vec<serde_json::Value>,
    #[serde(default)]
    pub section_context: String,
    #[serde(default)]
    pub quality_score: f64,
    #[serde(default)]
    pub readability_scores: HashMap<String, f64>,
    #[serde(default)]
    pub metadata: serde_json::Map<String, serde_json::Value>,
}

impl Chunk {
    /// Build a chunk for `words[position_index * size .. ]` sized `size`.
    pub fn from_words(
        document_id: &str,
        source_key: &str,
        position_index: u32,
        words: &[&str],
    ) -> Self {
        let text = words.join(" ");
        let word_count = words.len() as u32;
        let mut metadata = serde_json::Map::new();
        metadata.insert("source_key".to_string(), serde_json::Value::String(source_key.to_string()));
        Self {
            id: format!("{document_id}-{position_index:05}"),
            text,
            document_id: document_id.to_string(),
            position_index,
            token_count: word_count,
            word_count,
            entities: Vec::new(),
            section_context: String::new(),
            quality_score: 0.0,
            readability_scores: HashMap::new(),
            metadata,
        }
    }

    /// The single placeholder chunk emitted for empty input (§8 invariant:
    /// every processed file yields at least one chunk).
    pub fn empty_placeholder(document_id: &str, source_key: &str) -> Self {
        Self::from_words(document_id, source_key, 0, &[])
    }
}

#[cfg(test)]
#[path = "chunk_tests.rs"]
mod tests;
