// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Chunk stage: splits tokenized (whitespace-delimited) text into consecutive
//! word groups of `chunk_size`. Always emits at least one chunk — a
//! placeholder empty chunk for empty input (§8 invariant).

use dx_core::Chunk;

pub fn chunk_text(document_id: &str, source_key: &str, text: &str, chunk_size: u32) -> Vec<Chunk> {
    let chunk_size = chunk_size.max(1) as usize;
    let words: Vec<&str> = text.split_whitespace().collect();

    if words.is_empty() {
        return vec![Chunk::empty_placeholder(document_id, source_key)];
    }

    words
        .chunks(chunk_size)
        .enumerate()
        .map(|(i, group)| Chunk::from_words(document_id, source_key, i as u32, group))
        .collect()
}

#[cfg(test)]
#[path = "chunk_tests.rs"]
mod tests;
