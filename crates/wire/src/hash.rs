// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Request fingerprinting: `sha256(canonical JSON of normalized request fields)`.

use crate::request::ProcessJobRequest;
use serde_json::json;
use sha2::{Digest, Sha256};

/// Canonical sha-256 fingerprint of a normalized request.
///
/// Built from an explicit, fixed-order field list — deliberately narrower
/// than the full request struct — so that adding a new non-semantic field to
/// `ProcessJobRequest` never silently changes existing fingerprints.
/// `serde_json::Value::to_string` is infallible (unlike `to_string` on an
/// arbitrary `Serialize`), so this never needs to handle a serialization error.
pub fn request_hash(request: &ProcessJobRequest) -> String {
    let mut source_files = request.source_files.clone();
    source_files.sort();

    let fingerprint = json!({
        "input_path": request.input_path,
        "output_path": request.output_path,
        "output_format": request.output_format,
        "chunk_size": request.chunk_size,
        "recursive": request.recursive,
        "incremental": request.incremental,
        "force": request.force,
        "include_semantic": request.include_semantic,
        "continue_on_error": request.continue_on_error,
        "source_files": source_files,
    });

    let canonical = fingerprint.to_string();
    let digest = Sha256::digest(canonical.as_bytes());
    format!("{digest:x}")
}

#[cfg(test)]
#[path = "hash_tests.rs"]
mod tests;
