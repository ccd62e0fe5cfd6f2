// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! File Discovery Service: resolves a request's `input_path` (file,
//! directory, or glob) into an ordered file list plus a *pattern root* used
//! for deterministic relative output layout (§4.4).

use std::path::{Path, PathBuf};

use crate::error::PipelineError;

#[derive(Debug, Clone)]
pub struct Discovery {
    pub files: Vec<PathBuf>,
    pub source_root: PathBuf,
}

const GLOB_MARKERS: &[char] = &['*', '?', '['];

fn looks_like_glob(input: &str) -> bool {
    GLOB_MARKERS.iter().any(|c| input.contains(*c))
}

/// `discover(input, recursive, output_dir) -> Discovery`. Files under
/// `output_dir` are always excluded so outputs never feed back in as inputs.
pub fn discover(input: &str, recursive: bool, output_dir: &Path) -> Result<Discovery, PipelineError> {
    let discovery = if looks_like_glob(input) {
        discover_glob(input)?
    } else {
        let path = Path::new(input);
        if path.is_dir() {
            discover_directory(path, recursive)?
        } else {
            discover_single_file(path)?
        }
    };

    let output_dir = canonical_or_as_is(output_dir);
    let files: Vec<PathBuf> = discovery
        .files
        .into_iter()
        .filter(|f| !canonical_or_as_is(f).starts_with(&output_dir))
        .collect();

    if files.is_empty() {
        return Err(PipelineError::NoSupportedFiles { input_path: input.to_string() });
    }

    Ok(Discovery { files, source_root: discovery.source_root })
}

fn canonical_or_as_is(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
}

fn discover_single_file(path: &Path) -> Result<Discovery, PipelineError> {
    let files = if dx_extract::is_supported(path) { vec![path.to_path_buf()] } else { Vec::new() };
    let source_root = path.parent().map(Path::to_path_buf).unwrap_or_else(|| PathBuf::from("."));
    Ok(Discovery { files, source_root })
}

fn discover_directory(dir: &Path, recursive: bool) -> Result<Discovery, PipelineError> {
    let mut files = Vec::new();
    if recursive {
        for entry in walkdir::WalkDir::new(dir).into_iter().filter_map(Result::ok) {
            if entry.file_type().is_file() && dx_extract::is_supported(entry.path()) {
                files.push(entry.path().to_path_buf());
            }
        }
    } else {
        for entry in std::fs::read_dir(dir)?.filter_map(Result::ok) {
            let path = entry.path();
            if path.is_file() && dx_extract::is_supported(&path) {
                files.push(path);
            }
        }
    }
    files.sort_by(|a, b| {
        a.file_name().map(|n| n.to_string_lossy().to_lowercase()).cmp(&b.file_name().map(|n| n.to_string_lossy().to_lowercase()))
    });
    Ok(Discovery { files, source_root: dir.to_path_buf() })
}

fn discover_glob(pattern: &str) -> Result<Discovery, PipelineError> {
    let path = Path::new(pattern);
    let source_root = if path.is_absolute() {
        longest_non_glob_prefix(pattern)
    } else {
        std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
    };

    let matches = glob::glob(pattern)
        .map_err(|e| PipelineError::InvalidGlob { pattern: pattern.to_string(), reason: e.to_string() })?;

    let mut files: Vec<PathBuf> = matches
        .filter_map(Result::ok)
        .filter(|p| p.is_file() && dx_extract::is_supported(p))
        .collect();
    files.sort();

    Ok(Discovery { files, source_root })
}

fn longest_non_glob_prefix(pattern: &str) -> PathBuf {
    let mut prefix = PathBuf::new();
    for component in Path::new(pattern).components() {
        let piece = component.as_os_str().to_string_lossy();
        if looks_like_glob(&piece) {
            break;
        }
        prefix.push(component.as_os_str());
    }
    if prefix.as_os_str().is_empty() {
        PathBuf::from("/")
    } else {
        prefix
    }
}

#[cfg(test)]
#[path = "discovery_tests.rs"]
mod tests;
