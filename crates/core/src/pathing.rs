// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Pure path normalization helpers for deterministic per-file identity.
//!
//! Mirrors `data_extract.services.pathing` from the original implementation:
//! normalization never requires the path to exist, and the derived source key
//! is stable across platforms once the path text has been normalized.

use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

/// Expand `~` and resolve `.`/`..` components without requiring the path to exist.
///
/// Returns an absolute path using forward-slash separators in its text form
/// (the `PathBuf` itself still uses the platform separator; callers that need
/// the canonical text form should go through [`normalized_path_text`]).
pub fn normalize(path: impl AsRef<Path>) -> PathBuf {
    let path = path.as_ref();
    let expanded = expand_home(path);
    let absolute = if expanded.is_absolute() {
        expanded
    } else {
        std::env::current_dir().unwrap_or_default().join(expanded)
    };
    lexically_resolve(&absolute)
}

fn expand_home(path: &Path) -> PathBuf {
    let Ok(stripped) = path.strip_prefix("~") else {
        return path.to_path_buf();
    };
    match dirs::home_dir() {
        Some(home) => home.join(stripped),
        None => path.to_path_buf(),
    }
}

/// Resolve `.` and `..` components lexically (no filesystem access, so this
/// works for paths that do not exist yet).
fn lexically_resolve(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        use std::path::Component::*;
        match component {
            CurDir => {}
            ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Normalized string form of a path, forward-slash separated and lower-cased
/// on case-insensitive filesystems (Windows); case-sensitive elsewhere.
pub fn normalized_path_text(path: impl AsRef<Path>) -> String {
    let normalized = normalize(path);
    let text = normalized.to_string_lossy().replace('\\', "/");
    if cfg!(windows) {
        text.to_lowercase()
    } else {
        text
    }
}

/// Stable per-file identity key: `sha256(normalized-path-text)[0:16]`.
pub fn source_key(path: impl AsRef<Path>) -> String {
    let text = normalized_path_text(path);
    let digest = Sha256::digest(text.as_bytes());
    hex_prefix(&digest, 16)
}

/// Streaming sha-256 over the file contents, 8 KiB at a time.
pub fn file_hash(path: impl AsRef<Path>) -> io::Result<String> {
    let mut file = File::open(path)?;
    let mut hasher = Sha256::new();
    let mut buf = [0u8; 8192];
    loop {
        let read = file.read(&mut buf)?;
        if read == 0 {
            break;
        }
        hasher.update(&buf[..read]);
    }
    let digest = hasher.finalize();
    Ok(hex_prefix(&digest, digest.len() * 2))
}

fn hex_prefix(bytes: &[u8], hex_len: usize) -> String {
    let mut s = String::with_capacity(hex_len);
    for byte in bytes {
        if s.len() >= hex_len {
            break;
        }
        s.push_str(&format!("{byte:02x}"));
    }
    s.truncate(hex_len);
    s
}

#[cfg(test)]
#[path = "pathing_tests.rs"]
mod tests;
