// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Output Writer: `write(chunks, target, format) -> WriteResult`. All writes
//! are atomic at the file level (temp-file + rename); directories are
//! auto-created. JSON/TXT/CSV payloads are UTF-8 with a leading BOM.

use std::fs;
use std::io::Write as _;
use std::path::{Path, PathBuf};

use dx_core::{Chunk, OutputFormat};
use serde_json::json;

use crate::error::PipelineError;

const BOM: &str = "\u{feff}";

#[derive(Debug, Clone)]
pub struct WriteResult {
    pub chunk_count: u32,
    pub output_path: PathBuf,
}

pub fn write(
    chunks: &[Chunk],
    target: &Path,
    format: OutputFormat,
    source_documents: &[String],
    duration_seconds: f64,
) -> Result<WriteResult, PipelineError> {
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent)?;
    }

    let body = match format {
        OutputFormat::Json => render_json(chunks, source_documents, duration_seconds)?,
        OutputFormat::Txt => render_txt_combined(chunks),
        OutputFormat::Csv => render_csv(chunks)?,
    };

    atomic_write(target, &body)?;

    Ok(WriteResult { chunk_count: chunks.len() as u32, output_path: target.to_path_buf() })
}

/// Per-chunk TXT mode: one `<stem>_chunk_NNN.txt` file per chunk under `dir`.
pub fn write_txt_per_chunk(chunks: &[Chunk], dir: &Path, stem: &str) -> Result<Vec<PathBuf>, PipelineError> {
    fs::create_dir_all(dir)?;
    let mut paths = Vec::with_capacity(chunks.len());
    for (i, chunk) in chunks.iter().enumerate() {
        let path = dir.join(format!("{stem}_chunk_{i:03}.txt"));
        let body = format!("{BOM}{}", chunk.text);
        atomic_write(&path, body.as_bytes())?;
        paths.push(path);
    }
    Ok(paths)
}

fn render_json(chunks: &[Chunk], source_documents: &[String], duration_seconds: f64) -> Result<Vec<u8>, PipelineError> {
    let envelope = json!({
        "metadata": {
            "chunk_count": chunks.len(),
            "source_documents": source_documents,
            "duration_seconds": duration_seconds,
        },
        "content": chunks.iter().map(|c| c.text.as_str()).collect::<Vec<_>>().join("\n\n"),
        "chunks": chunks,
    });
    let text = serde_json::to_string_pretty(&envelope)?;
    Ok(format!("{BOM}{text}").into_bytes())
}

fn render_txt_combined(chunks: &[Chunk]) -> Vec<u8> {
    let mut out = String::from(BOM);
    for (i, chunk) in chunks.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        out.push_str(&format!("\u{2501}\u{2501}\u{2501} CHUNK {} \u{2501}\u{2501}\u{2501}\n", i + 1));
        out.push_str(&chunk.text);
        out.push('\n');
    }
    out.into_bytes()
}

fn render_csv(chunks: &[Chunk]) -> Result<Vec<u8>, PipelineError> {
    let mut buf = Vec::new();
    buf.extend_from_slice(BOM.as_bytes());
    {
        let mut writer = csv::Writer::from_writer(&mut buf);
        writer
            .write_record(["chunk_id", "document_id", "position_index", "word_count", "text"])
            .map_err(|e| PipelineError::Io(std::io::Error::other(e)))?;
        for chunk in chunks {
            writer
                .write_record([
                    chunk.id.as_str(),
                    chunk.document_id.as_str(),
                    &chunk.position_index.to_string(),
                    &chunk.word_count.to_string(),
                    chunk.text.as_str(),
                ])
                .map_err(|e| PipelineError::Io(std::io::Error::other(e)))?;
        }
        writer.flush().map_err(PipelineError::Io)?;
    }
    Ok(buf)
}

fn atomic_write(target: &Path, body: &[u8]) -> Result<(), PipelineError> {
    let parent = target.parent().unwrap_or_else(|| Path::new("."));
    let mut tmp = tempfile::NamedTempFile::new_in(parent)?;
    tmp.write_all(body)?;
    tmp.flush()?;
    tmp.persist(target).map_err(|e| PipelineError::Io(e.error))?;
    Ok(())
}

#[cfg(test)]
#[path = "writer_tests.rs"]
mod tests;
