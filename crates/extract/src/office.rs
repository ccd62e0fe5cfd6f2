// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! OOXML text scraping for DOCX/PPTX/XLSX. These are zip archives of XML
//! parts; rather than modeling the full OOXML schema (out of scope — the
//! extractor registry is an external collaborator per §1), this walks the
//! relevant XML parts and concatenates every text node, in document order.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use quick_xml::events::Event;
use quick_xml::Reader;
use serde_json::{Map, Value};
use std::collections::HashMap;
use zip::ZipArchive;

use crate::error::ExtractError;
use crate::outcome::ExtractOutcome;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OfficeKind {
    Docx,
    Pptx,
    Xlsx,
}

impl OfficeKind {
    fn format_tag(self) -> &'static str {
        match self {
            Self::Docx => "docx",
            Self::Pptx => "pptx",
            Self::Xlsx => "xlsx",
        }
    }
}

pub fn extract(path: &Path, kind: OfficeKind) -> Result<ExtractOutcome, ExtractError> {
    let file = File::open(path).map_err(|source| ExtractError::Io { path: path.display().to_string(), source })?;
    let mut archive = ZipArchive::new(file).map_err(|e| to_corrupt(path, e.to_string()))?;

    let mut parts = Vec::new();
    for i in 0..archive.len() {
        let entry = archive.by_index(i).map_err(|e| to_corrupt(path, e.to_string()))?;
        if is_text_part(kind, entry.name()) {
            parts.push(entry.name().to_string());
        }
    }
    parts.sort();

    if parts.is_empty() {
        return Err(ExtractError::CorruptInput {
            path: path.display().to_string(),
            reason: format!("no {} text parts found in archive", kind.format_tag()),
        });
    }

    let mut text_segments = Vec::new();
    for name in &parts {
        let mut entry = archive.by_name(name).map_err(|e| to_corrupt(path, e.to_string()))?;
        let mut xml = String::new();
        entry.read_to_string(&mut xml).map_err(|source| ExtractError::Io { path: path.display().to_string(), source })?;
        text_segments.push(scrape_text(&xml));
    }

    let text = text_segments.into_iter().filter(|s| !s.is_empty()).collect::<Vec<_>>().join("\n\n");

    let mut structure = Map::new();
    structure.insert("part_count".to_string(), Value::from(parts.len()));
    structure.insert("format".to_string(), Value::String(kind.format_tag().to_string()));
    let mut quality = HashMap::new();
    quality.insert("extraction_confidence".to_string(), 1.0);

    Ok(ExtractOutcome { text, structure, quality })
}

fn is_text_part(kind: OfficeKind, name: &str) -> bool {
    match kind {
        OfficeKind::Docx => name == "word/document.xml",
        OfficeKind::Pptx => name.starts_with("ppt/slides/slide") && name.ends_with(".xml"),
        OfficeKind::Xlsx => name.starts_with("xl/worksheets/sheet") && name.ends_with(".xml"),
    }
}

fn scrape_text(xml: &str) -> String {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);
    let mut words = Vec::new();
    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Text(e)) => {
                if let Ok(text) = e.unescape() {
                    let trimmed = text.trim();
                    if !trimmed.is_empty() {
                        words.push(trimmed.to_string());
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(_) => break,
            _ => {}
        }
        buf.clear();
    }
    words.join(" ")
}

fn to_corrupt(path: &Path, reason: String) -> ExtractError {
    ExtractError::CorruptInput { path: path.display().to_string(), reason }
}

#[cfg(test)]
#[path = "office_tests.rs"]
mod tests;
