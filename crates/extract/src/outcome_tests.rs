// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn defaults_confidence_to_one_when_absent() {
    let outcome = ExtractOutcome { text: "hi".into(), structure: Map::new(), quality: HashMap::new() };
    assert_eq!(outcome.extraction_confidence(), 1.0);
}

#[test]
fn reads_fallback_tag_from_structure() {
    let mut structure = Map::new();
    structure.insert("fallback".to_string(), Value::String("text_stub".to_string()));
    let outcome = ExtractOutcome { text: String::new(), structure, quality: HashMap::new() };
    assert_eq!(outcome.fallback(), Some("text_stub"));
}
