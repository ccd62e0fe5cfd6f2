// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use proptest::prelude::*;

#[test]
fn collapses_whitespace_runs() {
    assert_eq!(normalize("one   two\t\tthree"), "one two three");
}

#[test]
fn normalizes_crlf_and_cr_to_lf() {
    assert_eq!(normalize("a\r\nb\rc"), "a\nb\nc");
}

#[test]
fn preserves_newlines_between_paragraphs() {
    assert_eq!(normalize("a\n\nb"), "a\n\nb");
}

proptest! {
    #[test]
    fn normalize_is_idempotent(s in ".{0,200}") {
        let once = normalize(&s);
        let twice = normalize(&once);
        prop_assert_eq!(once, twice);
    }
}
