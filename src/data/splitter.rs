// ============================================================
// Layer 4 — Passage Splitter
// ============================================================
// Splits one page into paragraph-sized passages on blank lines
// (two consecutive '\n').
//
//   "para A\n\npara B"  →  ["para A", "para B"]
//   "no blank lines"    →  ["no blank lines"]
//
// Passages are handed to the scorer exactly as split: no
// trimming, no merging of short pieces, no re-splitting of
// long ones. Three or more newlines therefore produce empty
// passages, which keep their ordinal so paragraph numbers
// stay stable.

use crate::domain::document::Page;

pub const PASSAGE_DELIMITER: &str = "\n\n";

/// Split page text into passages. Always returns at least one element.
pub fn split_passages(text: &str) -> Vec<&str> {
    text.split(PASSAGE_DELIMITER).collect()
}

/// Passages of a page paired with their 1-based paragraph ordinal.
pub fn passages(page: &Page) -> impl Iterator<Item = (usize, &str)> + '_ {
    split_passages(&page.text)
        .into_iter()
        .enumerate()
        .map(|(idx, text)| (idx + 1, text))
}
