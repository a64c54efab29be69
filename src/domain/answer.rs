// ============================================================
// Layer 3 — Answer Domain Types
// ============================================================
// Extractive Q&A never invents text: the scorer points at a
// span inside a passage and gives it a confidence score.
//
//   ScoredSpan   — what the scorer returns for one passage
//   Candidate    — a ScoredSpan plus where it came from
//   QueryResult  — the single best Candidate, or nothing
//
// The score is an opaque ordering key. Whatever the model
// produces is compared as-is; it is not assumed to be a
// calibrated probability.

use std::fmt;

use crate::domain::document::Page;

/// Scorer output for one (question, passage) pair.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredSpan {
    pub answer: String,
    pub score:  f64,
}

impl ScoredSpan {
    pub fn new(answer: impl Into<String>, score: f64) -> Self {
        Self { answer: answer.into(), score }
    }
}

/// Where a passage lives: (page, paragraph), both 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct PassageLocation {
    pub page:      usize,
    pub paragraph: usize,
}

/// Which page number is reported to the user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PageNumbering {
    /// Position among non-empty pages
    #[default]
    Sequential,
    /// Position in the source file, counting blank pages
    Physical,
}

impl PageNumbering {
    pub fn number_of(self, page: &Page) -> usize {
        match self {
            PageNumbering::Sequential => page.number,
            PageNumbering::Physical   => page.physical_number,
        }
    }
}

/// A scored span tagged with its passage location.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub location: PassageLocation,
    pub answer:   String,
    pub score:    f64,
}

/// Outcome of one query.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryResult {
    Answer(Candidate),
    NoAnswer,
}

impl QueryResult {
    pub fn candidate(&self) -> Option<&Candidate> {
        match self {
            QueryResult::Answer(c) => Some(c),
            QueryResult::NoAnswer  => None,
        }
    }
}

impl fmt::Display for QueryResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryResult::Answer(c) => write!(
                f,
                "Page {}, Paragraph {}: {} (Confidence: {:.2})",
                c.location.page, c.location.paragraph, c.answer, c.score
            ),
            QueryResult::NoAnswer => f.write_str("No valid answer found."),
        }
    }
}
