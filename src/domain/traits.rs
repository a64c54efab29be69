// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// The application layer only talks to these traits, so the
// concrete pieces can be swapped or faked in tests:
//
//   PageSource        — PdfLoader (lopdf)
//   AnswerScorer      — TransformerScorer (burn + tokenizers),
//                       or any closure in tests
//   QuestionAnswerer  — AskUseCase, driven by the CLI session

use crate::domain::answer::{QueryResult, ScoredSpan};
use crate::domain::document::Document;
use crate::domain::error::{DocumentOpenError, ScorerError};

// ─── PageSource ───────────────────────────────────────────────────────────────
/// Anything that can produce a Document of ordered pages.
pub trait PageSource {
    fn load_document(&self) -> Result<Document, DocumentOpenError>;
}

// ─── AnswerScorer ─────────────────────────────────────────────────────────────
/// Extractive Q&A over a single passage.
///
/// A failure only concerns this one (question, context) pair;
/// callers are expected to skip the passage and carry on.
pub trait AnswerScorer {
    fn score(&self, question: &str, context: &str) -> Result<ScoredSpan, ScorerError>;
}

impl<F> AnswerScorer for F
where
    F: Fn(&str, &str) -> Result<ScoredSpan, ScorerError>,
{
    fn score(&self, question: &str, context: &str) -> Result<ScoredSpan, ScorerError> {
        self(question, context)
    }
}

// ─── QuestionAnswerer ─────────────────────────────────────────────────────────
/// Anything that can answer a question about an already-loaded document.
pub trait QuestionAnswerer {
    fn answer(&self, question: &str) -> QueryResult;
}
