// ============================================================
// Layer 2 — Ask Use Case
// ============================================================
// Owns the loaded document and the scorer for the lifetime of
// the process, and answers any number of questions against
// them:
//
//   startup:   PdfLoader → Document        (once)
//              model dir → TransformerScorer (once)
//   per query: select_answer(question, document, scorer)
//
// A document that cannot be loaded stops everything here.
// Scorer failures on individual passages never reach this
// layer; the selector absorbs them.

use anyhow::{Context, Result};

use crate::application::selector::{select_answer, SelectionSettings};
use crate::data::loader::PdfLoader;
use crate::domain::answer::QueryResult;
use crate::domain::document::Document;
use crate::domain::traits::{AnswerScorer, PageSource, QuestionAnswerer};
use crate::ml::inferencer::TransformerScorer;

/// Everything needed to build an AskUseCase from disk.
/// The CLI converts its arguments into this; no clap types here.
#[derive(Debug, Clone)]
pub struct AskConfig {
    pub pdf_path:          String,
    pub model_dir:         String,
    pub max_answer_tokens: usize,
    pub selection:         SelectionSettings,
}

pub struct AskUseCase<S: AnswerScorer> {
    document: Document,
    scorer:   S,
    settings: SelectionSettings,
}

impl AskUseCase<TransformerScorer> {
    /// Load the PDF and the model described by `config`.
    pub fn open(config: &AskConfig) -> Result<Self> {
        let document = PdfLoader::new(&config.pdf_path)
            .load_document()
            .with_context(|| "Failed to load document")?;
        if document.is_empty() {
            tracing::warn!("'{}' contains no extractable text", document.source);
        }

        let scorer = TransformerScorer::from_dir(&config.model_dir, config.max_answer_tokens)
            .with_context(|| format!("Failed to load model from '{}'", config.model_dir))?;

        Ok(Self::new(document, scorer, config.selection))
    }
}

impl<S: AnswerScorer> AskUseCase<S> {
    pub fn new(document: Document, scorer: S, settings: SelectionSettings) -> Self {
        Self { document, scorer, settings }
    }

    pub fn page_count(&self) -> usize {
        self.document.page_count()
    }
}

impl<S: AnswerScorer> QuestionAnswerer for AskUseCase<S> {
    fn answer(&self, question: &str) -> QueryResult {
        select_answer(question, &self.document, &self.scorer, self.settings)
    }
}
