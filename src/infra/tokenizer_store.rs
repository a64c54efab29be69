// ============================================================
// Layer 6 — Tokenizer Store
// ============================================================
// Loads the HuggingFace tokenizer.json that belongs to the
// model, and works out which ids mark the start of a sequence
// and separate question from context.
//
// BERT-style vocabularies use [CLS] / [SEP]; RoBERTa-style
// ones use <s> / </s> and put two separators between the
// question and the context:
//
//   [CLS] question [SEP] context [SEP]
//   <s> question </s></s> context </s>

use anyhow::Result;
use std::path::PathBuf;
use tokenizers::Tokenizer;

const TOKENIZER_FILE: &str = "tokenizer.json";

/// Ids of the markers around the question and the context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpecialTokens {
    pub cls: u32,
    pub sep: u32,
    /// Separators between question and context (1 for BERT, 2 for RoBERTa)
    pub pair_separators: usize,
}

impl SpecialTokens {
    pub fn resolve(tokenizer: &Tokenizer) -> Result<Self> {
        if let (Some(cls), Some(sep)) = (tokenizer.token_to_id("[CLS]"), tokenizer.token_to_id("[SEP]")) {
            return Ok(Self { cls, sep, pair_separators: 1 });
        }
        if let (Some(cls), Some(sep)) = (tokenizer.token_to_id("<s>"), tokenizer.token_to_id("</s>")) {
            return Ok(Self { cls, sep, pair_separators: 2 });
        }
        anyhow::bail!("Tokenizer has neither [CLS]/[SEP] nor <s>/</s> markers")
    }

    /// Number of special tokens wrapped around one question/context pair.
    pub fn overhead(&self) -> usize {
        2 + self.pair_separators
    }
}

pub struct TokenizerStore {
    dir: PathBuf,
}

impl TokenizerStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn load(&self) -> Result<Tokenizer> {
        let path = self.dir.join(TOKENIZER_FILE);
        Tokenizer::from_file(&path)
            .map_err(|e| anyhow::anyhow!(
                "Cannot load tokenizer from '{}': {}", path.display(), e
            ))
    }
}
