// ============================================================
// Layer 5 — Transformer Scorer
// ============================================================
// Implements AnswerScorer with the extractive Q&A model.
//
// One call = one forward pass over
//   [CLS] question [SEP] context [SEP]      (BERT)
//   <s> question </s></s> context </s>      (RoBERTa)
// followed by a search for the best (start, end) span inside
// the context segment. The confidence is p_start * p_end.
//
// Every failure is returned as a ScorerError so the selector
// can skip the passage; nothing here panics on bad input.
use anyhow::Result;
use burn::prelude::*;
use tokenizers::{Encoding, Tokenizer};

use crate::domain::answer::ScoredSpan;
use crate::domain::error::ScorerError;
use crate::domain::traits::AnswerScorer;
use crate::infra::checkpoint::CheckpointManager;
use crate::infra::tokenizer_store::{SpecialTokens, TokenizerStore};
use crate::ml::model::{ExtractiveQaConfig, ExtractiveQaModel};
use crate::ml::span::best_span;

pub type InferBackend = burn::backend::Wgpu;

pub const DEFAULT_MAX_ANSWER_TOKENS: usize = 30;

pub struct TransformerScorer<B: Backend = InferBackend> {
    model:             ExtractiveQaModel<B>,
    tokenizer:         Tokenizer,
    special:           SpecialTokens,
    max_seq_len:       usize,
    /// Context tokens get segment id 1 when the model has segments
    segmented:         bool,
    max_answer_tokens: usize,
    device:            B::Device,
}

impl TransformerScorer<InferBackend> {
    /// Load model, weights and tokenizer from `model_dir` onto the default device.
    pub fn from_dir(model_dir: &str, max_answer_tokens: usize) -> Result<Self> {
        Self::load(model_dir, max_answer_tokens, burn::backend::wgpu::WgpuDevice::default())
    }
}

impl<B: Backend> TransformerScorer<B> {
    pub fn load(model_dir: &str, max_answer_tokens: usize, device: B::Device) -> Result<Self> {
        let ckpt      = CheckpointManager::new(model_dir);
        let cfg       = ckpt.load_config()?;
        let model     = ckpt.load_model::<B>(&cfg, &device)?;
        let tokenizer = TokenizerStore::new(model_dir).load()?;

        tracing::info!(
            "Scorer ready: {} layers, d_model={}, max_seq_len={}",
            cfg.num_layers, cfg.d_model, cfg.max_seq_len()
        );
        Self::new(model, &cfg, tokenizer, max_answer_tokens, device)
    }

    /// Assemble a scorer from an already-built model and tokenizer.
    /// `cfg` must be the config the model was built from.
    pub fn new(
        model:             ExtractiveQaModel<B>,
        cfg:               &ExtractiveQaConfig,
        tokenizer:         Tokenizer,
        max_answer_tokens: usize,
        device:            B::Device,
    ) -> Result<Self> {
        let special = SpecialTokens::resolve(&tokenizer)?;
        Ok(Self {
            model,
            tokenizer,
            special,
            max_seq_len: cfg.max_seq_len(),
            segmented: cfg.type_vocab_size > 1,
            max_answer_tokens: max_answer_tokens.max(1),
            device,
        })
    }

    fn encode(&self, text: &str) -> Result<Encoding, ScorerError> {
        self.tokenizer
            .encode(text, false)
            .map_err(|e| ScorerError::Tokenizer(e.to_string()))
    }

    /// Softmax over a [1, seq_len] logit row, flattened.
    fn probabilities(&self, logits: Tensor<B, 2>) -> Result<Vec<f32>, ScorerError> {
        burn::tensor::activation::softmax(logits, 1)
            .into_data()
            .to_vec::<f32>()
            .map_err(|e| ScorerError::Inference(format!("{e:?}")))
    }

    fn row(&self, values: &[i32]) -> Tensor<B, 2, Int> {
        Tensor::<B, 1, Int>::from_ints(values, &self.device).unsqueeze::<2>()
    }
}

impl<B: Backend> AnswerScorer for TransformerScorer<B> {
    fn score(&self, question: &str, context: &str) -> Result<ScoredSpan, ScorerError> {
        if context.trim().is_empty() {
            return Err(ScorerError::EmptyContext);
        }

        let q_enc = self.encode(question)?;
        let c_enc = self.encode(context)?;

        let tokens = q_enc.len() + c_enc.len() + self.special.overhead();
        if tokens > self.max_seq_len {
            return Err(ScorerError::InputTooLong { tokens, limit: self.max_seq_len });
        }

        let mut input_ids = Vec::with_capacity(tokens);
        input_ids.push(self.special.cls);
        input_ids.extend_from_slice(q_enc.get_ids());
        input_ids.extend(std::iter::repeat(self.special.sep).take(self.special.pair_separators));
        let context_start = input_ids.len();
        input_ids.extend_from_slice(c_enc.get_ids());
        let context_end = input_ids.len();
        input_ids.push(self.special.sep);

        let context_segment = i32::from(self.segmented);
        let segments: Vec<i32> = (0..input_ids.len())
            .map(|i| if i < context_start { 0 } else { context_segment })
            .collect();
        let ids: Vec<i32> = input_ids.iter().map(|&id| id as i32).collect();

        let logits      = self.model.forward(self.row(&ids), self.row(&segments));
        let start_probs = self.probabilities(logits.start)?;
        let end_probs   = self.probabilities(logits.end)?;

        let span = best_span(
            &start_probs,
            &end_probs,
            context_start..context_end,
            self.max_answer_tokens,
        )
        .ok_or(ScorerError::EmptyAnswer)?;

        let first = span.start - context_start;
        let last  = span.end - context_start;
        let answer = match answer_from_offsets(context, c_enc.get_offsets(), first, last) {
            Some(text) => text.to_string(),
            None => self
                .tokenizer
                .decode(&c_enc.get_ids()[first..=last], true)
                .map_err(|e| ScorerError::Tokenizer(e.to_string()))?,
        };

        let answer = answer.trim();
        if answer.is_empty() {
            return Err(ScorerError::EmptyAnswer);
        }

        tracing::debug!("Span [{},{}] conf={:.4} answer='{}'", first, last, span.score, answer);
        Ok(ScoredSpan::new(answer, f64::from(span.score)))
    }
}

/// Slice of `context` covered by context tokens `first..=last`,
/// using the tokenizer's byte offsets.
fn answer_from_offsets<'a>(
    context: &'a str,
    offsets: &[(usize, usize)],
    first:   usize,
    last:    usize,
) -> Option<&'a str> {
    let (begin, _) = *offsets.get(first)?;
    let (_, end)   = *offsets.get(last)?;
    if begin >= end {
        return None;
    }
    context.get(begin..end)
}
