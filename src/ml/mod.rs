// ============================================================
// Layer 5 — ML / Model Layer (Burn)
// ============================================================
// All Burn framework code lives here. Other layers only see
// the AnswerScorer trait.
//
//   model.rs      — BERT-layout encoder with a span head
//   span.rs       — best (start, end) span search on probabilities
//   inferencer.rs — TransformerScorer: tokenise, forward, decode
//
// Reference: Devlin et al. (2019) BERT, §4.2 (SQuAD span prediction)

/// Transformer encoder Q&A model architecture
pub mod model;

/// Span selection over start/end probabilities
pub mod span;

/// AnswerScorer backed by the transformer model
pub mod inferencer;
