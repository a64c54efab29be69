// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// On-disk artefacts the scorer needs at startup:
//
//   checkpoint.rs      — config.json + weights: burn CompactRecorder
//                        files, or HF safetensors / PyTorch files
//                        read through burn-import
//
//   tokenizer_store.rs — tokenizer.json, plus lookup of the
//                        [CLS]/[SEP] marker ids
//
// Nothing here is touched after startup; all of it is read once.
// The only writer is `convert`, which saves model.mpk.gz.

/// Model config and weight loading
pub mod checkpoint;

/// Tokenizer loading and special-token lookup
pub mod tokenizer_store;
