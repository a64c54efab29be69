// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Plain Rust types and traits describing what the system
// works with: a loaded document, the passages inside it,
// the candidates produced while answering, and the result.
//
// Rules for this layer:
//   - NO Burn framework types
//   - NO file I/O
//   - NO PDF parsing
//
// Everything here can be unit tested without a model or a file.

// A loaded PDF: ordered, non-empty pages
pub mod document;

// Passage locations, scored spans, candidates and query results
pub mod answer;

// Error taxonomy for document loading and scoring
pub mod error;

// Seams implemented by the data, ml and application layers
pub mod traits;
