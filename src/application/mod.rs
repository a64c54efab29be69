// ============================================================
// Layer 2 — Application / Use Cases
// ============================================================
// Coordinates the other layers to answer questions:
//
//   ask_use_case.rs     — holds the document + scorer, answers queries
//   selector.rs         — the page/paragraph scan with threshold and
//                         best-of-N selection
//   convert_use_case.rs — turns HF weights into a burn checkpoint
//
// No printing here (that's Layer 1) and no model code (Layer 5).

// The question-answering workflow
pub mod ask_use_case;

// Best-candidate selection over all passages
pub mod selector;

// HF weights → model.mpk.gz
pub mod convert_use_case;
