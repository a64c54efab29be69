// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// Everything between a PDF on disk and the passages that get
// scored:
//
//   medical.pdf
//       │
//       ▼
//   PdfLoader       → one trimmed string per non-empty page
//       │
//       ▼
//   split_passages  → blank-line separated paragraphs
//
// The loader runs once at startup; the splitter runs on every
// query.

/// Loads PDF pages using lopdf
pub mod loader;

/// Splits a page into paragraph passages
pub mod splitter;
