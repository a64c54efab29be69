// ============================================================
// Layer 4 — PDF Document Loader
// ============================================================
// Loads a PDF with the lopdf crate and extracts one string of
// text per physical page.
//
// lopdf numbers pages from 1 in a BTreeMap, so iterating
// get_pages() already yields physical page order:
//
//   Document::load_mem(bytes)
//     └── get_pages()  → { 1: ObjectId, 2: ObjectId, ... }
//           └── extract_text(&[page_no]) → String
//
// The trim / drop-blank-pages rule lives in
// Document::from_page_texts so every source shares it.

use std::path::PathBuf;

use lopdf::Document as PdfFile;

use crate::domain::document::Document;
use crate::domain::error::DocumentOpenError;
use crate::domain::traits::PageSource;

/// Loads the pages of a single PDF file.
pub struct PdfLoader {
    path: PathBuf,
}

impl PdfLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl PageSource for PdfLoader {
    fn load_document(&self) -> Result<Document, DocumentOpenError> {
        let path = self.path.as_path();

        if !path.exists() {
            return Err(DocumentOpenError::NotFound(path.to_path_buf()));
        }

        let bytes = std::fs::read(path).map_err(|source| DocumentOpenError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let mut pdf = PdfFile::load_mem(&bytes).map_err(|e| DocumentOpenError::Parse {
            path:   path.to_path_buf(),
            reason: e.to_string(),
        })?;

        // Many PDFs are "encrypted" with an empty user password
        if pdf.is_encrypted() && pdf.decrypt("").is_err() {
            return Err(DocumentOpenError::Encrypted(path.to_path_buf()));
        }

        let texts = extract_page_texts(&pdf);
        let doc   = Document::from_page_texts(path.display().to_string(), texts);

        tracing::info!(
            "Loaded '{}': {} of {} pages contain text",
            path.display(),
            doc.page_count(),
            doc.physical_page_count
        );
        Ok(doc)
    }
}

/// Extract the raw text of every page in physical order.
///
/// A page whose content stream cannot be decoded becomes an
/// empty string (and is later dropped) rather than failing
/// the whole document.
fn extract_page_texts(pdf: &PdfFile) -> Vec<String> {
    pdf.get_pages()
        .keys()
        .map(|&page_no| match pdf.extract_text(&[page_no]) {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!("Cannot extract text from page {}: {}", page_no, e);
                String::new()
            }
        })
        .collect()
}
