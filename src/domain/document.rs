// ============================================================
// Layer 3 — Document Domain Type
// ============================================================
// A Document is the ordered list of pages extracted from one
// PDF. It is built once at startup and never changes after.
//
// Whitespace-only pages are dropped while building, so every
// Page holds some text. Each page remembers two numbers:
//   - number:          1-based position among the kept pages
//   - physical_number: 1-based position in the source file
//
// Example: a file with pages [text, blank, text] produces
//   Page { number: 1, physical_number: 1, .. }
//   Page { number: 2, physical_number: 3, .. }

/// One page of extracted text. Never empty; stored trimmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub number:          usize,
    pub physical_number: usize,
    pub text:            String,
}

/// The loaded document. Read-only after construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// Where the pages came from (a file path for PDFs)
    pub source: String,

    /// Number of pages in the source, including dropped blank ones
    pub physical_page_count: usize,

    pages: Vec<Page>,
}

impl Document {
    /// Build a Document from raw per-page strings in physical order.
    ///
    /// Each string is trimmed; strings that are empty after trimming
    /// are dropped, but still count towards physical numbering.
    pub fn from_page_texts<I, S>(source: impl Into<String>, texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut pages = Vec::new();
        let mut physical_page_count = 0usize;

        for (idx, raw) in texts.into_iter().enumerate() {
            physical_page_count = idx + 1;
            let trimmed = raw.as_ref().trim();
            if trimmed.is_empty() {
                continue;
            }
            pages.push(Page {
                number:          pages.len() + 1,
                physical_number: idx + 1,
                text:            trimmed.to_string(),
            });
        }

        Self {
            source: source.into(),
            physical_page_count,
            pages,
        }
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    /// Number of kept (non-empty) pages
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}
