// ============================================================
// Layer 3 — Error Taxonomy
// ============================================================
// Two error families with very different blast radius:
//
//   DocumentOpenError — the PDF could not be loaded. Fatal at
//                       startup; nothing can be answered.
//   ScorerError       — the model failed on ONE passage. The
//                       scan logs it, skips the passage, moves on.
//
// "No answer" is not an error at all; it is QueryResult::NoAnswer.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DocumentOpenError {
    #[error("document '{}' does not exist", .0.display())]
    NotFound(PathBuf),

    #[error("cannot read '{}': {source}", path.display())]
    Io {
        path:   PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("'{}' is not a readable PDF: {reason}", path.display())]
    Parse { path: PathBuf, reason: String },

    #[error("'{}' is encrypted and cannot be opened without a password", .0.display())]
    Encrypted(PathBuf),
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ScorerError {
    #[error("passage is empty")]
    EmptyContext,

    #[error("input is {tokens} tokens, model accepts at most {limit}")]
    InputTooLong { tokens: usize, limit: usize },

    #[error("tokenizer failed: {0}")]
    Tokenizer(String),

    #[error("model inference failed: {0}")]
    Inference(String),

    #[error("model produced an empty answer span")]
    EmptyAnswer,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_file() {
        let err = DocumentOpenError::NotFound(PathBuf::from("medical.pdf"));
        assert_eq!(err.to_string(), "document 'medical.pdf' does not exist");

        let err = DocumentOpenError::Parse {
            path:   PathBuf::from("notes.pdf"),
            reason: "bad header".to_string(),
        };
        assert!(err.to_string().contains("notes.pdf"));
        assert!(err.to_string().contains("bad header"));
    }

    #[test]
    fn test_input_too_long_message() {
        let err = ScorerError::InputTooLong { tokens: 700, limit: 512 };
        assert_eq!(err.to_string(), "input is 700 tokens, model accepts at most 512");
    }
}
