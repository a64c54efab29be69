// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Two subcommands share the same document/model options:
//   chat    — interactive question loop
//   ask     — answer one question and exit
// plus one to prepare a model directory:
//   convert — HF weights → model.mpk.gz

use clap::{Args, Subcommand};

use crate::application::ask_use_case::AskConfig;
use crate::application::selector::{SelectionSettings, DEFAULT_CONFIDENCE_THRESHOLD};
use crate::domain::answer::PageNumbering;
use crate::ml::inferencer::DEFAULT_MAX_ANSWER_TOKENS;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Load the PDF once, then answer questions until 'exit'
    Chat(ChatArgs),

    /// Answer a single question and exit
    Ask(AskArgs),

    /// Convert HF safetensors / PyTorch weights to a burn checkpoint
    Convert(ConvertArgs),
}

/// Options common to every command.
#[derive(Args, Debug, Clone)]
pub struct SharedArgs {
    /// PDF file to answer questions about
    #[arg(long, default_value = "medical.pdf")]
    pub pdf: String,

    /// Directory holding config.json, model weights and tokenizer.json
    #[arg(long, default_value = "model")]
    pub model_dir: String,

    /// Minimum confidence an answer needs to be reported
    #[arg(long, default_value_t = DEFAULT_CONFIDENCE_THRESHOLD)]
    pub threshold: f64,

    /// Longest answer span, in tokens
    #[arg(long, default_value_t = DEFAULT_MAX_ANSWER_TOKENS)]
    pub max_answer_tokens: usize,

    /// Report page numbers as they appear in the file, counting blank pages
    #[arg(long)]
    pub physical_pages: bool,
}

#[derive(Args, Debug)]
pub struct ChatArgs {
    #[command(flatten)]
    pub shared: SharedArgs,
}

#[derive(Args, Debug)]
pub struct AskArgs {
    /// The natural language question to answer
    #[arg(long)]
    pub question: String,

    #[command(flatten)]
    pub shared: SharedArgs,
}

#[derive(Args, Debug)]
pub struct ConvertArgs {
    /// Directory holding config.json and model.safetensors or pytorch_model.bin
    #[arg(long, default_value = "model")]
    pub model_dir: String,
}

/// Boundary between Layer 1 and Layer 2: the application layer
/// never sees clap types.
impl From<SharedArgs> for AskConfig {
    fn from(a: SharedArgs) -> Self {
        let numbering = if a.physical_pages {
            PageNumbering::Physical
        } else {
            PageNumbering::Sequential
        };
        AskConfig {
            pdf_path:          a.pdf,
            model_dir:         a.model_dir,
            max_answer_tokens: a.max_answer_tokens,
            selection:         SelectionSettings { threshold: a.threshold, numbering },
        }
    }
}
