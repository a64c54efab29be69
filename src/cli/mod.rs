// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// Parses arguments with clap, builds the AskUseCase, and owns
// all printing to stdout. Logs go to stderr (see main.rs), so
// stdout carries only the conversation.
//
//   chat    — "Extracted N pages", then the interactive loop
//   ask     — "Extracted N pages", then one answer
//   convert — path of the written burn checkpoint

pub mod commands;

pub mod session;

use anyhow::Result;
use clap::Parser;
use commands::{AskArgs, ChatArgs, Commands, ConvertArgs};

use crate::application::ask_use_case::{AskConfig, AskUseCase};
use crate::application::convert_use_case::ConvertUseCase;
use crate::domain::traits::QuestionAnswerer;
use crate::ml::inferencer::InferBackend;

#[derive(Parser, Debug)]
#[command(
    name = "pdf-qa",
    version,
    about = "Ask questions about a PDF with an extractive Q&A model."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Chat(args)    => run_chat(args),
            Commands::Ask(args)     => run_ask(args),
            Commands::Convert(args) => run_convert(args),
        }
    }
}

fn run_chat(args: ChatArgs) -> Result<()> {
    let config: AskConfig = args.shared.into();
    let use_case = AskUseCase::open(&config)?;
    println!("Extracted {} pages from the PDF.\n", use_case.page_count());

    let stdin = std::io::stdin();
    session::run_session(&use_case, stdin.lock(), std::io::stdout().lock())?;
    Ok(())
}

fn run_ask(args: AskArgs) -> Result<()> {
    let config: AskConfig = args.shared.into();
    let use_case = AskUseCase::open(&config)?;
    println!("Extracted {} pages from the PDF.\n", use_case.page_count());

    let result = use_case.answer(args.question.trim());
    println!("Answer:\n{result}");
    Ok(())
}

fn run_convert(args: ConvertArgs) -> Result<()> {
    let device  = burn::backend::wgpu::WgpuDevice::default();
    let written = ConvertUseCase::new(args.model_dir).execute::<InferBackend>(&device)?;
    println!("Wrote {}", written.display());
    Ok(())
}
