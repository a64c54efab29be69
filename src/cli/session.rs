// ============================================================
// Layer 1 — Interactive Session
// ============================================================
// Read a question, print the answer, repeat.
//
//   - "exit" (any case, surrounding whitespace ignored) ends it
//   - end of input ends it
//   - anything else, a blank line included, is passed to the
//     answerer as the question (trimmed)
//
// Generic over reader/writer so tests can drive it with
// in-memory buffers instead of a terminal.

use std::io::{self, BufRead, Write};

use crate::domain::traits::QuestionAnswerer;

pub const PROMPT: &str = "Enter your query (or type 'exit' to quit): ";

pub fn is_exit(line: &str) -> bool {
    line.trim().eq_ignore_ascii_case("exit")
}

pub fn run_session<Q, R, W>(answerer: &Q, mut input: R, mut out: W) -> io::Result<()>
where
    Q: QuestionAnswerer + ?Sized,
    R: BufRead,
    W: Write,
{
    let mut line = String::new();
    loop {
        write!(out, "{PROMPT}")?;
        out.flush()?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            writeln!(out)?;
            break;
        }

        let question = line.trim();
        if is_exit(question) {
            writeln!(out, "Exiting...")?;
            break;
        }

        tracing::debug!("Question: {}", question);
        let result = answerer.answer(question);
        writeln!(out, "\nAnswer:\n{result}")?;
    }
    Ok(())
}
