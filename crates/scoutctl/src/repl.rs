//! Line-oriented conversation loop.

use anyhow::{Context, Result};
use scout_common::Engine;
use std::io::{BufRead, Write};
use tracing::debug;

pub const PROMPT: &str = "> ";

fn is_exit(line: &str) -> bool {
    matches!(line.to_lowercase().as_str(), "quit" | "exit" | ":q")
}

/// Answer each line of `reader` until EOF or an exit command.
///
/// Returns the number of lines answered.
pub fn run_repl<R: BufRead, W: Write>(reader: R, writer: &mut W, engine: &mut Engine) -> Result<usize> {
    let mut answered = 0;
    let mut lines = reader.lines();
    loop {
        write!(writer, "{}", PROMPT)?;
        writer.flush()?;

        let line = match lines.next() {
            Some(line) => line.context("failed to read input")?,
            None => break,
        };
        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        if is_exit(input) {
            writeln!(writer, "Goodbye.")?;
            break;
        }

        let reply = engine.handle(input).context("failed to answer")?;
        debug!(action = reply.action.as_str(), topic = ?reply.topic, "answered");
        writeln!(writer, "{}", reply.text)?;
        answered += 1;
    }
    Ok(answered)
}
