//! Terminal-backed dialogue channel.

use std::io::{self, BufRead, Write};

use tabq_query::DialogueChannel;
use tracing::trace;

use crate::logging::redact_value;

/// Prints numbered options and reads one line per answer.
pub struct ConsoleChannel<R, W> {
    input: R,
    output: W,
}

impl ConsoleChannel<io::StdinLock<'static>, io::Stdout> {
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> ConsoleChannel<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn into_output(self) -> W {
        self.output
    }
}

impl<R: BufRead, W: Write> DialogueChannel for ConsoleChannel<R, W> {
    fn present_options(&mut self, prompt: &str, options: &[String]) -> io::Result<()> {
        writeln!(self.output, "{prompt}")?;
        for (index, option) in options.iter().enumerate() {
            writeln!(self.output, "  [{index}] {option}")?;
        }
        write!(self.output, "> ")?;
        self.output.flush()
    }

    fn read_answer(&mut self) -> io::Result<String> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "input closed before the query finished",
            ));
        }
        let answer = line.trim_end_matches(['\r', '\n']).to_string();
        trace!(answer = redact_value(&answer), "answer read");
        Ok(answer)
    }

    fn report_error(&mut self, message: &str) -> io::Result<()> {
        writeln!(self.output, "invalid answer: {message}")
    }
}
