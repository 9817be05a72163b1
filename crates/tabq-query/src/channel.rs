//! Dialogue channels: where options are shown and answers come from.

use std::collections::VecDeque;
use std::fmt::Write as _;
use std::io;

/// The collaborator that presents a round and returns one answer.
///
/// Nothing is assumed about who answers: a person at a terminal, a script,
/// or a remote suggestion service.
pub trait DialogueChannel {
    /// Show a prompt and its ordered options. Freeform rounds pass no options.
    fn present_options(&mut self, prompt: &str, options: &[String]) -> io::Result<()>;

    /// Block until one answer is available. Blank means "stop" where allowed.
    fn read_answer(&mut self) -> io::Result<String>;

    /// Tell the answering party why its last answer was rejected.
    fn report_error(&mut self, message: &str) -> io::Result<()>;
}

impl<C: DialogueChannel + ?Sized> DialogueChannel for &mut C {
    fn present_options(&mut self, prompt: &str, options: &[String]) -> io::Result<()> {
        (**self).present_options(prompt, options)
    }

    fn read_answer(&mut self) -> io::Result<String> {
        (**self).read_answer()
    }

    fn report_error(&mut self, message: &str) -> io::Result<()> {
        (**self).report_error(message)
    }
}

/// Answers from a fixed list. Running out is an `UnexpectedEof` error.
#[derive(Debug, Clone, Default)]
pub struct ScriptedChannel {
    answers: VecDeque<String>,
    prompts: Vec<String>,
    errors: Vec<String>,
}

impl ScriptedChannel {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
            prompts: Vec::new(),
            errors: Vec::new(),
        }
    }

    /// Prompts presented so far, in order.
    pub fn prompts(&self) -> &[String] {
        &self.prompts
    }

    /// Error messages reported so far, in order.
    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    pub fn remaining(&self) -> usize {
        self.answers.len()
    }
}

impl DialogueChannel for ScriptedChannel {
    fn present_options(&mut self, prompt: &str, _options: &[String]) -> io::Result<()> {
        self.prompts.push(prompt.to_string());
        Ok(())
    }

    fn read_answer(&mut self) -> io::Result<String> {
        self.answers.pop_front().ok_or_else(|| {
            io::Error::new(io::ErrorKind::UnexpectedEof, "answer script exhausted")
        })
    }

    fn report_error(&mut self, message: &str) -> io::Result<()> {
        self.errors.push(message.to_string());
        Ok(())
    }
}

/// One exchange recorded by a [`TranscriptChannel`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranscriptEntry {
    Question { prompt: String, options: Vec<String> },
    Answer(String),
    Error(String),
}

/// Records every exchange passing through an inner channel.
#[derive(Debug, Clone, Default)]
pub struct TranscriptChannel<C> {
    inner: C,
    entries: Vec<TranscriptEntry>,
}

impl<C: DialogueChannel> TranscriptChannel<C> {
    pub fn new(inner: C) -> Self {
        Self {
            inner,
            entries: Vec::new(),
        }
    }

    pub fn entries(&self) -> &[TranscriptEntry] {
        &self.entries
    }

    pub fn inner(&self) -> &C {
        &self.inner
    }

    pub fn into_inner(self) -> C {
        self.inner
    }

    /// Plain-text rendering, one line per exchange.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for entry in &self.entries {
            let _ = match entry {
                TranscriptEntry::Question { prompt, options } if options.is_empty() => {
                    writeln!(out, "? {prompt}")
                }
                TranscriptEntry::Question { prompt, options } => {
                    writeln!(out, "? {prompt} [{}]", options.join(", "))
                }
                TranscriptEntry::Answer(answer) => writeln!(out, "> {answer}"),
                TranscriptEntry::Error(message) => writeln!(out, "! {message}"),
            };
        }
        out
    }
}

impl<C: DialogueChannel> DialogueChannel for TranscriptChannel<C> {
    fn present_options(&mut self, prompt: &str, options: &[String]) -> io::Result<()> {
        self.entries.push(TranscriptEntry::Question {
            prompt: prompt.to_string(),
            options: options.to_vec(),
        });
        self.inner.present_options(prompt, options)
    }

    fn read_answer(&mut self) -> io::Result<String> {
        let answer = self.inner.read_answer()?;
        self.entries.push(TranscriptEntry::Answer(answer.clone()));
        Ok(answer)
    }

    fn report_error(&mut self, message: &str) -> io::Result<()> {
        self.entries.push(TranscriptEntry::Error(message.to_string()));
        self.inner.report_error(message)
    }
}
