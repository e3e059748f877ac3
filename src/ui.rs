//! Operator-facing input and output boundary
//!
//! The pipeline itself is pure with respect to the console: everything the
//! operator types comes in through [`InputProvider`] and every finished
//! document leaves through [`OutputSink`]. Tests inject scripted doubles.

use crate::error::{PromptError, PromptResult};
use inquire::Text;
use std::collections::VecDeque;
use std::path::PathBuf;

/// Where a composed document should go
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    Stdout,
    File(PathBuf),
}

/// Characters of the document echoed to the console after a file write
const PREVIEW_LIMIT: usize = 500;

/// Truncated head of a document for the post-save echo.
pub fn preview(document: &str) -> String {
    if document.chars().count() > PREVIEW_LIMIT {
        let head: String = document.chars().take(PREVIEW_LIMIT).collect();
        format!("{head}...")
    } else {
        document.to_string()
    }
}

/// Source of operator-typed values
pub trait InputProvider {
    /// Read one free-text line; cancellation surfaces as
    /// [`PromptError::UserCancelled`].
    fn read_line(&mut self, prompt: &str) -> PromptResult<String>;

    /// Read a filesystem path.
    fn read_path(&mut self, prompt: &str) -> PromptResult<PathBuf> {
        Ok(PathBuf::from(self.read_line(prompt)?.trim()))
    }
}

/// Destination for composed documents
pub trait OutputSink {
    /// Deliver the finished document. A file-write failure is returned to
    /// the caller; nothing is committed silently.
    fn write_document(&mut self, target: &OutputTarget, document: &str) -> PromptResult<()>;
}

/// Interactive console input via inquire
pub struct ConsoleInput;

impl InputProvider for ConsoleInput {
    fn read_line(&mut self, prompt: &str) -> PromptResult<String> {
        Text::new(prompt)
            .prompt()
            .map_err(|_| PromptError::UserCancelled)
    }
}

/// Console/file output
pub struct ConsoleOutput;

impl OutputSink for ConsoleOutput {
    fn write_document(&mut self, target: &OutputTarget, document: &str) -> PromptResult<()> {
        match target {
            OutputTarget::Stdout => {
                println!("{document}");
                Ok(())
            }
            OutputTarget::File(path) => {
                std::fs::write(path, document)?;
                println!("✅ Prompt saved to: {}", path.display());
                println!("\n--- PROMPT PREVIEW ---");
                println!("{}", preview(document));
                println!("\n[...continues in the file...]");
                Ok(())
            }
        }
    }
}

/// Scripted input double for headless runs and tests
pub struct ScriptedInput {
    answers: VecDeque<String>,
}

impl ScriptedInput {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
        }
    }
}

impl InputProvider for ScriptedInput {
    fn read_line(&mut self, _prompt: &str) -> PromptResult<String> {
        self.answers
            .pop_front()
            .ok_or(PromptError::UserCancelled)
    }
}

/// Output double that captures documents in memory
#[derive(Default)]
pub struct CapturedOutput {
    pub documents: Vec<(OutputTarget, String)>,
}

impl OutputSink for CapturedOutput {
    fn write_document(&mut self, target: &OutputTarget, document: &str) -> PromptResult<()> {
        self.documents.push((target.clone(), document.to_string()));
        Ok(())
    }
}
