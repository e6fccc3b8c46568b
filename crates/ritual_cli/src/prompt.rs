//! Interactive prompts.
//!
//! Works over any line reader and writer so the flow can run against stdin
//! or scripted input. End of input always means the user aborted.

use ritual_core::is_acceptable;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io::{self, BufRead, Write};

const MAX_NAME_ATTEMPTS: usize = 3;

#[derive(Debug)]
pub enum PromptError {
    /// Input closed before an answer was given.
    Aborted,
    /// Every manual name attempt failed acceptance; carries the last attempt.
    NameUnacceptable(String),
    Io(io::Error),
}

impl Display for PromptError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Aborted => write!(f, "ritual aborted by user"),
            Self::NameUnacceptable(name) => write!(f, "display name `{name}` was not accepted"),
            Self::Io(err) => write!(f, "terminal error: {err}"),
        }
    }
}

impl Error for PromptError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for PromptError {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn say(&mut self, message: &str) -> Result<(), PromptError> {
        writeln!(self.output, "{message}")?;
        Ok(())
    }

    /// Asks until a non-empty handle is typed.
    pub fn ask_handle(&mut self) -> Result<String, PromptError> {
        loop {
            let answer = self.ask("\n👤 Enter your GitHub username:")?;
            if !answer.is_empty() {
                return Ok(answer);
            }
            self.say("⚠️  GitHub username is required and cannot be empty. Please try again.")?;
        }
    }

    /// Asks whether `name` is correct; an empty answer means yes.
    pub fn confirm_name(&mut self, name: &str) -> Result<bool, PromptError> {
        self.say(&format!("Is this your correct name: {name}"))?;
        loop {
            let answer = self.ask("Please confirm [Y/n]:")?;
            match answer.to_ascii_lowercase().as_str() {
                "" | "y" | "yes" => return Ok(true),
                "n" | "no" => return Ok(false),
                _ => self.say("Please answer yes or no.")?,
            }
        }
    }

    /// Asks for a typed full name, re-asking on unacceptable input.
    pub fn ask_name(&mut self) -> Result<String, PromptError> {
        let mut last = String::new();
        for _ in 0..MAX_NAME_ATTEMPTS {
            last = self.ask("📝 Enter your full name (first and last):")?;
            if is_acceptable(&last) {
                return Ok(last);
            }
            self.say("⚠️  Please enter a first and last name, not just initials.")?;
        }
        Err(PromptError::NameUnacceptable(last))
    }

    fn ask(&mut self, question: &str) -> Result<String, PromptError> {
        write!(self.output, "{question} ")?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(PromptError::Aborted);
        }
        Ok(line.trim().to_string())
    }

    #[cfg(test)]
    fn into_output(self) -> W {
        self.output
    }
}
