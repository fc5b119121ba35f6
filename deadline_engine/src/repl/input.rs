//! Terminal input handling for the Deadline REPL.
//!
//! Everything that reads a line of player input goes through [`LineSource`]:
//! the interactive [`InputManager`] (rustyline with completion of the current
//! legal commands, or plain stdin when not attached to a terminal) and
//! [`ScriptedInput`], which feeds a fixed list of lines for replays and tests.

use std::collections::VecDeque;
use std::fs;
use std::io::{self, IsTerminal, Write};
use std::path::Path;

use anyhow::{Context as _, Result};
use log::{info, warn};
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::history::DefaultHistory;
use rustyline::validate::{ValidationContext, ValidationResult, Validator};
use rustyline::{Context, Helper};

/// Outcome of reading a line from the REPL input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    Line(String),
    Eof,
    Interrupted,
}

/// Anything the REPL and minigames can read player input from.
pub trait LineSource {
    /// Show `prompt` and read one line.
    ///
    /// # Errors
    /// Returns an error if the underlying reader fails.
    fn read_line(&mut self, prompt: &str) -> io::Result<InputEvent>;

    /// Offer these commands for completion on the next read.
    fn set_completions(&mut self, _commands: &[String]) {}
}

type ReplEditor = rustyline::Editor<DeadlineHelper, DefaultHistory>;

/// Completes whole commands (they may contain spaces) against the legal set.
#[derive(Default)]
struct DeadlineHelper {
    commands: Vec<String>,
}

impl Helper for DeadlineHelper {}

impl Completer for DeadlineHelper {
    type Candidate = Pair;

    fn complete(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> rustyline::Result<(usize, Vec<Self::Candidate>)> {
        let (start, prefix) = current_prefix(line, pos);
        Ok((start, completion_candidates(&self.commands, &prefix)))
    }
}

impl Hinter for DeadlineHelper {
    type Hint = String;
}

impl Highlighter for DeadlineHelper {}

impl Validator for DeadlineHelper {
    fn validate(&self, ctx: &mut ValidationContext) -> rustyline::Result<ValidationResult> {
        let _ = ctx;
        Ok(ValidationResult::Valid(None))
    }
}

fn current_prefix(line: &str, pos: usize) -> (usize, String) {
    let slice = &line[..pos];
    let trimmed = slice.trim_start_matches(char::is_whitespace);
    let start = pos - trimmed.len();
    (start, trimmed.to_string())
}

fn completion_candidates(commands: &[String], prefix: &str) -> Vec<Pair> {
    let lower = prefix.to_lowercase();
    commands
        .iter()
        .filter(|cmd| cmd.starts_with(&lower))
        .map(|cmd| Pair {
            display: cmd.clone(),
            replacement: cmd.clone(),
        })
        .collect()
}

/// Helper responsible for managing the interactive input backend.
///
/// Prefers `rustyline` when an interactive terminal is available, falling back to
/// a basic stdin reader otherwise.
pub struct InputManager {
    backend: Backend,
}

impl Default for InputManager {
    fn default() -> Self {
        Self::new()
    }
}

impl InputManager {
    pub fn new() -> Self {
        let backend = if io::stdin().is_terminal() {
            match RustylineInput::new() {
                Ok(editor) => {
                    info!("using rustyline-backed REPL input");
                    Backend::Rustyline(editor)
                },
                Err(err) => {
                    warn!("failed to initialize rustyline ({err}), falling back to basic stdin");
                    Backend::plain()
                },
            }
        } else {
            info!("stdin is not a TTY; using basic input mode");
            Backend::plain()
        };
        Self { backend }
    }
}

impl LineSource for InputManager {
    /// Read a line from the current backend. If the interactive backend reports an
    /// unrecoverable error, switch to the plain stdin backend and retry once.
    fn read_line(&mut self, prompt: &str) -> io::Result<InputEvent> {
        match self.backend.read_line(prompt) {
            Ok(event) => Ok(event),
            Err(err) => {
                if self.backend.is_rustyline() {
                    warn!("rustyline input failed: {err} -- switching to basic stdin");
                    self.backend = Backend::plain();
                    self.backend.read_line(prompt)
                } else {
                    Err(err)
                }
            },
        }
    }

    fn set_completions(&mut self, commands: &[String]) {
        if let Backend::Rustyline(input) = &mut self.backend
            && let Some(helper) = input.editor.helper_mut()
        {
            helper.commands = commands.to_vec();
        }
    }
}

enum Backend {
    Rustyline(RustylineInput),
    Plain(StdinInput),
}

impl Backend {
    fn plain() -> Self {
        Backend::Plain(StdinInput::default())
    }

    fn is_rustyline(&self) -> bool {
        matches!(self, Backend::Rustyline(_))
    }

    fn read_line(&mut self, prompt: &str) -> io::Result<InputEvent> {
        match self {
            Backend::Rustyline(editor) => editor.read_line(prompt),
            Backend::Plain(stdin) => stdin.read_line(prompt),
        }
    }
}

struct RustylineInput {
    editor: ReplEditor,
}

impl RustylineInput {
    fn new() -> io::Result<Self> {
        let mut editor = ReplEditor::new().map_err(map_io_err)?;
        editor.set_helper(Some(DeadlineHelper::default()));
        Ok(Self { editor })
    }

    fn read_line(&mut self, prompt: &str) -> io::Result<InputEvent> {
        match self.editor.readline(prompt) {
            Ok(line) => {
                if !line.trim().is_empty()
                    && let Err(err) = self.editor.add_history_entry(line.as_str())
                {
                    warn!("failed to append to history: {err}");
                }
                Ok(InputEvent::Line(line))
            },
            Err(err) => convert_readline_error(err),
        }
    }
}

#[derive(Default)]
struct StdinInput {
    buffer: String,
}

impl StdinInput {
    fn read_line(&mut self, prompt: &str) -> io::Result<InputEvent> {
        print!("{prompt}");
        io::stdout().flush()?;

        self.buffer.clear();
        let bytes = io::stdin().read_line(&mut self.buffer)?;
        if bytes == 0 {
            return Ok(InputEvent::Eof);
        }
        Ok(InputEvent::Line(strip_newline(&self.buffer).to_string()))
    }
}

fn strip_newline(line: &str) -> &str {
    line.strip_suffix('\n')
        .map_or(line, |rest| rest.strip_suffix('\r').unwrap_or(rest))
}

fn convert_readline_error(err: ReadlineError) -> io::Result<InputEvent> {
    match err {
        ReadlineError::Interrupted => Ok(InputEvent::Interrupted),
        ReadlineError::Eof => Ok(InputEvent::Eof),
        ReadlineError::Io(io_err) => Err(io_err),
        other => Err(io::Error::other(other)),
    }
}

fn map_io_err(err: ReadlineError) -> io::Error {
    match err {
        ReadlineError::Io(io_err) => io_err,
        other => io::Error::other(other),
    }
}

/// Pre-recorded input: replays a command script, then reports end of input.
#[derive(Debug, Clone, Default)]
pub struct ScriptedInput {
    lines: VecDeque<String>,
    /// Print each prompt and line as it is consumed.
    pub echo: bool,
}

impl ScriptedInput {
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
            echo: false,
        }
    }

    /// Load a replay file: one command per line; blank lines and `#` comments are skipped.
    ///
    /// # Errors
    /// Returns an error if the file can't be read.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).with_context(|| format!("reading replay file '{}'", path.display()))?;
        let lines: Vec<&str> = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .collect();
        info!("loaded {} replay command(s) from '{}'", lines.len(), path.display());
        Ok(Self::from_lines(lines))
    }

    /// Lines not yet consumed.
    pub fn remaining(&self) -> usize {
        self.lines.len()
    }
}

impl LineSource for ScriptedInput {
    fn read_line(&mut self, prompt: &str) -> io::Result<InputEvent> {
        match self.lines.pop_front() {
            Some(line) => {
                if self.echo {
                    println!("{prompt}{line}");
                }
                Ok(InputEvent::Line(line))
            },
            None => Ok(InputEvent::Eof),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;

    #[test]
    fn converts_readline_ctrl_c_to_interrupt() {
        let result = convert_readline_error(ReadlineError::Interrupted).unwrap();
        assert_eq!(result, InputEvent::Interrupted);
        assert_eq!(convert_readline_error(ReadlineError::Eof).unwrap(), InputEvent::Eof);
    }

    #[test]
    fn completion_matches_whole_commands_by_prefix() {
        let commands = vec!["go east".to_string(), "go upstairs".to_string(), "look".to_string()];
        let names: Vec<_> = completion_candidates(&commands, "Go u")
            .into_iter()
            .map(|pair| pair.replacement)
            .collect();
        assert_eq!(names, vec!["go upstairs"]);
        assert_eq!(completion_candidates(&commands, "").len(), 3);
    }

    #[test]
    fn prefix_skips_leading_whitespace() {
        assert_eq!(current_prefix("  pick", 6), (2, "pick".to_string()));
    }

    #[test]
    fn strip_newline_handles_crlf() {
        assert_eq!(strip_newline("look\r\n"), "look");
        assert_eq!(strip_newline("look\n"), "look");
        assert_eq!(strip_newline("look"), "look");
    }

    #[test]
    fn scripted_input_ends_with_eof() {
        let mut input = ScriptedInput::from_lines(["go east", "look"]);
        assert_eq!(input.read_line("> ").unwrap(), InputEvent::Line("go east".into()));
        assert_eq!(input.read_line("> ").unwrap(), InputEvent::Line("look".into()));
        assert_eq!(input.read_line("> ").unwrap(), InputEvent::Eof);
    }

    #[test]
    fn replay_file_skips_blanks_and_comments() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "# walkthrough\ngo east\n\n  pick up: key  \n").unwrap();
        let mut input = ScriptedInput::from_file(file.path()).unwrap();
        assert_eq!(input.remaining(), 2);
        assert_eq!(input.read_line("").unwrap(), InputEvent::Line("go east".into()));
        assert_eq!(input.read_line("").unwrap(), InputEvent::Line("pick up: key".into()));
    }
}
