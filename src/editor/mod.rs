//! Raw-keystroke line editor
//!
//! Captures a commit message or a numeric one-time password without relying
//! on line-buffered input. [LineEditor] is the pure state machine; [capture]
//! drives it against a [Terminal] inside a [RawSession], which guarantees the
//! terminal leaves raw mode however the session ends.
//!
//! - [terminal::CrosstermTerminal]: the real terminal
//! - [mock::ScriptedTerminal]: replays a fixed key sequence for tests

pub mod mock;
pub mod terminal;

pub use mock::ScriptedTerminal;
pub use terminal::{CrosstermTerminal, RawSession, Terminal};

use console::style;

use crate::error::{CancelReason, ReleaseError, Result};
use crate::runner::ShellKind;

/// A key press, reduced to what the editor reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Backspace,
    Enter,
    Escape,
    Interrupt,
    Other,
}

/// What is being captured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorMode {
    /// Free text. With `multiline`, Enter starts a new line and a blank line
    /// finishes; without it, the first Enter finishes.
    CommitMessage { multiline: bool },
    /// Digits only; Enter always finishes.
    Otp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorState {
    /// Dimmed hint shown, nothing typed yet
    Placeholder,
    Editing,
    Done,
    Cancelled(CancelReason),
}

/// Keystroke-driven editing state.
#[derive(Debug, Clone)]
pub struct LineEditor {
    mode: EditorMode,
    placeholder: String,
    lines: Vec<String>,
    buffer: String,
    state: EditorState,
}

const NEWLINE: &str = "\r\n";
const CLEAR_TO_END: &str = "\x1b[K";
const ERASE_CHAR: &str = "\x08 \x08";

impl LineEditor {
    pub fn new(mode: EditorMode, placeholder: &str) -> Self {
        LineEditor {
            mode,
            placeholder: placeholder.to_string(),
            lines: Vec::new(),
            buffer: String::new(),
            state: EditorState::Placeholder,
        }
    }

    pub fn state(&self) -> EditorState {
        self.state
    }

    /// Dimmed placeholder with the cursor moved back to its start.
    pub fn render_placeholder(&self) -> String {
        let width = self.placeholder.chars().count();
        if width == 0 {
            return String::new();
        }
        format!("{}\x1b[{}D", style(&self.placeholder).dim(), width)
    }

    /// Applies one key and returns the text to echo.
    pub fn handle_key(&mut self, key: Key) -> String {
        if matches!(self.state, EditorState::Done | EditorState::Cancelled(_)) {
            return String::new();
        }

        match key {
            Key::Escape => self.cancel(CancelReason::Escape),
            Key::Interrupt => self.cancel(CancelReason::Interrupt),
            Key::Char(c) => self.insert(c),
            Key::Backspace => self.backspace(),
            Key::Enter => self.enter(),
            Key::Other => String::new(),
        }
    }

    /// The captured text: joined lines for messages, the digits for an OTP.
    pub fn value(&self) -> String {
        match self.mode {
            EditorMode::Otp => self.buffer.clone(),
            EditorMode::CommitMessage { .. } => self.lines.join("\n"),
        }
    }

    fn leave_placeholder(&mut self) -> &'static str {
        if self.state == EditorState::Placeholder {
            self.state = EditorState::Editing;
            CLEAR_TO_END
        } else {
            ""
        }
    }

    fn cancel(&mut self, reason: CancelReason) -> String {
        let clear = self.leave_placeholder();
        self.state = EditorState::Cancelled(reason);
        format!("{}{}", clear, NEWLINE)
    }

    fn insert(&mut self, c: char) -> String {
        if c.is_control() {
            return String::new();
        }
        if self.mode == EditorMode::Otp && !c.is_ascii_digit() {
            return String::new();
        }
        let clear = self.leave_placeholder();
        self.buffer.push(c);
        format!("{}{}", clear, c)
    }

    fn backspace(&mut self) -> String {
        if self.state == EditorState::Placeholder || self.buffer.pop().is_none() {
            return String::new();
        }
        ERASE_CHAR.to_string()
    }

    fn enter(&mut self) -> String {
        let clear = self.leave_placeholder();

        match self.mode {
            EditorMode::Otp => self.state = EditorState::Done,
            EditorMode::CommitMessage { multiline } => {
                if self.buffer.is_empty() {
                    self.state = EditorState::Done;
                } else {
                    self.lines.push(std::mem::take(&mut self.buffer));
                    if !multiline {
                        self.state = EditorState::Done;
                    }
                }
            }
        }

        format!("{}{}", clear, NEWLINE)
    }
}

/// Escapes a string for embedding in a double-quoted argument of the
/// platform shell (see [ShellKind::escape_in_quotes]).
pub fn shell_escape(s: &str) -> String {
    ShellKind::current().escape_in_quotes(s)
}

/// Runs one interactive capture session.
///
/// Returns the captured text, shell-escaped. An empty string means the user
/// pressed Enter without typing anything.
///
/// # Errors
/// `UserCancelled` on Escape or Ctrl+C; `Io` if the terminal fails. Raw mode
/// is released in every case.
pub fn capture<T: Terminal + ?Sized>(
    terminal: &mut T,
    prompt: &str,
    mode: EditorMode,
    placeholder: &str,
) -> Result<String> {
    let mut session = RawSession::enter(terminal)?;
    let mut editor = LineEditor::new(mode, placeholder);

    session.write_str(&format!("{} ", style(prompt).bold()))?;
    session.write_str(&editor.render_placeholder())?;

    loop {
        let key = session.read_key()?;
        let echo = editor.handle_key(key);
        if !echo.is_empty() {
            session.write_str(&echo)?;
        }

        match editor.state() {
            EditorState::Done => break,
            EditorState::Cancelled(reason) => return Err(ReleaseError::UserCancelled(reason)),
            EditorState::Placeholder | EditorState::Editing => {}
        }
    }

    Ok(shell_escape(&editor.value()))
}

/// Asks for a commit message, falling back to `default` when nothing is typed.
///
/// In silent mode the terminal is never touched and `default` is returned.
pub fn prompt_commit_message<T: Terminal + ?Sized>(
    terminal: &mut T,
    silent: bool,
    multiline: bool,
    default: &str,
) -> Result<String> {
    if silent {
        return Ok(shell_escape(default));
    }

    let hint = if multiline {
        format!("{} (blank line to finish)", default)
    } else {
        default.to_string()
    };
    let message = capture(
        terminal,
        "Commit message:",
        EditorMode::CommitMessage { multiline },
        &hint,
    )?;

    if message.is_empty() {
        Ok(shell_escape(default))
    } else {
        Ok(message)
    }
}

/// Asks for a one-time password; silent mode yields an empty code.
pub fn prompt_otp<T: Terminal + ?Sized>(terminal: &mut T, silent: bool) -> Result<String> {
    if silent {
        return Ok(String::new());
    }
    capture(terminal, "One-time password:", EditorMode::Otp, "123456")
}
