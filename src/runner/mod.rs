//! External command execution
//!
//! Every git and registry step runs as an external process through the
//! [CommandRunner] trait, so the pipeline can be driven against a real shell
//! or against a scripted double.
//!
//! - [shell::ShellRunner]: runs command lines through the platform shell
//! - [mock::MockRunner]: records command lines and replays scripted results

pub mod mock;
pub mod shell;

pub use mock::MockRunner;
pub use shell::ShellRunner;

use std::path::Path;

use crate::error::Result;

/// Captured result of one external command.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommandOutput {
    pub exit_code: i32,
    /// Empty when output was streamed to the terminal.
    pub stdout: String,
    /// Empty when output was streamed to the terminal.
    pub stderr: String,
}

/// Runs one external command line to completion.
///
/// ## Errors
///
/// Implementations return `CommandNotFound` when the executable cannot be
/// located and `CommandFailed` when the process exits non-zero.
pub trait CommandRunner {
    /// Runs `command_line` in `working_dir`.
    ///
    /// With `stream_output` the child inherits stdout/stderr. Without it, output
    /// is captured and only shown to the user when the command fails.
    fn run(&self, command_line: &str, working_dir: &Path, stream_output: bool)
        -> Result<CommandOutput>;
}

/// The shell that interprets command lines on this platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellKind {
    /// `sh -c`
    Posix,
    /// `cmd /C`
    Cmd,
}

impl ShellKind {
    pub fn current() -> Self {
        if cfg!(windows) {
            ShellKind::Cmd
        } else {
            ShellKind::Posix
        }
    }

    /// Escapes `s` for embedding between double quotes in a command line.
    ///
    /// Posix escapes `\`, `"`, `$` and `` ` `` with a backslash. Cmd doubles
    /// quotes and the backslashes that precede a quote (or the closing quote),
    /// following the argument rules of the Windows C runtime. `%` is left alone:
    /// cmd expands `%NAME%` even inside quotes.
    pub fn escape_in_quotes(self, s: &str) -> String {
        let mut out = String::with_capacity(s.len());
        match self {
            ShellKind::Posix => {
                for c in s.chars() {
                    if matches!(c, '\\' | '"' | '$' | '`') {
                        out.push('\\');
                    }
                    out.push(c);
                }
            }
            ShellKind::Cmd => {
                let mut backslashes = 0;
                for c in s.chars() {
                    match c {
                        '\\' => backslashes += 1,
                        '"' => {
                            out.push_str(&"\\".repeat(backslashes));
                            out.push('"');
                            backslashes = 0;
                        }
                        _ => backslashes = 0,
                    }
                    out.push(c);
                }
                out.push_str(&"\\".repeat(backslashes));
            }
        }
        out
    }
}

/// First whitespace-separated word of a command line.
pub fn program_name(command_line: &str) -> Option<&str> {
    command_line.split_whitespace().next()
}
