use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::error::{ReleaseError, Result};
use crate::runner::{program_name, CommandOutput, CommandRunner};

#[derive(Debug, Clone)]
enum Rule {
    Fail { needle: String, exit_code: i32 },
    Missing { program: String },
}

/// A recorded invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct Invocation {
    pub command_line: String,
    pub working_dir: PathBuf,
    pub streamed: bool,
}

/// Mock runner for testing without spawning processes
///
/// Every call is recorded. Rules are matched by substring against the command
/// line in the order they were added; unmatched commands succeed silently.
#[derive(Debug, Default)]
pub struct MockRunner {
    rules: Vec<Rule>,
    calls: Mutex<Vec<Invocation>>,
}

impl MockRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Commands containing `needle` exit with `exit_code`.
    pub fn fail_on(mut self, needle: &str, exit_code: i32) -> Self {
        self.rules.push(Rule::Fail {
            needle: needle.to_string(),
            exit_code,
        });
        self
    }

    /// Commands whose program is `program` report `CommandNotFound`.
    pub fn missing(mut self, program: &str) -> Self {
        self.rules.push(Rule::Missing {
            program: program.to_string(),
        });
        self
    }

    pub fn invocations(&self) -> Vec<Invocation> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    /// Recorded command lines, in call order.
    pub fn commands(&self) -> Vec<String> {
        self.invocations()
            .into_iter()
            .map(|i| i.command_line)
            .collect()
    }
}

impl CommandRunner for MockRunner {
    fn run(
        &self,
        command_line: &str,
        working_dir: &Path,
        stream_output: bool,
    ) -> Result<CommandOutput> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(Invocation {
                command_line: command_line.to_string(),
                working_dir: working_dir.to_path_buf(),
                streamed: stream_output,
            });
        }

        for rule in &self.rules {
            match rule {
                Rule::Missing { program }
                    if program_name(command_line) == Some(program.as_str()) =>
                {
                    return Err(ReleaseError::CommandNotFound(program.clone()));
                }
                Rule::Fail { needle, exit_code } if command_line.contains(needle.as_str()) => {
                    return Err(ReleaseError::CommandFailed {
                        exit_code: *exit_code,
                        command: command_line.to_string(),
                    });
                }
                _ => {}
            }
        }

        Ok(CommandOutput::default())
    }
}
