use std::env;
use std::path::Path;
use std::process::{Command, Stdio};

use crate::error::{ReleaseError, Result};
use crate::runner::{program_name, CommandOutput, CommandRunner, ShellKind};
use crate::ui;

/// Runs command lines through `sh -c` (`cmd /C` on Windows).
///
/// The executable named by the first word is resolved on `PATH` (relative to
/// the working directory) before spawning, so a missing tool surfaces as
/// `CommandNotFound` instead of a shell exit status.
#[derive(Debug, Default, Clone, Copy)]
pub struct ShellRunner;

impl ShellRunner {
    pub fn new() -> Self {
        ShellRunner
    }
}

fn shell_command(command_line: &str) -> Command {
    let (shell, flag) = match ShellKind::current() {
        ShellKind::Cmd => ("cmd", "/C"),
        ShellKind::Posix => ("sh", "-c"),
    };
    let mut cmd = Command::new(shell);
    cmd.args([flag, command_line]);
    cmd
}

impl CommandRunner for ShellRunner {
    fn run(
        &self,
        command_line: &str,
        working_dir: &Path,
        stream_output: bool,
    ) -> Result<CommandOutput> {
        let program = program_name(command_line)
            .ok_or_else(|| ReleaseError::CommandNotFound(command_line.to_string()))?;
        which::which_in(program, env::var_os("PATH"), working_dir)
            .map_err(|_| ReleaseError::CommandNotFound(program.to_string()))?;

        log::debug!("$ {} (in {})", command_line, working_dir.display());

        let mut cmd = shell_command(command_line);
        cmd.current_dir(working_dir).stdin(Stdio::inherit());

        let output = if stream_output {
            let status = cmd
                .stdout(Stdio::inherit())
                .stderr(Stdio::inherit())
                .status()?;
            CommandOutput {
                exit_code: status.code().unwrap_or(-1),
                stdout: String::new(),
                stderr: String::new(),
            }
        } else {
            let out = cmd.output()?;
            CommandOutput {
                exit_code: out.status.code().unwrap_or(-1),
                stdout: String::from_utf8_lossy(&out.stdout).into_owned(),
                stderr: String::from_utf8_lossy(&out.stderr).into_owned(),
            }
        };

        if output.exit_code != 0 {
            if !stream_output {
                ui::display_command_output(&output.stdout, &output.stderr);
            }
            return Err(ReleaseError::CommandFailed {
                exit_code: output.exit_code,
                command: command_line.to_string(),
            });
        }

        Ok(output)
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn test_captures_stdout() {
        let dir = tempfile::tempdir().unwrap();
        let out = ShellRunner::new()
            .run("echo \"hello world\"", dir.path(), false)
            .unwrap();
        assert_eq!(out.exit_code, 0);
        assert_eq!(out.stdout.trim(), "hello world");
    }

    #[test]
    fn test_runs_in_working_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("marker.txt"), "x").unwrap();
        let out = ShellRunner::new().run("ls", dir.path(), false).unwrap();
        assert!(out.stdout.contains("marker.txt"));
    }

    #[test]
    fn test_non_zero_exit_is_command_failed() {
        let dir = tempfile::tempdir().unwrap();
        let err = ShellRunner::new()
            .run("sh -c 'exit 3'", dir.path(), false)
            .unwrap_err();
        match err {
            ReleaseError::CommandFailed { exit_code, command } => {
                assert_eq!(exit_code, 3);
                assert_eq!(command, "sh -c 'exit 3'");
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_missing_executable_is_command_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = ShellRunner::new()
            .run("definitely-not-a-real-tool-42 --flag", dir.path(), false)
            .unwrap_err();
        assert!(matches!(err, ReleaseError::CommandNotFound(p) if p == "definitely-not-a-real-tool-42"));
    }

    #[test]
    fn test_empty_command_line() {
        let dir = tempfile::tempdir().unwrap();
        assert!(ShellRunner::new().run("  ", dir.path(), false).is_err());
    }
}
