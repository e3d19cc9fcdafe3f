//! Pure formatting functions for UI output.
//!
//! This module contains all display/formatting logic separated from user interaction.
//! Functions here have no side effects beyond printing.

use console::style;

use crate::warning::ReleaseWarning;

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red().bold().for_stderr(), message);
}

/// Format and print a success message with green checkmark.
pub fn display_success(message: &str) {
    println!("{} {}", style("✓").green(), message);
}

/// Format and print a status message with yellow arrow.
pub fn display_status(message: &str) {
    println!("{} {}", style("→").yellow(), message);
}

/// Print a line explaining that the run was skipped or cancelled.
pub fn display_cancelled(message: &str) {
    println!("{} {}", style("⊘ SKIPPED:").yellow().bold(), message);
}

/// Display a non-fatal warning to the user.
pub fn display_warning(warning: &ReleaseWarning) {
    eprintln!("{} {}", style("⚠ WARNING:").yellow().for_stderr(), warning);
}

/// Flush captured output of a failed command to stderr.
///
/// Blank streams are skipped so a quiet failure only prints the error line.
pub fn display_command_output(stdout: &str, stderr: &str) {
    for (label, text) in [("stdout", stdout), ("stderr", stderr)] {
        let text = text.trim_end();
        if text.is_empty() {
            continue;
        }
        eprintln!("{}", style(format!("--- {} ---", label)).dim().for_stderr());
        eprintln!("{}", text);
    }
}

/// Show the version transition for a package.
///
/// # Arguments
/// * `name` - Package name from the manifest
/// * `from` - Version read from the persisted manifest
/// * `to` - Version about to be published
pub fn display_version_change(name: &str, from: &str, to: &str) {
    println!("\n{}", style(format!("Releasing {}", name)).bold());
    println!("  From: {}", style(from).red());
    println!("  To:   {}", style(to).green());
}

/// List the command lines a dry run would have executed.
pub fn display_planned_commands(commands: &[String]) {
    if commands.is_empty() {
        return;
    }
    println!("{}", style("Dry run, commands not executed:").bold());
    for (i, command) in commands.iter().enumerate() {
        println!("  Step {}: {}", i + 1, style(command).cyan());
    }
}

/// Render the message for a `--help`-less invocation that tried to release
/// from a directory without a manifest.
pub fn format_missing_manifest_hint(project_root: &str) -> String {
    format!(
        "No package.json found in '{}'. Use --cwd to point at the package root.",
        project_root
    )
}
