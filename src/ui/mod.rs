//! User interface module - outcome reporting and formatting.
//!
//! Separates concerns:
//! - `formatter` - Pure formatting functions
//! - This module - Final pipeline outcome reporting
//!
//! Interactive keystroke capture lives in [crate::editor].

pub mod formatter;

// Re-export formatter functions for convenience
pub use formatter::{
    display_cancelled, display_command_output, display_error, display_planned_commands,
    display_status, display_success, display_version_change, display_warning,
    format_missing_manifest_hint,
};

use crate::cli::orchestration::PipelineOutcome;
use crate::error::CancelReason;

/// Prints the final line for a pipeline run.
///
/// Success lines go to stdout, failures to stderr with the failing stage, and
/// cancellations get their own "skipped" line so they are not mistaken for
/// errors.
pub fn display_outcome(outcome: &PipelineOutcome) {
    match outcome {
        PipelineOutcome::Success {
            name,
            version,
            dry_run,
        } => {
            if *dry_run {
                display_success(&format!(
                    "Dry run complete: {}@{} was not published",
                    name, version
                ));
            } else {
                display_success(&format!("Published {}@{}", name, version));
            }
        }
        PipelineOutcome::Cancelled { reason } => {
            let how = match reason {
                CancelReason::Escape => "escape pressed",
                CancelReason::Interrupt => "interrupted",
            };
            display_cancelled(&format!("release cancelled ({}), version restored", how));
        }
        PipelineOutcome::Failure { stage, cause } => {
            display_error(&format!("release failed during {}: {}", stage, cause));
        }
    }
}
