//! Command-line orchestration of a release run.

pub mod orchestration;

pub use orchestration::{PipelineOutcome, ReleaseWorkflow, Stage, VersionState};
