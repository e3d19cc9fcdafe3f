//! Main release workflow orchestration
//!
//! Sequences version computation, staging, git and registry steps. Everything
//! before the manifest is persisted fails fast; everything after it restores
//! the persisted version and removes the staging directory before reporting.

use std::fmt;
use std::path::Path;

use crate::config::Config;
use crate::editor::{self, Terminal};
use crate::error::{CancelReason, ReleaseError, Result};
use crate::git;
use crate::manifest::PackageManifest;
use crate::plan::ReleasePlan;
use crate::registry::{self, PublishOptions};
use crate::runner::CommandRunner;
use crate::staging::{self, StagedTree};
use crate::ui;
use crate::version::bump;
use crate::warning::ReleaseWarning;

/// Pipeline stages, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Init,
    Prepare,
    VersionCompute,
    Staging,
    GitCommit,
    GitTag,
    GitPush,
    RegistryPublish,
    Cleanup,
    Done,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Init => "init",
            Stage::Prepare => "prepare",
            Stage::VersionCompute => "version computation",
            Stage::Staging => "staging",
            Stage::GitCommit => "git commit",
            Stage::GitTag => "git tag",
            Stage::GitPush => "git push",
            Stage::RegistryPublish => "registry publish",
            Stage::Cleanup => "cleanup",
            Stage::Done => "done",
        };
        f.write_str(name)
    }
}

/// Version before and after this release.
#[derive(Debug, Clone, PartialEq)]
pub struct VersionState {
    pub original: String,
    pub next: String,
}

/// Result of a release run
#[derive(Debug)]
pub enum PipelineOutcome {
    Success {
        name: String,
        version: String,
        dry_run: bool,
    },
    /// The user aborted an interactive prompt; the version was restored.
    Cancelled { reason: CancelReason },
    Failure { stage: Stage, cause: ReleaseError },
}

impl PipelineOutcome {
    /// Process exit code: cancellation is not an error.
    pub fn exit_code(&self) -> i32 {
        match self {
            PipelineOutcome::Success { .. } | PipelineOutcome::Cancelled { .. } => 0,
            PipelineOutcome::Failure { .. } => 1,
        }
    }
}

/// One release invocation.
///
/// Holds the collaborators for the run: the resolved plan and config, the
/// runner used for every external command, and the terminal used for the
/// commit message and OTP prompts.
pub struct ReleaseWorkflow<'a, R: CommandRunner + ?Sized, T: Terminal + ?Sized> {
    plan: &'a ReleasePlan,
    config: &'a Config,
    runner: &'a R,
    terminal: &'a mut T,
    stage: Stage,
    warnings: Vec<ReleaseWarning>,
}

impl<'a, R: CommandRunner + ?Sized, T: Terminal + ?Sized> ReleaseWorkflow<'a, R, T> {
    pub fn new(plan: &'a ReleasePlan, config: &'a Config, runner: &'a R, terminal: &'a mut T) -> Self {
        ReleaseWorkflow {
            plan,
            config,
            runner,
            terminal,
            stage: Stage::Init,
            warnings: Vec::new(),
        }
    }

    /// Warnings raised during the last run.
    pub fn warnings(&self) -> &[ReleaseWarning] {
        &self.warnings
    }

    /// Runs the pipeline to completion.
    pub fn run(&mut self) -> PipelineOutcome {
        self.enter(Stage::Init);
        let manifest_path = self.plan.manifest_path();
        let manifest = match PackageManifest::load(&manifest_path) {
            Ok(manifest) => manifest,
            Err(e) => return self.fail(e),
        };

        if self.plan.flags.prepare {
            self.enter(Stage::Prepare);
            if let Err(e) = self.prepare() {
                return self.fail(e);
            }
        }

        self.enter(Stage::VersionCompute);
        let versions = match bump(manifest.version(), &self.plan.kind) {
            Ok(next) => VersionState {
                original: manifest.version().to_string(),
                next,
            },
            Err(e) => return self.fail(e),
        };
        ui::display_version_change(manifest.name(), &versions.original, &versions.next);

        self.enter(Stage::Staging);
        let bumped = manifest.with_version(&versions.next);
        let staged = match staging::stage(self.plan, &self.config.staging, &bumped) {
            Ok(staged) => staged,
            Err(e) => return self.fail(e),
        };
        ui::display_success(&format!(
            "Staged {} files into {}",
            staged.files.len(),
            staged.dir.display()
        ));

        if self.plan.flags.dry_run {
            ui::display_planned_commands(&self.planned_commands(&versions.next));
            self.finish(&staged);
            return PipelineOutcome::Success {
                name: manifest.name().to_string(),
                version: versions.next,
                dry_run: true,
            };
        }

        match self.release(&bumped, &staged) {
            Ok(()) => {
                self.finish(&staged);
                PipelineOutcome::Success {
                    name: manifest.name().to_string(),
                    version: versions.next,
                    dry_run: false,
                }
            }
            Err(e) => {
                let stage = self.stage;
                log::debug!("{} failed: {}, rolling back", stage, e);
                self.revert(&manifest_path, &versions.original);
                self.cleanup(&staged.dir);
                match e.cancel_reason() {
                    Some(reason) => PipelineOutcome::Cancelled { reason },
                    None => PipelineOutcome::Failure { stage, cause: e },
                }
            }
        }
    }

    fn enter(&mut self, stage: Stage) {
        log::debug!("stage: {}", stage);
        self.stage = stage;
    }

    fn fail(&self, cause: ReleaseError) -> PipelineOutcome {
        PipelineOutcome::Failure {
            stage: self.stage,
            cause,
        }
    }

    fn warn(&mut self, warning: ReleaseWarning) {
        log::warn!("{}", warning);
        ui::display_warning(&warning);
        self.warnings.push(warning);
    }

    fn run_in_root(&self, command_line: &str, stream_output: bool) -> Result<()> {
        self.runner
            .run(command_line, &self.plan.project_root, stream_output)
            .map(|_| ())
    }

    fn prepare(&self) -> Result<()> {
        for command in &self.config.prepare.commands {
            ui::display_status(&format!("Running {}", command));
            self.run_in_root(command, true)?;
        }
        Ok(())
    }

    /// The mutating half: persist, git, publish.
    fn release(&mut self, bumped: &PackageManifest, staged: &StagedTree) -> Result<()> {
        let (plan, config) = (self.plan, self.config);
        bumped.save(&plan.manifest_path())?;
        log::debug!("persisted version {}", bumped.version());

        let flags = &plan.flags;
        let verbose = flags.verbose;

        if plan.runs_git() {
            self.enter(Stage::GitCommit);
            let default = config.git.message_for(bumped.version());
            let message = editor::prompt_commit_message(
                &mut *self.terminal,
                flags.silent,
                config.git.multiline,
                &default,
            )?;
            self.run_in_root(&git::add_all(), verbose)?;
            self.run_in_root(&git::commit(&message), verbose)?;
            ui::display_success("Committed release");

            let mut tag = None;
            if flags.tag {
                self.enter(Stage::GitTag);
                let name = git::tag_name(&config.git.tag_prefix, bumped.version());
                self.run_in_root(&git::annotated_tag(&name, &message), verbose)?;
                ui::display_success(&format!("Created tag {}", name));
                tag = Some(name);
            }

            if flags.push {
                self.enter(Stage::GitPush);
                self.run_in_root(&git::push(tag.is_some()), verbose)?;
                ui::display_success("Pushed to remote");
            }
        }

        self.enter(Stage::RegistryPublish);
        let otp = if flags.use_otp {
            let code = editor::prompt_otp(&mut *self.terminal, flags.silent)?;
            if code.is_empty() {
                self.warn(ReleaseWarning::EmptyOtp);
            }
            Some(code)
        } else {
            None
        };

        let command = registry::publish_command(&PublishOptions {
            registry: &config.registry,
            public_access: flags.public_access,
            kind: &plan.kind,
            otp: otp.as_deref(),
        });
        ui::display_status(&format!("Publishing from {}", staged.dir.display()));
        self.runner.run(&command, &staged.dir, verbose)?;

        Ok(())
    }

    fn planned_commands(&self, next: &str) -> Vec<String> {
        let mut commands = Vec::new();
        if !self.plan.flags.no_git {
            let message = editor::shell_escape(&self.config.git.message_for(next));
            let tag = self
                .plan
                .flags
                .tag
                .then(|| git::tag_name(&self.config.git.tag_prefix, next));
            commands.extend(git::release_commands(
                &message,
                tag.as_deref(),
                self.plan.flags.push,
            ));
        }
        commands.push(registry::publish_command(&PublishOptions {
            registry: &self.config.registry,
            public_access: self.plan.flags.public_access,
            kind: &self.plan.kind,
            otp: None,
        }));
        commands
    }

    fn finish(&mut self, staged: &StagedTree) {
        self.enter(Stage::Cleanup);
        self.cleanup(&staged.dir);
        self.enter(Stage::Done);
    }

    fn cleanup(&mut self, dir: &Path) {
        if self.plan.flags.no_cleanup {
            ui::display_status(&format!("Staged package kept at {}", dir.display()));
            return;
        }
        if let Err(e) = staging::remove_staging_dir(dir) {
            self.warn(ReleaseWarning::CleanupFailed {
                path: dir.to_path_buf(),
                reason: e.to_string(),
            });
        }
    }

    fn revert(&mut self, manifest_path: &Path, original: &str) {
        match revert_version(manifest_path, original) {
            Ok(true) => ui::display_status(&format!("Restored version {}", original)),
            Ok(false) => {}
            Err(e) => self.warn(ReleaseWarning::RevertFailed {
                version: original.to_string(),
                reason: e.to_string(),
            }),
        }
    }
}

/// Restores the persisted manifest's version if it moved.
///
/// Returns whether the file was rewritten.
pub fn revert_version(manifest_path: &Path, original: &str) -> Result<bool> {
    let mut manifest = PackageManifest::load(manifest_path)?;
    if manifest.version() == original {
        return Ok(false);
    }
    manifest.set_version(original);
    manifest.save(manifest_path)?;
    Ok(true)
}
