//! Resolved, immutable inputs of one release run.

use std::path::PathBuf;

use crate::error::Result;
use crate::manifest::{normalize_dir, MANIFEST_FILE};
use crate::version::ReleaseKind;

/// Behaviour switches for one run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReleaseFlags {
    pub dry_run: bool,
    pub no_cleanup: bool,
    pub public_access: bool,
    /// Create an annotated git tag
    pub tag: bool,
    pub push: bool,
    pub no_git: bool,
    pub no_license: bool,
    pub prepare: bool,
    pub silent: bool,
    pub use_otp: bool,
    pub verbose: bool,
}

/// Immutable configuration resolved from invocation inputs.
#[derive(Debug, Clone, PartialEq)]
pub struct ReleasePlan {
    pub kind: ReleaseKind,
    pub project_root: PathBuf,
    /// Source directory as given, relative to `project_root`
    pub source_dir: String,
    /// Staging directory as given, relative to `project_root`
    pub staging_dir: String,
    pub flags: ReleaseFlags,
}

impl ReleasePlan {
    pub fn new(
        kind: ReleaseKind,
        project_root: impl Into<PathBuf>,
        source_dir: impl Into<String>,
        staging_dir: impl Into<String>,
        flags: ReleaseFlags,
    ) -> Self {
        ReleasePlan {
            kind,
            project_root: project_root.into(),
            source_dir: source_dir.into(),
            staging_dir: staging_dir.into(),
            flags,
        }
    }

    /// True when the whole project root is staged instead of a build folder.
    pub fn stages_root(&self) -> bool {
        matches!(normalize_dir(&self.source_dir), "" | ".")
    }

    /// Directory prefix stripped from export paths; `None` when staging the root.
    pub fn export_prefix(&self) -> Option<&str> {
        if self.stages_root() {
            None
        } else {
            Some(normalize_dir(&self.source_dir))
        }
    }

    pub fn source_path(&self) -> PathBuf {
        if self.stages_root() {
            self.project_root.clone()
        } else {
            self.project_root.join(normalize_dir(&self.source_dir))
        }
    }

    pub fn staging_path(&self) -> PathBuf {
        self.project_root.join(normalize_dir(&self.staging_dir))
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.project_root.join(MANIFEST_FILE)
    }

    /// Whether any git step runs in this invocation.
    pub fn runs_git(&self) -> bool {
        !self.flags.no_git && !self.flags.dry_run
    }
}

/// Picks the release kind from the CLI switches.
///
/// Precedence is fixed: `--major`, then `--minor`, then `--patch`, then
/// `--type`, then the `patch` default. A `--type` naming a standard kind
/// selects that kind.
pub fn resolve_kind(
    major: bool,
    minor: bool,
    patch: bool,
    custom: Option<&str>,
) -> Result<ReleaseKind> {
    if major {
        Ok(ReleaseKind::Major)
    } else if minor {
        Ok(ReleaseKind::Minor)
    } else if patch {
        Ok(ReleaseKind::Patch)
    } else if let Some(tag) = custom {
        tag.parse()
    } else {
        Ok(ReleaseKind::default())
    }
}
