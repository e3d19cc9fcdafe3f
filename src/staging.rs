//! Builds the flattened, publishable package tree.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use walkdir::{DirEntry, WalkDir};

use crate::config::StagingConfig;
use crate::error::{ReleaseError, Result};
use crate::manifest::{strip_prefix, PackageManifest, MANIFEST_FILE};
use crate::plan::ReleasePlan;

/// Dependency caches, never staged.
const DEPENDENCY_DIRS: &[&str] = &["node_modules", "bower_components", "jspm_packages"];

/// Skipped only when the project root itself is staged.
const ROOT_EXCLUDES: &[&str] = &[
    ".git",
    ".hg",
    ".svn",
    ".DS_Store",
    "Thumbs.db",
    "coverage",
    ".nyc_output",
];

/// The files copied into the staging directory plus the manifest written there.
#[derive(Debug, Clone, PartialEq)]
pub struct StagedTree {
    pub dir: PathBuf,
    /// Staged files, relative to `dir`, sorted
    pub files: Vec<PathBuf>,
    pub manifest: PackageManifest,
}

/// Stages `manifest` and the plan's source tree into the staging directory.
///
/// Any previous staging content is discarded first. When staging a build
/// folder, allow-listed root files (README, registry config, license) are
/// copied after the tree and win over same-named files from it, and export
/// paths lose the build-folder prefix.
///
/// # Errors
/// * `SourceMissing` - the source directory does not exist; nothing is touched
/// * `Config` - the staging directory would overlap the project or source
pub fn stage(
    plan: &ReleasePlan,
    config: &StagingConfig,
    manifest: &PackageManifest,
) -> Result<StagedTree> {
    let source = plan.source_path();
    if !source.is_dir() {
        return Err(ReleaseError::SourceMissing(source));
    }

    let staging = plan.staging_path();
    if staging == plan.project_root || staging == source || source.starts_with(&staging) {
        return Err(ReleaseError::config(format!(
            "staging directory '{}' must not contain the source tree",
            staging.display()
        )));
    }

    reset_dir(&staging)?;

    let stages_root = plan.stages_root();
    let mut files = copy_tree(&source, &staging, stages_root)?;

    if !stages_root {
        let mut allow_list: Vec<&str> = config.files.iter().map(String::as_str).collect();
        if !plan.flags.no_license {
            allow_list.push(config.license.as_str());
        }

        for name in allow_list {
            let from = plan.project_root.join(name);
            if !from.is_file() {
                log::debug!("{} not present in project root, skipped", name);
                continue;
            }
            let Some(file_name) = from.file_name() else {
                continue;
            };
            fs::copy(&from, staging.join(file_name))?;
            files.push(PathBuf::from(file_name));
        }
    }

    let staged_manifest = match plan.export_prefix() {
        Some(prefix) => strip_prefix(manifest, prefix),
        None => manifest.clone(),
    };
    staged_manifest.save(&staging.join(MANIFEST_FILE))?;
    files.push(PathBuf::from(MANIFEST_FILE));

    files.sort();
    files.dedup();

    log::debug!("staged {} files into {}", files.len(), staging.display());

    Ok(StagedTree {
        dir: staging,
        files,
        manifest: staged_manifest,
    })
}

/// Removes the staging directory if it exists.
pub fn remove_staging_dir(dir: &Path) -> io::Result<()> {
    match fs::remove_dir_all(dir) {
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        other => other,
    }
}

fn reset_dir(dir: &Path) -> io::Result<()> {
    remove_staging_dir(dir)?;
    fs::create_dir_all(dir)
}

fn is_excluded(entry: &DirEntry, staging: &Path, stages_root: bool) -> bool {
    if entry.path() == staging {
        return true;
    }
    let name = entry.file_name().to_string_lossy();
    if DEPENDENCY_DIRS.contains(&&*name) {
        return true;
    }
    stages_root && ROOT_EXCLUDES.contains(&&*name)
}

fn copy_tree(source: &Path, staging: &Path, stages_root: bool) -> Result<Vec<PathBuf>> {
    let mut copied = Vec::new();

    let walker = WalkDir::new(source)
        .min_depth(1)
        .into_iter()
        .filter_entry(|e| !is_excluded(e, staging, stages_root));

    for entry in walker {
        let entry = entry.map_err(io::Error::from)?;
        let rel = entry
            .path()
            .strip_prefix(source)
            .map_err(io::Error::other)?;
        let target = staging.join(rel);

        let file_type = entry.file_type();
        if file_type.is_dir() {
            fs::create_dir_all(&target)?;
            continue;
        }

        // Symlinks are followed; links to directories are not descended.
        if file_type.is_symlink() && !fs::metadata(entry.path())?.is_file() {
            log::debug!("skipping linked directory {}", entry.path().display());
            continue;
        }

        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::copy(entry.path(), &target)?;
        copied.push(rel.to_path_buf());
    }

    Ok(copied)
}
