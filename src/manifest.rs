//! Package manifest (`package.json`) handling.
//!
//! The manifest is kept as an ordered JSON object so that writing it back
//! preserves key order and every field this tool does not know about.

use std::fs;
use std::path::Path;

use serde_json::{Map, Value};

use crate::error::{ReleaseError, Result};

/// File name of the manifest in a project root and in the staging directory.
pub const MANIFEST_FILE: &str = "package.json";

/// A parsed package manifest that always has a `name` and a `version`.
#[derive(Debug, Clone, PartialEq)]
pub struct PackageManifest {
    fields: Map<String, Value>,
}

impl PackageManifest {
    /// Builds a manifest from a JSON value, checking the required fields.
    ///
    /// `origin` is only used for error messages.
    pub fn from_value(value: Value, origin: &Path) -> Result<Self> {
        let fields = match value {
            Value::Object(fields) => fields,
            _ => return Err(ReleaseError::manifest(origin, "expected a JSON object")),
        };

        for key in ["name", "version"] {
            match fields.get(key) {
                Some(Value::String(s)) if !s.trim().is_empty() => {}
                _ => {
                    return Err(ReleaseError::manifest(
                        origin,
                        format!("missing a non-empty '{}' field", key),
                    ))
                }
            }
        }

        Ok(PackageManifest { fields })
    }

    /// Reads and validates the manifest at `path`.
    ///
    /// # Errors
    /// `ManifestUnreadable` if the file is absent, not JSON, or lacks
    /// `name`/`version`.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .map_err(|e| ReleaseError::manifest(path, e.to_string()))?;
        let value: Value =
            serde_json::from_str(&raw).map_err(|e| ReleaseError::manifest(path, e.to_string()))?;
        Self::from_value(value, path)
    }

    /// Writes the manifest as two-space indented JSON with a trailing newline.
    pub fn save(&self, path: &Path) -> Result<()> {
        let mut out = serde_json::to_string_pretty(&self.fields)
            .map_err(|e| ReleaseError::manifest(path, e.to_string()))?;
        out.push('\n');
        fs::write(path, out)?;
        Ok(())
    }

    pub fn name(&self) -> &str {
        self.fields
            .get("name")
            .and_then(Value::as_str)
            .unwrap_or_default()
    }

    pub fn version(&self) -> &str {
        self.fields
            .get("version")
            .and_then(Value::as_str)
            .unwrap_or_default()
    }

    pub fn set_version(&mut self, version: &str) {
        self.fields
            .insert("version".to_string(), Value::String(version.to_string()));
    }

    /// Returns a copy carrying `version`.
    pub fn with_version(&self, version: &str) -> Self {
        let mut copy = self.clone();
        copy.set_version(version);
        copy
    }

    pub fn exports(&self) -> Option<&Value> {
        self.fields.get("exports")
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }
}

/// Maps every string leaf of a tree of strings and nested objects.
///
/// Objects keep all their keys in order; arrays are walked element-wise;
/// non-string scalars pass through untouched.
pub fn map_leaves<F>(value: &Value, f: &F) -> Value
where
    F: Fn(&str) -> String,
{
    match value {
        Value::String(s) => Value::String(f(s)),
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), map_leaves(v, f)))
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.iter().map(|v| map_leaves(v, f)).collect()),
        other => other.clone(),
    }
}

/// Rewrites `./<prefix>/<rest>` to `./<rest>`; anything else is returned as is.
pub fn strip_path_prefix(path: &str, prefix_dir: &str) -> String {
    let prefix = normalize_dir(prefix_dir);
    if prefix.is_empty() {
        return path.to_string();
    }

    let needle = format!("./{}/", prefix);
    match path.strip_prefix(&needle) {
        Some(rest) if !rest.is_empty() => format!("./{}", rest),
        _ => path.to_string(),
    }
}

/// Returns a manifest whose `exports` paths no longer carry `prefix_dir`.
///
/// All other fields are copied unchanged. Does not touch disk.
pub fn strip_prefix(manifest: &PackageManifest, prefix_dir: &str) -> PackageManifest {
    let mut fields = manifest.fields.clone();
    if let Some(exports) = manifest.fields.get("exports") {
        let rewritten = map_leaves(exports, &|leaf: &str| strip_path_prefix(leaf, prefix_dir));
        fields.insert("exports".to_string(), rewritten);
    }
    PackageManifest { fields }
}

/// Trims `./` prefixes and trailing separators: `./dist/` becomes `dist`.
pub fn normalize_dir(dir: &str) -> &str {
    let mut dir = dir.trim();
    while let Some(rest) = dir.strip_prefix("./") {
        dir = rest;
    }
    dir.trim_end_matches(['/', '\\'])
}
