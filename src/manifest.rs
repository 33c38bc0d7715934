//! Version fields in root-level manifest files.
//!
//! Reads are structured (serde_json / toml) so a version buried in a comment
//! or dependency table is never picked up by mistake. Writes are a textual
//! replacement of the first version assignment, preserving every other byte
//! of the file.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{NextVersionError, Result};

/// Supported manifest formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManifestKind {
    PackageJson,
    CargoToml,
}

impl ManifestKind {
    pub fn file_name(&self) -> &'static str {
        match self {
            ManifestKind::PackageJson => "package.json",
            ManifestKind::CargoToml => "Cargo.toml",
        }
    }
}

impl fmt::Display for ManifestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_name())
    }
}

/// A manifest file whose version field the workflow rewrites.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manifest {
    pub path: PathBuf,
    pub kind: ManifestKind,
}

impl Manifest {
    /// Read the manifest's current version field.
    pub fn read_version(&self) -> Result<String> {
        let content = fs::read_to_string(&self.path)?;
        match self.kind {
            ManifestKind::PackageJson => package_json_version(&content),
            ManifestKind::CargoToml => cargo_toml_version(&content),
        }
        .map_err(|e| {
            NextVersionError::manifest(format!("{}: {}", self.path.display(), e))
        })
    }

    /// Rewrite the version assignment from `current` to `next`.
    ///
    /// Replaces the first occurrence of the exact assignment text and leaves
    /// the rest of the file byte-for-byte unchanged.
    pub fn apply_version(&self, current: &str, next: &str) -> Result<()> {
        let content = fs::read_to_string(&self.path)?;
        let updated = replace_version_assignment(&content, self.kind, current, next)
            .ok_or_else(|| {
                NextVersionError::manifest(format!(
                    "{}: no version assignment for '{}' found",
                    self.path.display(),
                    current
                ))
            })?;
        fs::write(&self.path, updated)?;
        Ok(())
    }
}

/// Detect the manifests present at the root of `dir`.
///
/// Only root-level `package.json` and `Cargo.toml` are considered; nested
/// packages are out of scope.
pub fn find_manifests(dir: &Path) -> Vec<Manifest> {
    let mut manifests = Vec::new();
    for kind in [ManifestKind::PackageJson, ManifestKind::CargoToml] {
        let path = dir.join(kind.file_name());
        if path.is_file() {
            manifests.push(Manifest { path, kind });
        }
    }
    manifests
}

fn package_json_version(content: &str) -> std::result::Result<String, String> {
    let value: serde_json::Value =
        serde_json::from_str(content).map_err(|e| format!("invalid JSON: {}", e))?;

    value
        .get("version")
        .and_then(|v| v.as_str())
        .map(|v| v.to_string())
        .ok_or_else(|| "missing or non-string 'version' field".to_string())
}

fn cargo_toml_version(content: &str) -> std::result::Result<String, String> {
    let value: toml::Value = content
        .parse()
        .map_err(|e: toml::de::Error| format!("invalid TOML: {}", e))?;

    value
        .get("package")
        .and_then(|package| package.get("version"))
        .and_then(|v| v.as_str())
        .map(|v| v.to_string())
        .ok_or_else(|| "missing or non-string [package] version field".to_string())
}

/// Replace the first occurrence of the version assignment, or `None` when the
/// expected assignment text is absent.
fn replace_version_assignment(
    content: &str,
    kind: ManifestKind,
    current: &str,
    next: &str,
) -> Option<String> {
    let (old_assignment, new_assignment) = match kind {
        ManifestKind::PackageJson => (
            format!("\"version\": \"{}\"", current),
            format!("\"version\": \"{}\"", next),
        ),
        ManifestKind::CargoToml => (
            format!("version = \"{}\"", current),
            format!("version = \"{}\"", next),
        ),
    };

    if !content.contains(&old_assignment) {
        return None;
    }

    Some(content.replacen(&old_assignment, &new_assignment, 1))
}
