//! Manifest source for JavaScript packages using package.json.

use std::fs;
use std::path::Path;

use monoflow_core::error::{Error, Result};
use monoflow_core::manifest::{Manifest, ManifestSource};
use once_cell::sync::Lazy;
use regex::Regex;
use semver::Version;
use serde_json::Value;

/// Matches the top-level version field. Rewriting it in place keeps the
/// rest of the file byte-identical, which matters for npm-managed files.
static VERSION_FIELD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#""version"\s*:\s*"[^"]*""#).expect("valid regex"));

/// Manifest source for package.json packages.
pub struct PackageJsonSource;

impl ManifestSource for PackageJsonSource {
    fn kind(&self) -> &'static str {
        "package.json"
    }

    fn detect(&self, root: &Path) -> bool {
        root.join("package.json").exists()
    }

    fn read_manifest(&self, root: &Path) -> Result<Manifest> {
        let path = root.join("package.json");
        let content = fs::read_to_string(&path)
            .map_err(|e| Error::manifest(root, format!("failed to read package.json: {}", e)))?;

        let json: Value = serde_json::from_str(&content)
            .map_err(|e| Error::manifest(root, format!("failed to parse package.json: {}", e)))?;

        let name = json
            .get("name")
            .and_then(|n| n.as_str())
            .ok_or_else(|| Error::manifest(root, "missing package name"))?
            .to_string();

        let raw_version = json
            .get("version")
            .and_then(|v| v.as_str())
            .ok_or_else(|| Error::manifest(root, "missing package version"))?;

        let version = monoflow_core::version::parse_version(raw_version)?;

        let dependencies = json
            .get("dependencies")
            .and_then(|d| d.as_object())
            .map(|deps| deps.keys().cloned().collect())
            .unwrap_or_default();

        Ok(Manifest {
            name,
            version,
            dependencies,
        })
    }

    fn set_version(&self, root: &Path, version: &Version) -> Result<()> {
        let path = root.join("package.json");
        let content = fs::read_to_string(&path)
            .map_err(|e| Error::manifest(root, format!("failed to read package.json: {}", e)))?;

        if !VERSION_FIELD.is_match(&content) {
            return Err(Error::manifest(root, "no version field in package.json"));
        }

        let updated = VERSION_FIELD.replace(&content, format!(r#""version": "{}""#, version));
        fs::write(&path, updated.as_ref())
            .map_err(|e| Error::manifest(root, format!("failed to write package.json: {}", e)))?;

        Ok(())
    }
}
