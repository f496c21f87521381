//! Manifest source for Rust packages using Cargo.toml.

use std::fs;
use std::path::Path;

use monoflow_core::error::{Error, Result};
use monoflow_core::manifest::{Manifest, ManifestSource};
use semver::Version;
use toml::Value;

/// Manifest source for Cargo.toml packages.
pub struct CargoSource;

impl ManifestSource for CargoSource {
    fn kind(&self) -> &'static str {
        "cargo"
    }

    fn detect(&self, root: &Path) -> bool {
        root.join("Cargo.toml").exists()
    }

    fn read_manifest(&self, root: &Path) -> Result<Manifest> {
        let path = root.join("Cargo.toml");
        let content = fs::read_to_string(&path)
            .map_err(|e| Error::manifest(root, format!("failed to read Cargo.toml: {}", e)))?;

        let doc: Value = content
            .parse()
            .map_err(|e| Error::manifest(root, format!("failed to parse Cargo.toml: {}", e)))?;

        let package = doc
            .get("package")
            .ok_or_else(|| Error::manifest(root, "missing [package] section"))?;

        let name = package
            .get("name")
            .and_then(|n| n.as_str())
            .ok_or_else(|| Error::manifest(root, "missing package name"))?
            .to_string();

        let raw_version = match package.get("version") {
            Some(value) => value.as_str().ok_or_else(|| {
                Error::manifest(root, "package.version must be a literal version string")
            })?,
            None => return Err(Error::manifest(root, "missing package version")),
        };

        let version = monoflow_core::version::parse_version(raw_version)?;

        let dependencies = doc
            .get("dependencies")
            .and_then(|d| d.as_table())
            .map(|table| table.keys().cloned().collect())
            .unwrap_or_default();

        Ok(Manifest {
            name,
            version,
            dependencies,
        })
    }

    fn set_version(&self, root: &Path, version: &Version) -> Result<()> {
        let path = root.join("Cargo.toml");
        let content = fs::read_to_string(&path)
            .map_err(|e| Error::manifest(root, format!("failed to read Cargo.toml: {}", e)))?;

        let mut doc: Value = content
            .parse()
            .map_err(|e| Error::manifest(root, format!("failed to parse Cargo.toml: {}", e)))?;

        let package = doc
            .get_mut("package")
            .and_then(|p| p.as_table_mut())
            .ok_or_else(|| Error::manifest(root, "missing [package] section"))?;
        package.insert("version".to_string(), Value::String(version.to_string()));

        let serialized = toml::to_string_pretty(&doc)
            .map_err(|e| Error::manifest(root, format!("failed to serialize Cargo.toml: {}", e)))?;
        fs::write(&path, serialized)
            .map_err(|e| Error::manifest(root, format!("failed to write Cargo.toml: {}", e)))?;

        Ok(())
    }
}
