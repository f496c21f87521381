//! Manifest source for Python packages using pyproject.toml.
//!
//! Reads name, version, and dependency declarations from both PEP 621
//! format (the `[project]` table) and Poetry format (`[tool.poetry]`).

use std::fs;
use std::path::Path;

use monoflow_core::error::{Error, Result};
use monoflow_core::manifest::{Manifest, ManifestSource};
use once_cell::sync::Lazy;
use regex::Regex;
use semver::Version;
use toml::Value;

/// Leading distribution name of a PEP 508 requirement string, before any
/// extras, specifiers, or markers.
static REQUIREMENT_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9._-]*").expect("valid regex"));

fn requirement_name(spec: &str) -> Option<String> {
    REQUIREMENT_NAME
        .find(spec.trim())
        .map(|m| m.as_str().to_string())
}

/// Manifest source for pyproject.toml packages.
pub struct PyprojectSource;

impl ManifestSource for PyprojectSource {
    fn kind(&self) -> &'static str {
        "pyproject"
    }

    fn detect(&self, root: &Path) -> bool {
        root.join("pyproject.toml").exists()
    }

    fn read_manifest(&self, root: &Path) -> Result<Manifest> {
        let path = root.join("pyproject.toml");
        let content = fs::read_to_string(&path)
            .map_err(|e| Error::manifest(root, format!("failed to read pyproject.toml: {}", e)))?;

        let doc: Value = content
            .parse()
            .map_err(|e| Error::manifest(root, format!("failed to parse pyproject.toml: {}", e)))?;

        let name = doc
            .get("project")
            .and_then(|p| p.get("name"))
            .and_then(|n| n.as_str())
            .or_else(|| {
                doc.get("tool")
                    .and_then(|t| t.get("poetry"))
                    .and_then(|p| p.get("name"))
                    .and_then(|n| n.as_str())
            })
            .ok_or_else(|| Error::manifest(root, "missing package name"))?
            .to_string();

        let raw_version = doc
            .get("project")
            .and_then(|p| p.get("version"))
            .and_then(|v| v.as_str())
            .or_else(|| {
                doc.get("tool")
                    .and_then(|t| t.get("poetry"))
                    .and_then(|p| p.get("version"))
                    .and_then(|v| v.as_str())
            })
            .ok_or_else(|| Error::manifest(root, "missing package version"))?;

        let version = monoflow_core::version::parse_version(raw_version)?;

        let mut dependencies = Vec::new();
        if let Some(requirements) = doc
            .get("project")
            .and_then(|p| p.get("dependencies"))
            .and_then(|d| d.as_array())
        {
            for requirement in requirements {
                if let Some(dep) = requirement.as_str().and_then(requirement_name) {
                    dependencies.push(dep);
                }
            }
        }
        if let Some(table) = doc
            .get("tool")
            .and_then(|t| t.get("poetry"))
            .and_then(|p| p.get("dependencies"))
            .and_then(|d| d.as_table())
        {
            // The interpreter constraint is not a package dependency.
            for key in table.keys().filter(|k| k.as_str() != "python") {
                dependencies.push(key.clone());
            }
        }

        Ok(Manifest {
            name,
            version,
            dependencies,
        })
    }

    fn set_version(&self, root: &Path, version: &Version) -> Result<()> {
        let path = root.join("pyproject.toml");
        let content = fs::read_to_string(&path)
            .map_err(|e| Error::manifest(root, format!("failed to read pyproject.toml: {}", e)))?;

        let mut doc: Value = content
            .parse()
            .map_err(|e| Error::manifest(root, format!("failed to parse pyproject.toml: {}", e)))?;

        let updated = if let Some(project) = doc.get_mut("project").and_then(|p| p.as_table_mut())
        {
            project.insert("version".to_string(), Value::String(version.to_string()));
            true
        } else if let Some(poetry) = doc
            .get_mut("tool")
            .and_then(|t| t.get_mut("poetry"))
            .and_then(|p| p.as_table_mut())
        {
            poetry.insert("version".to_string(), Value::String(version.to_string()));
            true
        } else {
            false
        };

        if !updated {
            return Err(Error::manifest(
                root,
                "no [project] or [tool.poetry] section to write the version into",
            ));
        }

        let serialized = toml::to_string_pretty(&doc)
            .map_err(|e| Error::manifest(root, format!("failed to serialize pyproject.toml: {}", e)))?;
        fs::write(&path, serialized)
            .map_err(|e| Error::manifest(root, format!("failed to write pyproject.toml: {}", e)))?;

        Ok(())
    }
}
