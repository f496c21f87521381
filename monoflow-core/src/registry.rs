//! Package registry: discovery and loading of manifest snapshots.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::error::{Error, Result};
use crate::manifest::ManifestSource;
use crate::package::Package;

const MAX_DISCOVERY_DEPTH: usize = 3;

/// How `load` responds to a manifest that cannot be read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ManifestErrorPolicy {
    /// Exclude the package, record it in the outcome, keep loading.
    #[default]
    SkipPackage,
    /// Fail the whole load on the first bad manifest.
    Abort,
}

/// Options controlling a registry load.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoadOptions {
    pub manifest_errors: ManifestErrorPolicy,
}

impl LoadOptions {
    pub fn abort_on_manifest_error() -> Self {
        Self {
            manifest_errors: ManifestErrorPolicy::Abort,
        }
    }
}

/// A package root excluded from the registry, with the error that excluded it.
#[derive(Debug)]
pub struct SkippedPackage {
    pub root: PathBuf,
    pub error: Error,
}

/// Result of a registry load: the registry plus the skip report.
///
/// Under `ManifestErrorPolicy::SkipPackage` a bad manifest is not fatal;
/// callers that care must inspect `skipped` rather than rely on a log line.
#[derive(Debug)]
pub struct LoadOutcome {
    pub registry: PackageRegistry,
    pub skipped: Vec<SkippedPackage>,
}

/// Immutable catalog of the packages in one monorepo snapshot.
///
/// Iteration order is discovery order and stays stable for the lifetime of
/// the value, which makes downstream build ordering reproducible.
#[derive(Debug, Default)]
pub struct PackageRegistry {
    packages: IndexMap<String, Package>,
}

impl PackageRegistry {
    /// Loads a registry from explicit package roots.
    ///
    /// Each root's manifest is read exactly once through the first source
    /// whose `detect` matches. A root with no recognizable manifest, an
    /// unparsable manifest, or a duplicate package name is a manifest
    /// error, handled per `options.manifest_errors`.
    ///
    /// # Errors
    ///
    /// Under `ManifestErrorPolicy::Abort`, the first manifest error fails
    /// the whole load. Under `SkipPackage` (the default) the load itself
    /// only fails on non-manifest errors.
    pub fn load(
        roots: &[PathBuf],
        sources: &[Box<dyn ManifestSource>],
        options: LoadOptions,
    ) -> Result<LoadOutcome> {
        let mut registry = PackageRegistry::default();
        let mut skipped = Vec::new();

        for root in roots {
            let result = Self::read_root(root, sources).and_then(|package| {
                match registry.packages.get(&package.name) {
                    Some(existing) => Err(Error::manifest(
                        root,
                        format!(
                            "duplicate package name '{}', first defined at {}",
                            package.name,
                            existing.root.display()
                        ),
                    )),
                    None => Ok(package),
                }
            });

            match result {
                Ok(package) => {
                    registry.packages.insert(package.name.clone(), package);
                }
                Err(error) => match options.manifest_errors {
                    ManifestErrorPolicy::SkipPackage => {
                        warn!("skipping package at {}: {}", root.display(), error);
                        skipped.push(SkippedPackage {
                            root: root.clone(),
                            error,
                        });
                    }
                    ManifestErrorPolicy::Abort => return Err(error),
                },
            }
        }

        Ok(LoadOutcome { registry, skipped })
    }

    /// Discovers package roots under `packages_dir` and loads them.
    ///
    /// A root is any directory (bounded depth) where some source detects a
    /// manifest. Roots are sorted by path before loading so discovery
    /// order, and everything derived from it, is reproducible.
    pub fn discover(
        packages_dir: impl AsRef<Path>,
        sources: &[Box<dyn ManifestSource>],
        options: LoadOptions,
    ) -> Result<LoadOutcome> {
        let packages_dir = packages_dir.as_ref();
        let mut roots: Vec<PathBuf> = WalkDir::new(packages_dir)
            .max_depth(MAX_DISCOVERY_DEPTH)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_dir())
            .map(|entry| entry.into_path())
            .filter(|dir| sources.iter().any(|source| source.detect(dir)))
            .collect();
        roots.sort();

        debug!(
            "discovered {} package roots under {}",
            roots.len(),
            packages_dir.display()
        );

        Self::load(&roots, sources, options)
    }

    /// Builds a registry directly from package values.
    ///
    /// # Errors
    ///
    /// Returns a manifest error on duplicate package names.
    pub fn from_packages(packages: Vec<Package>) -> Result<Self> {
        let mut registry = PackageRegistry::default();
        for package in packages {
            if let Some(existing) = registry.packages.get(&package.name) {
                return Err(Error::manifest(
                    package.root.clone(),
                    format!(
                        "duplicate package name '{}', first defined at {}",
                        package.name,
                        existing.root.display()
                    ),
                ));
            }
            registry.packages.insert(package.name.clone(), package);
        }
        Ok(registry)
    }

    fn read_root(root: &Path, sources: &[Box<dyn ManifestSource>]) -> Result<Package> {
        let source = sources
            .iter()
            .find(|source| source.detect(root))
            .ok_or_else(|| Error::manifest(root, "no recognizable manifest"))?;

        let manifest = source.read_manifest(root)?;
        Ok(Package::new(
            manifest.name,
            manifest.version,
            root.to_path_buf(),
            manifest.dependencies,
        ))
    }

    /// Retrieves a package by name.
    #[inline]
    pub fn get(&self, name: &str) -> Option<&Package> {
        self.packages.get(name)
    }

    /// Retrieves a package by name, or fails with `PackageNotFound`.
    pub fn require(&self, name: &str) -> Result<&Package> {
        self.get(name).ok_or_else(|| Error::PackageNotFound {
            name: name.to_string(),
            available: self.known_names(),
        })
    }

    /// Package names in discovery order.
    pub fn package_names(&self) -> impl Iterator<Item = &str> {
        self.packages.keys().map(String::as_str)
    }

    /// Packages in discovery order.
    pub fn packages(&self) -> impl Iterator<Item = &Package> {
        self.packages.values()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.packages.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    pub(crate) fn known_names(&self) -> String {
        self.packages
            .keys()
            .cloned()
            .collect::<Vec<_>>()
            .join(", ")
    }
}
