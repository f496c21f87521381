//! Manifest source trait for reading package metadata.

use std::path::Path;

use semver::Version;

use crate::error::Result;

/// Structured manifest contents, reduced to the fields the core consumes.
///
/// Dependency constraint strings are dropped at this boundary; only the
/// declared names survive.
#[derive(Debug, Clone)]
pub struct Manifest {
    pub name: String,
    pub version: Version,
    pub dependencies: Vec<String>,
}

/// Trait for manifest-format-specific package I/O.
///
/// Sources detect packages, read name/version/dependency fields, and write
/// versions back. The core only ever reads; `set_version` exists for the
/// layer that applies a computed bump.
pub trait ManifestSource: Send + Sync {
    /// Short format identifier ("pyproject", "cargo", ...) used in reports.
    fn kind(&self) -> &'static str;

    /// Whether a package of this format lives at `root`.
    fn detect(&self, root: &Path) -> bool;

    /// Reads the manifest at `root` once.
    ///
    /// # Errors
    ///
    /// Returns `Error::Manifest` if the file is unreadable, unparsable, or
    /// missing a required name/version field.
    fn read_manifest(&self, root: &Path) -> Result<Manifest>;

    /// Writes `version` into the manifest at `root`, preserving everything
    /// else in the document.
    fn set_version(&self, root: &Path, version: &Version) -> Result<()>;
}
