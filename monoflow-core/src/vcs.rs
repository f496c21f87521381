//! Version-control source traits.
//!
//! The core never shells out or walks history itself; it consumes
//! already-computed change sets and commit lists through these seams so
//! tests can substitute in-memory implementations.

use std::path::{Path, PathBuf};

use crate::commit::CommitInfo;
use crate::error::Result;

/// Supplies the set of files changed since a reference point.
pub trait DiffSource {
    /// Files changed since `reference`, as paths relative to the repository
    /// root. When `reference` is `None` or cannot be resolved (for example
    /// a fresh history with no prior commit), implementations fall back to
    /// returning every tracked file.
    fn changed_files_since(&self, reference: Option<&str>) -> Result<Vec<PathBuf>>;
}

/// Supplies the classified commit log attributed to one package.
pub trait CommitSource {
    /// Commits touching `package_root` since `reference` (a tag or rev),
    /// oldest first. A `None` or unresolvable reference means the whole
    /// history of the package.
    fn commits_for_package(
        &self,
        package_root: &Path,
        reference: Option<&str>,
    ) -> Result<Vec<CommitInfo>>;
}
