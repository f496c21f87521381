//! Change detection for determining affected packages.

use std::collections::BTreeSet;
use std::path::Path;

use crate::error::Result;
use crate::graph::DependencyGraph;
use crate::package::Package;
use crate::registry::PackageRegistry;

/// Maps changed files to the packages that must be rebuilt or retested.
///
/// The detector never discovers changed files itself; callers obtain them
/// from a `DiffSource` (or anywhere else) and pass the set in. File paths
/// are compared textually against package roots, so both must share a base:
/// either all absolute, or all relative to the same repository root.
pub struct ChangeDetector;

impl ChangeDetector {
    /// Packages owning at least one changed file.
    ///
    /// A file belongs to the package whose root is its nearest ancestor
    /// directory; with nested roots the deepest containing root wins. Files
    /// outside every package root contribute nothing.
    pub fn directly_affected(
        changed_files: &[impl AsRef<Path>],
        registry: &PackageRegistry,
    ) -> BTreeSet<String> {
        let mut affected = BTreeSet::new();
        for file in changed_files {
            if let Some(owner) = Self::owning_package(file.as_ref(), registry) {
                affected.insert(owner.name.clone());
            }
        }
        affected
    }

    /// Directly affected packages plus every transitive dependent: the set
    /// a CI driver rebuilds and retests.
    ///
    /// # Errors
    ///
    /// Propagates graph lookup failures; these cannot occur when `graph`
    /// was built from `registry`.
    pub fn fully_affected(
        changed_files: &[impl AsRef<Path>],
        registry: &PackageRegistry,
        graph: &DependencyGraph,
    ) -> Result<BTreeSet<String>> {
        let direct = Self::directly_affected(changed_files, registry);
        graph.affected_packages(&direct.into_iter().collect::<Vec<_>>())
    }

    fn owning_package<'r>(file: &Path, registry: &'r PackageRegistry) -> Option<&'r Package> {
        registry
            .packages()
            .filter(|package| package.contains(file))
            .max_by_key(|package| package.root_depth())
    }
}
