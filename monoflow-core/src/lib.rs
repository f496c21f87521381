//! Core library for monorepo dependency and release analysis.

pub mod change;
pub mod changelog;
pub mod commit;
pub mod error;
pub mod graph;
pub mod manifest;
pub mod package;
pub mod registry;
pub mod vcs;
pub mod version;

pub use change::ChangeDetector;
pub use changelog::ChangelogGenerator;
pub use commit::{CommitInfo, CommitType};
pub use error::{Error, Result};
pub use graph::DependencyGraph;
pub use manifest::{Manifest, ManifestSource};
pub use package::Package;
pub use registry::{
    LoadOptions, LoadOutcome, ManifestErrorPolicy, PackageRegistry, SkippedPackage,
};
pub use vcs::{CommitSource, DiffSource};
pub use version::{parse_version, BumpType, ReleasePlan, VersionManager};
