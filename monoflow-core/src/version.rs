//! Semantic version policy driven by classified commits.

use semver::Version;
use serde::{Deserialize, Serialize};

use crate::commit::{CommitInfo, CommitType};
use crate::error::{Error, Result};
use crate::registry::PackageRegistry;

/// Parses a version string, accepting only the plain MAJOR.MINOR.PATCH
/// triple. Pre-release and build metadata are rejected.
pub fn parse_version(input: &str) -> Result<Version> {
    let version = Version::parse(input).map_err(|e| Error::version(input, e))?;
    if !version.pre.is_empty() || !version.build.is_empty() {
        return Err(Error::version(
            input,
            "pre-release and build metadata are not supported",
        ));
    }
    Ok(version)
}

/// Type of semantic version bump.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BumpType {
    /// Major version bump (1.2.3 -> 2.0.0).
    Major,
    /// Minor version bump (1.2.3 -> 1.3.0).
    Minor,
    /// Patch version bump (1.2.3 -> 1.2.4).
    Patch,
}

impl BumpType {
    /// Applies the bump to `version`, returning a new value.
    pub fn apply(self, version: &Version) -> Version {
        match self {
            BumpType::Major => Version::new(version.major + 1, 0, 0),
            BumpType::Minor => Version::new(version.major, version.minor + 1, 0),
            BumpType::Patch => Version::new(version.major, version.minor, version.patch + 1),
        }
    }

    /// Classifies a commit log into the bump it warrants, highest severity
    /// winning: any breaking commit means `Major`, else any feature means
    /// `Minor`, else any fix means `Patch`. Commits of other types are
    /// ignored; `None` means the version stays put.
    pub fn classify(commits: &[CommitInfo]) -> Option<BumpType> {
        if commits.iter().any(|c| c.breaking) {
            Some(BumpType::Major)
        } else if commits.iter().any(|c| c.commit_type == CommitType::Feat) {
            Some(BumpType::Minor)
        } else if commits.iter().any(|c| c.commit_type == CommitType::Fix) {
            Some(BumpType::Patch)
        } else {
            None
        }
    }

    #[inline]
    pub fn as_str(&self) -> &'static str {
        match self {
            BumpType::Major => "major",
            BumpType::Minor => "minor",
            BumpType::Patch => "patch",
        }
    }
}

/// A planned version change for one package.
#[derive(Debug, Clone, Serialize)]
pub struct ReleasePlan {
    pub package: String,
    pub current: Version,
    pub next: Version,
    /// The classified or forced bump. `None` for plans that carry an
    /// explicitly chosen version, and for no-op plans.
    pub bump: Option<BumpType>,
}

impl ReleasePlan {
    /// Whether applying this plan would change anything.
    #[inline]
    pub fn is_noop(&self) -> bool {
        self.current == self.next
    }
}

/// Computes next versions for registry packages from their commit logs.
///
/// Purely computational: the manager never writes versions back; applying
/// a plan through `ManifestSource::set_version` is the caller's job.
pub struct VersionManager<'a> {
    registry: &'a PackageRegistry,
}

impl<'a> VersionManager<'a> {
    pub fn new(registry: &'a PackageRegistry) -> Self {
        Self { registry }
    }

    /// Computes the next version for `package` from its commit log.
    ///
    /// Never fails on the commit list itself: unrecognized commit types
    /// simply do not count, and an empty or all-unrecognized log returns
    /// the current version unchanged.
    ///
    /// # Errors
    ///
    /// Returns `PackageNotFound` if `package` is absent from the registry.
    pub fn next_version(&self, package: &str, commits: &[CommitInfo]) -> Result<Version> {
        let pkg = self.registry.require(package)?;
        Ok(match BumpType::classify(commits) {
            Some(bump) => bump.apply(&pkg.version),
            None => pkg.version.clone(),
        })
    }

    /// Plans a release for `package`: current version, next version, and
    /// the bump that produced it.
    ///
    /// # Errors
    ///
    /// Returns `PackageNotFound` if `package` is absent from the registry.
    pub fn plan_release(&self, package: &str, commits: &[CommitInfo]) -> Result<ReleasePlan> {
        let pkg = self.registry.require(package)?;
        let bump = BumpType::classify(commits);
        let next = match bump {
            Some(bump) => bump.apply(&pkg.version),
            None => pkg.version.clone(),
        };

        Ok(ReleasePlan {
            package: pkg.name.clone(),
            current: pkg.version.clone(),
            next,
            bump,
        })
    }

    /// Plans a release with a caller-chosen bump, bypassing commit
    /// classification.
    ///
    /// # Errors
    ///
    /// Returns `PackageNotFound` if `package` is absent from the registry.
    pub fn plan_release_with(&self, package: &str, bump: BumpType) -> Result<ReleasePlan> {
        let pkg = self.registry.require(package)?;
        Ok(ReleasePlan {
            package: pkg.name.clone(),
            current: pkg.version.clone(),
            next: bump.apply(&pkg.version),
            bump: Some(bump),
        })
    }

    /// Plans a release to an explicitly chosen version.
    ///
    /// # Errors
    ///
    /// Returns `PackageNotFound` if `package` is absent from the registry.
    pub fn plan_release_to(&self, package: &str, next: Version) -> Result<ReleasePlan> {
        let pkg = self.registry.require(package)?;
        Ok(ReleasePlan {
            package: pkg.name.clone(),
            current: pkg.version.clone(),
            next,
            bump: None,
        })
    }
}
