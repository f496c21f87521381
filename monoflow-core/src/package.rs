//! Package data model.

use std::path::{Path, PathBuf};

use semver::Version;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// A package discovered in the monorepo.
///
/// Packages are immutable snapshots taken at registry load time. A version
/// bump written back to the manifest on disk does not mutate the in-memory
/// value; callers reload the registry to observe it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Package {
    pub name: String,
    pub version: Version,
    pub root: PathBuf,
    /// Dependency names exactly as declared in the manifest. Names that do
    /// not belong to the registry contribute no graph edges.
    #[serde(
        deserialize_with = "deserialize_deps",
        serialize_with = "serialize_deps"
    )]
    pub dependencies: SmallVec<[String; 4]>,
}

fn deserialize_deps<'de, D>(deserializer: D) -> Result<SmallVec<[String; 4]>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::Deserialize;
    let vec: Vec<String> = Vec::deserialize(deserializer)?;
    Ok(SmallVec::from_vec(vec))
}

fn serialize_deps<S>(deps: &SmallVec<[String; 4]>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    use serde::Serialize;
    let vec: Vec<&String> = deps.iter().collect();
    vec.serialize(serializer)
}

impl Package {
    pub fn new(
        name: String,
        version: Version,
        root: PathBuf,
        dependencies: Vec<String>,
    ) -> Self {
        Self {
            name,
            version,
            root,
            dependencies: SmallVec::from_vec(dependencies),
        }
    }

    /// Whether `path` lies inside this package's root directory.
    #[inline]
    pub fn contains(&self, path: &Path) -> bool {
        path.starts_with(&self.root)
    }

    /// Depth of the package root, used to rank nested roots when resolving
    /// file ownership (deeper root wins).
    #[inline]
    pub(crate) fn root_depth(&self) -> usize {
        self.root.components().count()
    }
}
