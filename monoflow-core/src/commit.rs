//! Classified commit data model.

use serde::{Deserialize, Serialize};

/// Closed set of commit classifications the version policy understands.
///
/// Anything that is not a feature or a fix collapses to `Other`; such
/// commits never drive a version bump and never appear in a changelog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommitType {
    Feat,
    Fix,
    Other,
}

impl CommitType {
    /// Maps a conventional-commit type tag to its classification.
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "feat" => CommitType::Feat,
            "fix" => CommitType::Fix,
            _ => CommitType::Other,
        }
    }

    #[inline]
    pub fn as_str(&self) -> &'static str {
        match self {
            CommitType::Feat => "feat",
            CommitType::Fix => "fix",
            CommitType::Other => "other",
        }
    }
}

/// One classified commit attributed to a package.
///
/// Produced by the commit-log source (conventional-commit parsing is an
/// adapter concern); consumed read-only by the version policy and the
/// changelog renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitInfo {
    pub commit_type: CommitType,
    pub scope: Option<String>,
    pub message: String,
    pub breaking: bool,
}

impl CommitInfo {
    pub fn new(commit_type: CommitType, message: impl Into<String>) -> Self {
        Self {
            commit_type,
            scope: None,
            message: message.into(),
            breaking: false,
        }
    }

    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = Some(scope.into());
        self
    }

    pub fn with_breaking(mut self, breaking: bool) -> Self {
        self.breaking = breaking;
        self
    }
}
