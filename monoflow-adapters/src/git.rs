//! Git-backed diff and commit sources using libgit2.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use git2::{Commit, Oid, Repository};
use monoflow_core::commit::CommitInfo;
use monoflow_core::error::{Error, Result};
use monoflow_core::vcs::{CommitSource, DiffSource};
use tracing::debug;

use crate::conventional;

/// Diff and commit source backed by the repository containing the
/// working directory.
pub struct GitSource {
    repo: Repository,
}

impl GitSource {
    /// Opens the repository containing `path`, searching parent
    /// directories the way git itself does.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let repo = Repository::discover(path.as_ref())
            .map_err(|e| Error::Vcs(format!("cannot open repository: {}", e)))?;
        Ok(Self { repo })
    }

    /// Absolute path of the repository working directory.
    pub fn root(&self) -> Result<PathBuf> {
        self.repo
            .workdir()
            .map(Path::to_path_buf)
            .ok_or_else(|| Error::Vcs("repository has no working directory".to_string()))
    }

    /// Resolves a tag, branch, or revision to its commit id. Annotated
    /// tags peel through to the tagged commit.
    fn resolve_commit(&self, reference: &str) -> Option<Oid> {
        self.repo
            .revparse_single(reference)
            .ok()
            .and_then(|object| object.peel_to_commit().ok())
            .map(|commit| commit.id())
    }

    /// Repo-relative form of `path`. Paths outside the working directory
    /// pass through unchanged.
    fn workdir_relative(&self, path: &Path) -> PathBuf {
        match self.repo.workdir() {
            Some(workdir) => path.strip_prefix(workdir).unwrap_or(path).to_path_buf(),
            None => path.to_path_buf(),
        }
    }

    fn tracked_files(&self) -> Result<Vec<PathBuf>> {
        let index = self
            .repo
            .index()
            .map_err(|e| Error::Vcs(format!("cannot read index: {}", e)))?;
        Ok(index
            .iter()
            .map(|entry| PathBuf::from(String::from_utf8_lossy(&entry.path).as_ref()))
            .collect())
    }

    /// Whether `commit` changes anything under `prefix`, judged against
    /// its first parent (or the empty tree for a root commit).
    fn commit_touches(&self, commit: &Commit, prefix: &Path) -> Result<bool> {
        let tree = commit
            .tree()
            .map_err(|e| Error::Vcs(format!("cannot read commit tree: {}", e)))?;
        let parent_tree = match commit.parent(0) {
            Ok(parent) => Some(
                parent
                    .tree()
                    .map_err(|e| Error::Vcs(format!("cannot read parent tree: {}", e)))?,
            ),
            Err(_) => None,
        };

        let diff = self
            .repo
            .diff_tree_to_tree(parent_tree.as_ref(), Some(&tree), None)
            .map_err(|e| Error::Vcs(format!("cannot diff commit: {}", e)))?;

        Ok(diff.deltas().any(|delta| {
            delta
                .new_file()
                .path()
                .or_else(|| delta.old_file().path())
                .map_or(false, |path| path.starts_with(prefix))
        }))
    }
}

impl DiffSource for GitSource {
    fn changed_files_since(&self, reference: Option<&str>) -> Result<Vec<PathBuf>> {
        let oid = match reference.and_then(|r| self.resolve_commit(r)) {
            Some(oid) => oid,
            None => {
                debug!(
                    "no usable diff reference {:?}, falling back to all tracked files",
                    reference
                );
                return self.tracked_files();
            }
        };

        let commit = self
            .repo
            .find_commit(oid)
            .map_err(|e| Error::Vcs(format!("cannot read commit {}: {}", oid, e)))?;
        let tree = commit
            .tree()
            .map_err(|e| Error::Vcs(format!("cannot read commit tree: {}", e)))?;

        let diff = self
            .repo
            .diff_tree_to_workdir_with_index(Some(&tree), None)
            .map_err(|e| Error::Vcs(format!("cannot diff against workdir: {}", e)))?;

        // Collect both sides of every delta so renames count for the old
        // and the new location.
        let mut files = BTreeSet::new();
        for delta in diff.deltas() {
            if let Some(path) = delta.old_file().path() {
                files.insert(path.to_path_buf());
            }
            if let Some(path) = delta.new_file().path() {
                files.insert(path.to_path_buf());
            }
        }

        Ok(files.into_iter().collect())
    }
}

impl CommitSource for GitSource {
    fn commits_for_package(
        &self,
        package_root: &Path,
        reference: Option<&str>,
    ) -> Result<Vec<CommitInfo>> {
        if self.repo.head().is_err() {
            // Unborn branch: nothing has been committed yet.
            return Ok(Vec::new());
        }

        let prefix = self.workdir_relative(package_root);

        let mut revwalk = self
            .repo
            .revwalk()
            .map_err(|e| Error::Vcs(format!("cannot walk history: {}", e)))?;
        revwalk
            .push_head()
            .map_err(|e| Error::Vcs(format!("cannot walk history: {}", e)))?;

        match reference.map(|r| (r, self.resolve_commit(r))) {
            Some((_, Some(oid))) => {
                revwalk
                    .hide(oid)
                    .map_err(|e| Error::Vcs(format!("cannot bound history walk: {}", e)))?;
            }
            Some((name, None)) => {
                debug!("reference '{}' not found, walking full history", name);
            }
            None => {}
        }

        let mut commits = Vec::new();
        for oid in revwalk {
            let oid = oid.map_err(|e| Error::Vcs(format!("history walk failed: {}", e)))?;
            let commit = self
                .repo
                .find_commit(oid)
                .map_err(|e| Error::Vcs(format!("cannot read commit {}: {}", oid, e)))?;

            if !self.commit_touches(&commit, &prefix)? {
                continue;
            }

            commits.push(conventional::parse_commit(commit.message().unwrap_or_default()));
        }

        // Revwalk yields newest first.
        commits.reverse();
        Ok(commits)
    }
}
