//! Error types and result aliases.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Manifest error in {path}: {reason}")]
    Manifest { path: PathBuf, reason: String },

    #[error("Package not found: {name}. Known packages: {available}")]
    PackageNotFound { name: String, available: String },

    #[error("Circular dependency detected among: {0}")]
    CircularDependency(String),

    #[error("Invalid version '{input}': {reason}")]
    Version { input: String, reason: String },

    #[error("VCS error: {0}")]
    Vcs(String),
}

impl Error {
    /// Builds a `Manifest` error for the given package root.
    pub fn manifest(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Error::Manifest {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Builds a `Version` error from a semver parse failure.
    pub fn version(input: impl Into<String>, reason: impl ToString) -> Self {
        Error::Version {
            input: input.into(),
            reason: reason.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
