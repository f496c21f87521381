//! Manifest and VCS adapters for Monoflow.

pub mod conventional;
pub mod git;
pub mod js;
pub mod python;
pub mod rust;

pub use conventional::parse_commit;
pub use git::GitSource;
pub use js::PackageJsonSource;
pub use python::PyprojectSource;
pub use rust::CargoSource;

use monoflow_core::manifest::ManifestSource;

/// All built-in manifest sources, in detection precedence order.
pub fn default_sources() -> Vec<Box<dyn ManifestSource>> {
    vec![
        Box::new(PyprojectSource),
        Box::new(CargoSource),
        Box::new(PackageJsonSource),
    ]
}
