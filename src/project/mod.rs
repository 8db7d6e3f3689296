//! Registry-level validation.
//!
//! A registry is a directory laid out as described in
//! [`base::layout`](crate::base::layout) together with a manifest listing the
//! registered entity names. [`check_registry`] validates every registered
//! entry; [`check_schema`] and [`check_semantics`] validate single files.

mod pipeline;
mod registry;
mod report;

#[cfg(test)]
mod tests;

use std::path::{Path, PathBuf};

use crate::base::constants::MANIFEST_FILES;
use crate::check::SelectorPolicy;

pub use pipeline::{check_schema, check_semantics, schema_findings, semantics_findings};
pub use registry::{Manifest, RegistryError, check_entry, check_registry};
pub use report::{EntryRecord, EntryReport, FileReport, Report};

/// Options for a registry run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckConfig {
    pub root: PathBuf,
    pub policy: SelectorPolicy,
    /// Validate entries on the rayon pool.
    pub parallel: bool,
    /// Manifest to use instead of `registry.yaml` / `registry.yml` under the root.
    pub manifest: Option<PathBuf>,
}

impl CheckConfig {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            policy: SelectorPolicy::default(),
            parallel: false,
            manifest: None,
        }
    }

    pub fn with_policy(mut self, policy: SelectorPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_manifest(mut self, manifest: impl Into<PathBuf>) -> Self {
        self.manifest = Some(manifest.into());
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The manifest this run reads: the override, or the first default file
    /// present under the root.
    pub fn manifest_path(&self) -> Option<PathBuf> {
        if let Some(manifest) = &self.manifest {
            return Some(manifest.clone());
        }
        MANIFEST_FILES
            .iter()
            .map(|file| self.root.join(file))
            .find(|candidate| candidate.is_file())
    }
}
