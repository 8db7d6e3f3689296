//! Registry manifests and batch validation.

use std::path::{Path, PathBuf};

use rayon::prelude::*;
use serde::Deserialize;
use smol_str::SmolStr;
use thiserror::Error;
use tracing::{info, warn};

use super::CheckConfig;
use super::pipeline::{check_schema, check_semantics};
use super::report::{EntryReport, Report};
use crate::base::constants::MANIFEST_FILES;
use crate::base::layout;
use crate::check::{ErrorKind, ValidationError};
use crate::diagnostics::LocationResolver;

/// Failures of the run itself, as opposed to findings about an entry.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("no manifest found in {}: expected one of {}", root.display(), MANIFEST_FILES.join(", "))]
    ManifestNotFound { root: PathBuf },

    #[error("cannot read manifest {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid manifest {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

/// On-disk manifest shapes: a bare list, or the list under `registered_yml`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ManifestFile {
    List(Vec<String>),
    Keyed {
        #[serde(rename = "registered_yml")]
        registered: Vec<String>,
    },
}

/// Registered entity names, in manifest order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    pub entries: Vec<SmolStr>,
}

impl Manifest {
    /// Parse manifest text. Document extensions on names are dropped.
    pub fn parse(text: &str) -> Result<Self, serde_yaml::Error> {
        let names = match serde_yaml::from_str::<ManifestFile>(text)? {
            ManifestFile::List(names) => names,
            ManifestFile::Keyed { registered } => registered,
        };
        let entries = names
            .iter()
            .map(|name| name.trim())
            .filter(|name| !name.is_empty())
            .map(|name| SmolStr::new(layout::entity_stem(name)))
            .collect();
        Ok(Self { entries })
    }

    pub fn load(path: &Path) -> Result<Self, RegistryError> {
        let text = std::fs::read_to_string(path).map_err(|source| RegistryError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text).map_err(|source| RegistryError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// The manifest `config` points at.
    pub fn locate(config: &CheckConfig) -> Result<Self, RegistryError> {
        let path = config
            .manifest_path()
            .ok_or_else(|| RegistryError::ManifestNotFound {
                root: config.root.clone(),
            })?;
        Self::load(&path)
    }
}

/// Validate every entry the manifest registers.
pub fn check_registry(config: &CheckConfig) -> Result<Report, RegistryError> {
    let manifest = Manifest::locate(config)?;
    info!(
        "checking {} registered entries under {}{}",
        manifest.entries.len(),
        config.root.display(),
        if config.parallel { " in parallel" } else { "" }
    );

    let entries: Vec<EntryReport> = if config.parallel {
        manifest
            .entries
            .par_iter()
            .map(|name| check_entry(config, name))
            .collect()
    } else {
        manifest
            .entries
            .iter()
            .map(|name| check_entry(config, name))
            .collect()
    };
    Ok(Report { entries })
}

/// Validate the schema and semantic documents registered as `name`.
///
/// The schema is checked against `ddl/{name}.sql` when that file exists.
pub fn check_entry(config: &CheckConfig, name: &str) -> EntryReport {
    let root = config.root();
    let mut files = Vec::new();

    if let Some(schema) = layout::schema_path(root, name) {
        let ddl = layout::ddl_path(root, name);
        files.push(check_schema(&schema, ddl.as_deref()));
    }
    if let Some(semantics) = layout::semantics_path(root, name) {
        files.push(check_semantics(&semantics, root, config.policy));
    }

    let mut diagnostics = Vec::new();
    if files.is_empty() {
        warn!("registered entry `{name}` has no documents under {}", root.display());
        diagnostics.push(LocationResolver::detached().resolve(ValidationError::new(
            Vec::new(),
            ErrorKind::RegistryEntryMissing,
            format!("Registered entry `{name}` has neither a schema nor a semantic document"),
        )));
    }

    let report = EntryReport {
        name: SmolStr::new(name),
        files,
        diagnostics,
    };
    info!(
        "`{name}`: {}",
        if report.passed() {
            "passed".to_string()
        } else {
            format!("{} finding(s)", report.diagnostic_count())
        }
    );
    report
}
