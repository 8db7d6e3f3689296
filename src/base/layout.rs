//! Registry directory conventions.
//!
//! ```text
//! {root}/schema/{name}.yaml
//! {root}/ddl/{name}.sql
//! {root}/semantics/{name}.yaml
//! ```

use std::path::{Path, PathBuf};

use super::constants::{DDL_DIR, DDL_EXTENSION, DOCUMENT_EXTENSIONS, SCHEMA_DIR, SEMANTICS_DIR};

/// Find `{root}/{dir}/{name}.{ext}` for the first document extension that exists.
pub fn find_document(root: &Path, dir: &str, name: &str) -> Option<PathBuf> {
    DOCUMENT_EXTENSIONS
        .iter()
        .map(|ext| root.join(dir).join(format!("{name}.{ext}")))
        .find(|candidate| candidate.is_file())
}

/// Schema document registered under `name`, if present.
pub fn schema_path(root: &Path, name: &str) -> Option<PathBuf> {
    find_document(root, SCHEMA_DIR, name)
}

/// Semantic document registered under `name`, if present.
pub fn semantics_path(root: &Path, name: &str) -> Option<PathBuf> {
    find_document(root, SEMANTICS_DIR, name)
}

/// DDL file registered under `name`, if present.
pub fn ddl_path(root: &Path, name: &str) -> Option<PathBuf> {
    let path = root.join(DDL_DIR).join(format!("{name}.{DDL_EXTENSION}"));
    path.is_file().then_some(path)
}

/// Strip a trailing document extension from a registered name (`movies.yml` -> `movies`).
pub fn entity_stem(name: &str) -> &str {
    DOCUMENT_EXTENSIONS
        .iter()
        .find_map(|ext| {
            name.strip_suffix(ext)
                .and_then(|rest| rest.strip_suffix('.'))
        })
        .unwrap_or(name)
}
