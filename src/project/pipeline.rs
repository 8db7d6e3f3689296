//! Single-document pipelines.
//!
//! Load, check structure, run the cross checks only when the structure is
//! sound, then resolve every finding against the loaded text. Nothing is
//! cached between calls.

use std::path::Path;

use tracing::{debug, warn};

use super::report::FileReport;
use crate::check::{self, ErrorCollector, ErrorKind, SelectorPolicy, ValidationError, namespace};
use crate::ddl::{self, DdlTableMetadata};
use crate::diagnostics::LocationResolver;
use crate::document::{self, Document};

/// Findings for a loaded schema document, checked against `ddl` when given.
///
/// Structural findings are returned alone; the DDL comparison needs a sound
/// model.
pub fn schema_findings(document: &Document, ddl: Option<&DdlTableMetadata>) -> Vec<ValidationError> {
    let schema = match check::schema::validate(document) {
        Ok(schema) => schema,
        Err(errors) => return errors,
    };
    let Some(ddl) = ddl else {
        return Vec::new();
    };

    let mut errors = ErrorCollector::new();
    check::ddl::validate(&schema, ddl, &mut errors);
    errors.into_errors()
}

/// Findings for a loaded semantic document whose sources live under `root`.
pub fn semantics_findings(
    document: &Document,
    root: &Path,
    policy: SelectorPolicy,
) -> Vec<ValidationError> {
    let semantic = match check::semantic::validate(document) {
        Ok(semantic) => semantic,
        Err(errors) => return errors,
    };

    let mut errors = ErrorCollector::new();
    let namespace = namespace::build(&semantic, root, policy, &mut errors);
    check::references::validate(&semantic, &namespace, &mut errors);
    errors.into_errors()
}

/// Validate the schema document at `path`, and its DDL when `ddl_path` is given.
pub fn check_schema(path: &Path, ddl_path: Option<&Path>) -> FileReport {
    let document = match document::load(path) {
        Ok(document) => document,
        Err(err) => return unreadable(path, err),
    };

    let mut ddl_failure = None;
    let ddl = ddl_path.and_then(|ddl_path| match ddl::load_ddl(ddl_path) {
        Ok(table) => Some(table),
        Err(err) => {
            warn!("cannot use DDL {}: {err}", ddl_path.display());
            ddl_failure = Some(ValidationError::new(
                Vec::new(),
                ErrorKind::DdlUnreadable,
                format!("{}: {err}", ddl_path.display()),
            ));
            None
        }
    });

    let errors = schema_findings(&document, ddl.as_ref());
    debug!("{}: {} finding(s)", path.display(), errors.len());
    let mut diagnostics = LocationResolver::new(&document).resolve_all(errors);
    // Lines of a DDL failure belong to the SQL file, not this document.
    diagnostics.extend(ddl_failure.map(|error| LocationResolver::detached().resolve(error)));
    FileReport::new(path, diagnostics)
}

/// Validate the semantic document at `path`, resolving sources under `root`.
pub fn check_semantics(path: &Path, root: &Path, policy: SelectorPolicy) -> FileReport {
    let document = match document::load(path) {
        Ok(document) => document,
        Err(err) => return unreadable(path, err),
    };

    let errors = semantics_findings(&document, root, policy);
    debug!("{}: {} finding(s)", path.display(), errors.len());
    FileReport::new(path, LocationResolver::new(&document).resolve_all(errors))
}

fn unreadable(path: &Path, err: document::LoadError) -> FileReport {
    warn!("cannot load {}: {err}", path.display());
    let mut error = ValidationError::new(
        Vec::new(),
        ErrorKind::DocumentUnreadable,
        format!("{}: {err}", path.display()),
    );
    if let Some(line) = err.line() {
        error = error.with_line(line);
    }
    FileReport::new(path, vec![LocationResolver::detached().resolve(error)])
}
