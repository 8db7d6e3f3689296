//! Reference namespace assembly for semantic documents.
//!
//! The namespace holds every identifier a semantic document may reference:
//! its own attribute and metric ids plus whatever its sources import. It is
//! built completely before any reference is checked, so declaration order
//! and reference cycles do not matter.

use std::path::Path;

use rustc_hash::FxHashSet;
use smol_str::SmolStr;
use tracing::{debug, warn};

use super::error::{ErrorCollector, ErrorKind, ValidationError};
use super::model::{Selection, SemanticDocument, Source, SourceKind};
use crate::base::layout;
use crate::document::{self, Document, PathSegment};
use crate::path;

/// How explicit selector ids that the source does not declare are treated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SelectorPolicy {
    /// Drop them silently (logged at debug level).
    #[default]
    Lenient,
    /// Report each one as `UnknownSourceId`.
    Strict,
}

/// Identifiers a semantic document may reference.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReferenceNamespace {
    ids: FxHashSet<SmolStr>,
}

impl ReferenceNamespace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: impl Into<SmolStr>) -> bool {
        self.ids.insert(id.into())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SmolStr> {
        self.ids.iter()
    }
}

impl<S: Into<SmolStr>> FromIterator<S> for ReferenceNamespace {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            ids: iter.into_iter().map(Into::into).collect(),
        }
    }
}

/// Build the namespace of `semantic`, resolving sources under `root`.
///
/// Missing or unreadable sources are reported and skipped; the remaining
/// sources are still imported.
pub fn build(
    semantic: &SemanticDocument,
    root: &Path,
    policy: SelectorPolicy,
    errors: &mut ErrorCollector,
) -> ReferenceNamespace {
    let mut namespace = ReferenceNamespace::new();
    for id in semantic.attributes.keys().chain(semantic.metrics.keys()) {
        namespace.insert(id.clone());
    }

    for source in &semantic.sources {
        let source_path = path![semantic.sources_key, source.alias.to_string()];
        let Some(file) = layout::find_document(root, source.alias.kind.dir(), &source.alias.name)
        else {
            warn!("source `{}` not found under {}", source.alias, root.display());
            errors.report(
                source_path,
                ErrorKind::SourceNotFound,
                format!(
                    "Source `{}` not found: expected {}",
                    source.alias,
                    root.join(source.alias.kind.dir())
                        .join(format!("{}.yaml", source.alias.name))
                        .display()
                ),
            );
            continue;
        };

        let loaded = match document::load(&file) {
            Ok(loaded) => loaded,
            Err(err) => {
                warn!("skipping unreadable source {}: {err}", file.display());
                errors.report(
                    source_path,
                    ErrorKind::SourceUnreadable,
                    format!("Source `{}` could not be loaded: {err}", source.alias),
                );
                continue;
            }
        };

        let before = namespace.len();
        let mut import = Importer {
            source,
            source_path: &source_path,
            policy,
            namespace: &mut namespace,
            errors: &mut *errors,
        };
        match source.alias.kind {
            SourceKind::Schema => {
                import.section(&loaded, "columns", source.selector.columns.as_ref());
            }
            SourceKind::Semantics => {
                import.section(&loaded, "attributes", source.selector.attributes.as_ref());
                import.section(&loaded, "metrics", source.selector.metrics.as_ref());
            }
        }
        debug!(
            "imported {} ids from `{}` ({})",
            namespace.len() - before,
            source.alias,
            file.display()
        );
    }

    debug!("namespace of `{}` holds {} ids", semantic.name, namespace.len());
    namespace
}

struct Importer<'a> {
    source: &'a Source,
    source_path: &'a [PathSegment],
    policy: SelectorPolicy,
    namespace: &'a mut ReferenceNamespace,
    errors: &'a mut ErrorCollector,
}

impl Importer<'_> {
    /// Import the ids declared under `section` of `loaded`, as selected.
    fn section(&mut self, loaded: &Document, section: &str, selection: Option<&Selection>) {
        let Some(selection) = selection else {
            return;
        };
        let declared: Vec<&SmolStr> = loaded
            .body()
            .as_mapping()
            .and_then(|body| body.get(section))
            .and_then(|node| node.as_mapping())
            .map(|map| map.keys().collect())
            .unwrap_or_default();

        match selection {
            Selection::All => {
                for id in declared {
                    self.namespace.insert(id.clone());
                }
            }
            Selection::Ids(ids) => {
                for (index, id) in ids.iter().enumerate() {
                    if declared.contains(&id) {
                        self.namespace.insert(id.clone());
                        continue;
                    }
                    match self.policy {
                        SelectorPolicy::Lenient => {
                            debug!(
                                "dropping `{id}`: not declared in the {section} of `{}`",
                                self.source.alias
                            );
                        }
                        SelectorPolicy::Strict => {
                            let mut path = self.source_path.to_vec();
                            path.push(PathSegment::key(section));
                            path.push(PathSegment::Index(index));
                            self.errors.push(ValidationError::new(
                                path,
                                ErrorKind::UnknownSourceId,
                                format!(
                                    "`{id}` is not declared in the {section} of `{}`",
                                    self.source.alias
                                ),
                            ));
                        }
                    }
                }
            }
        }
    }
}
