//! Path-to-line resolution for validation findings.

use tracing::trace;

use super::{Diagnostic, Location};
use crate::check::ValidationError;
use crate::document::{Document, PathSegment, PositionIndex, render_path};

/// Places findings against one document.
///
/// A line pinned on the finding wins. Otherwise the full path is looked up;
/// if that fails, a single-key path falls back to the entity line and a
/// deeper path to its nearest existing ancestor, scanning from the deepest.
/// A resolver without a document (the document could not be loaded) only
/// honours pinned lines.
#[derive(Debug, Clone, Copy)]
pub struct LocationResolver<'a> {
    index: Option<PositionIndex<'a>>,
}

impl<'a> LocationResolver<'a> {
    pub fn new(document: &'a Document) -> Self {
        Self {
            index: Some(document.position_index()),
        }
    }

    /// Resolver for findings about a document that has no usable tree.
    pub fn detached() -> Self {
        Self { index: None }
    }

    pub fn locate(&self, error: &ValidationError) -> Location {
        if let Some(line) = error.line {
            return Location::Exact(line);
        }
        match &self.index {
            Some(index) => locate_path(index, &error.path),
            None => Location::Unknown,
        }
    }

    pub fn resolve(&self, error: ValidationError) -> Diagnostic {
        let location = self.locate(&error);
        Diagnostic::new(error, location)
    }

    /// Resolve every finding, keeping their order.
    pub fn resolve_all(&self, errors: impl IntoIterator<Item = ValidationError>) -> Vec<Diagnostic> {
        errors.into_iter().map(|error| self.resolve(error)).collect()
    }
}

fn locate_path(index: &PositionIndex<'_>, path: &[PathSegment]) -> Location {
    if let Some(line) = index.get_line(path) {
        return Location::Exact(line);
    }
    if path.len() <= 1 {
        return Location::Approximate(index.top_level_line());
    }

    let ancestor = (1..path.len())
        .rev()
        .find_map(|depth| index.get_line(&path[..depth]));
    match ancestor {
        Some(line) => Location::Approximate(line),
        None => {
            trace!("no position for `{}`", render_path(path));
            Location::Unknown
        }
    }
}
