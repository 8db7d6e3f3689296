//! Path-to-line lookups over a loaded [`Document`].

use super::Document;
use super::node::{Node, PathSegment};

/// Line lookups for paths into a document body.
///
/// Paths are relative to the entity body, so `["columns", "id"]` addresses
/// the `id` entry under `columns`. Only paths that run through live
/// containers have a position; anything past a scalar, a missing key or an
/// out-of-range index is unknown.
#[derive(Debug, Clone, Copy)]
pub struct PositionIndex<'a> {
    document: &'a Document,
}

impl<'a> PositionIndex<'a> {
    pub fn new(document: &'a Document) -> Self {
        Self { document }
    }

    /// Line of the key or item addressed by `path`.
    ///
    /// The empty path addresses the entity itself and yields the line of the
    /// top-level key.
    pub fn get_line(&self, path: &[PathSegment]) -> Option<u32> {
        let Some((last, parents)) = path.split_last() else {
            return Some(self.document.name_line());
        };
        self.container(parents)?.child_line(last)
    }

    /// Node addressed by `path`, when every step exists.
    pub fn container(&self, path: &[PathSegment]) -> Option<&'a Node> {
        path.iter()
            .try_fold(self.document.body(), |node, segment| node.child(segment))
    }

    /// Line of the entity key, used when nothing more precise is known.
    pub fn top_level_line(&self) -> u32 {
        self.document.name_line()
    }
}
