//! Position-aware document model.
//!
//! Schema and semantic documents are YAML files with a single top-level key
//! naming the entity:
//!
//! ```yaml
//! movies:
//!   subject_area: catalog
//!   columns:
//!     id: { name: Movie id, type: INT, column: id, desc: Key }
//! ```
//!
//! Loading produces a [`Document`] holding the entity name, the line of that
//! key and the body node. Every node keeps its starting line so findings can
//! later be pinned to the source text, and repeated keys are reported as
//! [`DuplicateKey`]s instead of silently overwriting earlier values.

mod error;
mod index;
mod lexer;
mod node;
mod reader;


use std::path::Path;

use smol_str::SmolStr;

pub use error::LoadError;
pub use index::PositionIndex;
pub use node::{Entry, Mapping, Node, NodeValue, PathSegment, Scalar, render_path};

/// A key that appears more than once in the same mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateKey {
    /// Path of the mapping holding the key, relative to the entity body.
    /// `None` when the entity key itself is repeated at the top level.
    pub container: Option<Vec<PathSegment>>,
    pub key: SmolStr,
    /// Line of the occurrence that was kept.
    pub first_line: u32,
    /// Line of this later occurrence.
    pub line: u32,
}

/// A loaded entity document.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    name: SmolStr,
    name_line: u32,
    body: Node,
    duplicates: Vec<DuplicateKey>,
}

impl Document {
    /// Entity name: the single top-level key.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Line of the top-level key.
    pub fn name_line(&self) -> u32 {
        self.name_line
    }

    /// Value under the top-level key.
    pub fn body(&self) -> &Node {
        &self.body
    }

    pub fn duplicates(&self) -> &[DuplicateKey] {
        &self.duplicates
    }

    pub fn position_index(&self) -> PositionIndex<'_> {
        PositionIndex::new(self)
    }
}

/// Read and parse the document at `path`.
pub fn load(path: &Path) -> Result<Document, LoadError> {
    let text = std::fs::read_to_string(path).map_err(|err| LoadError::io(path, err))?;
    tracing::trace!("loaded {} ({} bytes)", path.display(), text.len());
    parse_str(&text)
}

/// Parse document text.
pub fn parse_str(text: &str) -> Result<Document, LoadError> {
    let output = reader::read(text)?;
    let root_line = output.root.line();
    let NodeValue::Mapping(root) = output.root.value() else {
        return Err(LoadError::NotAMapping { line: root_line });
    };

    let mut entries = root.iter();
    let Some((name, entry)) = entries.next() else {
        return Err(LoadError::Empty);
    };
    if let Some((second, other)) = entries.next() {
        return Err(LoadError::MultipleEntities {
            line: other.key_line,
            first: name.clone(),
            second: second.clone(),
        });
    }

    let duplicates = output
        .duplicates
        .into_iter()
        .map(|raw| DuplicateKey {
            // Raw paths start at the document root; drop the entity key.
            container: raw.path.split_first().map(|(_, rest)| rest.to_vec()),
            key: raw.key,
            first_line: raw.first_line,
            line: raw.line,
        })
        .collect();

    Ok(Document {
        name: name.clone(),
        name_line: entry.key_line,
        body: entry.value.clone(),
        duplicates,
    })
}
