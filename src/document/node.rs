//! Position-carrying document tree.
//!
//! Every [`Node`] remembers the 1-based line it starts on, and every mapping
//! [`Entry`] remembers the line of its key. These are the only positions the
//! resolver needs.

use std::fmt;

use indexmap::IndexMap;
use smol_str::SmolStr;

/// One step of a path into a document: a mapping key or a sequence index.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    Key(SmolStr),
    Index(usize),
}

impl PathSegment {
    pub fn key(key: impl Into<SmolStr>) -> Self {
        Self::Key(key.into())
    }

    pub fn as_key(&self) -> Option<&str> {
        match self {
            Self::Key(key) => Some(key),
            Self::Index(_) => None,
        }
    }
}

impl From<&str> for PathSegment {
    fn from(key: &str) -> Self {
        Self::Key(SmolStr::new(key))
    }
}

impl From<&String> for PathSegment {
    fn from(key: &String) -> Self {
        Self::Key(SmolStr::new(key))
    }
}

impl From<String> for PathSegment {
    fn from(key: String) -> Self {
        Self::Key(SmolStr::new(key))
    }
}

impl From<SmolStr> for PathSegment {
    fn from(key: SmolStr) -> Self {
        Self::Key(key)
    }
}

impl From<&SmolStr> for PathSegment {
    fn from(key: &SmolStr) -> Self {
        Self::Key(key.clone())
    }
}

impl From<usize> for PathSegment {
    fn from(index: usize) -> Self {
        Self::Index(index)
    }
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Key(key) => write!(f, "{key}"),
            Self::Index(index) => write!(f, "[{index}]"),
        }
    }
}

/// Render a path as `columns.id.type` / `table_info[0].joins[1]`.
pub fn render_path(path: &[PathSegment]) -> String {
    let mut out = String::new();
    for segment in path {
        match segment {
            PathSegment::Key(key) => {
                if !out.is_empty() {
                    out.push('.');
                }
                out.push_str(key);
            }
            PathSegment::Index(index) => {
                out.push_str(&format!("[{index}]"));
            }
        }
    }
    out
}

/// Build a path from a heterogeneous list of keys and indices.
///
/// ```
/// use metacheck::path;
/// use metacheck::document::{PathSegment, render_path};
///
/// let p = path!["table_info", 0usize, "joins"];
/// assert_eq!(render_path(&p), "table_info[0].joins");
/// ```
#[macro_export]
macro_rules! path {
    ($($segment:expr),* $(,)?) => {
        vec![$($crate::document::PathSegment::from($segment)),*]
    };
}

/// A scalar value with its YAML type resolved.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Str(String),
    Bool(bool),
    Int(i64),
    Float(f64),
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeValue {
    Null,
    Scalar(Scalar),
    Sequence(Vec<Node>),
    Mapping(Mapping),
}

/// A value in the document tree together with the line it starts on.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    value: NodeValue,
    line: u32,
}

impl Node {
    pub fn new(value: NodeValue, line: u32) -> Self {
        Self { value, line }
    }

    pub fn null(line: u32) -> Self {
        Self::new(NodeValue::Null, line)
    }

    pub fn string(text: impl Into<String>, line: u32) -> Self {
        Self::new(NodeValue::Scalar(Scalar::Str(text.into())), line)
    }

    /// 1-based line the value starts on.
    pub fn line(&self) -> u32 {
        self.line
    }

    pub fn value(&self) -> &NodeValue {
        &self.value
    }

    pub fn is_null(&self) -> bool {
        matches!(self.value, NodeValue::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match &self.value {
            NodeValue::Scalar(Scalar::Str(text)) => Some(text),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match &self.value {
            NodeValue::Scalar(Scalar::Bool(flag)) => Some(*flag),
            _ => None,
        }
    }

    pub fn as_mapping(&self) -> Option<&Mapping> {
        match &self.value {
            NodeValue::Mapping(mapping) => Some(mapping),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[Node]> {
        match &self.value {
            NodeValue::Sequence(items) => Some(items),
            _ => None,
        }
    }

    /// Human-readable type name used in type errors.
    pub fn type_name(&self) -> &'static str {
        match &self.value {
            NodeValue::Null => "null",
            NodeValue::Scalar(Scalar::Str(_)) => "string",
            NodeValue::Scalar(Scalar::Bool(_)) => "boolean",
            NodeValue::Scalar(Scalar::Int(_)) => "integer",
            NodeValue::Scalar(Scalar::Float(_)) => "float",
            NodeValue::Sequence(_) => "sequence",
            NodeValue::Mapping(_) => "mapping",
        }
    }

    /// Child reached through `segment`, if this node is a matching container.
    pub fn child(&self, segment: &PathSegment) -> Option<&Node> {
        match (&self.value, segment) {
            (NodeValue::Mapping(mapping), PathSegment::Key(key)) => mapping.get(key),
            (NodeValue::Sequence(items), PathSegment::Index(index)) => items.get(*index),
            _ => None,
        }
    }

    /// Line of the child reached through `segment`.
    ///
    /// For mappings this is the line of the key, for sequences the line of
    /// the item. Scalars carry no child positions.
    pub fn child_line(&self, segment: &PathSegment) -> Option<u32> {
        match (&self.value, segment) {
            (NodeValue::Mapping(mapping), PathSegment::Key(key)) => mapping.key_line(key),
            (NodeValue::Sequence(items), PathSegment::Index(index)) => {
                items.get(*index).map(Node::line)
            }
            _ => None,
        }
    }
}

/// A mapping entry: the line of its key and its value.
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    pub key_line: u32,
    pub value: Node,
}

/// Insertion-ordered mapping. The first occurrence of a key wins.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Mapping {
    entries: IndexMap<SmolStr, Entry>,
}

impl Mapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an entry unless the key is already present.
    ///
    /// Returns the line of the earlier key when the key is a duplicate; the
    /// existing value is kept.
    pub(crate) fn insert(&mut self, key: SmolStr, key_line: u32, value: Node) -> Result<(), u32> {
        if let Some(existing) = self.entries.get(&key) {
            return Err(existing.key_line);
        }
        self.entries.insert(key, Entry { key_line, value });
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&Node> {
        self.entries.get(key).map(|entry| &entry.value)
    }

    pub fn entry(&self, key: &str) -> Option<&Entry> {
        self.entries.get(key)
    }

    pub fn key_line(&self, key: &str) -> Option<u32> {
        self.entries.get(key).map(|entry| entry.key_line)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &SmolStr> {
        self.entries.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&SmolStr, &Entry)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
