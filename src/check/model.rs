//! Typed documents produced by the structural validators.

use std::fmt;

use indexmap::IndexMap;
use smol_str::SmolStr;

use crate::base::constants::{SCHEMA_DIR, SEMANTICS_DIR};

/// A table schema document.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaDocument {
    /// Entity name (the top-level key).
    pub name: SmolStr,
    pub subject_area: String,
    pub tables: Vec<TableRef>,
    pub columns: IndexMap<SmolStr, ColumnDef>,
}

impl SchemaDocument {
    /// The table the schema describes: the first `table_info` entry.
    pub fn primary_table(&self) -> Option<&TableRef> {
        self.tables.first()
    }
}

/// One `table_info` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRef {
    pub name: String,
    pub join_conditions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDef {
    pub name: String,
    pub data_type: String,
    /// Name of the column in the physical table.
    pub physical_column: String,
    pub description: String,
    pub is_primary_key: Option<bool>,
    pub is_foreign_key: Option<bool>,
    pub table_ref: Option<TableRefs>,
    pub fetch: Option<bool>,
}

impl ColumnDef {
    pub fn is_primary_key(&self) -> bool {
        self.is_primary_key.unwrap_or(false)
    }
}

/// Table reference of a column: a single name or a list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableRefs {
    One(String),
    Many(Vec<String>),
}

impl TableRefs {
    pub fn names(&self) -> Vec<&str> {
        match self {
            Self::One(name) => vec![name.as_str()],
            Self::Many(names) => names.iter().map(String::as_str).collect(),
        }
    }
}

/// A semantic-layer document.
#[derive(Debug, Clone, PartialEq)]
pub struct SemanticDocument {
    pub name: SmolStr,
    pub folder: String,
    pub kind: String,
    /// Key the sources were declared under (`source` or `sources`).
    pub sources_key: &'static str,
    pub sources: Vec<Source>,
    pub attributes: IndexMap<SmolStr, AttributeDef>,
    pub metrics: IndexMap<SmolStr, MetricDef>,
}

/// A declared source with what it imports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Source {
    pub alias: SourceAlias,
    pub selector: SourceSelector,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    Schema,
    Semantics,
}

impl SourceKind {
    /// Directory under the registry root holding documents of this kind.
    pub fn dir(&self) -> &'static str {
        match self {
            Self::Schema => SCHEMA_DIR,
            Self::Semantics => SEMANTICS_DIR,
        }
    }
}

/// `kind.name` reference to another document in the registry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SourceAlias {
    pub kind: SourceKind,
    pub name: SmolStr,
}

impl SourceAlias {
    /// Parse `schema.<name>` or `semantics.<name>`.
    pub fn parse(alias: &str) -> Option<Self> {
        let (kind, name) = alias.split_once('.')?;
        let kind = match kind {
            SCHEMA_DIR => SourceKind::Schema,
            SEMANTICS_DIR => SourceKind::Semantics,
            _ => return None,
        };
        let valid_name = !name.is_empty()
            && !name.contains(['/', '\\'])
            && name != ".."
            && !name.starts_with('.');
        valid_name.then(|| Self {
            kind,
            name: SmolStr::new(name),
        })
    }
}

impl fmt::Display for SourceAlias {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.kind.dir(), self.name)
    }
}

/// Which ids each section of a source contributes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceSelector {
    pub columns: Option<Selection>,
    pub attributes: Option<Selection>,
    pub metrics: Option<Selection>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// The `<all>` wildcard.
    All,
    Ids(Vec<SmolStr>),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributeDef {
    pub name: String,
    pub synonyms: Vec<String>,
    pub description: String,
    pub include: Vec<SmolStr>,
    pub output_consideration: Option<String>,
    pub relevant_attributes: Vec<String>,
    pub calculation: Option<String>,
    pub filter: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetricDef {
    pub name: String,
    pub synonyms: Vec<String>,
    pub description: Option<String>,
    pub calculation: Option<String>,
    pub granularity: Vec<String>,
    pub include: Vec<SmolStr>,
    pub function: Option<String>,
    pub filter: Vec<String>,
}
