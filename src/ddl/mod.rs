//! Reader for authoritative `CREATE TABLE` definitions.
//!
//! Only what the schema cross-check needs is extracted: the table name,
//! each column's name and declared type, and the primary key columns
//! (inline `PRIMARY KEY` or a table constraint). Other constraints and column
//! modifiers are skipped.
//!
//! ```
//! use metacheck::ddl::parse_ddl;
//!
//! let table = parse_ddl("CREATE TABLE movies (id INT PRIMARY KEY, title VARCHAR(200));").unwrap();
//! assert_eq!(table.table_name, "movies");
//! assert_eq!(table.columns[1].data_type, "VARCHAR(200)");
//! assert!(table.is_primary_key("id"));
//! ```

mod lexer;
mod parser;


use std::path::{Path, PathBuf};

use rustc_hash::FxHashSet;
use smol_str::SmolStr;
use thiserror::Error;

/// Errors raised while reading a DDL file.
#[derive(Debug, Error)]
pub enum DdlError {
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("DDL syntax error at line {line}: {message}")]
    Syntax { line: u32, message: String },

    #[error("no CREATE TABLE statement found")]
    NoCreateTable,
}

impl DdlError {
    pub fn line(&self) -> Option<u32> {
        match self {
            Self::Syntax { line, .. } => Some(*line),
            Self::Io { .. } | Self::NoCreateTable => None,
        }
    }
}

/// A column as declared in the DDL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSpec {
    pub name: SmolStr,
    /// Declared type including any size arguments, e.g. `DECIMAL(10,2)`.
    pub data_type: String,
    /// Line of the column definition in the DDL text.
    pub line: u32,
}

/// What a `CREATE TABLE` statement declares.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DdlTableMetadata {
    /// Schema qualifier, as in `CREATE TABLE sales.orders`.
    pub schema: Option<SmolStr>,
    pub table_name: SmolStr,
    pub columns: Vec<ColumnSpec>,
    pub primary_key_names: FxHashSet<SmolStr>,
}

impl DdlTableMetadata {
    pub fn is_primary_key(&self, column: &str) -> bool {
        self.primary_key_names.contains(column)
    }

    pub fn column(&self, name: &str) -> Option<&ColumnSpec> {
        self.columns.iter().find(|column| column.name == name)
    }
}

/// Read the first `CREATE TABLE` statement in `text`.
pub fn parse_ddl(text: &str) -> Result<DdlTableMetadata, DdlError> {
    parser::Parser::new(text).parse_first_table()
}

/// Read and parse the DDL file at `path`.
pub fn load_ddl(path: &Path) -> Result<DdlTableMetadata, DdlError> {
    let text = std::fs::read_to_string(path).map_err(|source| DdlError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_ddl(&text)
}
