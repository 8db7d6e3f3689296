//! Findings produced by the checkers.
//!
//! Error codes follow a naming convention: E{category}{number}
//! - E01xx: Structural errors (missing or mistyped fields, malformed values)
//! - E02xx: Reference errors (identifiers that resolve to nothing)
//! - E03xx: Consistency errors (schema vs. DDL disagreements)
//! - E04xx: Infrastructure errors (files missing, unreadable or ambiguous)

use std::fmt;

use crate::document::{PathSegment, render_path};

/// Broad class of a finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Fatal to the downstream checks of the same document.
    Structural,
    Reference,
    Consistency,
    /// Only the affected source or entry is skipped.
    Infrastructure,
}

impl ErrorCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Structural => "structural",
            Self::Reference => "reference",
            Self::Consistency => "consistency",
            Self::Infrastructure => "infrastructure",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of a finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    // =========================================================================
    // E01xx: Structural errors
    // =========================================================================
    /// A required field is absent
    MissingField,
    /// A field holds a value of the wrong type
    InvalidType,
    /// A join condition is not `table.column = table.column`
    InvalidJoinCondition,
    /// A `table_info` entry has a blank table name
    EmptyTableName,
    /// The same column id is declared twice
    DuplicateColumnId,
    /// A column id is not an identifier
    InvalidColumnId,
    /// A source alias is not `schema.<name>` or `semantics.<name>`
    InvalidSourceAlias,

    // =========================================================================
    // E02xx: Reference errors
    // =========================================================================
    /// An include or bracketed expression token names nothing in scope
    InvalidReference,
    /// A column's `table` names a table absent from `table_info`
    TableReferenceMissing,
    /// An explicit source selector names an id the source does not declare
    UnknownSourceId,

    // =========================================================================
    // E03xx: Consistency errors
    // =========================================================================
    /// Schema table name differs from the DDL table name
    TableNameMismatch,
    /// A DDL column has no schema counterpart
    ColumnNotFoundInSchema,
    /// A schema column has no DDL counterpart
    ColumnExtraInSchema,
    /// Schema and DDL types are not equivalent
    TypeMismatch,
    /// Schema and DDL disagree on primary key membership
    PrimaryKeyMismatch,
    /// `fetch` is set on a numeric column
    InvalidFetchOnNumericColumn,

    // =========================================================================
    // E04xx: Infrastructure errors
    // =========================================================================
    /// A declared source file does not exist
    SourceNotFound,
    /// A key is repeated within one mapping
    DuplicateKeyInDocument,
    /// A source file exists but could not be loaded
    SourceUnreadable,
    /// A registered entity has neither a schema nor a semantic document
    RegistryEntryMissing,
    /// The document under validation could not be loaded
    DocumentUnreadable,
    /// The DDL file could not be read or parsed
    DdlUnreadable,
}

impl ErrorKind {
    /// Stable code, e.g. `E0201`.
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingField => "E0101",
            Self::InvalidType => "E0102",
            Self::InvalidJoinCondition => "E0103",
            Self::EmptyTableName => "E0104",
            Self::DuplicateColumnId => "E0105",
            Self::InvalidColumnId => "E0106",
            Self::InvalidSourceAlias => "E0107",
            Self::InvalidReference => "E0201",
            Self::TableReferenceMissing => "E0202",
            Self::UnknownSourceId => "E0203",
            Self::TableNameMismatch => "E0301",
            Self::ColumnNotFoundInSchema => "E0302",
            Self::ColumnExtraInSchema => "E0303",
            Self::TypeMismatch => "E0304",
            Self::PrimaryKeyMismatch => "E0305",
            Self::InvalidFetchOnNumericColumn => "E0306",
            Self::SourceNotFound => "E0401",
            Self::DuplicateKeyInDocument => "E0402",
            Self::SourceUnreadable => "E0403",
            Self::RegistryEntryMissing => "E0404",
            Self::DocumentUnreadable => "E0405",
            Self::DdlUnreadable => "E0406",
        }
    }

    /// snake_case name used in rendered diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            Self::MissingField => "missing_field",
            Self::InvalidType => "invalid_type",
            Self::InvalidJoinCondition => "invalid_join_condition",
            Self::EmptyTableName => "empty_table_name",
            Self::DuplicateColumnId => "duplicate_column_id",
            Self::InvalidColumnId => "invalid_column_id",
            Self::InvalidSourceAlias => "invalid_source_alias",
            Self::InvalidReference => "invalid_reference",
            Self::TableReferenceMissing => "table_reference_missing",
            Self::UnknownSourceId => "unknown_source_id",
            Self::TableNameMismatch => "table_name_mismatch",
            Self::ColumnNotFoundInSchema => "column_not_found_in_schema",
            Self::ColumnExtraInSchema => "column_extra_in_schema",
            Self::TypeMismatch => "type_mismatch",
            Self::PrimaryKeyMismatch => "primary_key_mismatch",
            Self::InvalidFetchOnNumericColumn => "invalid_fetch_on_numeric_column",
            Self::SourceNotFound => "source_not_found",
            Self::DuplicateKeyInDocument => "duplicate_key_in_document",
            Self::SourceUnreadable => "source_unreadable",
            Self::RegistryEntryMissing => "registry_entry_missing",
            Self::DocumentUnreadable => "document_unreadable",
            Self::DdlUnreadable => "ddl_unreadable",
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self.code().as_bytes()[2] {
            b'1' => ErrorCategory::Structural,
            b'2' => ErrorCategory::Reference,
            b'3' => ErrorCategory::Consistency,
            _ => ErrorCategory::Infrastructure,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One finding, addressed by a path into the entity body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub path: Vec<PathSegment>,
    pub kind: ErrorKind,
    pub message: String,
    /// Line already known at the point of detection (duplicate keys, load
    /// failures). Takes precedence over path resolution.
    pub line: Option<u32>,
}

impl ValidationError {
    pub fn new(path: Vec<PathSegment>, kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            path,
            kind,
            message: message.into(),
            line: None,
        }
    }

    pub fn with_line(mut self, line: u32) -> Self {
        self.line = Some(line);
        self
    }

    pub fn category(&self) -> ErrorCategory {
        self.kind.category()
    }

    pub fn is_structural(&self) -> bool {
        self.category() == ErrorCategory::Structural
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [{}]: {}",
            self.kind,
            render_path(&self.path),
            self.message
        )
    }
}

/// Accumulates findings for one validation call.
#[derive(Debug, Default)]
pub struct ErrorCollector {
    errors: Vec<ValidationError>,
}

impl ErrorCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    /// Record a finding at `path`.
    pub fn report(&mut self, path: Vec<PathSegment>, kind: ErrorKind, message: impl Into<String>) {
        self.push(ValidationError::new(path, kind, message));
    }

    pub fn extend(&mut self, errors: impl IntoIterator<Item = ValidationError>) {
        self.errors.extend(errors);
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    pub fn into_errors(self) -> Vec<ValidationError> {
        self.errors
    }

    /// Hand back `value` when nothing was collected, the findings otherwise.
    pub fn finish<T>(self, value: T) -> Result<T, Vec<ValidationError>> {
        if self.errors.is_empty() {
            Ok(value)
        } else {
            Err(self.errors)
        }
    }
}
