//! # metacheck
//!
//! Validator for table schema documents and the semantic-layer documents
//! built on top of them, with diagnostics pinned to source lines.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! project     → Registry manifests, per-file pipelines, reports
//!   ↓
//! diagnostics → Path-to-line resolution of findings
//!   ↓
//! check       → Structural, reference and DDL consistency checks
//!   ↓
//! ddl         → Logos SQL tokenizer, CREATE TABLE reader
//! document    → Logos line lexer, position-tracking YAML reader
//!   ↓
//! base        → Layout conventions, constants, line index
//! ```
//!
//! ## Example
//!
//! ```
//! use metacheck::check::schema;
//! use metacheck::diagnostics::LocationResolver;
//! use metacheck::document;
//!
//! let text = "\
//! movies:
//!   subject_area: catalog
//!   table_info:
//!     - table: movies
//!       joins: []
//! ";
//! let doc = document::parse_str(text).unwrap();
//! let errors = schema::validate(&doc).unwrap_err();
//! let resolver = LocationResolver::new(&doc);
//! let rendered = resolver.resolve(errors[0].clone()).to_string();
//! assert_eq!(
//!     rendered,
//!     "missing_field [columns]: missing required field `columns` at or near line 1"
//! );
//! ```

// ============================================================================
// MODULES (dependency order: base → document/ddl → check → diagnostics → project)
// ============================================================================

/// Foundation: registry layout, constants, line index
pub mod base;

/// Position-aware document model
pub mod document;

/// `CREATE TABLE` reader
pub mod ddl;

/// Structural, reference and consistency checks
pub mod check;

/// Findings resolved to source lines
pub mod diagnostics;

/// Registry and single-file validation runs
pub mod project;

// Re-export the common entry points
pub use check::{ErrorCategory, ErrorKind, SelectorPolicy, ValidationError};
pub use diagnostics::{Diagnostic, Location, LocationResolver};
pub use document::{Document, LoadError, PathSegment};
pub use project::{CheckConfig, Report, check_registry, check_schema, check_semantics};
