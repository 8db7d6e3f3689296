//! Structural, reference and consistency checks.
//!
//! The checkers work on a loaded [`Document`](crate::document::Document) and
//! report [`ValidationError`]s addressed by a path into the entity body:
//!
//! - [`schema`] and [`semantic`] turn a document into a typed model or the
//!   list of structural findings that prevented it
//! - [`namespace`] gathers the identifiers a semantic document may reference
//!   (its own plus those imported from its sources)
//! - [`references`] checks includes and bracketed expression tokens against
//!   that namespace
//! - [`ddl`] compares a schema with its authoritative `CREATE TABLE`
//! - [`expression`] and [`types`] are the lexical helpers behind them
//!
//! Findings are accumulated through an explicit [`ErrorCollector`]; no
//! checker stops at the first problem.

pub mod ddl;
mod error;
pub mod expression;
mod fields;
mod model;
pub mod namespace;
pub mod references;
pub mod schema;
pub mod semantic;
pub mod types;

#[cfg(test)]
mod tests;

pub use error::{ErrorCategory, ErrorCollector, ErrorKind, ValidationError};
pub use model::{
    AttributeDef, ColumnDef, MetricDef, SchemaDocument, Selection, SemanticDocument, Source,
    SourceAlias, SourceKind, SourceSelector, TableRef, TableRefs,
};
pub use namespace::{ReferenceNamespace, SelectorPolicy};
