//! Domain constants shared across the validator.

/// Selector value that imports every identifier a source declares.
pub const WILDCARD: &str = "<all>";

/// Directory holding schema documents inside a registry root.
pub const SCHEMA_DIR: &str = "schema";

/// Directory holding `CREATE TABLE` files inside a registry root.
pub const DDL_DIR: &str = "ddl";

/// Directory holding semantic documents inside a registry root.
pub const SEMANTICS_DIR: &str = "semantics";

/// Document extensions, in lookup order.
pub const DOCUMENT_EXTENSIONS: &[&str] = &["yaml", "yml"];

/// Extension of DDL files.
pub const DDL_EXTENSION: &str = "sql";

/// Manifest file names looked up in a registry root, in order.
pub const MANIFEST_FILES: &[&str] = &["registry.yaml", "registry.yml"];
