//! Consistency checks between a schema document and its DDL.
//!
//! Schema columns are matched to DDL columns by physical column name. Every
//! disagreement is reported; nothing here stops the remaining checks.

use rustc_hash::FxHashMap;
use smol_str::SmolStr;

use super::error::{ErrorCollector, ErrorKind};
use super::model::{ColumnDef, SchemaDocument};
use super::types;
use crate::ddl::DdlTableMetadata;
use crate::path;

pub fn validate(schema: &SchemaDocument, ddl: &DdlTableMetadata, errors: &mut ErrorCollector) {
    if let Some(table) = schema.primary_table() {
        if table.name != ddl.table_name {
            errors.report(
                path!["table_info", 0usize, "table"],
                ErrorKind::TableNameMismatch,
                format!(
                    "Table name mismatch: {} not in DDL (DDL declares `{}`)",
                    table.name, ddl.table_name
                ),
            );
        }
    }

    let mut by_physical: FxHashMap<&str, Vec<(&SmolStr, &ColumnDef)>> = FxHashMap::default();
    for (id, column) in &schema.columns {
        by_physical
            .entry(column.physical_column.as_str())
            .or_default()
            .push((id, column));
    }

    for (id, column) in &schema.columns {
        if ddl.column(&column.physical_column).is_none() {
            errors.report(
                path!["columns", id],
                ErrorKind::ColumnExtraInSchema,
                format!(
                    "Schema column '{id}' (column '{}') not found in DDL.",
                    column.physical_column
                ),
            );
        }
    }

    for ddl_column in &ddl.columns {
        let name = ddl_column.name.as_str();
        let Some(matches) = by_physical.get(name) else {
            errors.report(
                path!["columns"],
                ErrorKind::ColumnNotFoundInSchema,
                format!("DDL column '{name}' not found in schema."),
            );
            continue;
        };

        // Several schema columns may share one physical column; check each.
        for &(id, column) in matches {
            if !types::equivalent(&ddl_column.data_type, &column.data_type) {
                errors.report(
                    path!["columns", id, "type"],
                    ErrorKind::TypeMismatch,
                    format!(
                        "Type mismatch for column '{name}': DDL type '{}', Schema type '{}'.",
                        ddl_column.data_type.to_ascii_uppercase(),
                        column.data_type.to_ascii_uppercase()
                    ),
                );
            }

            match (ddl.is_primary_key(name), column.is_primary_key()) {
                (true, false) => errors.report(
                    path!["columns", id, "primary_key"],
                    ErrorKind::PrimaryKeyMismatch,
                    format!("'{name}' not stated as primary key in Schema"),
                ),
                (false, true) => errors.report(
                    path!["columns", id, "primary_key"],
                    ErrorKind::PrimaryKeyMismatch,
                    format!("'{name}' stated as primary key in Schema which isn't a primary key"),
                ),
                _ => {}
            }

            if column.fetch == Some(true) && types::is_number(&column.data_type) {
                errors.report(
                    path!["columns", id, "fetch"],
                    ErrorKind::InvalidFetchOnNumericColumn,
                    format!(
                        "Invalid fetch value for '{name}': Column type is {}",
                        types::normalize(&column.data_type)
                    ),
                );
            }
        }
    }
}
