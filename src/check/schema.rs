//! Structural validation of table schema documents.
//!
//! Findings are accumulated in priority order: required fields and their
//! types, join condition syntax, blank table names, repeated column ids,
//! column id syntax, then column table references. Any finding means the
//! document is not handed to the DDL and cross-reference checks.

use std::sync::LazyLock;

use indexmap::IndexMap;
use regex::Regex;
use smol_str::SmolStr;

use super::error::{ErrorCollector, ErrorKind, ValidationError};
use super::fields::{Fields, expect_mapping};
use super::model::{ColumnDef, SchemaDocument, TableRef, TableRefs};
use crate::document::{Document, DuplicateKey, Mapping, Node, PathSegment, render_path};
use crate::path;

static JOIN_CONDITION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\w+\.\w+\s*=\s*\w+\.\w+$").expect("join condition pattern"));

static COLUMN_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("column id pattern"));

/// Path of the `columns` mapping, as recorded for duplicate keys.
const COLUMNS: &str = "columns";

/// Whether `condition` has the `table.column = table.column` shape.
pub fn is_valid_join_condition(condition: &str) -> bool {
    JOIN_CONDITION.is_match(condition)
}

pub fn is_valid_column_id(id: &str) -> bool {
    COLUMN_ID.is_match(id)
}

/// Validate a loaded schema document.
pub fn validate(document: &Document) -> Result<SchemaDocument, Vec<ValidationError>> {
    let mut errors = ErrorCollector::new();

    let Some(body) = expect_mapping(document.body(), &[], document.name(), &mut errors) else {
        report_duplicates(document, &mut errors);
        return Err(errors.into_errors());
    };

    let fields = Fields::new(body, Vec::new());
    let subject_area = fields.required_str("subject_area", &mut errors);
    let tables = read_tables(&fields, &mut errors);
    let column_map = fields.required_mapping(COLUMNS, &mut errors);
    let columns = column_map.map(|map| read_columns(map, &mut errors));

    if let Some(tables) = &tables {
        check_join_conditions(tables, &mut errors);
        check_table_names(tables, &mut errors);
    }
    report_duplicates(document, &mut errors);
    if let Some(map) = column_map {
        check_column_ids(map, &mut errors);
    }
    if let (Some(tables), Some(columns)) = (&tables, &columns) {
        check_table_references(tables, columns, &mut errors);
    }

    match (subject_area, tables, columns) {
        (Some(subject_area), Some(tables), Some(columns)) => {
            let tables = tables.into_iter().filter_map(RawTable::into_table_ref).collect();
            errors.finish(SchemaDocument {
                name: SmolStr::new(document.name()),
                subject_area,
                tables,
                columns,
            })
        }
        _ => Err(errors.into_errors()),
    }
}

/// A `table_info` entry as read, before the pattern checks.
struct RawTable {
    index: usize,
    name: Option<String>,
    /// Join conditions with their position in the `joins` sequence.
    joins: Vec<(usize, String)>,
    complete: bool,
}

impl RawTable {
    fn into_table_ref(self) -> Option<TableRef> {
        if !self.complete {
            return None;
        }
        Some(TableRef {
            name: self.name?,
            join_conditions: self.joins.into_iter().map(|(_, join)| join).collect(),
        })
    }
}

fn read_tables(fields: &Fields<'_>, errors: &mut ErrorCollector) -> Option<Vec<RawTable>> {
    let items = fields.required_sequence("table_info", errors)?;
    let tables = items
        .iter()
        .enumerate()
        .filter_map(|(index, item)| read_table(index, item, errors))
        .collect();
    Some(tables)
}

fn read_table(index: usize, node: &Node, errors: &mut ErrorCollector) -> Option<RawTable> {
    let path = path!["table_info", index];
    let mapping = expect_mapping(node, &path, &format!("table_info[{index}]"), errors)?;
    let fields = Fields::new(mapping, path);

    let name = fields.required_str("table", errors);
    let mut complete = name.is_some();
    let mut joins = Vec::new();
    match fields.required_sequence("joins", errors) {
        Some(items) => {
            for (position, item) in items.iter().enumerate() {
                match item.as_str() {
                    Some(join) => joins.push((position, join.to_string())),
                    None => {
                        complete = false;
                        errors.report(
                            path!["table_info", index, "joins", position],
                            ErrorKind::InvalidType,
                            format!(
                                "expected string for `joins[{position}]`, found {}",
                                item.type_name()
                            ),
                        );
                    }
                }
            }
        }
        None => complete = false,
    }

    Some(RawTable {
        index,
        name,
        joins,
        complete,
    })
}

fn read_columns(map: &Mapping, errors: &mut ErrorCollector) -> IndexMap<SmolStr, ColumnDef> {
    map.iter()
        .filter_map(|(id, entry)| {
            let column = read_column(id, &entry.value, errors)?;
            Some((id.clone(), column))
        })
        .collect()
}

fn read_column(id: &SmolStr, node: &Node, errors: &mut ErrorCollector) -> Option<ColumnDef> {
    let path = path![COLUMNS, id];
    let mapping = expect_mapping(node, &path, id, errors)?;
    let fields = Fields::new(mapping, path);

    let name = fields.required_str("name", errors);
    let data_type = fields.required_str("type", errors);
    let physical_column = fields.required_str("column", errors);
    let description = fields.required_str("desc", errors);
    let is_primary_key = fields.optional_bool("primary_key", errors);
    let is_foreign_key = fields.optional_bool("foreign_key", errors);
    let table_ref = read_table_ref(&fields, errors);
    let fetch = fields.optional_bool("fetch", errors);

    Some(ColumnDef {
        name: name?,
        data_type: data_type?,
        physical_column: physical_column?,
        description: description?,
        is_primary_key,
        is_foreign_key,
        table_ref: table_ref.ok()?,
        fetch,
    })
}

/// `Err` when the field is present but mistyped (already reported).
fn read_table_ref(fields: &Fields<'_>, errors: &mut ErrorCollector) -> Result<Option<TableRefs>, ()> {
    let Some(node) = fields.get("table") else {
        return Ok(None);
    };
    if let Some(name) = node.as_str() {
        return Ok(Some(TableRefs::One(name.to_string())));
    }
    if node.as_sequence().is_none() {
        errors.report(
            fields.path_of("table"),
            ErrorKind::InvalidType,
            format!(
                "expected string or sequence of strings for `table`, found {}",
                node.type_name()
            ),
        );
        return Err(());
    }
    let before = errors.len();
    let names = fields.string_list("table", errors);
    if errors.len() > before {
        return Err(());
    }
    Ok(Some(TableRefs::Many(names)))
}

fn check_join_conditions(tables: &[RawTable], errors: &mut ErrorCollector) {
    for table in tables {
        for (position, condition) in &table.joins {
            if !is_valid_join_condition(condition) {
                errors.report(
                    path!["table_info", table.index, "joins", *position],
                    ErrorKind::InvalidJoinCondition,
                    format!(
                        "Invalid join condition format: \"{condition}\". \
                         Expected format: \"table.column = table.column\""
                    ),
                );
            }
        }
    }
}

fn check_table_names(tables: &[RawTable], errors: &mut ErrorCollector) {
    for table in tables {
        if table.name.as_deref().is_some_and(|name| name.trim().is_empty()) {
            errors.report(
                path!["table_info", table.index, "table"],
                ErrorKind::EmptyTableName,
                "Empty table name in table_info",
            );
        }
    }
}

/// Repeated keys: column ids under `columns`, anything else generically.
fn report_duplicates(document: &Document, errors: &mut ErrorCollector) {
    let columns_path = [PathSegment::key(COLUMNS)];
    for duplicate in document.duplicates() {
        let in_columns = duplicate.container.as_deref() == Some(&columns_path[..]);
        if in_columns {
            errors.push(
                ValidationError::new(
                    path![COLUMNS, &duplicate.key],
                    ErrorKind::DuplicateColumnId,
                    format!(
                        "column id `{}` is declared more than once (first at line {})",
                        duplicate.key, duplicate.first_line
                    ),
                )
                .with_line(duplicate.line),
            );
        } else {
            errors.push(duplicate_key_error(document, duplicate));
        }
    }
}

/// Generic finding for a repeated key, pinned to the repeated occurrence.
pub(crate) fn duplicate_key_error(
    document: &Document,
    duplicate: &DuplicateKey,
) -> ValidationError {
    let path = match &duplicate.container {
        Some(container) => {
            let mut path = container.clone();
            path.push(PathSegment::Key(duplicate.key.clone()));
            path
        }
        None => Vec::new(),
    };
    let container = match &duplicate.container {
        Some(container) if !container.is_empty() => {
            format!("`{}`", render_path(container))
        }
        Some(_) => format!("`{}`", document.name()),
        None => "the document root".to_string(),
    };
    ValidationError::new(
        path,
        ErrorKind::DuplicateKeyInDocument,
        format!(
            "Duplicate key `{}` in {container} (first at line {})",
            duplicate.key, duplicate.first_line
        ),
    )
    .with_line(duplicate.line)
}

fn check_column_ids(map: &Mapping, errors: &mut ErrorCollector) {
    for id in map.keys() {
        if !is_valid_column_id(id) {
            errors.report(
                path![COLUMNS, id],
                ErrorKind::InvalidColumnId,
                format!("Column name: {id} not matching with the column name format"),
            );
        }
    }
}

fn check_table_references(
    tables: &[RawTable],
    columns: &IndexMap<SmolStr, ColumnDef>,
    errors: &mut ErrorCollector,
) {
    let declared: Vec<&str> = tables.iter().filter_map(|t| t.name.as_deref()).collect();
    for (id, column) in columns {
        let Some(table_ref) = &column.table_ref else {
            continue;
        };
        let many = matches!(table_ref, TableRefs::Many(_));
        for (position, name) in table_ref.names().into_iter().enumerate() {
            if declared.contains(&name) {
                continue;
            }
            let mut path = path![COLUMNS, id, "table"];
            if many {
                path.push(PathSegment::Index(position));
            }
            errors.report(
                path,
                ErrorKind::TableReferenceMissing,
                format!("Column `{id}` references table `{name}`, which is missing from table_info"),
            );
        }
    }
}
