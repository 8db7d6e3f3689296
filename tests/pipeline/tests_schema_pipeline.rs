#![allow(clippy::unwrap_used, clippy::expect_used)]

use metacheck::ErrorKind;
use metacheck::project::{FileReport, check_schema};
use tempfile::TempDir;

use crate::helpers::fixtures::{MOVIES_DDL, MOVIES_SCHEMA};
use crate::helpers::registry_helpers::write_file;

fn run(schema: &str, ddl: Option<&str>) -> FileReport {
    let temp = TempDir::new().unwrap();
    let schema_path = write_file(temp.path(), "schema/movies.yaml", schema);
    let ddl_path = ddl.map(|ddl| write_file(temp.path(), "ddl/movies.sql", ddl));
    check_schema(&schema_path, ddl_path.as_deref())
}

fn kinds(report: &FileReport) -> Vec<ErrorKind> {
    report.diagnostics.iter().map(|d| d.kind()).collect()
}

#[test]
fn test_fixture_schema_matches_its_ddl() {
    let report = run(MOVIES_SCHEMA, Some(MOVIES_DDL));
    assert!(report.passed(), "{:?}", report.messages());
}

#[test]
fn test_schema_without_ddl_only_checks_structure() {
    let report = run(MOVIES_SCHEMA, None);
    assert!(report.passed());
}

#[test]
fn test_type_mismatch_is_pinned_to_the_type_key() {
    let ddl = MOVIES_DDL.replace("title VARCHAR(200)", "title DATE");
    let report = run(MOVIES_SCHEMA, Some(&ddl));
    assert_eq!(kinds(&report), vec![ErrorKind::TypeMismatch]);
    assert_eq!(
        report.messages(),
        vec![
            "type_mismatch [columns.title.type]: Type mismatch for column 'title': \
             DDL type 'DATE', Schema type 'VARCHAR'. at line 18"
        ]
    );
}

#[test]
fn test_missing_optional_key_resolves_near_its_column() {
    let schema = MOVIES_SCHEMA.replace("      primary_key: true\n", "");
    let report = run(&schema, Some(MOVIES_DDL));
    assert_eq!(kinds(&report), vec![ErrorKind::PrimaryKeyMismatch]);
    assert!(report.messages()[0].ends_with("at or near line 10"));
}

#[test]
fn test_structural_failure_skips_ddl_checks() {
    let schema = MOVIES_SCHEMA.replace("      desc: Movie title\n", "");
    let ddl = "CREATE TABLE other (x INT);";
    let report = run(&schema, Some(ddl));
    assert_eq!(kinds(&report), vec![ErrorKind::MissingField]);
    assert!(report.messages()[0].ends_with("at or near line 16"));
}

#[test]
fn test_duplicate_top_level_entity_key() {
    let schema = format!("{MOVIES_SCHEMA}movies:\n  subject_area: again\n");
    let report = run(&schema, None);
    assert_eq!(kinds(&report), vec![ErrorKind::DuplicateKeyInDocument]);
    assert!(report.messages()[0].ends_with("at line 28"));
}

#[test]
fn test_syntax_error_reports_document_unreadable() {
    let schema = MOVIES_SCHEMA.replace("      column: id\n", "      column: [id\n");
    let report = run(&schema, Some(MOVIES_DDL));
    assert_eq!(kinds(&report), vec![ErrorKind::DocumentUnreadable]);
    assert_eq!(report.diagnostics[0].line(), Some(13));
}

#[test]
fn test_missing_ddl_file_is_reported() {
    let temp = TempDir::new().unwrap();
    let schema_path = write_file(temp.path(), "schema/movies.yaml", MOVIES_SCHEMA);
    let report = check_schema(&schema_path, Some(&temp.path().join("ddl/movies.sql")));
    assert_eq!(kinds(&report), vec![ErrorKind::DdlUnreadable]);
    assert_eq!(report.diagnostics[0].line(), None);
    assert!(report.diagnostics[0].to_string().ends_with("(line unknown)"));
}
