#![allow(clippy::unwrap_used, clippy::expect_used)]

use metacheck::project::{CheckConfig, RegistryError, check_registry};
use metacheck::{ErrorKind, SelectorPolicy};
use tempfile::TempDir;

use crate::helpers::registry_helpers::{movies_registry, write_file};

#[test]
fn test_fixture_registry_passes() {
    let temp = movies_registry();
    let report = check_registry(&CheckConfig::new(temp.path())).unwrap();
    assert!(report.passed(), "{:?}", report.records());
    let names: Vec<&str> = report.entries.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["movies", "movie_metrics"]);
}

#[test]
fn test_one_failing_entry_does_not_hide_others() {
    let temp = movies_registry();
    write_file(temp.path(), "registry.yaml", "- movies\n- missing\n- movie_metrics\n");
    write_file(
        temp.path(),
        "ddl/movies.sql",
        "CREATE TABLE movies (id INT PRIMARY KEY, title TEXT);",
    );
    let report = check_registry(&CheckConfig::new(temp.path()).with_parallel(true)).unwrap();

    let failed: Vec<&str> = report.failed_entries().map(|e| e.name.as_str()).collect();
    assert_eq!(failed, vec!["movies", "missing"]);

    let movies = &report.entries[0];
    assert_eq!(movies.files[0].diagnostics.len(), 1);
    assert_eq!(movies.files[0].diagnostics[0].kind(), ErrorKind::ColumnExtraInSchema);
    assert_eq!(
        report.entries[1].diagnostics[0].kind(),
        ErrorKind::RegistryEntryMissing
    );
}

#[test]
fn test_entry_with_both_documents_checks_both() {
    let temp = movies_registry();
    write_file(
        temp.path(),
        "semantics/movies.yml",
        "movies:\n  folder: f\n  type: t\n  attributes: {}\n  metrics:\n    m:\n      name: M\n      calculation: \"[nothing]\"\n",
    );
    let report = check_registry(&CheckConfig::new(temp.path())).unwrap();
    let movies = &report.entries[0];
    assert_eq!(movies.files.len(), 2);
    assert!(movies.files[0].passed());
    assert_eq!(movies.files[1].diagnostics[0].kind(), ErrorKind::InvalidReference);
    assert_eq!(movies.files[1].diagnostics[0].line(), Some(8));
}

#[test]
fn test_manifest_override() {
    let temp = movies_registry();
    let manifest = write_file(temp.path(), "only.yaml", "- movie_metrics\n");
    let config = CheckConfig::new(temp.path())
        .with_manifest(manifest)
        .with_policy(SelectorPolicy::Strict);
    let report = check_registry(&config).unwrap();
    assert_eq!(report.entries.len(), 1);
    assert!(report.passed());
}

#[test]
fn test_malformed_manifest_is_a_run_error() {
    let temp = TempDir::new().unwrap();
    write_file(temp.path(), "registry.yaml", "registered_yml: movies\n");
    let err = check_registry(&CheckConfig::new(temp.path())).unwrap_err();
    assert!(matches!(err, RegistryError::Parse { .. }));
    assert!(err.to_string().contains("registry.yaml"));
}
