#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::fs;
use std::path::Path;

use rstest::rstest;
use tempfile::TempDir;

use super::*;
use crate::check::ErrorKind;
use crate::diagnostics::Location;

const ORDERS: &str = "\
orders:
  subject_area: sales
  table_info:
    - table: orders
      joins: []
  columns:
    order_id:
      name: Order id
      type: INT
      column: order_id
      desc: Key
      primary_key: true
    amount:
      name: Amount
      type: DECIMAL
      column: amount
      desc: Amount
";

const ORDERS_DDL: &str = "CREATE TABLE orders (\n  order_id INT PRIMARY KEY,\n  amount DECIMAL(10,2)\n);\n";

const FINANCE: &str = "\
finance:
  folder: finance
  type: semantic
  source:
    schema.orders:
      columns: <all>
  attributes: {}
  metrics:
    revenue:
      name: Revenue
      calculation: SUM([amount])
";

fn write(root: &Path, relative: &str, text: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, text).unwrap();
}

fn registry(manifest: &str) -> TempDir {
    let temp = TempDir::new().unwrap();
    write(temp.path(), "schema/orders.yaml", ORDERS);
    write(temp.path(), "ddl/orders.sql", ORDERS_DDL);
    write(temp.path(), "semantics/finance.yaml", FINANCE);
    write(temp.path(), "registry.yaml", manifest);
    temp
}

#[rstest]
#[case("- orders\n- finance.yaml\n")]
#[case("registered_yml:\n  - orders.yml\n  - finance\n")]
fn test_manifest_forms(#[case] text: &str) {
    let manifest = Manifest::parse(text).unwrap();
    assert_eq!(manifest.entries, vec!["orders", "finance"]);
}

#[test]
fn test_manifest_with_wrong_shape_is_rejected() {
    assert!(Manifest::parse("entries: 3\n").is_err());
}

#[test]
fn test_manifest_falls_back_to_yml() {
    let temp = TempDir::new().unwrap();
    write(temp.path(), "registry.yml", "- orders\n");
    let config = CheckConfig::new(temp.path());
    assert_eq!(config.manifest_path(), Some(temp.path().join("registry.yml")));
}

#[test]
fn test_missing_manifest_is_a_run_error() {
    let temp = TempDir::new().unwrap();
    let err = check_registry(&CheckConfig::new(temp.path())).unwrap_err();
    assert!(matches!(err, RegistryError::ManifestNotFound { .. }));
}

#[test]
fn test_clean_registry_passes() {
    let temp = registry("- orders\n- finance\n");
    let report = check_registry(&CheckConfig::new(temp.path())).unwrap();
    assert!(report.passed(), "{:?}", report.records());
    assert_eq!(report.entries.len(), 2);
    assert_eq!(report.entries[0].files.len(), 1);
}

#[test]
fn test_missing_entry_is_reported_and_others_run() {
    let temp = registry("- ghost\n- orders\n");
    let report = check_registry(&CheckConfig::new(temp.path())).unwrap();
    assert!(!report.passed());
    let ghost = &report.entries[0];
    assert_eq!(ghost.diagnostics[0].kind(), ErrorKind::RegistryEntryMissing);
    assert_eq!(ghost.diagnostics[0].location, Location::Unknown);
    assert!(report.entries[1].passed());
}

#[test]
fn test_parallel_run_keeps_manifest_order() {
    let temp = registry("- finance\n- ghost\n- orders\n");
    let sequential = check_registry(&CheckConfig::new(temp.path())).unwrap();
    let parallel = check_registry(&CheckConfig::new(temp.path()).with_parallel(true)).unwrap();
    let names: Vec<&str> = parallel.entries.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["finance", "ghost", "orders"]);
    assert_eq!(sequential, parallel);
}

#[test]
fn test_ddl_disagreement_fails_the_entry() {
    let temp = registry("- orders\n");
    write(temp.path(), "ddl/orders.sql", "CREATE TABLE orders (order_id INT, amount DECIMAL);");
    let report = check_registry(&CheckConfig::new(temp.path())).unwrap();
    let file = &report.entries[0].files[0];
    assert_eq!(file.diagnostics.len(), 1);
    assert_eq!(file.diagnostics[0].kind(), ErrorKind::PrimaryKeyMismatch);
    assert_eq!(file.diagnostics[0].location, Location::Exact(12));
}

#[test]
fn test_unreadable_ddl_is_reported_with_schema_findings() {
    let temp = registry("- orders\n");
    write(temp.path(), "ddl/orders.sql", "DROP TABLE orders;");
    let file = check_schema(
        &temp.path().join("schema/orders.yaml"),
        Some(&temp.path().join("ddl/orders.sql")),
    );
    assert_eq!(file.diagnostics.len(), 1);
    assert_eq!(file.diagnostics[0].kind(), ErrorKind::DdlUnreadable);
    assert_eq!(file.diagnostics[0].location, Location::Unknown);
    assert!(file.diagnostics[0].to_string().ends_with("(line unknown)"));
}

#[test]
fn test_unreadable_document_keeps_its_line() {
    let temp = TempDir::new().unwrap();
    write(temp.path(), "schema/broken.yaml", "broken:\n  columns: [a, b\n");
    let file = check_schema(&temp.path().join("schema/broken.yaml"), None);
    assert_eq!(file.diagnostics[0].kind(), ErrorKind::DocumentUnreadable);
    assert_eq!(file.diagnostics[0].line(), Some(2));
}

#[test]
fn test_strict_policy_reaches_semantic_checks() {
    let temp = registry("- finance\n");
    write(
        temp.path(),
        "semantics/finance.yaml",
        &FINANCE.replace("columns: <all>", "columns: [amount, tax]"),
    );
    let lenient = check_registry(&CheckConfig::new(temp.path())).unwrap();
    assert!(lenient.passed());

    let config = CheckConfig::new(temp.path()).with_policy(SelectorPolicy::Strict);
    let strict = check_registry(&config).unwrap();
    let file = &strict.entries[0].files[0];
    assert_eq!(file.diagnostics[0].kind(), ErrorKind::UnknownSourceId);
    assert_eq!(file.diagnostics[0].location, Location::Exact(6));
}

#[test]
fn test_records_serialize_as_json() {
    let temp = registry("- ghost\n");
    let report = check_registry(&CheckConfig::new(temp.path())).unwrap();
    let records = report.records();
    assert_eq!(records.len(), 1);
    let json = serde_json::to_value(&records[0]).unwrap();
    assert_eq!(json["entity_name"], "ghost");
    assert_eq!(json["code"], ErrorKind::RegistryEntryMissing.code());
    assert!(json.get("file").is_none());
    assert!(json["message"].as_str().unwrap().ends_with("(line unknown)"));
}
