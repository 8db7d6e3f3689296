use std::fs;
use std::path::Path;

use tempfile::TempDir;

use super::*;
use crate::path;

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
    amount:
      name: Amount
      type: DECIMAL
      column: amount
      desc: Amount
    status:
      name: Status
      type: VARCHAR
      column: status
      desc: Status
";

const CUSTOMERS: &str = "\
customers:
  folder: crm
  type: semantic
  attributes:
    customer_name:
      name: Customer name
      description: Name
    region:
      name: Region
      description: Region
  metrics:
    lifetime_value:
      name: Lifetime value
      calculation: SUM([amount])
";

fn registry() -> TempDir {
    let temp = TempDir::new().unwrap();
    fs::create_dir_all(temp.path().join("schema")).unwrap();
    fs::create_dir_all(temp.path().join("semantics")).unwrap();
    fs::write(temp.path().join("schema/orders.yaml"), ORDERS).unwrap();
    fs::write(temp.path().join("semantics/customers.yml"), CUSTOMERS).unwrap();
    temp
}

fn semantic_with_sources(sources: &str) -> SemanticDocument {
    let text = format!(
        "finance:
  folder: finance
  type: semantic
  source:
{sources}  attributes:
    segment:
      name: Segment
      description: Segment
  metrics:
    revenue:
      name: Revenue
"
    );
    semantic::validate(&doc(&text)).unwrap()
}

fn build(
    sources: &str,
    root: &Path,
    policy: SelectorPolicy,
) -> (ReferenceNamespace, Vec<ValidationError>) {
    let semantic = semantic_with_sources(sources);
    let mut errors = ErrorCollector::new();
    let namespace = namespace::build(&semantic, root, policy, &mut errors);
    (namespace, errors.into_errors())
}

fn sorted(namespace: &ReferenceNamespace) -> Vec<&str> {
    let mut ids: Vec<&str> = namespace.iter().map(|id| id.as_str()).collect();
    ids.sort_unstable();
    ids
}

#[test]
fn test_wildcard_imports_every_column() {
    let temp = registry();
    let (namespace, errors) = build(
        "    schema.orders:\n      columns: <all>\n",
        temp.path(),
        SelectorPolicy::Lenient,
    );
    assert!(errors.is_empty(), "{errors:?}");
    assert_eq!(
        sorted(&namespace),
        vec!["amount", "order_id", "revenue", "segment", "status"]
    );
}

#[test]
fn test_explicit_list_imports_only_named_ids() {
    let temp = registry();
    let (namespace, errors) = build(
        "    schema.orders:\n      columns: [amount]\n",
        temp.path(),
        SelectorPolicy::Lenient,
    );
    assert!(errors.is_empty());
    assert!(namespace.contains("amount"));
    assert!(!namespace.contains("status"));
}

#[test]
fn test_unknown_selector_id_is_dropped_when_lenient() {
    let temp = registry();
    let (namespace, errors) = build(
        "    schema.orders:\n      columns: [amount, discount]\n",
        temp.path(),
        SelectorPolicy::Lenient,
    );
    assert!(errors.is_empty());
    assert!(namespace.contains("amount"));
    assert!(!namespace.contains("discount"));
}

#[test]
fn test_unknown_selector_id_is_reported_when_strict() {
    let temp = registry();
    let (namespace, errors) = build(
        "    schema.orders:\n      columns: [amount, discount]\n",
        temp.path(),
        SelectorPolicy::Strict,
    );
    assert_eq!(kinds(&errors), vec![ErrorKind::UnknownSourceId]);
    assert_eq!(
        errors[0].path,
        path!["source", "schema.orders", "columns", 1usize]
    );
    assert!(!namespace.contains("discount"));
}

#[test]
fn test_semantics_sections_are_selected_independently() {
    let temp = registry();
    let (namespace, errors) = build(
        "    semantics.customers:\n      attributes: [region]\n      metrics: <all>\n",
        temp.path(),
        SelectorPolicy::Lenient,
    );
    assert!(errors.is_empty());
    assert!(namespace.contains("region"));
    assert!(namespace.contains("lifetime_value"));
    assert!(!namespace.contains("customer_name"));
}

#[test]
fn test_columns_selector_on_semantics_source_imports_nothing() {
    let temp = registry();
    let (namespace, _) = build(
        "    semantics.customers:\n      columns: <all>\n",
        temp.path(),
        SelectorPolicy::Lenient,
    );
    assert_eq!(sorted(&namespace), vec!["revenue", "segment"]);
}

#[test]
fn test_missing_source_does_not_stop_other_imports() {
    let temp = registry();
    let (namespace, errors) = build(
        "    schema.shipments:\n      columns: <all>\n    schema.orders:\n      columns: [status]\n",
        temp.path(),
        SelectorPolicy::Lenient,
    );
    assert_eq!(kinds(&errors), vec![ErrorKind::SourceNotFound]);
    assert_eq!(errors[0].path, path!["source", "schema.shipments"]);
    assert!(namespace.contains("status"));
}

#[test]
fn test_unreadable_source_is_reported() {
    let temp = registry();
    fs::write(temp.path().join("schema/broken.yaml"), "broken:\n  a: [1, 2\n").unwrap();
    let (namespace, errors) = build(
        "    schema.broken:\n      columns: <all>\n",
        temp.path(),
        SelectorPolicy::Lenient,
    );
    assert_eq!(kinds(&errors), vec![ErrorKind::SourceUnreadable]);
    assert_eq!(errors[0].category(), ErrorCategory::Infrastructure);
    assert_eq!(namespace.len(), 2);
}

#[test]
fn test_own_ids_are_always_present() {
    let temp = TempDir::new().unwrap();
    let (namespace, errors) = build("", temp.path(), SelectorPolicy::Strict);
    assert!(errors.is_empty());
    assert_eq!(sorted(&namespace), vec!["revenue", "segment"]);
}
