//! Behavioural guarantees of the validator as a whole.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use metacheck::check::{ErrorCollector, ReferenceNamespace, references, schema, semantic, types};
use metacheck::ddl::parse_ddl;
use metacheck::document::parse_str;
use metacheck::project::{schema_findings, semantics_findings};
use metacheck::{ErrorKind, Location, LocationResolver, SelectorPolicy};
use rstest::rstest;
use tempfile::TempDir;

use crate::helpers::fixtures::MOVIES_SCHEMA;

const TYPES: &[&str] = &[
    "DECIMAL", "FLOAT", "NUMBER", "DOUBLE", "NUMERIC", "INT", "INTEGER", "BIGINT", "SMALLINT",
    "VARCHAR", "TEXT", "STRING", "CHAR", "DATE", "DATETIME", "TIMESTAMP",
];

#[test]
fn test_duplicate_column_id_yields_one_located_error() {
    let text = MOVIES_SCHEMA.replace(
        "    rating:\n",
        "    title:\n      name: T\n      type: TEXT\n      column: t2\n      desc: d\n    rating:\n",
    );
    let document = parse_str(&text).unwrap();
    let errors = schema::validate(&document).unwrap_err();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].kind, ErrorKind::DuplicateColumnId);

    let diagnostic = LocationResolver::new(&document).resolve(errors[0].clone());
    assert_eq!(diagnostic.location, Location::Exact(22));
}

#[rstest]
#[case("movies.id == ratings.movie_id", false)]
#[case("movies.id = ratings.movie_id", true)]
fn test_join_operator(#[case] condition: &str, #[case] accepted: bool) {
    let text = MOVIES_SCHEMA.replace("movies.id = ratings.movie_id", condition);
    let result = schema::validate(&parse_str(&text).unwrap());
    assert_eq!(result.is_ok(), accepted);
    if let Err(errors) = result {
        assert_eq!(errors[0].kind, ErrorKind::InvalidJoinCondition);
    }
}

#[test]
fn test_undeclared_table_reference_is_one_error() {
    let text = MOVIES_SCHEMA.replace("      table: ratings\n", "      table: reviews\n");
    let errors = schema::validate(&parse_str(&text).unwrap()).unwrap_err();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].kind, ErrorKind::TableReferenceMissing);
}

#[test]
fn test_type_equivalence_is_symmetric() {
    for a in TYPES {
        for b in TYPES {
            assert_eq!(types::equivalent(a, b), types::equivalent(b, a), "{a} / {b}");
        }
    }
}

#[test]
fn test_ddl_disagreement_is_exactly_type_and_primary_key() {
    let text = "\
people:
  subject_area: hr
  table_info:
    - table: people
      joins: []
  columns:
    id:
      name: Id
      type: VARCHAR
      column: id
      desc: Id
    name:
      name: Name
      type: VARCHAR
      column: name
      desc: Name
";
    let document = parse_str(text).unwrap();
    let ddl = parse_ddl("CREATE TABLE people (id INT PRIMARY KEY, name VARCHAR);").unwrap();
    let errors = schema_findings(&document, Some(&ddl));
    let kinds: Vec<_> = errors.iter().map(|e| e.kind).collect();
    assert_eq!(kinds, vec![ErrorKind::TypeMismatch, ErrorKind::PrimaryKeyMismatch]);
    assert!(errors.iter().all(|e| e.path[1].as_key() == Some("id")));
}

#[test]
fn test_expression_with_one_unknown_token() {
    let text = "\
finance:
  folder: f
  type: semantic
  attributes: {}
  metrics:
    revenue:
      name: Revenue
    margin:
      name: Margin
      calculation: \"[revenue] - [cost]\"
";
    let model = semantic::validate(&parse_str(text).unwrap()).unwrap();
    let namespace: ReferenceNamespace = ["revenue", "margin"].into_iter().collect();
    let mut errors = ErrorCollector::new();
    references::validate(&model, &namespace, &mut errors);
    let errors = errors.into_errors();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].kind, ErrorKind::InvalidReference);
    assert!(errors[0].message.contains("'cost'"));
}

#[test]
fn test_missing_columns_falls_back_to_entity_line() {
    let text = "\n\nmovies:\n  subject_area: catalog\n  table_info:\n    - table: movies\n      joins: []\n";
    let document = parse_str(text).unwrap();
    let errors = schema_findings(&document, None);
    let diagnostics = LocationResolver::new(&document).resolve_all(errors);
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].kind(), ErrorKind::MissingField);
    assert_eq!(diagnostics[0].location, Location::Approximate(3));
}

#[test]
fn test_repeated_runs_are_identical() {
    let temp = TempDir::new().unwrap();
    let text = MOVIES_SCHEMA
        .replace("table: ratings\n      joins: []", "table: \"\"\n      joins: []")
        .replace("type: INT", "type: 5");
    let document = parse_str(&text).unwrap();
    let render = || -> Vec<String> {
        let resolver = LocationResolver::new(&document);
        resolver
            .resolve_all(schema_findings(&document, None))
            .iter()
            .map(ToString::to_string)
            .collect()
    };
    let first = render();
    assert!(!first.is_empty());
    assert_eq!(first, render());

    let semantics = parse_str("m:\n  folder: f\n  type: t\n  attributes: {}\n  metrics: {}\n").unwrap();
    let once = semantics_findings(&semantics, temp.path(), SelectorPolicy::Strict);
    let twice = semantics_findings(&semantics, temp.path(), SelectorPolicy::Strict);
    assert_eq!(once, twice);
}
