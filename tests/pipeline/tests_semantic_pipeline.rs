#![allow(clippy::unwrap_used, clippy::expect_used)]

use metacheck::project::{FileReport, check_semantics};
use metacheck::{ErrorKind, Location, SelectorPolicy};
use tempfile::TempDir;

use crate::helpers::fixtures::MOVIE_METRICS;
use crate::helpers::registry_helpers::{movies_registry, write_file};

fn run(temp: &TempDir, text: &str, policy: SelectorPolicy) -> FileReport {
    let path = write_file(temp.path(), "semantics/movie_metrics.yaml", text);
    check_semantics(&path, temp.path(), policy)
}

fn kinds(report: &FileReport) -> Vec<ErrorKind> {
    report.diagnostics.iter().map(|d| d.kind()).collect()
}

#[test]
fn test_fixture_semantics_resolve_against_registry() {
    let temp = movies_registry();
    let report = run(&temp, MOVIE_METRICS, SelectorPolicy::Lenient);
    assert!(report.passed(), "{:?}", report.messages());
}

#[test]
fn test_unknown_include_is_pinned_to_its_item() {
    let temp = movies_registry();
    let text = MOVIE_METRICS.replace("include: [title]", "include: [title, budget]");
    let report = run(&temp, &text, SelectorPolicy::Lenient);
    assert_eq!(kinds(&report), vec![ErrorKind::InvalidReference]);
    assert_eq!(report.diagnostics[0].location, Location::Exact(12));
    assert!(report.messages()[0].contains("'budget' in include of 'film_title'"));
}

#[test]
fn test_calculation_token_is_pinned_to_the_calculation_key() {
    let temp = movies_registry();
    let text = MOVIE_METRICS.replace("AVG([rating])", "AVG([score])");
    let report = run(&temp, &text, SelectorPolicy::Lenient);
    assert_eq!(kinds(&report), vec![ErrorKind::InvalidReference]);
    assert_eq!(report.diagnostics[0].location, Location::Exact(16));
}

#[test]
fn test_missing_source_still_checks_references() {
    let temp = movies_registry();
    let text = MOVIE_METRICS.replace("schema.movies:", "schema.films:");
    let report = run(&temp, &text, SelectorPolicy::Lenient);
    let kinds = kinds(&report);
    assert_eq!(kinds[0], ErrorKind::SourceNotFound);
    assert_eq!(report.diagnostics[0].location, Location::Exact(5));
    // title and rating are no longer imported
    assert_eq!(
        kinds.iter().filter(|k| **k == ErrorKind::InvalidReference).count(),
        3
    );
}

#[test]
fn test_narrowed_selector_hides_columns() {
    let temp = movies_registry();
    let text = MOVIE_METRICS.replace("columns: <all>", "columns: [title]");
    let report = run(&temp, &text, SelectorPolicy::Lenient);
    assert_eq!(
        kinds(&report),
        vec![ErrorKind::InvalidReference, ErrorKind::InvalidReference]
    );
}

#[test]
fn test_strict_policy_reports_undeclared_selector_id() {
    let temp = movies_registry();
    let text = MOVIE_METRICS.replace("columns: <all>", "columns: [title, rating, budget]");
    let lenient = run(&temp, &text, SelectorPolicy::Lenient);
    assert!(lenient.passed());

    let strict = run(&temp, &text, SelectorPolicy::Strict);
    assert_eq!(kinds(&strict), vec![ErrorKind::UnknownSourceId]);
    assert_eq!(strict.diagnostics[0].location, Location::Exact(6));
}

#[test]
fn test_semantic_source_imports_attributes_and_metrics() {
    let temp = movies_registry();
    let text = "\
dashboard:
  folder: catalog
  type: semantic
  sources:
    semantics.movie_metrics:
      attributes: <all>
      metrics: [average_rating]
  attributes: {}
  metrics:
    headline:
      name: Headline
      calculation: \"[average_rating] by [film_title]\"
      filter:
        - \"[rating_spread] > 1\"
";
    let path = write_file(temp.path(), "semantics/dashboard.yaml", text);
    let report = check_semantics(&path, temp.path(), SelectorPolicy::Lenient);
    assert_eq!(kinds(&report), vec![ErrorKind::InvalidReference]);
    assert_eq!(report.diagnostics[0].location, Location::Exact(14));
    assert!(report.messages()[0].contains("'rating_spread' in filter of 'headline'"));
}
