//! Reference checks of a semantic document against its namespace.

use smol_str::SmolStr;

use super::error::{ErrorCollector, ErrorKind};
use super::expression;
use super::namespace::ReferenceNamespace;
use super::model::SemanticDocument;
use crate::path;

/// The reference-bearing fields of one attribute or metric.
struct Item<'a> {
    include: &'a [SmolStr],
    calculation: Option<&'a str>,
    filter: &'a [String],
}

/// Check every include entry, calculation token and filter token of every
/// attribute and metric. All findings are reported.
pub fn validate(
    semantic: &SemanticDocument,
    namespace: &ReferenceNamespace,
    errors: &mut ErrorCollector,
) {
    for (id, attribute) in &semantic.attributes {
        let item = Item {
            include: &attribute.include,
            calculation: attribute.calculation.as_deref(),
            filter: &attribute.filter,
        };
        check_item("attributes", id, &item, namespace, errors);
    }
    for (id, metric) in &semantic.metrics {
        let item = Item {
            include: &metric.include,
            calculation: metric.calculation.as_deref(),
            filter: &metric.filter,
        };
        check_item("metrics", id, &item, namespace, errors);
    }
}

fn check_item(
    section: &str,
    id: &SmolStr,
    item: &Item<'_>,
    namespace: &ReferenceNamespace,
    errors: &mut ErrorCollector,
) {
    for (index, reference) in item.include.iter().enumerate() {
        if !namespace.contains(reference) {
            errors.report(
                path![section, id, "include", index],
                ErrorKind::InvalidReference,
                message(reference, "include", id),
            );
        }
    }

    if let Some(calculation) = item.calculation {
        for token in expression::extract(calculation) {
            if !namespace.contains(token) {
                errors.report(
                    path![section, id, "calculation"],
                    ErrorKind::InvalidReference,
                    message(token, "calculation", id),
                );
            }
        }
    }

    for (index, filter) in item.filter.iter().enumerate() {
        for token in expression::extract(filter) {
            if !namespace.contains(token) {
                errors.report(
                    path![section, id, "filter", index],
                    ErrorKind::InvalidReference,
                    message(token, "filter", id),
                );
            }
        }
    }
}

fn message(reference: &str, context: &str, id: &str) -> String {
    format!("Incorrect reference '{reference}' in {context} of '{id}'. Not found in namespace.")
}
