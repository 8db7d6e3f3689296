//! Structural validation of semantic-layer documents.

use indexmap::IndexMap;
use smol_str::SmolStr;

use super::error::{ErrorCollector, ErrorKind, ValidationError};
use super::fields::{Fields, expect_mapping};
use super::model::{
    AttributeDef, MetricDef, Selection, SemanticDocument, Source, SourceAlias, SourceSelector,
};
use super::schema::duplicate_key_error;
use crate::base::constants::WILDCARD;
use crate::document::{Document, Mapping, Node};
use crate::path;

/// Accepted spellings of the sources section, preferred first.
const SOURCE_KEYS: [&str; 2] = ["source", "sources"];

/// Accepted spellings of the synonyms field, preferred first.
const SYNONYM_KEYS: [&str; 2] = ["synonym", "synonyms"];

/// Validate a loaded semantic document.
pub fn validate(document: &Document) -> Result<SemanticDocument, Vec<ValidationError>> {
    let mut errors = ErrorCollector::new();

    let body = expect_mapping(document.body(), &[], document.name(), &mut errors);
    let model = body.and_then(|body| read_document(document, body, &mut errors));
    for duplicate in document.duplicates() {
        errors.push(duplicate_key_error(document, duplicate));
    }

    match model {
        Some(model) => errors.finish(model),
        None => Err(errors.into_errors()),
    }
}

fn read_document(
    document: &Document,
    body: &Mapping,
    errors: &mut ErrorCollector,
) -> Option<SemanticDocument> {
    let fields = Fields::new(body, Vec::new());
    let folder = fields.required_str("folder", errors);
    let kind = fields.required_str("type", errors);
    let sources_key = SOURCE_KEYS
        .into_iter()
        .find(|key| body.contains_key(key))
        .unwrap_or(SOURCE_KEYS[0]);
    let sources = read_sources(&fields, sources_key, errors);
    let attributes = fields
        .required_mapping("attributes", errors)
        .map(|map| read_section(map, "attributes", read_attribute, errors));
    let metrics = fields
        .required_mapping("metrics", errors)
        .map(|map| read_section(map, "metrics", read_metric, errors));

    Some(SemanticDocument {
        name: SmolStr::new(document.name()),
        folder: folder?,
        kind: kind?,
        sources_key,
        sources,
        attributes: attributes?,
        metrics: metrics?,
    })
}

fn read_section<T>(
    map: &Mapping,
    section: &str,
    read: fn(&str, &SmolStr, &Node, &mut ErrorCollector) -> Option<T>,
    errors: &mut ErrorCollector,
) -> IndexMap<SmolStr, T> {
    map.iter()
        .filter_map(|(id, entry)| Some((id.clone(), read(section, id, &entry.value, errors)?)))
        .collect()
}

fn read_sources(fields: &Fields<'_>, key: &'static str, errors: &mut ErrorCollector) -> Vec<Source> {
    let Some(map) = fields.optional_mapping(key, errors) else {
        return Vec::new();
    };

    let mut sources = Vec::new();
    for (alias, entry) in map.iter() {
        let Some(parsed) = SourceAlias::parse(alias) else {
            errors.report(
                path![key, alias],
                ErrorKind::InvalidSourceAlias,
                format!("source alias `{alias}` must be `schema.<name>` or `semantics.<name>`"),
            );
            continue;
        };
        if let Some(selector) = read_selector(key, alias, &entry.value, errors) {
            sources.push(Source {
                alias: parsed,
                selector,
            });
        }
    }
    sources
}

fn read_selector(
    key: &str,
    alias: &SmolStr,
    node: &Node,
    errors: &mut ErrorCollector,
) -> Option<SourceSelector> {
    if node.is_null() {
        return Some(SourceSelector::default());
    }
    let mapping = expect_mapping(node, &path![key, alias], alias, errors)?;
    let fields = Fields::new(mapping, path![key, alias]);
    Some(SourceSelector {
        columns: read_selection(&fields, "columns", errors),
        attributes: read_selection(&fields, "attributes", errors),
        metrics: read_selection(&fields, "metrics", errors),
    })
}

fn read_selection(fields: &Fields<'_>, key: &str, errors: &mut ErrorCollector) -> Option<Selection> {
    let node = fields.get(key)?;
    if node.as_str() == Some(WILDCARD) {
        return Some(Selection::All);
    }
    if node.as_sequence().is_some() {
        return Some(Selection::Ids(fields.id_list(key, errors)));
    }
    let found = match node.as_str() {
        Some(text) => format!("string `{text}`"),
        None => node.type_name().to_string(),
    };
    errors.report(
        fields.path_of(key),
        ErrorKind::InvalidType,
        format!("expected `{WILDCARD}` or a sequence of ids for `{key}`, found {found}"),
    );
    None
}

fn synonyms(fields: &Fields<'_>, errors: &mut ErrorCollector) -> Vec<String> {
    SYNONYM_KEYS
        .into_iter()
        .find(|key| fields.get(key).is_some())
        .map(|key| fields.string_list(key, errors))
        .unwrap_or_default()
}

fn read_attribute(
    section: &str,
    id: &SmolStr,
    node: &Node,
    errors: &mut ErrorCollector,
) -> Option<AttributeDef> {
    let path = path![section, id];
    let mapping = expect_mapping(node, &path, id, errors)?;
    let fields = Fields::new(mapping, path);

    let name = fields.required_str("name", errors);
    let synonyms = synonyms(&fields, errors);
    let description = fields.required_str("description", errors);
    let include = fields.id_list("include", errors);
    let output_consideration = fields.optional_str("output_consideration", errors);
    let relevant_attributes = fields.string_list("relevant_attributes", errors);
    let calculation = fields.optional_str("calculation", errors);
    let filter = fields.string_list("filter", errors);

    Some(AttributeDef {
        name: name?,
        synonyms,
        description: description?,
        include,
        output_consideration,
        relevant_attributes,
        calculation,
        filter,
    })
}

fn read_metric(
    section: &str,
    id: &SmolStr,
    node: &Node,
    errors: &mut ErrorCollector,
) -> Option<MetricDef> {
    let path = path![section, id];
    let mapping = expect_mapping(node, &path, id, errors)?;
    let fields = Fields::new(mapping, path);

    let name = fields.required_str("name", errors);
    let synonyms = synonyms(&fields, errors);
    let description = fields.optional_str("description", errors);
    let calculation = fields.optional_str("calculation", errors);
    let granularity = fields.string_list("granularity", errors);
    let include = fields.id_list("include", errors);
    let function = fields.optional_str("function", errors);
    let filter = fields.string_list("filter", errors);

    Some(MetricDef {
        name: name?,
        synonyms,
        description,
        calculation,
        granularity,
        include,
        function,
        filter,
    })
}
