//! Typed field access over document mappings, reporting missing and
//! mistyped fields as they are read.

use smol_str::SmolStr;

use super::error::{ErrorCollector, ErrorKind};
use crate::document::{Mapping, Node, PathSegment};

/// Require `node` to be a mapping, reporting `InvalidType` at `path` if not.
pub(crate) fn expect_mapping<'a>(
    node: &'a Node,
    path: &[PathSegment],
    what: &str,
    errors: &mut ErrorCollector,
) -> Option<&'a Mapping> {
    let mapping = node.as_mapping();
    if mapping.is_none() {
        errors.report(
            path.to_vec(),
            ErrorKind::InvalidType,
            format!("expected mapping for `{what}`, found {}", node.type_name()),
        );
    }
    mapping
}

/// Fields of one mapping located at `path`.
pub(crate) struct Fields<'a> {
    mapping: &'a Mapping,
    path: Vec<PathSegment>,
}

impl<'a> Fields<'a> {
    pub fn new(mapping: &'a Mapping, path: Vec<PathSegment>) -> Self {
        Self { mapping, path }
    }

    /// Path of the field `key`.
    pub fn path_of(&self, key: &str) -> Vec<PathSegment> {
        let mut path = self.path.clone();
        path.push(PathSegment::key(key));
        path
    }

    /// Value of `key` unless absent or null.
    pub fn get(&self, key: &str) -> Option<&'a Node> {
        self.mapping.get(key).filter(|node| !node.is_null())
    }

    pub fn required(&self, key: &str, errors: &mut ErrorCollector) -> Option<&'a Node> {
        let node = self.mapping.get(key);
        if node.is_none() {
            errors.report(
                self.path_of(key),
                ErrorKind::MissingField,
                format!("missing required field `{key}`"),
            );
        }
        node
    }

    pub fn required_str(&self, key: &str, errors: &mut ErrorCollector) -> Option<String> {
        let node = self.required(key, errors)?;
        self.string_value(key, node, errors)
    }

    pub fn optional_str(&self, key: &str, errors: &mut ErrorCollector) -> Option<String> {
        let node = self.get(key)?;
        self.string_value(key, node, errors)
    }

    pub fn optional_bool(&self, key: &str, errors: &mut ErrorCollector) -> Option<bool> {
        let node = self.get(key)?;
        let flag = node.as_bool();
        if flag.is_none() {
            self.type_error(self.path_of(key), key, "boolean", node, errors);
        }
        flag
    }

    pub fn required_mapping(&self, key: &str, errors: &mut ErrorCollector) -> Option<&'a Mapping> {
        let node = self.required(key, errors)?;
        expect_mapping(node, &self.path_of(key), key, errors)
    }

    /// Mapping under `key`, absent or null treated as missing without error.
    pub fn optional_mapping(&self, key: &str, errors: &mut ErrorCollector) -> Option<&'a Mapping> {
        let node = self.get(key)?;
        expect_mapping(node, &self.path_of(key), key, errors)
    }

    pub fn required_sequence(&self, key: &str, errors: &mut ErrorCollector) -> Option<&'a [Node]> {
        let node = self.required(key, errors)?;
        let items = node.as_sequence();
        if items.is_none() {
            self.type_error(self.path_of(key), key, "sequence", node, errors);
        }
        items
    }

    /// List of strings under `key`; absent or null yields an empty list.
    ///
    /// Items of the wrong type are reported one by one and left out.
    pub fn string_list(&self, key: &str, errors: &mut ErrorCollector) -> Vec<String> {
        let Some(node) = self.get(key) else {
            return Vec::new();
        };
        let Some(items) = node.as_sequence() else {
            self.type_error(self.path_of(key), key, "sequence of strings", node, errors);
            return Vec::new();
        };
        items
            .iter()
            .enumerate()
            .filter_map(|(index, item)| {
                let text = item.as_str();
                if text.is_none() {
                    let mut path = self.path_of(key);
                    path.push(PathSegment::Index(index));
                    self.type_error(path, &format!("{key}[{index}]"), "string", item, errors);
                }
                text.map(str::to_string)
            })
            .collect()
    }

    pub fn id_list(&self, key: &str, errors: &mut ErrorCollector) -> Vec<SmolStr> {
        self.string_list(key, errors)
            .into_iter()
            .map(SmolStr::from)
            .collect()
    }

    fn string_value(&self, key: &str, node: &Node, errors: &mut ErrorCollector) -> Option<String> {
        let text = node.as_str();
        if text.is_none() {
            self.type_error(self.path_of(key), key, "string", node, errors);
        }
        text.map(str::to_string)
    }

    fn type_error(
        &self,
        path: Vec<PathSegment>,
        what: &str,
        expected: &str,
        found: &Node,
        errors: &mut ErrorCollector,
    ) {
        errors.report(
            path,
            ErrorKind::InvalidType,
            format!("expected {expected} for `{what}`, found {}", found.type_name()),
        );
    }
}
