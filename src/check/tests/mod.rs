#![allow(clippy::unwrap_used, clippy::expect_used)]

mod tests_namespace;

use super::*;
use crate::document::{self, Document};

pub(super) fn doc(text: &str) -> Document {
    document::parse_str(text).expect("fixture should parse")
}

pub(super) fn kinds(errors: &[ValidationError]) -> Vec<ErrorKind> {
    errors.iter().map(|e| e.kind).collect()
}

/// A schema document for the `movies` table with the given `columns` body
/// (indented four spaces).
pub(super) fn movies_schema(columns: &str) -> String {
    format!(
        "movies:
  subject_area: catalog
  table_info:
    - table: movies
      joins:
        - movies.id = ratings.movie_id
    - table: ratings
      joins: []
  columns:
{columns}"
    )
}

pub(super) const MOVIE_COLUMNS: &str = "    id:
      name: Movie id
      type: INT
      column: id
      desc: Primary key
      primary_key: true
    title:
      name: Title
      type: VARCHAR
      column: title
      desc: Movie title
      table: movies
";
