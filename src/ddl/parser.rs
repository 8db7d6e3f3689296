//! `CREATE TABLE` statement reader.

use rustc_hash::FxHashSet;
use smol_str::SmolStr;

use super::lexer::{SqlKind, SqlToken, tokenize};
use super::{ColumnSpec, DdlError, DdlTableMetadata};
use crate::base::{LineIndex, TextRange, TextSize};

/// Words allowed between `CREATE` and `TABLE`.
const TABLE_PREFIXES: &[&str] = &["OR", "REPLACE", "TEMP", "TEMPORARY", "GLOBAL", "LOCAL", "EXTERNAL", "TRANSIENT"];

/// Keywords that follow a column type and end it.
const COLUMN_MODIFIERS: &[&str] = &[
    "NOT", "NULL", "PRIMARY", "DEFAULT", "REFERENCES", "UNIQUE", "CHECK", "CONSTRAINT", "COLLATE",
    "GENERATED", "AUTO_INCREMENT", "AUTOINCREMENT", "IDENTITY", "COMMENT", "KEY", "ENCODE",
];

enum Constraint {
    PrimaryKey,
    Other,
}

pub(super) struct Parser<'a> {
    source: &'a str,
    tokens: Vec<SqlToken>,
    pos: usize,
    lines: LineIndex,
}

impl<'a> Parser<'a> {
    pub(super) fn new(source: &'a str) -> Self {
        Self {
            source,
            tokens: tokenize(source),
            pos: 0,
            lines: LineIndex::new(source),
        }
    }

    /// Parse the first `CREATE TABLE` statement in the source.
    pub(super) fn parse_first_table(&mut self) -> Result<DdlTableMetadata, DdlError> {
        while self.pos < self.tokens.len() {
            if self.at_keyword("CREATE") && self.starts_create_table() {
                let table = self.parse_create_table()?;
                if self.tokens[self.pos..]
                    .iter()
                    .any(|t| t.is_keyword(self.source, "CREATE"))
                {
                    tracing::debug!(
                        "using the first CREATE TABLE statement (`{}`), ignoring the rest",
                        table.table_name
                    );
                }
                return Ok(table);
            }
            self.pos += 1;
        }
        Err(DdlError::NoCreateTable)
    }

    fn peek(&self) -> Option<&SqlToken> {
        self.tokens.get(self.pos)
    }

    fn at_keyword(&self, keyword: &str) -> bool {
        self.peek().is_some_and(|t| t.is_keyword(self.source, keyword))
    }

    fn eat_keyword(&mut self, keyword: &str) -> bool {
        let matched = self.at_keyword(keyword);
        if matched {
            self.pos += 1;
        }
        matched
    }

    fn line_at(&self, index: usize) -> u32 {
        let offset = self
            .tokens
            .get(index)
            .map(|t| t.range.start())
            .unwrap_or_else(|| TextSize::new(self.source.len() as u32));
        self.lines.line(offset)
    }

    fn error(&self, index: usize, message: impl Into<String>) -> DdlError {
        DdlError::Syntax {
            line: self.line_at(index),
            message: message.into(),
        }
    }

    /// Whether the `CREATE` at the cursor introduces a table.
    fn starts_create_table(&self) -> bool {
        self.tokens[self.pos + 1..]
            .iter()
            .find(|t| {
                !TABLE_PREFIXES
                    .iter()
                    .any(|prefix| t.is_keyword(self.source, prefix))
            })
            .is_some_and(|t| t.is_keyword(self.source, "TABLE"))
    }

    fn parse_create_table(&mut self) -> Result<DdlTableMetadata, DdlError> {
        let create = self.pos;
        self.pos += 1;
        while !self.eat_keyword("TABLE") {
            self.pos += 1;
        }
        if self.eat_keyword("IF") && !(self.eat_keyword("NOT") && self.eat_keyword("EXISTS")) {
            return Err(self.error(self.pos, "expected `IF NOT EXISTS`"));
        }

        let (schema, table_name) = self.parse_qualified_name()?;

        match self.peek() {
            Some(token) if token.kind == SqlKind::LParen => self.pos += 1,
            _ => return Err(self.error(self.pos, "expected `(` after the table name")),
        }

        let elements = self.split_elements(create)?;
        let mut columns = Vec::new();
        let mut primary_key_names = FxHashSet::default();
        for element in elements {
            self.parse_element(element, &mut columns, &mut primary_key_names)?;
        }

        Ok(DdlTableMetadata {
            schema,
            table_name,
            columns,
            primary_key_names,
        })
    }

    fn parse_qualified_name(&mut self) -> Result<(Option<SmolStr>, SmolStr), DdlError> {
        let mut parts = Vec::new();
        loop {
            match self.peek() {
                Some(token) if token.is_identifier() => {
                    parts.push(SmolStr::new(token.identifier(self.source)));
                    self.pos += 1;
                }
                _ => return Err(self.error(self.pos, "expected a table name")),
            }
            match self.peek() {
                Some(token) if token.kind == SqlKind::Dot => self.pos += 1,
                _ => break,
            }
        }
        // `parts` holds at least one name here.
        let table = parts.pop().unwrap_or_default();
        Ok((parts.pop(), table))
    }

    /// Split the column list into comma-separated elements (token index
    /// ranges), consuming the closing parenthesis.
    fn split_elements(&mut self, create: usize) -> Result<Vec<(usize, usize)>, DdlError> {
        let mut elements = Vec::new();
        let mut depth = 0usize;
        let mut start = self.pos;
        while let Some(token) = self.peek() {
            match token.kind {
                SqlKind::LParen => depth += 1,
                SqlKind::RParen if depth == 0 => {
                    if start < self.pos {
                        elements.push((start, self.pos));
                    }
                    self.pos += 1;
                    return Ok(elements);
                }
                SqlKind::RParen => depth -= 1,
                SqlKind::Comma if depth == 0 => {
                    if start == self.pos {
                        return Err(self.error(self.pos, "empty column definition"));
                    }
                    elements.push((start, self.pos));
                    start = self.pos + 1;
                }
                SqlKind::Semicolon => {
                    return Err(self.error(create, "unterminated column list"));
                }
                _ => {}
            }
            self.pos += 1;
        }
        Err(self.error(create, "unterminated column list"))
    }

    fn parse_element(
        &self,
        (start, end): (usize, usize),
        columns: &mut Vec<ColumnSpec>,
        primary_keys: &mut FxHashSet<SmolStr>,
    ) -> Result<(), DdlError> {
        let tokens = &self.tokens[start..end];
        let mut index = 0;
        if tokens[index].is_keyword(self.source, "CONSTRAINT") {
            // CONSTRAINT <name> <constraint>
            index += 2;
        }
        let Some(head) = tokens.get(index) else {
            return Err(self.error(start, "incomplete constraint"));
        };

        match self.constraint_kind(&tokens[index..]) {
            Some(Constraint::PrimaryKey) => {
                let names = self.parenthesized_names(&tokens[index + 2..], start + index)?;
                primary_keys.extend(names);
                return Ok(());
            }
            Some(Constraint::Other) => return Ok(()),
            None => {}
        }

        if !head.is_identifier() || index != 0 {
            return Err(self.error(
                start + index,
                format!("unexpected `{}` in column list", head.text(self.source)),
            ));
        }
        let name = SmolStr::new(head.identifier(self.source));
        let Some(type_token) = tokens.get(1).filter(|t| t.is_identifier()) else {
            return Err(self.error(start, format!("column `{name}` has no type")));
        };

        // Types may span several words (`DOUBLE PRECISION`,
        // `TIMESTAMP(3) WITH TIME ZONE`); the first modifier keyword ends them.
        let mut data_type = type_token.identifier(self.source);
        let mut rest = 2;
        while let Some(token) = tokens.get(rest) {
            if token.kind == SqlKind::LParen {
                let close = tokens[rest..]
                    .iter()
                    .position(|t| t.kind == SqlKind::RParen)
                    .map(|offset| rest + offset)
                    .ok_or_else(|| self.error(start, format!("unclosed size of column `{name}`")))?;
                let args_start = tokens[rest].range.start();
                let args_end = tokens[close].range.end();
                data_type.push_str(&self.source[TextRange::new(args_start, args_end)]);
                rest = close + 1;
            } else if token.kind == SqlKind::Word && !self.is_column_modifier(token) {
                data_type.push(' ');
                data_type.push_str(token.text(self.source));
                rest += 1;
            } else {
                break;
            }
        }

        let modifiers = &tokens[rest..];
        let inline_primary_key = modifiers.windows(2).any(|pair| {
            pair[0].is_keyword(self.source, "PRIMARY") && pair[1].is_keyword(self.source, "KEY")
        });
        if inline_primary_key {
            primary_keys.insert(name.clone());
        }

        columns.push(ColumnSpec {
            name,
            data_type,
            line: self.line_at(start),
        });
        Ok(())
    }

    fn is_column_modifier(&self, token: &SqlToken) -> bool {
        COLUMN_MODIFIERS
            .iter()
            .any(|keyword| token.is_keyword(self.source, keyword))
    }

    /// Classify an element starting with `tokens` as a table constraint.
    ///
    /// Keywords only count when followed by what the constraint syntax
    /// requires, so columns named `key` or `primary` are still columns.
    fn constraint_kind(&self, tokens: &[SqlToken]) -> Option<Constraint> {
        let keyword = |index: usize, word: &str| {
            tokens
                .get(index)
                .is_some_and(|t| t.is_keyword(self.source, word))
        };
        let paren = |index: usize| tokens.get(index).is_some_and(|t| t.kind == SqlKind::LParen);

        if keyword(0, "PRIMARY") && keyword(1, "KEY") {
            return Some(Constraint::PrimaryKey);
        }
        let other = (keyword(0, "FOREIGN") && keyword(1, "KEY"))
            || (keyword(0, "UNIQUE") && (keyword(1, "KEY") || keyword(1, "INDEX") || paren(1)))
            || ((keyword(0, "CHECK") || keyword(0, "EXCLUDE")) && paren(1))
            || ((keyword(0, "KEY") || keyword(0, "INDEX"))
                && (paren(1) || (tokens.get(1).is_some_and(SqlToken::is_identifier) && paren(2))));
        other.then_some(Constraint::Other)
    }

    /// `( a, b, ... )` at the start of `tokens`.
    fn parenthesized_names(&self, tokens: &[SqlToken], at: usize) -> Result<Vec<SmolStr>, DdlError> {
        let mut names = Vec::new();
        let mut iter = tokens.iter();
        if iter.next().map(|t| t.kind) != Some(SqlKind::LParen) {
            return Err(self.error(at, "expected `(` after `PRIMARY KEY`"));
        }
        for token in iter {
            match token.kind {
                SqlKind::RParen => return Ok(names),
                SqlKind::Comma => {}
                _ if token.is_identifier() => names.push(SmolStr::new(token.identifier(self.source))),
                _ => {
                    return Err(self.error(
                        at,
                        format!("unexpected `{}` in key column list", token.text(self.source)),
                    ));
                }
            }
        }
        Err(self.error(at, "unclosed key column list"))
    }
}
