//! Position-tracking reader for block-style YAML documents.
//!
//! The reader walks the text line by line, keeping an indentation-driven
//! recursive descent over mappings and sequences. Inline values (quoted
//! scalars, flow collections) go through the logos lexer. Every node records
//! the line it starts on; every mapping entry records the line of its key.
//!
//! Duplicate keys never overwrite: the first value is kept and each repeat
//! is reported back to the caller with both line numbers.

use smol_str::SmolStr;

use super::error::LoadError;
use super::lexer::{self, InlineKind, InlineToken};
use super::node::{Mapping, Node, NodeValue, PathSegment, Scalar};

/// A key seen more than once in the same mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RawDuplicate {
    /// Path of the mapping holding the key, from the document root.
    pub path: Vec<PathSegment>,
    pub key: SmolStr,
    pub first_line: u32,
    pub line: u32,
}

pub(crate) struct ReadOutput {
    pub root: Node,
    pub duplicates: Vec<RawDuplicate>,
}

/// Read a whole document.
pub(crate) fn read(text: &str) -> Result<ReadOutput, LoadError> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut reader = Reader::new(text);
    if let Some(line) = reader.second_document {
        return Err(syntax(line, "multiple documents in one file are not supported"));
    }
    let Some(first) = reader.next_content() else {
        return Err(LoadError::Empty);
    };
    let first_line = reader.lines[first].number;
    let root = reader.parse_block(0, first_line)?;
    if let Some(idx) = reader.next_content() {
        let line = reader.lines[idx];
        return Err(syntax(
            line.number,
            format!("unexpected content `{}` after the document body", line.text),
        ));
    }
    Ok(ReadOutput {
        root,
        duplicates: reader.duplicates,
    })
}

fn syntax(line: u32, message: impl Into<String>) -> LoadError {
    LoadError::Syntax {
        line,
        message: message.into(),
    }
}

#[derive(Debug, Clone, Copy)]
struct Line<'a> {
    number: u32,
    indent: usize,
    /// Content after the indentation, comment removed, trailing space trimmed.
    text: &'a str,
    /// The indentation contains a tab.
    tabbed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Chomp {
    Clip,
    Strip,
    Keep,
}

#[derive(Debug, Clone, Copy)]
struct BlockHeader {
    folded: bool,
    chomp: Chomp,
}

struct Reader<'a> {
    raw: Vec<&'a str>,
    lines: Vec<Line<'a>>,
    pos: usize,
    path: Vec<PathSegment>,
    duplicates: Vec<RawDuplicate>,
    second_document: Option<u32>,
}

impl<'a> Reader<'a> {
    fn new(text: &'a str) -> Self {
        let raw: Vec<&'a str> = text.lines().collect();
        let mut lines = Vec::with_capacity(raw.len());
        let mut seen_content = false;
        let mut ended = false;
        let mut second_document = None;

        for (i, raw_line) in raw.iter().enumerate() {
            let number = i as u32 + 1;
            let body = raw_line.trim_start_matches([' ', '\t']);
            let indentation = &raw_line[..raw_line.len() - body.len()];
            let mut text = lexer::strip_comment(body).trim_end();

            if indentation.is_empty() && (text == "---" || text.starts_with("--- ")) {
                if seen_content && second_document.is_none() {
                    second_document = Some(number);
                }
                text = "";
            } else if indentation.is_empty() && text == "..." {
                ended = true;
                text = "";
            }
            if ended {
                text = "";
            }
            seen_content |= !text.is_empty();

            lines.push(Line {
                number,
                indent: indentation.len(),
                text,
                tabbed: indentation.contains('\t'),
            });
        }

        Self {
            raw,
            lines,
            pos: 0,
            path: Vec::new(),
            duplicates: Vec::new(),
            second_document,
        }
    }

    /// Index of the next non-blank line at or after the cursor.
    fn next_content(&self) -> Option<usize> {
        (self.pos..self.lines.len()).find(|&idx| !self.lines[idx].text.is_empty())
    }

    fn line(&self, idx: usize) -> Result<Line<'a>, LoadError> {
        let line = self.lines[idx];
        if line.tabbed {
            return Err(syntax(line.number, "tab character in indentation"));
        }
        Ok(line)
    }

    /// Parse the block node starting at the next content line, provided it is
    /// indented at least `min_indent`; otherwise the value is null.
    fn parse_block(&mut self, min_indent: usize, parent_line: u32) -> Result<Node, LoadError> {
        let Some(idx) = self.next_content() else {
            return Ok(Node::null(parent_line));
        };
        let line = self.line(idx)?;
        if line.indent < min_indent {
            return Ok(Node::null(parent_line));
        }
        if is_sequence_item(line.text) {
            self.parse_sequence(line.indent)
        } else if lexer::split_key_value(line.text).is_some() {
            self.parse_mapping(line.indent)
        } else {
            self.pos = idx + 1;
            self.parse_inline(line.text, line.number, line.indent)
        }
    }

    fn parse_mapping(&mut self, indent: usize) -> Result<Node, LoadError> {
        let mut mapping = Mapping::new();
        let mut start_line = None;

        while let Some(idx) = self.next_content() {
            let line = self.line(idx)?;
            if line.indent < indent {
                break;
            }
            if line.indent > indent {
                return Err(syntax(line.number, "unexpected indentation"));
            }
            if is_sequence_item(line.text) {
                return Err(syntax(
                    line.number,
                    "sequence item where a mapping key was expected",
                ));
            }
            let Some((raw_key, rest)) = lexer::split_key_value(line.text) else {
                return Err(syntax(
                    line.number,
                    format!("expected `key: value`, found `{}`", line.text),
                ));
            };
            let key = parse_key(raw_key);
            start_line.get_or_insert(line.number);
            self.pos = idx + 1;

            self.path.push(PathSegment::Key(key.clone()));
            let value = self.parse_entry_value(rest, line, indent);
            self.path.pop();

            if let Err(first_line) = mapping.insert(key.clone(), line.number, value?) {
                self.duplicates.push(RawDuplicate {
                    path: self.path.clone(),
                    key,
                    first_line,
                    line: line.number,
                });
            }
        }

        let line = start_line.unwrap_or_else(|| self.last_line());
        Ok(Node::new(NodeValue::Mapping(mapping), line))
    }

    fn parse_entry_value(
        &mut self,
        rest: &'a str,
        line: Line<'a>,
        indent: usize,
    ) -> Result<Node, LoadError> {
        if rest.is_empty() {
            let Some(idx) = self.next_content() else {
                return Ok(Node::null(line.number));
            };
            let next = self.line(idx)?;
            if next.indent > indent {
                return self.parse_block(indent + 1, line.number);
            }
            if next.indent == indent && is_sequence_item(next.text) {
                return self.parse_sequence(indent);
            }
            return Ok(Node::null(line.number));
        }
        if let Some(header) = block_scalar_header(rest) {
            return self.parse_block_scalar(header, line.number, indent);
        }
        self.parse_inline(rest, line.number, indent + 1)
    }

    fn parse_sequence(&mut self, indent: usize) -> Result<Node, LoadError> {
        let mut items = Vec::new();
        let mut start_line = None;

        while let Some(idx) = self.next_content() {
            let line = self.line(idx)?;
            if line.indent < indent {
                break;
            }
            if line.indent > indent {
                return Err(syntax(line.number, "unexpected indentation"));
            }
            if !is_sequence_item(line.text) {
                break;
            }
            start_line.get_or_insert(line.number);

            let rest = line.text[1..].trim_start();
            let offset = line.text.len() - rest.len();

            self.path.push(PathSegment::Index(items.len()));
            let item = if rest.is_empty() {
                self.pos = idx + 1;
                self.parse_block(indent + 1, line.number)
            } else if is_sequence_item(rest) || lexer::split_key_value(rest).is_some() {
                // Compact form `- key: value`: re-read the remainder of the
                // line as if it started at the column of its first character.
                self.lines[idx] = Line {
                    indent: indent + offset,
                    text: rest,
                    ..line
                };
                self.parse_block(indent + offset, line.number)
            } else if let Some(header) = block_scalar_header(rest) {
                self.pos = idx + 1;
                self.parse_block_scalar(header, line.number, indent)
            } else {
                self.pos = idx + 1;
                self.parse_inline(rest, line.number, indent + 1)
            };
            self.path.pop();
            items.push(item?);
        }

        let line = start_line.unwrap_or_else(|| self.last_line());
        Ok(Node::new(NodeValue::Sequence(items), line))
    }

    /// Parse a value written on the same line as its key or dash. Plain and
    /// quoted scalars may continue on following lines indented at least
    /// `min_continuation`.
    fn parse_inline(
        &mut self,
        text: &'a str,
        number: u32,
        min_continuation: usize,
    ) -> Result<Node, LoadError> {
        match text.as_bytes().first() {
            Some(b'[') | Some(b'{') => self.parse_flow(text, number),
            Some(b'"') | Some(b'\'') => self.parse_quoted(text, number),
            _ => {
                let folded = self.fold_plain(text, min_continuation);
                Ok(Node::new(plain_value(&folded), number))
            }
        }
    }

    fn fold_plain(&mut self, text: &str, min_continuation: usize) -> String {
        let mut value = text.to_string();
        while let Some(idx) = self.next_content() {
            let line = self.lines[idx];
            if line.tabbed
                || line.indent < min_continuation
                || lexer::split_key_value(line.text).is_some()
            {
                break;
            }
            value.push(' ');
            value.push_str(line.text);
            self.pos = idx + 1;
        }
        value
    }

    fn parse_quoted(&mut self, text: &str, number: u32) -> Result<Node, LoadError> {
        let mut buffer = text.to_string();
        loop {
            let tokens = lexer::tokenize(&buffer);
            if let Some(first) = tokens.first() {
                let closed = matches!(
                    first.kind,
                    InlineKind::DoubleQuoted | InlineKind::SingleQuoted
                ) && first.start() == 0;
                if closed {
                    if tokens.len() > 1 {
                        return Err(syntax(number, "unexpected text after quoted scalar"));
                    }
                    return Ok(Node::string(decode_quoted(first, &buffer), number));
                }
            }
            let Some(idx) = self.next_content() else {
                return Err(syntax(number, "unterminated quoted scalar"));
            };
            let continuation = self.raw[idx].trim();
            buffer.push(' ');
            buffer.push_str(continuation);
            self.pos = idx + 1;
        }
    }

    fn parse_flow(&mut self, text: &str, number: u32) -> Result<Node, LoadError> {
        let mut buffer = text.to_string();
        let mut line_starts = vec![(0usize, number)];
        while !lexer::flow_is_balanced(&buffer) {
            let Some(idx) = self.next_content() else {
                return Err(syntax(number, "unterminated flow collection"));
            };
            let line = self.lines[idx];
            self.pos = idx + 1;
            buffer.push('\n');
            line_starts.push((buffer.len(), line.number));
            buffer.push_str(line.text);
        }

        let mut flow = FlowParser {
            source: &buffer,
            tokens: lexer::tokenize(&buffer),
            pos: 0,
            line_starts,
            path: self.path.clone(),
            duplicates: &mut self.duplicates,
        };
        let node = flow.parse_value()?;
        if let Some(token) = flow.tokens.get(flow.pos) {
            let line = flow.line_at(token.start());
            return Err(syntax(line, "unexpected text after flow collection"));
        }
        Ok(node)
    }

    fn parse_block_scalar(
        &mut self,
        header: BlockHeader,
        number: u32,
        parent_indent: usize,
    ) -> Result<Node, LoadError> {
        let mut collected: Vec<&str> = Vec::new();
        let mut block_indent = None;
        let mut idx = self.pos;

        while idx < self.raw.len() {
            let raw = self.raw[idx];
            if raw.trim().is_empty() {
                collected.push("");
                idx += 1;
                continue;
            }
            let indent = raw.len() - raw.trim_start_matches(' ').len();
            if indent <= parent_indent {
                break;
            }
            let block = *block_indent.get_or_insert(indent);
            if indent < block {
                break;
            }
            collected.push(&raw[block..]);
            idx += 1;
        }
        self.pos = idx;

        let content_end = collected
            .iter()
            .rposition(|line| !line.is_empty())
            .map_or(0, |last| last + 1);
        let trailing = collected.len() - content_end;
        let body = &collected[..content_end];

        let mut text = if header.folded {
            fold_lines(body)
        } else {
            body.join("\n")
        };
        match header.chomp {
            Chomp::Strip => {}
            Chomp::Clip => {
                if !body.is_empty() {
                    text.push('\n');
                }
            }
            Chomp::Keep => {
                if !body.is_empty() {
                    text.push('\n');
                }
                text.extend(std::iter::repeat_n('\n', trailing));
            }
        }
        Ok(Node::string(text, number))
    }

    fn last_line(&self) -> u32 {
        self.lines.last().map_or(1, |line| line.number)
    }
}

/// Recursive descent over the tokens of one flow collection.
struct FlowParser<'s, 'd> {
    source: &'s str,
    tokens: Vec<InlineToken>,
    pos: usize,
    /// Byte offset in `source` where each original line starts.
    line_starts: Vec<(usize, u32)>,
    path: Vec<PathSegment>,
    duplicates: &'d mut Vec<RawDuplicate>,
}

impl FlowParser<'_, '_> {
    fn line_at(&self, offset: usize) -> u32 {
        self.line_starts
            .iter()
            .rev()
            .find(|(start, _)| *start <= offset)
            .map_or(self.line_starts[0].1, |(_, line)| *line)
    }

    fn peek(&self) -> Option<InlineToken> {
        self.tokens.get(self.pos).copied()
    }

    fn parse_value(&mut self) -> Result<Node, LoadError> {
        let Some(token) = self.peek() else {
            let line = self.line_at(self.source.len());
            return Err(syntax(line, "unexpected end of flow collection"));
        };
        let line = self.line_at(token.start());
        match token.kind {
            InlineKind::LBracket => {
                self.pos += 1;
                self.parse_sequence(line)
            }
            InlineKind::LBrace => {
                self.pos += 1;
                self.parse_mapping(line)
            }
            InlineKind::DoubleQuoted | InlineKind::SingleQuoted => {
                self.pos += 1;
                Ok(Node::string(decode_quoted(&token, self.source), line))
            }
            InlineKind::Plain => {
                let text = self.plain_run(false);
                Ok(Node::new(plain_value(&text), line))
            }
            _ => Err(syntax(
                line,
                format!("unexpected `{}` in flow collection", token.text(self.source)),
            )),
        }
    }

    /// Consume consecutive plain text up to the next flow indicator.
    fn plain_run(&mut self, stop_at_colon: bool) -> String {
        let Some(first) = self.peek() else {
            return String::new();
        };
        let start = first.start();
        let mut end = start;
        while let Some(token) = self.peek() {
            match token.kind {
                InlineKind::Comma
                | InlineKind::LBracket
                | InlineKind::RBracket
                | InlineKind::LBrace
                | InlineKind::RBrace => break,
                InlineKind::Colon if stop_at_colon => break,
                _ => {
                    end = token.end();
                    self.pos += 1;
                }
            }
        }
        self.source[start..end].replace('\n', " ")
    }

    fn parse_sequence(&mut self, line: u32) -> Result<Node, LoadError> {
        let mut items = Vec::new();
        loop {
            match self.peek().map(|t| t.kind) {
                Some(InlineKind::RBracket) => {
                    self.pos += 1;
                    break;
                }
                Some(InlineKind::Comma) => {
                    self.pos += 1;
                }
                Some(_) => {
                    self.path.push(PathSegment::Index(items.len()));
                    let item = self.parse_value();
                    self.path.pop();
                    items.push(item?);
                    match self.peek().map(|t| t.kind) {
                        Some(InlineKind::Comma) | Some(InlineKind::RBracket) => {}
                        _ => return Err(syntax(line, "expected `,` or `]` in flow sequence")),
                    }
                }
                None => return Err(syntax(line, "unterminated flow sequence")),
            }
        }
        Ok(Node::new(NodeValue::Sequence(items), line))
    }

    fn parse_mapping(&mut self, line: u32) -> Result<Node, LoadError> {
        let mut mapping = Mapping::new();
        loop {
            let Some(token) = self.peek() else {
                return Err(syntax(line, "unterminated flow mapping"));
            };
            match token.kind {
                InlineKind::RBrace => {
                    self.pos += 1;
                    break;
                }
                InlineKind::Comma => {
                    self.pos += 1;
                    continue;
                }
                _ => {}
            }

            let key_line = self.line_at(token.start());
            let key = match token.kind {
                InlineKind::DoubleQuoted | InlineKind::SingleQuoted => {
                    self.pos += 1;
                    SmolStr::new(decode_quoted(&token, self.source))
                }
                InlineKind::Plain => SmolStr::new(self.plain_run(true).trim()),
                _ => {
                    return Err(syntax(
                        key_line,
                        format!("unexpected `{}` in flow mapping", token.text(self.source)),
                    ));
                }
            };
            if self.peek().map(|t| t.kind) != Some(InlineKind::Colon) {
                return Err(syntax(key_line, "expected `:` after flow mapping key"));
            }
            self.pos += 1;

            self.path.push(PathSegment::Key(key.clone()));
            let value = match self.peek().map(|t| t.kind) {
                Some(InlineKind::Comma) | Some(InlineKind::RBrace) => Ok(Node::null(key_line)),
                _ => self.parse_value(),
            };
            self.path.pop();

            if let Err(first_line) = mapping.insert(key.clone(), key_line, value?) {
                self.duplicates.push(RawDuplicate {
                    path: self.path.clone(),
                    key,
                    first_line,
                    line: key_line,
                });
            }
        }
        Ok(Node::new(NodeValue::Mapping(mapping), line))
    }
}

fn is_sequence_item(text: &str) -> bool {
    text == "-" || text.starts_with("- ") || text.starts_with("-\t")
}

fn block_scalar_header(text: &str) -> Option<BlockHeader> {
    let folded = match text.as_bytes().first() {
        Some(b'|') => false,
        Some(b'>') => true,
        _ => return None,
    };
    let indicators = &text[1..];
    if !indicators
        .chars()
        .all(|c| c == '-' || c == '+' || c.is_ascii_digit())
    {
        return None;
    }
    let chomp = if indicators.contains('-') {
        Chomp::Strip
    } else if indicators.contains('+') {
        Chomp::Keep
    } else {
        Chomp::Clip
    };
    Some(BlockHeader { folded, chomp })
}

fn fold_lines(lines: &[&str]) -> String {
    let mut out = String::new();
    let mut after_break = true;
    for line in lines {
        if line.is_empty() {
            out.push('\n');
            after_break = true;
        } else {
            if !after_break {
                out.push(' ');
            }
            out.push_str(line);
            after_break = false;
        }
    }
    out
}

fn parse_key(raw: &str) -> SmolStr {
    let bytes = raw.as_bytes();
    if raw.len() >= 2 && bytes[0] == b'"' && bytes[raw.len() - 1] == b'"' {
        return SmolStr::new(lexer::unescape_double(&raw[1..raw.len() - 1]));
    }
    if raw.len() >= 2 && bytes[0] == b'\'' && bytes[raw.len() - 1] == b'\'' {
        return SmolStr::new(lexer::unescape_single(&raw[1..raw.len() - 1]));
    }
    SmolStr::new(raw)
}

fn decode_quoted(token: &InlineToken, source: &str) -> String {
    let text = token.text(source);
    let body = &text[1..text.len() - 1];
    match token.kind {
        InlineKind::SingleQuoted => lexer::unescape_single(body),
        _ => lexer::unescape_double(body),
    }
}

/// Resolve the type of a plain scalar.
fn plain_value(text: &str) -> NodeValue {
    if matches!(text, "" | "~" | "null" | "Null" | "NULL") {
        return NodeValue::Null;
    }
    if text.eq_ignore_ascii_case("true") {
        return NodeValue::Scalar(Scalar::Bool(true));
    }
    if text.eq_ignore_ascii_case("false") {
        return NodeValue::Scalar(Scalar::Bool(false));
    }
    if let Ok(int) = text.parse::<i64>() {
        return NodeValue::Scalar(Scalar::Int(int));
    }
    let numeric = text.bytes().any(|b| b.is_ascii_digit())
        && text
            .bytes()
            .all(|b| b.is_ascii_digit() || matches!(b, b'.' | b'e' | b'E' | b'+' | b'-'));
    if numeric {
        if let Ok(float) = text.parse::<f64>() {
            return NodeValue::Scalar(Scalar::Float(float));
        }
    }
    NodeValue::Scalar(Scalar::Str(text.to_string()))
}
