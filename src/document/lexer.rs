//! Logos-based lexer for the inline part of a document line.
//!
//! Block structure (indentation, `- ` items) is handled line by line in the
//! reader; this lexer only splits the text of one line (or one flow
//! collection) into quoted scalars, flow indicators and plain text so the
//! reader can find `key: value` separators, comments and flow items.

use logos::Logos;
use text_size::{TextRange, TextSize};

/// Kinds of inline tokens.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t\r\n]+")]
pub enum InlineKind {
    #[regex(r#""([^"\\]|\\.)*""#)]
    DoubleQuoted,

    #[regex(r"'([^']|'')*'")]
    SingleQuoted,

    #[token("[")]
    LBracket,

    #[token("]")]
    RBracket,

    #[token("{")]
    LBrace,

    #[token("}")]
    RBrace,

    #[token(",")]
    Comma,

    #[token(":")]
    Colon,

    #[regex(r"#[^\n]*", allow_greedy = true)]
    Comment,

    #[regex(r#"[^ \t\r\n\[\]{},:#"']+"#)]
    Plain,
}

/// A token with its kind and byte range in the scanned text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InlineToken {
    pub kind: InlineKind,
    pub range: TextRange,
}

impl InlineToken {
    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        &source[self.range]
    }

    pub fn start(&self) -> usize {
        u32::from(self.range.start()) as usize
    }

    pub fn end(&self) -> usize {
        u32::from(self.range.end()) as usize
    }
}

/// Tokenize `text`. Characters the lexer cannot classify (an unterminated
/// quote, for instance) become plain text.
///
/// A quote only opens a quoted scalar where a scalar can start; an apostrophe
/// inside plain text (`Customer's name`) is a plain character.
pub fn tokenize(text: &str) -> Vec<InlineToken> {
    let mut tokens = Vec::new();
    let mut offset = 0;
    'scan: while offset < text.len() {
        let mut lexer = InlineKind::lexer(&text[offset..]);
        while let Some(result) = lexer.next() {
            let span = lexer.span();
            let (start, end) = (offset + span.start, offset + span.end);
            let quote = matches!(text.as_bytes()[start], b'"' | b'\'');
            if quote && !starts_scalar(&tokens, text, start) {
                tokens.push(token(InlineKind::Plain, start, start + 1));
                offset = start + 1;
                continue 'scan;
            }
            tokens.push(token(result.unwrap_or(InlineKind::Plain), start, end));
        }
        break;
    }
    tokens
}

fn token(kind: InlineKind, start: usize, end: usize) -> InlineToken {
    let range = TextRange::new(TextSize::new(start as u32), TextSize::new(end as u32));
    InlineToken { kind, range }
}

/// Whether a scalar may begin at byte `start`: at the start of the text, after
/// a flow indicator or `:`, or after a `- ` item marker.
fn starts_scalar(tokens: &[InlineToken], text: &str, start: usize) -> bool {
    let Some(previous) = tokens.last() else {
        return true;
    };
    match previous.kind {
        InlineKind::Colon | InlineKind::Comma | InlineKind::LBracket | InlineKind::LBrace => true,
        InlineKind::Plain => previous.text(text) == "-" && previous.end() < start,
        _ => false,
    }
}

/// Remove a trailing `#` comment.
///
/// A `#` only starts a comment at the beginning of the text or after
/// whitespace; quoted scalars are never cut.
pub fn strip_comment(text: &str) -> &str {
    for token in tokenize(text) {
        if token.kind != InlineKind::Comment {
            continue;
        }
        let start = token.start();
        let preceded_by_space = start == 0
            || text[..start]
                .chars()
                .next_back()
                .is_some_and(|c| c == ' ' || c == '\t');
        if preceded_by_space {
            return text[..start].trim_end();
        }
    }
    text
}

/// Split `key: value` at the first mapping indicator outside quotes and flow
/// collections.
///
/// The indicator is a `:` followed by whitespace or the end of the text, so
/// plain values such as `http://host` or `12:30` are left alone. Returns the
/// trimmed key text and the trimmed value text.
pub fn split_key_value(text: &str) -> Option<(&str, &str)> {
    let mut depth = 0usize;
    for token in tokenize(text) {
        match token.kind {
            InlineKind::LBracket | InlineKind::LBrace => depth += 1,
            InlineKind::RBracket | InlineKind::RBrace => depth = depth.saturating_sub(1),
            InlineKind::Comment => return None,
            InlineKind::Colon if depth == 0 => {
                let end = token.end();
                let followed_by_space = text[end..]
                    .chars()
                    .next()
                    .is_none_or(|c| c == ' ' || c == '\t');
                if !followed_by_space {
                    continue;
                }
                let key = text[..token.start()].trim_end();
                if key.is_empty() {
                    return None;
                }
                return Some((key, text[end..].trim()));
            }
            _ => {}
        }
    }
    None
}

/// Whether every `[`/`{` in `text` is closed, ignoring quoted scalars.
pub fn flow_is_balanced(text: &str) -> bool {
    let mut depth = 0i32;
    for token in tokenize(text) {
        match token.kind {
            InlineKind::LBracket | InlineKind::LBrace => depth += 1,
            InlineKind::RBracket | InlineKind::RBrace => depth -= 1,
            _ => {}
        }
    }
    depth <= 0
}

/// Decode the body of a double-quoted scalar (without the quotes).
pub fn unescape_double(body: &str) -> String {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('0') => out.push('\0'),
            Some('"') => out.push('"'),
            Some('\\') => out.push('\\'),
            Some('/') => out.push('/'),
            Some('u') => {
                let hex: String = chars.by_ref().take(4).collect();
                match u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32) {
                    Some(decoded) => out.push(decoded),
                    None => {
                        out.push_str("\\u");
                        out.push_str(&hex);
                    }
                }
            }
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

/// Decode the body of a single-quoted scalar (without the quotes).
pub fn unescape_single(body: &str) -> String {
    body.replace("''", "'")
}
