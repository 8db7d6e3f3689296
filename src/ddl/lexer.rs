//! Logos-based SQL tokenizer for `CREATE TABLE` statements.

use logos::Logos;
use text_size::{TextRange, TextSize};

/// SQL token kinds. Any other single character is [`SqlKind::Other`].
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t\r\n\f]+")]
#[logos(skip(r"--[^\n]*", allow_greedy = true))]
#[logos(skip r"/\*([^*]|\*+[^*/])*\*+/")]
pub enum SqlKind {
    #[regex(r"[A-Za-z_][A-Za-z0-9_$]*")]
    Word,

    #[regex(r#""([^"]|"")*""#)]
    QuotedIdent,

    #[regex(r"`([^`]|``)*`")]
    BacktickIdent,

    #[regex(r"\[[^\]]*\]")]
    BracketIdent,

    #[regex(r"'([^']|'')*'")]
    StringLit,

    #[regex(r"[0-9]+(\.[0-9]+)?")]
    Number,

    #[token("(")]
    LParen,

    #[token(")")]
    RParen,

    #[token(",")]
    Comma,

    #[token(".")]
    Dot,

    #[token(";")]
    Semicolon,

    #[regex(r"[^ \t\r\n\f]", priority = 0)]
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SqlToken {
    pub kind: SqlKind,
    pub range: TextRange,
}

impl SqlToken {
    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        &source[self.range]
    }

    /// Case-insensitive keyword test.
    pub fn is_keyword(&self, source: &str, keyword: &str) -> bool {
        self.kind == SqlKind::Word && self.text(source).eq_ignore_ascii_case(keyword)
    }

    pub fn is_identifier(&self) -> bool {
        matches!(
            self.kind,
            SqlKind::Word | SqlKind::QuotedIdent | SqlKind::BacktickIdent | SqlKind::BracketIdent
        )
    }

    /// Identifier text with any quoting removed.
    pub fn identifier(&self, source: &str) -> String {
        let text = self.text(source);
        match self.kind {
            SqlKind::QuotedIdent => text[1..text.len() - 1].replace("\"\"", "\""),
            SqlKind::BacktickIdent => text[1..text.len() - 1].replace("``", "`"),
            SqlKind::BracketIdent => text[1..text.len() - 1].to_string(),
            _ => text.to_string(),
        }
    }
}

pub fn tokenize(source: &str) -> Vec<SqlToken> {
    let mut lexer = SqlKind::lexer(source);
    let mut tokens = Vec::new();
    while let Some(result) = lexer.next() {
        let span = lexer.span();
        tokens.push(SqlToken {
            kind: result.unwrap_or(SqlKind::Other),
            range: TextRange::new(TextSize::new(span.start as u32), TextSize::new(span.end as u32)),
        });
    }
    tokens
}
