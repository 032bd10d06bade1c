//! Token stream for the flat display mode.
//!
//! Tokens are produced while walking the parsed value, so a string that
//! happens to contain `":` can never be mistaken for a key. Concatenating the
//! token texts yields exactly [`ParsedDocument::beautify`].

use serde_json::Value;
use strum_macros::{AsRefStr, Display};

use crate::document::ParsedDocument;

const INDENT: &str = "  ";

/// Syntactic class of a token. The string form is its CSS class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr, Display)]
pub enum TokenKind {
    /// Object member name.
    #[strum(serialize = "json-key")]
    Key,
    /// String value.
    #[strum(serialize = "json-string")]
    String,
    /// Number value.
    #[strum(serialize = "json-number")]
    Number,
    /// `true` or `false`.
    #[strum(serialize = "json-boolean")]
    Boolean,
    /// `null`.
    #[strum(serialize = "json-null")]
    Null,
    /// Brackets, commas, colons and whitespace. Not wrapped in a span.
    #[strum(serialize = "json-punct")]
    Punct,
}

impl TokenKind {
    /// Kinds that get a colored span.
    pub const HIGHLIGHTED: [Self; 5] = [
        Self::Key,
        Self::String,
        Self::Number,
        Self::Boolean,
        Self::Null,
    ];

    /// Kind of a scalar value; `None` for containers.
    #[must_use]
    pub const fn of_scalar(value: &Value) -> Option<Self> {
        match value {
            Value::String(_) => Some(Self::String),
            Value::Number(_) => Some(Self::Number),
            Value::Bool(_) => Some(Self::Boolean),
            Value::Null => Some(Self::Null),
            Value::Array(_) | Value::Object(_) => None,
        }
    }
}

/// One piece of the beautified text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// Syntactic class.
    pub kind: TokenKind,
    /// Exact text, JSON-escaped where applicable.
    pub text: String,
}

/// Display text of a scalar: its JSON serialization.
#[must_use]
pub fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => quote(s),
        other => other.to_string(),
    }
}

/// JSON string literal for `s`, quotes included.
#[must_use]
pub fn quote(s: &str) -> String {
    Value::from(s).to_string()
}

/// Tokenize the beautified form of `document`.
#[must_use]
pub fn tokenize(document: &ParsedDocument) -> Vec<Token> {
    let mut out = TokenWriter::default();
    out.value(document.value(), 0);
    out.finish()
}

#[derive(Default)]
struct TokenWriter {
    tokens: Vec<Token>,
}

impl TokenWriter {
    fn finish(self) -> Vec<Token> {
        self.tokens
    }

    /// Append `text`, merging runs of punctuation into one token.
    fn push(&mut self, kind: TokenKind, text: &str) {
        if kind == TokenKind::Punct
            && let Some(last) = self.tokens.last_mut()
            && last.kind == TokenKind::Punct
        {
            last.text.push_str(text);
            return;
        }
        self.tokens.push(Token {
            kind,
            text: text.to_string(),
        });
    }

    fn newline(&mut self, depth: usize) {
        self.push(TokenKind::Punct, "\n");
        for _ in 0..depth {
            self.push(TokenKind::Punct, INDENT);
        }
    }

    fn value(&mut self, value: &Value, depth: usize) {
        match value {
            Value::Array(items) if items.is_empty() => self.push(TokenKind::Punct, "[]"),
            Value::Object(map) if map.is_empty() => self.push(TokenKind::Punct, "{}"),
            Value::Array(items) => {
                self.push(TokenKind::Punct, "[");
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        self.push(TokenKind::Punct, ",");
                    }
                    self.newline(depth + 1);
                    self.value(item, depth + 1);
                }
                self.newline(depth);
                self.push(TokenKind::Punct, "]");
            }
            Value::Object(map) => {
                self.push(TokenKind::Punct, "{");
                for (i, (key, item)) in map.iter().enumerate() {
                    if i > 0 {
                        self.push(TokenKind::Punct, ",");
                    }
                    self.newline(depth + 1);
                    self.push(TokenKind::Key, &quote(key));
                    self.push(TokenKind::Punct, ": ");
                    self.value(item, depth + 1);
                }
                self.newline(depth);
                self.push(TokenKind::Punct, "}");
            }
            scalar => {
                let kind = TokenKind::of_scalar(scalar).unwrap_or(TokenKind::Punct);
                self.push(kind, &scalar_text(scalar));
            }
        }
    }
}
