//! Token types and tokens
//!
//! A [`TokenType`] is a named regular expression registered by the grammar author.
//! A [`Token`] is one concrete match of a token type, paired with the byte range it
//! was matched from.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Range as ByteRange;

use crate::error::GrammarError;

/// Identity of a registered token type: its position in priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TokenTypeId(pub(crate) usize);

impl TokenTypeId {
    /// Priority index (0 is tried first)
    pub fn index(self) -> usize {
        self.0
    }
}

/// A named lexical category
#[derive(Debug, Clone)]
pub struct TokenType {
    id: TokenTypeId,
    name: String,
    pattern: String,
    ignore: bool,
}

impl TokenType {
    /// Create a token type, checking that `pattern` compiles.
    ///
    /// The pattern is implicitly anchored to the start of the remaining input when
    /// the tokenizer uses it, so it should not carry its own `^`.
    pub(crate) fn new(
        id: TokenTypeId,
        name: impl Into<String>,
        pattern: impl Into<String>,
        ignore: bool,
    ) -> Result<Self, GrammarError> {
        let name = name.into();
        let pattern = pattern.into();
        if let Err(source) = Regex::new(&anchored(&pattern)) {
            return Err(GrammarError::InvalidPattern { name, source });
        }
        Ok(Self {
            id,
            name,
            pattern,
            ignore,
        })
    }

    pub fn id(&self) -> TokenTypeId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Whether matched text is consumed without producing a token
    pub fn is_ignored(&self) -> bool {
        self.ignore
    }
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(\"{}\")", self.name, self.pattern)?;
        if self.ignore {
            write!(f, " [ignored]")?;
        }
        Ok(())
    }
}

/// Wrap a user pattern so it only matches at the start of the haystack
pub(crate) fn anchored(pattern: &str) -> String {
    format!("^(?:{})", pattern)
}

/// A lexeme: the token type it was matched as and the text it covers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    type_id: TokenTypeId,
    type_name: String,
    text: String,
    span: ByteRange<usize>,
}

impl Token {
    pub fn new(
        token_type: &TokenType,
        text: impl Into<String>,
        span: ByteRange<usize>,
    ) -> Self {
        Self {
            type_id: token_type.id(),
            type_name: token_type.name().to_string(),
            text: text.into(),
            span,
        }
    }

    pub fn type_id(&self) -> TokenTypeId {
        self.type_id
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// The matched text
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Byte range of the match in the original input
    pub fn span(&self) -> ByteRange<usize> {
        self.span.clone()
    }

    /// Whether this token was produced by the given token type
    pub fn is(&self, id: TokenTypeId) -> bool {
        self.type_id == id
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(\"{}\")", self.type_name, self.text)
    }
}
