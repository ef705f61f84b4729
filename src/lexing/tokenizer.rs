//! Priority-ordered regex tokenizer
//!
//! Token types are tried in registration order against the front of the remaining
//! input. The first type that matches wins, even if a later type would match more
//! text, so ordering is part of the grammar. After every match the scan starts over
//! from the first type. Tokenization fails if input remains and no type matches.

use regex::{Regex, RegexBuilder};

use super::tokens::{anchored, Token, TokenType};
use crate::error::{GrammarError, TokenizeError};

/// Compiled token types, ready to split input into tokens
#[derive(Debug, Clone)]
pub struct Tokenizer {
    rules: Vec<(TokenType, Regex)>,
}

impl Tokenizer {
    /// Compile `token_types` (already in priority order).
    pub fn new(token_types: &[TokenType], case_insensitive: bool) -> Result<Self, GrammarError> {
        let rules = token_types
            .iter()
            .map(|ty| {
                RegexBuilder::new(&anchored(ty.pattern()))
                    .case_insensitive(case_insensitive)
                    .build()
                    .map(|re| (ty.clone(), re))
                    .map_err(|source| GrammarError::InvalidPattern {
                        name: ty.name().to_string(),
                        source,
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { rules })
    }

    /// Token types in priority order
    pub fn token_types(&self) -> impl Iterator<Item = &TokenType> {
        self.rules.iter().map(|(ty, _)| ty)
    }

    /// Split `input` into tokens, dropping matches of ignored types.
    pub fn tokenize(&self, input: &str) -> Result<Vec<Token>, TokenizeError> {
        let mut tokens = Vec::new();
        let mut offset = 0;

        'scan: while offset < input.len() {
            let rest = &input[offset..];
            for (ty, re) in &self.rules {
                // An empty match would restart the scan at the same place forever.
                let Some(m) = re.find(rest).filter(|m| !m.is_empty()) else {
                    continue;
                };
                let span = offset..offset + m.end();
                if !ty.is_ignored() {
                    tokens.push(Token::new(ty, m.as_str(), span.clone()));
                }
                offset = span.end;
                continue 'scan;
            }
            return Err(TokenizeError::Unmatched {
                offset,
                remaining: rest.to_string(),
            });
        }

        Ok(tokens)
    }
}
