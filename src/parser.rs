//! Parser engine: tokenize, run the root node, keep full parses
//!
//! [`Parser::parse`] returns a lazy iterator over every derivation of the whole input
//! from the grammar's root node. A root result only counts if every token was
//! consumed when it was produced; results that leave tokens behind are dropped.
//! Input that cannot be tokenized yields no results at all.

use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

use crate::config::ParserConfig;
use crate::error::{GrammarError, ParseError, TokenizeError};
use crate::grammar::results::ParseContext;
use crate::grammar::{Grammar, NodeResults};
use crate::lexing::{Token, TokenStream, Tokenizer};
use crate::trace::{LogTracer, NoopTracer, TraceEvent, Tracer};

pub struct Parser<V> {
    grammar: Grammar<V>,
    tokenizer: Tokenizer,
    config: ParserConfig,
    tracer: Arc<dyn Tracer>,
}

impl<V> fmt::Debug for Parser<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Parser")
            .field("grammar", &self.grammar)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl<V> Parser<V> {
    /// Compile the grammar's token types under `config`.
    ///
    /// With `config.trace` set, events go to the `log` facade until another tracer
    /// is injected with [`with_tracer`](Self::with_tracer).
    pub fn new(grammar: Grammar<V>, config: ParserConfig) -> Result<Self, GrammarError> {
        let tokenizer = Tokenizer::new(grammar.token_types(), config.case_insensitive)?;
        let tracer: Arc<dyn Tracer> = if config.trace {
            Arc::new(LogTracer)
        } else {
            Arc::new(NoopTracer)
        };
        Ok(Self {
            grammar,
            tokenizer,
            config,
            tracer,
        })
    }

    pub fn with_tracer(mut self, tracer: impl Tracer + 'static) -> Self {
        self.tracer = Arc::new(tracer);
        self
    }

    pub fn grammar(&self) -> &Grammar<V> {
        &self.grammar
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    pub fn tokenizer(&self) -> &Tokenizer {
        &self.tokenizer
    }

    /// Tokenize without parsing, reporting where tokenization stopped.
    pub fn tokenize(&self, input: &str) -> Result<Vec<Token>, TokenizeError> {
        self.tokenizer.tokenize(input)
    }
}

impl<V: Clone + fmt::Debug> Parser<V> {
    /// Every value the root node can build from the whole of `input`, produced on
    /// demand in the order the root node finds them.
    pub fn parse(&self, input: &str) -> Result<Parses<'_, V>, ParseError> {
        let root = self.grammar.root().ok_or(ParseError::NoRootNode)?;
        let tracer: &dyn Tracer = self.tracer.as_ref();

        let tokens = match self.tokenizer.tokenize(input) {
            Ok(tokens) => tokens,
            Err(TokenizeError::Unmatched { offset, remaining }) => {
                if tracer.enabled() {
                    tracer.trace(TraceEvent::TokenizeFailed {
                        offset,
                        remaining: &remaining,
                    });
                }
                return Ok(Parses {
                    results: None,
                    stream: Rc::new(TokenStream::new(Vec::new())),
                    tracer,
                });
            }
        };
        if tracer.enabled() {
            for token in &tokens {
                tracer.trace(TraceEvent::Token(token));
            }
        }

        let stream = Rc::new(TokenStream::new(tokens));
        let results = ParseContext::new(&self.grammar, Rc::clone(&stream), tracer).results(root);
        Ok(Parses {
            results: Some(results),
            stream,
            tracer,
        })
    }
}

/// Accepted parses of one input, see [`Parser::parse`]
pub struct Parses<'p, V> {
    results: Option<NodeResults<'p, V>>,
    stream: Rc<TokenStream>,
    tracer: &'p dyn Tracer,
}

impl<V> Parses<'_, V> {
    /// The tokens being parsed (empty if tokenization failed)
    pub fn tokens(&self) -> &[Token] {
        self.stream.tokens()
    }

    /// False when the input could not be tokenized
    pub fn tokenized(&self) -> bool {
        self.results.is_some()
    }
}

impl<V: Clone + fmt::Debug> Iterator for Parses<'_, V> {
    type Item = V;

    fn next(&mut self) -> Option<V> {
        let results = self.results.as_mut()?;
        loop {
            let value = results.next()?;
            if self.stream.at_end() {
                if self.tracer.enabled() {
                    self.tracer.trace(TraceEvent::Accept { value: &value });
                }
                return Some(value);
            }
            if self.tracer.enabled() {
                self.tracer.trace(TraceEvent::Discard {
                    value: &value,
                    unparsed: self.stream.remaining(),
                });
            }
        }
    }
}

impl<V> fmt::Debug for Parses<'_, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Parses")
            .field("tokens", &self.stream.len())
            .field("tokenized", &self.results.is_some())
            .finish()
    }
}
