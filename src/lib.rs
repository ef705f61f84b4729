//! # grammar-parser
//!
//! A lexer plus a backtracking parser-combinator engine for ambiguous grammars.
//!
//! A grammar is a set of named token patterns and a graph of grammar nodes built
//! from four combinators: empty, terminal, sequence and alternation. Parsing
//! tokenizes the input, then enumerates lazily every distinct way the token stream
//! can be derived from the root node, turning each derivation into a value with the
//! builders attached to the nodes.
//!
//! File Layout
//!
//! src/
//!   ├── lexing       Token types, the priority tokenizer, the backtracking token stream
//!   ├── grammar      Node arena and the lazy result iterators (the search itself)
//!   ├── parser       Engine: tokenize, run the root, keep full parses
//!   ├── trace        Injected diagnostics
//!   ├── config       Engine switches (case sensitivity, tracing)
//!   └── sql          A SELECT grammar built on the public API, used by the CLI
//!
//! A minimal grammar:
//!
//! ```text
//! let mut g = Grammar::<i64>::new();
//! let num = g.token_with("NUM", r"\d+", |t| t.text().parse().unwrap_or_default())?;
//! let plus = g.token_with("PLUS", r"\+", |_| 0)?;
//! let sum = g.sequence_with([num, plus, num], |v| v[0] + v[2]);
//! g.set_root(sum)?;
//! let parser = Parser::new(g, ParserConfig::default())?;
//! assert_eq!(parser.parse("2+3")?.collect::<Vec<_>>(), vec![5]);
//! ```

pub mod config;
pub mod error;
pub mod grammar;
pub mod lexing;
pub mod parser;
pub mod sql;
pub mod trace;

pub use config::ParserConfig;
pub use error::{GrammarError, ParseError, TokenizeError};
pub use grammar::{Grammar, Node, NodeId, NodeResults};
pub use lexing::{Checkpoint, Token, TokenStream, TokenType, TokenTypeId, Tokenizer};
pub use parser::{Parser, Parses};
pub use trace::{LogTracer, NoopTracer, TraceEvent, TraceLog, Tracer};
