//! Error types for grammar definition, tokenization and parsing
//!
//! Only configuration mistakes surface as errors. A branch of the grammar that
//! cannot match is not an error: it simply contributes no results, which is how
//! the engine backtracks.

use thiserror::Error;

use crate::grammar::NodeId;

/// Errors raised while defining a grammar or building a parser from it
#[derive(Debug, Error)]
pub enum GrammarError {
    /// A token type's pattern is not a valid regular expression
    #[error("invalid pattern for token type `{name}`: {source}")]
    InvalidPattern {
        name: String,
        #[source]
        source: regex::Error,
    },

    /// Children were assigned to a node that cannot hold any
    #[error("node `{node}` is not a sequence or alternation")]
    NotComposite { node: String },

    /// A node id that this grammar never issued
    #[error("unknown node {0}")]
    UnknownNode(NodeId),
}

/// Raised by [`Tokenizer::tokenize`](crate::lexing::Tokenizer::tokenize) when input remains
/// that no token type matches
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenizeError {
    #[error("no token type matches input at byte {offset}: {remaining:?}")]
    Unmatched { offset: usize, remaining: String },
}

/// Errors raised when a parse is attempted
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The grammar has no root node to start from
    #[error("grammar has no root node")]
    NoRootNode,
}
