//! SQL-like `SELECT` statements, as a client of the grammar engine
//!
//! This module only uses the public grammar-authoring API. It exists to exercise the
//! engine on a realistic grammar and to back the command-line tool.

pub mod ast;
pub mod grammar;

use thiserror::Error;

use crate::config::ParserConfig;
use crate::error::{GrammarError, ParseError};
use crate::parser::Parser;

pub use ast::{
    ArithOp, Attr, Chain, CompOp, Expr, Literal, LogicalOp, Relation, SelectItem,
    SelectStatement,
};
pub use grammar::SqlNode;

#[derive(Debug, Error)]
pub enum SqlError {
    #[error(transparent)]
    Grammar(#[from] GrammarError),
    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// A parser for the `SELECT` grammar.
pub fn parser(config: ParserConfig) -> Result<Parser<SqlNode>, GrammarError> {
    Parser::new(grammar::build()?, config)
}

/// Every reading of `input` as a `SELECT` statement, keywords matched in any case.
pub fn parse(input: &str) -> Result<Vec<SelectStatement>, SqlError> {
    let parser = parser(ParserConfig::default().case_insensitive(true))?;
    let statements = parser
        .parse(input)?
        .filter_map(SqlNode::into_select)
        .collect();
    Ok(statements)
}
