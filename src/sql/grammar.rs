//! The `SELECT` grammar, written against the public grammar API
//!
//! ```text
//! select     := SELECT items FROM relations condition
//! items      := item items_rest          items_rest := COMMA item items_rest | ε
//! item       := expr alias
//! relations  := relation rels_rest       rels_rest  := COMMA relation rels_rest | ε
//! relation   := IDENT alias
//! alias      := AS IDENT | IDENT | ε
//! condition  := WHERE expr | ε
//! expr       := or
//! or         := and or_rest              or_rest    := OR and or_rest | ε
//! and        := not and_rest             and_rest   := AND not and_rest | ε
//! not        := NOT not | comp
//! comp       := arith comp_op arith | arith
//! arith      := term arith_rest          arith_rest := (PLUS | MINUS) term arith_rest | ε
//! term       := unary term_rest          term_rest  := (STAR | SLASH) unary term_rest | ε
//! unary      := MINUS unary | primary
//! primary    := NUMBER | STRING | attr | LPAREN expr RPAREN
//! attr       := IDENT DOT IDENT | IDENT
//! ```
//!
//! Repetition is right recursion ending in an empty node, so the "rest" rules yield
//! the longest continuation first and the engine's full-consumption filter picks the
//! one that fits. Every node produces a [`SqlNode`]; the builders below know which
//! variant each child produces.

use super::ast::{
    ArithOp, Attr, CompOp, Expr, Literal, LogicalOp, Relation, SelectItem, SelectStatement,
};
use crate::error::GrammarError;
use crate::grammar::{Grammar, NodeId};

/// Value type of the SQL grammar: every intermediate shape a rule can build
#[derive(Debug, Clone, PartialEq)]
pub enum SqlNode {
    /// Keywords and punctuation
    Skip,
    Ident(String),
    Expr(Expr),
    Arith(ArithOp),
    Comp(CompOp),
    Logical(LogicalOp),
    ArithRest(Vec<(ArithOp, Expr)>),
    LogicalRest(Vec<(LogicalOp, Expr)>),
    Alias(Option<String>),
    Item(SelectItem),
    Items(Vec<SelectItem>),
    Relation(Relation),
    Relations(Vec<Relation>),
    Condition(Option<Expr>),
    Select(SelectStatement),
}

impl SqlNode {
    pub fn into_select(self) -> Option<SelectStatement> {
        match self {
            SqlNode::Select(stmt) => Some(stmt),
            _ => None,
        }
    }
}

/// Pull the payload out of a child value. The grammar fixes which variant each
/// child produces, so a mismatch is a bug in this file.
macro_rules! unwrap_node {
    ($value:expr, $variant:ident) => {
        match $value {
            SqlNode::$variant(inner) => inner,
            other => unreachable!(
                concat!("expected SqlNode::", stringify!($variant), ", got {:?}"),
                other
            ),
        }
    };
}

fn take<const N: usize>(values: Vec<SqlNode>) -> [SqlNode; N] {
    values
        .try_into()
        .unwrap_or_else(|values: Vec<SqlNode>| {
            unreachable!("expected {} child values, got {}", N, values.len())
        })
}

fn keyword(g: &mut Grammar<SqlNode>, word: &str) -> Result<NodeId, GrammarError> {
    g.token_with(word, format!(r"{}\b", word), |_| SqlNode::Skip)
}

fn punctuation(g: &mut Grammar<SqlNode>, name: &str, pattern: &str) -> Result<NodeId, GrammarError> {
    g.token_with(name, pattern, |_| SqlNode::Skip)
}

fn unquote(text: &str) -> String {
    text.strip_prefix('\'')
        .and_then(|t| t.strip_suffix('\''))
        .unwrap_or(text)
        .replace("''", "'")
}

fn arith_chain(values: Vec<SqlNode>) -> SqlNode {
    let [first, rest] = take(values);
    SqlNode::Expr(Expr::arith(
        unwrap_node!(first, Expr),
        unwrap_node!(rest, ArithRest),
    ))
}

fn logical_chain(values: Vec<SqlNode>) -> SqlNode {
    let [first, rest] = take(values);
    SqlNode::Expr(Expr::logical(
        unwrap_node!(first, Expr),
        unwrap_node!(rest, LogicalRest),
    ))
}

/// `rest := op operand rest | ε`, collecting `(op, operand)` pairs in source order
fn arith_rest(g: &mut Grammar<SqlNode>, op: NodeId, operand: NodeId) -> Result<NodeId, GrammarError> {
    let rest = g.alternation([]);
    let more = g.sequence_with([op, operand, rest], |values| {
        let [op, operand, rest] = take(values);
        let mut pairs = unwrap_node!(rest, ArithRest);
        pairs.insert(0, (unwrap_node!(op, Arith), unwrap_node!(operand, Expr)));
        SqlNode::ArithRest(pairs)
    });
    let done = g.empty_with(|| SqlNode::ArithRest(Vec::new()));
    g.set_children(rest, [more, done])?;
    Ok(rest)
}

fn logical_rest(g: &mut Grammar<SqlNode>, op: NodeId, operand: NodeId) -> Result<NodeId, GrammarError> {
    let rest = g.alternation([]);
    let more = g.sequence_with([op, operand, rest], |values| {
        let [op, operand, rest] = take(values);
        let mut pairs = unwrap_node!(rest, LogicalRest);
        pairs.insert(0, (unwrap_node!(op, Logical), unwrap_node!(operand, Expr)));
        SqlNode::LogicalRest(pairs)
    });
    let done = g.empty_with(|| SqlNode::LogicalRest(Vec::new()));
    g.set_children(rest, [more, done])?;
    Ok(rest)
}

/// Build the grammar with `select` as its root.
pub fn build() -> Result<Grammar<SqlNode>, GrammarError> {
    let mut g = Grammar::new();

    // Token types, in priority order: keywords before identifiers, two-character
    // operators before their one-character prefixes.
    g.register_ignored("WS", r"\s+")?;
    let select_kw = keyword(&mut g, "SELECT")?;
    let from_kw = keyword(&mut g, "FROM")?;
    let where_kw = keyword(&mut g, "WHERE")?;
    let as_kw = keyword(&mut g, "AS")?;
    let not_kw = keyword(&mut g, "NOT")?;
    let and_kw = g.token_with("AND", r"AND\b", |_| SqlNode::Logical(LogicalOp::And))?;
    let or_kw = g.token_with("OR", r"OR\b", |_| SqlNode::Logical(LogicalOp::Or))?;
    let number = g.token_with("NUMBER", r"\d+(?:\.\d+)?", |t| {
        let n = t.text().parse().unwrap_or_default();
        SqlNode::Expr(Expr::Literal(Literal::Number(n)))
    })?;
    let string = g.token_with("STRING", r"'(?:[^']|'')*'", |t| {
        SqlNode::Expr(Expr::Literal(Literal::String(unquote(t.text()))))
    })?;
    let ident = g.token_with("IDENT", r"[A-Za-z_][A-Za-z0-9_]*", |t| {
        SqlNode::Ident(t.text().to_string())
    })?;
    let dot = punctuation(&mut g, "DOT", r"\.")?;
    let comma = punctuation(&mut g, "COMMA", ",")?;
    let lparen = punctuation(&mut g, "LPAREN", r"\(")?;
    let rparen = punctuation(&mut g, "RPAREN", r"\)")?;
    let le = g.token_with("LE", "<=", |_| SqlNode::Comp(CompOp::Le))?;
    let ge = g.token_with("GE", ">=", |_| SqlNode::Comp(CompOp::Ge))?;
    let ne = g.token_with("NE", "<>", |_| SqlNode::Comp(CompOp::Ne))?;
    let lt = g.token_with("LT", "<", |_| SqlNode::Comp(CompOp::Lt))?;
    let gt = g.token_with("GT", ">", |_| SqlNode::Comp(CompOp::Gt))?;
    let eq = g.token_with("EQ", "=", |_| SqlNode::Comp(CompOp::Eq))?;
    let plus = g.token_with("PLUS", r"\+", |_| SqlNode::Arith(ArithOp::Add))?;
    let minus = g.token_with("MINUS", "-", |_| SqlNode::Arith(ArithOp::Subtract))?;
    let star = g.token_with("STAR", r"\*", |_| SqlNode::Arith(ArithOp::Multiply))?;
    let slash = g.token_with("SLASH", "/", |_| SqlNode::Arith(ArithOp::Divide))?;

    // attr
    let qualified = g.sequence_with([ident, dot, ident], |values| {
        let [relation, _, field] = take(values);
        SqlNode::Expr(Expr::Attr(Attr {
            relation: Some(unwrap_node!(relation, Ident)),
            field: unwrap_node!(field, Ident),
        }))
    });
    let bare = g.sequence_with([ident], |values| {
        let [field] = take(values);
        SqlNode::Expr(Expr::Attr(Attr {
            relation: None,
            field: unwrap_node!(field, Ident),
        }))
    });
    let attr = g.alternation([qualified, bare]);
    g.rename(attr, "attr");

    // primary, with `expr` filled in once the whole expression tower exists
    let expr = g.alternation([]);
    g.rename(expr, "expr");
    let parens = g.sequence_with([lparen, expr, rparen], |values| {
        let [_, inner, _] = take(values);
        SqlNode::Expr(Expr::Parens(Box::new(unwrap_node!(inner, Expr))))
    });
    let primary = g.alternation([number, string, attr, parens]);
    g.rename(primary, "primary");

    let unary = g.alternation([]);
    g.rename(unary, "unary");
    let negative = g.sequence_with([minus, unary], |values| {
        let [_, inner] = take(values);
        SqlNode::Expr(Expr::Negative(Box::new(unwrap_node!(inner, Expr))))
    });
    g.set_children(unary, [negative, primary])?;

    let mul_op = g.alternation([star, slash]);
    let term_rest = arith_rest(&mut g, mul_op, unary)?;
    let term = g.sequence_with([unary, term_rest], arith_chain);
    g.rename(term, "term");

    let add_op = g.alternation([plus, minus]);
    let sum_rest = arith_rest(&mut g, add_op, term)?;
    let arith = g.sequence_with([term, sum_rest], arith_chain);
    g.rename(arith, "arith");

    let comp_op = g.alternation([le, ge, ne, lt, gt, eq]);
    let comparison = g.sequence_with([arith, comp_op, arith], |values| {
        let [left, op, right] = take(values);
        SqlNode::Expr(Expr::Compare {
            left: Box::new(unwrap_node!(left, Expr)),
            op: unwrap_node!(op, Comp),
            right: Box::new(unwrap_node!(right, Expr)),
        })
    });
    let comp = g.alternation([comparison, arith]);
    g.rename(comp, "comp");

    let not = g.alternation([]);
    g.rename(not, "not");
    let negation = g.sequence_with([not_kw, not], |values| {
        let [_, inner] = take(values);
        SqlNode::Expr(Expr::Not(Box::new(unwrap_node!(inner, Expr))))
    });
    g.set_children(not, [negation, comp])?;

    let and_rest = logical_rest(&mut g, and_kw, not)?;
    let and = g.sequence_with([not, and_rest], logical_chain);
    g.rename(and, "and");
    let or_rest = logical_rest(&mut g, or_kw, and)?;
    let or = g.sequence_with([and, or_rest], logical_chain);
    g.rename(or, "or");
    g.set_children(expr, [or])?;

    // alias
    let as_alias = g.sequence_with([as_kw, ident], |values| {
        let [_, name] = take(values);
        SqlNode::Alias(Some(unwrap_node!(name, Ident)))
    });
    let bare_alias = g.sequence_with([ident], |values| {
        let [name] = take(values);
        SqlNode::Alias(Some(unwrap_node!(name, Ident)))
    });
    let no_alias = g.empty_with(|| SqlNode::Alias(None));
    let alias = g.alternation([as_alias, bare_alias, no_alias]);
    g.rename(alias, "alias");

    // select list
    let item = g.sequence_with([expr, alias], |values| {
        let [expr, alias] = take(values);
        SqlNode::Item(SelectItem {
            expr: unwrap_node!(expr, Expr),
            alias: unwrap_node!(alias, Alias),
        })
    });
    g.rename(item, "item");
    let items_rest = g.alternation([]);
    let more_items = g.sequence_with([comma, item, items_rest], |values| {
        let [_, item, rest] = take(values);
        let mut items = unwrap_node!(rest, Items);
        items.insert(0, unwrap_node!(item, Item));
        SqlNode::Items(items)
    });
    let no_items = g.empty_with(|| SqlNode::Items(Vec::new()));
    g.set_children(items_rest, [more_items, no_items])?;
    let items = g.sequence_with([item, items_rest], |values| {
        let [first, rest] = take(values);
        let mut items = unwrap_node!(rest, Items);
        items.insert(0, unwrap_node!(first, Item));
        SqlNode::Items(items)
    });
    g.rename(items, "items");

    // relations
    let relation = g.sequence_with([ident, alias], |values| {
        let [name, alias] = take(values);
        SqlNode::Relation(Relation {
            name: unwrap_node!(name, Ident),
            alias: unwrap_node!(alias, Alias),
        })
    });
    g.rename(relation, "relation");
    let rels_rest = g.alternation([]);
    let more_rels = g.sequence_with([comma, relation, rels_rest], |values| {
        let [_, relation, rest] = take(values);
        let mut relations = unwrap_node!(rest, Relations);
        relations.insert(0, unwrap_node!(relation, Relation));
        SqlNode::Relations(relations)
    });
    let no_rels = g.empty_with(|| SqlNode::Relations(Vec::new()));
    g.set_children(rels_rest, [more_rels, no_rels])?;
    let relations = g.sequence_with([relation, rels_rest], |values| {
        let [first, rest] = take(values);
        let mut relations = unwrap_node!(rest, Relations);
        relations.insert(0, unwrap_node!(first, Relation));
        SqlNode::Relations(relations)
    });
    g.rename(relations, "relations");

    // condition
    let filter = g.sequence_with([where_kw, expr], |values| {
        let [_, condition] = take(values);
        SqlNode::Condition(Some(unwrap_node!(condition, Expr)))
    });
    let no_filter = g.empty_with(|| SqlNode::Condition(None));
    let condition = g.alternation([filter, no_filter]);
    g.rename(condition, "condition");

    let select = g.sequence_with(
        [select_kw, items, from_kw, relations, condition],
        |values| {
            let [_, items, _, relations, condition] = take(values);
            SqlNode::Select(SelectStatement {
                items: unwrap_node!(items, Items),
                relations: unwrap_node!(relations, Relations),
                condition: unwrap_node!(condition, Condition),
            })
        },
    );
    g.rename(select, "select");
    g.set_root(select)?;

    Ok(g)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unquote() {
        assert_eq!(unquote("'abc'"), "abc");
        assert_eq!(unquote("'it''s'"), "it's");
        assert_eq!(unquote("''"), "");
    }

    #[test]
    fn test_grammar_builds() {
        let g = build().unwrap();
        assert_eq!(g.token_types()[0].name(), "WS");
        assert!(g.token_types()[0].is_ignored());
        let root = g.root().unwrap();
        assert_eq!(g.name(root), Some("select"));
    }

    #[test]
    fn test_into_select() {
        assert!(SqlNode::Skip.into_select().is_none());
    }
}
