//! AST of the SQL-like `SELECT` grammar
//!
//! `Display` renders normalised SQL. Operands of an operator that are themselves
//! operator expressions are wrapped in parentheses, so the rendering shows how an
//! expression was grouped: `a + b * c` renders as `a + (b * c)`.

use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectStatement {
    pub items: Vec<SelectItem>,
    pub relations: Vec<Relation>,
    pub condition: Option<Expr>,
}

/// One expression of the select list
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectItem {
    pub expr: Expr,
    pub alias: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Relation {
    pub name: String,
    pub alias: Option<String>,
}

/// A column reference, optionally qualified by relation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attr {
    pub relation: Option<String>,
    pub field: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Literal {
    Number(f64),
    String(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CompOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ArithOp {
    Add,
    Subtract,
    Multiply,
    Divide,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LogicalOp {
    And,
    Or,
}

/// A left-to-right run of operands joined by operators of equal precedence:
/// `first op₁ rest[0] op₂ rest[1] ...`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Chain<Op> {
    pub first: Box<Expr>,
    pub rest: Vec<(Op, Expr)>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Expr {
    Literal(Literal),
    Attr(Attr),
    Parens(Box<Expr>),
    Negative(Box<Expr>),
    Not(Box<Expr>),
    Compare {
        left: Box<Expr>,
        op: CompOp,
        right: Box<Expr>,
    },
    Arith(Chain<ArithOp>),
    Logical(Chain<LogicalOp>),
}

impl Expr {
    /// Join `first` with `rest`, or return `first` alone when there is nothing to join.
    pub fn arith(first: Expr, rest: Vec<(ArithOp, Expr)>) -> Expr {
        if rest.is_empty() {
            first
        } else {
            Expr::Arith(Chain {
                first: Box::new(first),
                rest,
            })
        }
    }

    pub fn logical(first: Expr, rest: Vec<(LogicalOp, Expr)>) -> Expr {
        if rest.is_empty() {
            first
        } else {
            Expr::Logical(Chain {
                first: Box::new(first),
                rest,
            })
        }
    }

    fn is_operator(&self) -> bool {
        matches!(
            self,
            Expr::Compare { .. } | Expr::Arith(_) | Expr::Logical(_)
        )
    }
}

/// Renders an operand, bracketing it when it is an operator expression itself
struct Operand<'a>(&'a Expr);

impl fmt::Display for Operand<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_operator() {
            write!(f, "({})", self.0)
        } else {
            write!(f, "{}", self.0)
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Number(n) => write!(f, "{}", n),
            Literal::String(s) => write!(f, "'{}'", s.replace('\'', "''")),
        }
    }
}

impl fmt::Display for Attr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.relation {
            Some(relation) => write!(f, "{}.{}", relation, self.field),
            None => write!(f, "{}", self.field),
        }
    }
}

impl fmt::Display for CompOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CompOp::Eq => "=",
            CompOp::Ne => "<>",
            CompOp::Lt => "<",
            CompOp::Le => "<=",
            CompOp::Gt => ">",
            CompOp::Ge => ">=",
        })
    }
}

impl fmt::Display for ArithOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ArithOp::Add => "+",
            ArithOp::Subtract => "-",
            ArithOp::Multiply => "*",
            ArithOp::Divide => "/",
        })
    }
}

impl fmt::Display for LogicalOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LogicalOp::And => "AND",
            LogicalOp::Or => "OR",
        })
    }
}

impl<Op: fmt::Display> fmt::Display for Chain<Op> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", Operand(&self.first))?;
        for (op, expr) in &self.rest {
            write!(f, " {} {}", op, Operand(expr))?;
        }
        Ok(())
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Literal(literal) => write!(f, "{}", literal),
            Expr::Attr(attr) => write!(f, "{}", attr),
            Expr::Parens(inner) => write!(f, "({})", inner),
            Expr::Negative(inner) => write!(f, "-{}", Operand(inner)),
            Expr::Not(inner) => write!(f, "NOT {}", Operand(inner)),
            Expr::Compare { left, op, right } => {
                write!(f, "{} {} {}", Operand(left), op, Operand(right))
            }
            Expr::Arith(chain) => write!(f, "{}", chain),
            Expr::Logical(chain) => write!(f, "{}", chain),
        }
    }
}

impl fmt::Display for SelectItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.expr)?;
        if let Some(alias) = &self.alias {
            write!(f, " AS {}", alias)?;
        }
        Ok(())
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if let Some(alias) = &self.alias {
            write!(f, " AS {}", alias)?;
        }
        Ok(())
    }
}

fn join<T: fmt::Display>(f: &mut fmt::Formatter<'_>, items: &[T]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{}", item)?;
    }
    Ok(())
}

impl fmt::Display for SelectStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SELECT ")?;
        join(f, &self.items)?;
        f.write_str(" FROM ")?;
        join(f, &self.relations)?;
        if let Some(condition) = &self.condition {
            write!(f, " WHERE {}", condition)?;
        }
        Ok(())
    }
}
