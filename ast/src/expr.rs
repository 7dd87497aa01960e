//! Expression AST types.
//!
//! Expressions appear in derived fact type conditions and in comparison
//! clauses. Subtraction and division arrive pre-lowered by the parser:
//! `a - b` is `Sum(a, Negate(b))` and `a / b` is `Product(a, Reciprocal(b))`.

use crate::{Certainty, Literal, NounPhrase};
use std::fmt;

/// An expression tree node.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    /// A bare noun phrase operand.
    Noun(NounPhrase),
    /// A literal operand.
    Literal(Literal),
    /// Addition of two or more terms.
    Sum(Vec<Expression>),
    /// Arithmetic negation of one term.
    Negate(Box<Expression>),
    /// Multiplication of two or more factors.
    Product(Vec<Expression>),
    /// Multiplicative inverse of one factor.
    Reciprocal(Box<Expression>),
    /// Logical conjunction.
    LogicalAnd(Vec<Expression>),
    /// Logical disjunction.
    LogicalOr(Vec<Expression>),
    /// Logical negation.
    LogicalNot(Box<Expression>),
    /// Conditional choice.
    Ternary {
        condition: Box<Expression>,
        if_true: Box<Expression>,
        if_false: Box<Expression>,
    },
    /// An aggregate function over an operand.
    Aggregate {
        operation: String,
        aggregand: Box<Expression>,
    },
    /// A comparison of two expressions.
    Comparison(Box<Comparison>),
}

impl Expression {
    /// Get the bare noun phrase if this expression is one.
    pub fn as_noun(&self) -> Option<&NounPhrase> {
        match self {
            Expression::Noun(np) => Some(np),
            _ => None,
        }
    }
}

/// A comparison of two expressions.
#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    pub operator: ComparisonOp,
    pub lhs: Expression,
    pub rhs: Expression,
    pub certainty: Certainty,
    pub qualifiers: Vec<String>,
    pub conjunction: Option<String>,
}

impl Comparison {
    pub fn new(operator: ComparisonOp, lhs: Expression, rhs: Expression) -> Self {
        Self {
            operator,
            lhs,
            rhs,
            certainty: Certainty::Definite,
            qualifiers: Vec::new(),
            conjunction: None,
        }
    }

    /// Whether this is an equality comparison (a candidate projection).
    pub fn is_equality(&self) -> bool {
        self.operator == ComparisonOp::Eq
    }
}

/// Comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComparisonOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl ComparisonOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            ComparisonOp::Eq => "=",
            ComparisonOp::Ne => "<>",
            ComparisonOp::Lt => "<",
            ComparisonOp::Le => "<=",
            ComparisonOp::Gt => ">",
            ComparisonOp::Ge => ">=",
        }
    }
}

impl fmt::Display for ComparisonOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
