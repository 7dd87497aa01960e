//! Clause and noun-phrase AST types.

use crate::{Comparison, ValueConstraintDecl};
use factum_core::Value;

/// Source location for error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub line: usize,
    pub column: usize,
}

impl Span {
    pub fn new(start: usize, end: usize, line: usize, column: usize) -> Self {
        Self {
            start,
            end,
            line,
            column,
        }
    }
}

/// How definitely a clause asserts its fact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Certainty {
    /// The fact definitely holds.
    #[default]
    Definite,
    /// The fact definitely does not hold.
    Negated,
    /// The fact possibly holds ("maybe").
    Possible,
}

/// A role name or subscript attached to a noun phrase.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RoleName {
    /// An explicit role name, e.g. "(as supervisor)".
    Name(String),
    /// A positional subscript, e.g. "(1)".
    Subscript(u16),
}

/// A literal with an optional unit name.
#[derive(Debug, Clone, PartialEq)]
pub struct Literal {
    pub value: Value,
    pub unit: Option<String>,
}

impl Literal {
    pub fn new(value: impl Into<Value>) -> Self {
        Self {
            value: value.into(),
            unit: None,
        }
    }

    pub fn with_unit(value: impl Into<Value>, unit: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            unit: Some(unit.into()),
        }
    }
}

/// One textual mention of a term within a declaration.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NounPhrase {
    /// The head term (the underlying global term).
    pub term: String,
    /// Adjective written before the term, if any.
    pub leading_adjective: Option<String>,
    /// Adjective written after the term, if any.
    pub trailing_adjective: Option<String>,
    /// Role name or subscript, if any.
    pub role_name: Option<RoleName>,
    /// Quantifier preceding the noun, if any.
    pub quantifier: Option<Quantifier>,
    /// Embedded value constraint, if any.
    pub value_constraint: Option<ValueConstraintDecl>,
    /// Literal value standing in for the noun, if any.
    pub literal: Option<Literal>,
    /// Nested clauses: an objectification or subordinate query.
    pub nested_clauses: Vec<Clause>,
    pub span: Span,
}

impl NounPhrase {
    pub fn new(term: impl Into<String>) -> Self {
        Self {
            term: term.into(),
            ..Default::default()
        }
    }
}

/// A quantifier over a role occurrence or constraint.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Quantifier {
    pub min: Option<u32>,
    pub max: Option<u32>,
    pub pragmas: Vec<String>,
}

impl Quantifier {
    pub fn new(min: Option<u32>, max: Option<u32>) -> Self {
        Self {
            min,
            max,
            pragmas: Vec::new(),
        }
    }

    /// "at most one time"
    pub fn at_most_one() -> Self {
        Self::new(None, Some(1))
    }

    /// "exactly one time"
    pub fn exactly_one() -> Self {
        Self::new(Some(1), Some(1))
    }
}

/// An element of a clause: either a connective word or a noun phrase.
#[derive(Debug, Clone, PartialEq)]
pub enum ClauseItem {
    /// A literal connective word, e.g. "has".
    Word(String),
    /// A noun phrase occurrence.
    Noun(NounPhrase),
}

impl ClauseItem {
    pub fn word(w: impl Into<String>) -> Self {
        ClauseItem::Word(w.into())
    }

    /// Get the contained noun phrase, if this item is one.
    pub fn as_noun(&self) -> Option<&NounPhrase> {
        match self {
            ClauseItem::Noun(np) => Some(np),
            ClauseItem::Word(_) => None,
        }
    }
}

/// An ordered sequence of noun phrases and connective words forming one
/// reading of a fact type.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Clause {
    pub items: Vec<ClauseItem>,
    /// Modality qualifier words attached to the clause.
    pub qualifiers: Vec<String>,
    pub certainty: Certainty,
    /// Conjunction word linking this clause to the prior one, if any.
    pub conjunction: Option<String>,
    pub context_note: Option<ContextNote>,
    pub span: Span,
}

impl Clause {
    pub fn new(items: Vec<ClauseItem>) -> Self {
        Self {
            items,
            ..Default::default()
        }
    }

    /// Iterate the noun phrases of this clause in reading order.
    pub fn nouns(&self) -> impl Iterator<Item = &NounPhrase> {
        self.items.iter().filter_map(ClauseItem::as_noun)
    }

    /// Whether any noun phrase carries a literal value.
    pub fn includes_literals(&self) -> bool {
        self.nouns().any(|np| np.literal.is_some())
    }

    /// Whether any noun phrase carries nested clauses.
    pub fn includes_nested_clauses(&self) -> bool {
        self.nouns().any(|np| !np.nested_clauses.is_empty())
    }
}

/// A list of clauses joined by conjunctions, read as one condition set.
pub type ClauseList = Vec<Clause>;

/// One clause within a query or condition list: a fact-type reading or a
/// comparison expression at clause level.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    Clause(Clause),
    Comparison(Comparison),
}

/// A provenance note attached to a definition or constraint.
#[derive(Debug, Clone, PartialEq)]
pub struct ContextNote {
    pub kind: ContextNoteKind,
    pub description: String,
    /// Agents the note is according to.
    pub according_to: Vec<String>,
    pub agreement: Option<Agreement>,
}

/// The kind of a context note.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextNoteKind {
    Because,
    SoThat,
    ToAvoid,
    AsOpposedTo,
}

/// Agreement metadata on a context note.
#[derive(Debug, Clone, PartialEq)]
pub struct Agreement {
    pub date: Option<String>,
    pub agents: Vec<String>,
}

/// An enforcement directive on a constraint.
#[derive(Debug, Clone, PartialEq)]
pub struct Enforcement {
    pub action: String,
    pub agent: Option<String>,
}

impl Enforcement {
    pub fn new(action: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            agent: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reading(subject: &str, verb: &str, object: &str) -> Clause {
        Clause::new(vec![
            ClauseItem::Noun(NounPhrase::new(subject)),
            ClauseItem::word(verb),
            ClauseItem::Noun(NounPhrase::new(object)),
        ])
    }

    #[test]
    fn test_clause_nouns_in_reading_order() {
        let clause = reading("Person", "has", "Name");
        let terms: Vec<_> = clause.nouns().map(|np| np.term.as_str()).collect();
        assert_eq!(terms, vec!["Person", "Name"]);
    }

    #[test]
    fn test_includes_literals() {
        let mut clause = reading("Person", "has", "Age");
        assert!(!clause.includes_literals());

        if let ClauseItem::Noun(np) = &mut clause.items[2] {
            np.literal = Some(Literal::new(21i64));
        }
        assert!(clause.includes_literals());
    }

    #[test]
    fn test_default_certainty_is_definite() {
        assert_eq!(Clause::default().certainty, Certainty::Definite);
    }
}
