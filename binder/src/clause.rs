//! The per-declaration clause and phrase arena.
//!
//! The binder flattens a declaration's clause tree into indexed records so
//! that resolution state (player, binding, role) can be attached by index
//! while other records are being read.

use factum_ast::{Certainty, ComparisonOp, Literal, Quantifier, RoleName, ValueConstraintDecl};
use factum_core::{FactTypeId, ObjectTypeId, ReadingId, RoleId};
use std::fmt;

/// Index of a clause in the context's clause arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClauseIx(pub u32);

impl ClauseIx {
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

/// Index of a phrase in the context's phrase arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PhraseIx(pub u32);

impl PhraseIx {
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

/// One clause of the declaration being compiled.
#[derive(Debug)]
pub struct BoundClause {
    pub kind: ClauseKind,
    /// For a reading: words and nouns in reading order.
    /// For an operation: the operand phrases in operand order.
    pub phrases: Vec<PhraseIx>,
    pub certainty: Certainty,
    pub qualifiers: Vec<String>,
    pub conjunction: Option<String>,
    /// The fact type this clause matched or created, once known.
    pub fact_type: Option<FactTypeId>,
    /// The reading this clause matched or created, once known.
    pub reading: Option<ReadingId>,
    /// For an operation: the result player, once identified.
    pub result_player: Option<ObjectTypeId>,
    /// For an operation: the synthesized result phrase, once bound.
    pub result: Option<PhraseIx>,
}

impl BoundClause {
    pub fn is_operation(&self) -> bool {
        matches!(self.kind, ClauseKind::Operation(_))
    }
}

/// What kind of clause this is.
#[derive(Debug, Clone, PartialEq)]
pub enum ClauseKind {
    /// A fact type reading: nouns and connective words.
    Reading,
    /// An operator applied to operands, itself readable as a fact type.
    Operation(Operator),
}

/// The operators an operation clause may apply.
#[derive(Debug, Clone, PartialEq)]
pub enum Operator {
    Sum,
    Product,
    Reciprocal,
    Negate,
    LogicalAnd,
    LogicalOr,
    LogicalNot,
    Ternary,
    Aggregate(String),
    Compare(ComparisonOp),
}

impl Operator {
    /// The operator's symbol as it appears in the synthesized reading.
    pub fn symbol(&self) -> String {
        match self {
            Operator::Sum => "+".to_string(),
            Operator::Product => "*".to_string(),
            Operator::Reciprocal => "1/".to_string(),
            Operator::Negate => "0-".to_string(),
            Operator::LogicalAnd => "and".to_string(),
            Operator::LogicalOr => "or".to_string(),
            Operator::LogicalNot => "not".to_string(),
            Operator::Ternary => "?".to_string(),
            Operator::Aggregate(op) => op.clone(),
            Operator::Compare(op) => op.as_str().to_string(),
        }
    }

    /// Whether this is an equality comparison.
    pub fn is_equality(&self) -> bool {
        matches!(self, Operator::Compare(ComparisonOp::Eq))
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.symbol())
    }
}

/// One phrase of a clause.
#[derive(Debug)]
pub enum BoundPhrase {
    /// A literal connective word.
    Word(String),
    /// A noun phrase occurrence with its resolution state.
    Noun(NounRecord),
    /// An operand that is itself an operation clause; its value is the
    /// operation's result.
    Operation(ClauseIx),
}

impl BoundPhrase {
    pub fn as_noun(&self) -> Option<&NounRecord> {
        match self {
            BoundPhrase::Noun(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_noun_mut(&mut self) -> Option<&mut NounRecord> {
        match self {
            BoundPhrase::Noun(n) => Some(n),
            _ => None,
        }
    }
}

/// A noun phrase occurrence and its resolution state.
#[derive(Debug)]
pub struct NounRecord {
    pub term: String,
    pub leading_adjective: Option<String>,
    pub trailing_adjective: Option<String>,
    pub role_name: Option<RoleName>,
    pub quantifier: Option<Quantifier>,
    pub literal: Option<Literal>,
    pub value_constraint: Option<ValueConstraintDecl>,
    /// Nested clauses (objectification or subordinate query).
    pub nested_clauses: Vec<ClauseIx>,
    /// The clause this noun occurs in; None for bare role-list nouns.
    pub clause: Option<ClauseIx>,

    /// The resolved player, once identified.
    pub player: Option<ObjectTypeId>,
    /// Whether the player was resolved through the role-name table.
    pub resolved_by_role_name: bool,
    /// The binding this occurrence joined, once bound.
    pub binding: Option<super::BindingIx>,
    /// The fact type role this occurrence plays, once matched.
    pub role: Option<RoleId>,
}

impl NounRecord {
    /// A synthesized noun standing for an operation's result.
    pub fn synthetic(
        term: impl Into<String>,
        clause: ClauseIx,
        player: ObjectTypeId,
    ) -> Self {
        Self {
            term: term.into(),
            leading_adjective: None,
            trailing_adjective: None,
            role_name: None,
            quantifier: None,
            literal: None,
            value_constraint: None,
            nested_clauses: Vec::new(),
            clause: Some(clause),
            player: Some(player),
            resolved_by_role_name: false,
            binding: None,
            role: None,
        }
    }

    /// The adjectives used for disambiguation, when no role name applies.
    pub fn adjectives(&self) -> (Option<&str>, Option<&str>) {
        (
            self.leading_adjective.as_deref(),
            self.trailing_adjective.as_deref(),
        )
    }

    /// Display form for diagnostics, e.g. "given-Name".
    pub fn describe(&self) -> String {
        let mut s = String::new();
        if let Some(adj) = &self.leading_adjective {
            s.push_str(adj);
            s.push('-');
        }
        s.push_str(&self.term);
        if let Some(adj) = &self.trailing_adjective {
            s.push('-');
            s.push_str(adj);
        }
        if let Some(RoleName::Name(rn)) = &self.role_name {
            s.push_str(" (as ");
            s.push_str(rn);
            s.push(')');
        }
        s
    }
}
