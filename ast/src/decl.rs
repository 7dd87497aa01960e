//! Classified declarations as delivered by the parser.

use crate::{
    Clause, ClauseList, Condition, ContextNote, Enforcement, NounPhrase, Quantifier, Span,
};
use factum_core::Value;

/// One top-level declaration, already classified by kind.
#[derive(Debug, Clone, PartialEq)]
pub enum Definition {
    Schema(SchemaDecl),
    ValueType(ValueTypeDecl),
    Unit(UnitDecl),
    FactType(FactTypeDecl),
    Constraint(ConstraintDecl),
}

/// A schema (vocabulary) header.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaDecl {
    pub name: String,
    pub version: Option<String>,
    pub span: Span,
}

/// A value type definition, e.g. `Age is written as Integer(32);`.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueTypeDecl {
    pub name: String,
    /// The base (supertype) value type name; equal to `name` for a root type.
    pub base_name: String,
    /// Ordered parameters: length and scale.
    pub length: Option<u32>,
    pub scale: Option<u32>,
    /// Named parameter actions, in declaration order.
    pub parameters: Vec<ParameterAction>,
    /// Unit name and exponent, if any.
    pub unit: Option<(String, i32)>,
    pub value_constraint: Option<ValueConstraintDecl>,
    pub pragmas: Vec<String>,
    pub context_note: Option<ContextNote>,
    /// Transaction phase at which values are auto-assigned, if any.
    pub auto_assigned_at: Option<String>,
    pub span: Span,
}

/// A named-parameter action within a value type definition.
#[derive(Debug, Clone, PartialEq)]
pub enum ParameterAction {
    /// Introduce a named, typed parameter on this value type.
    Definition {
        name: String,
        value_type: String,
        restriction: Option<ParameterRestrictionDecl>,
    },
    /// Narrow an inherited parameter's allowed value set at this type.
    Restriction {
        name: String,
        restriction: ParameterRestrictionDecl,
    },
    /// Fix an inherited parameter to a single value at this type.
    Setting { name: String, value: Value },
}

/// The allowed-value form of a parameter restriction.
#[derive(Debug, Clone, PartialEq)]
pub enum ParameterRestrictionDecl {
    /// An explicit set of allowed values and ranges.
    Ranges(Vec<RangeDecl>),
    /// A `value <op> X` restriction with a style.
    Comparison {
        value: Value,
        style: RestrictionStyle,
    },
}

/// The style of a `value <op> X` restriction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestrictionStyle {
    /// Exactly the given value.
    Exact,
    /// The given value or more.
    Min,
    /// The given value or less.
    Max,
}

/// One element of a value range list.
#[derive(Debug, Clone, PartialEq)]
pub enum RangeDecl {
    /// A single allowed value.
    Single(Value),
    /// A range of allowed values, open on either side.
    Range {
        min: Option<Value>,
        max: Option<Value>,
    },
}

/// A unit definition.
#[derive(Debug, Clone, PartialEq)]
pub struct UnitDecl {
    pub singular: String,
    pub plural: Option<String>,
    pub numerator: f64,
    pub denominator: i64,
    pub offset: f64,
    /// Base units as (name, exponent) pairs.
    pub base_units: Vec<(String, i32)>,
    pub approximate: bool,
    pub ephemera_url: Option<String>,
    pub span: Span,
}

/// A fact type declaration: readings plus optional derivation conditions.
#[derive(Debug, Clone, PartialEq)]
pub struct FactTypeDecl {
    /// Objectifying name, if the fact type is named.
    pub name: Option<String>,
    pub readings: ClauseList,
    pub conditions: Vec<Condition>,
    pub pragmas: Vec<String>,
    pub span: Span,
}

/// A constraint declaration of any kind.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstraintDecl {
    pub body: ConstraintBody,
    pub enforcement: Option<Enforcement>,
    pub context_note: Option<ContextNote>,
    pub span: Span,
}

/// Kind-specific constraint content.
#[derive(Debug, Clone, PartialEq)]
pub enum ConstraintBody {
    /// `each <roles> occurs <quantifier> time(s) in <clauses>`
    Presence {
        clauses_lists: Vec<ClauseList>,
        role_list: Vec<NounPhrase>,
        quantifier: Quantifier,
    },
    /// `for each <roles> <quantifier> of these holds: <clauses>; ...`
    SetExclusion {
        clauses_lists: Vec<ClauseList>,
        role_list: Vec<NounPhrase>,
        quantifier: Quantifier,
    },
    /// `<clauses> if and only if <clauses>`
    SetEquality { clauses_lists: Vec<ClauseList> },
    /// `<subset clauses> only if <superset clauses>`
    Subset {
        subset: ClauseList,
        superset: ClauseList,
    },
    /// Allowed values on a value type or role.
    Value {
        constraint: ValueConstraintDecl,
        /// The value type the constraint applies to.
        value_type: String,
    },
}

/// A value constraint: ranges or a regular expression, never both.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ValueConstraintDecl {
    pub ranges: Vec<RangeDecl>,
    pub regular_expression: Option<String>,
    /// Unit name, if the source applied one (not supported downstream).
    pub units: Option<String>,
    pub enforcement: Option<Enforcement>,
    pub context_note: Option<ContextNote>,
}
