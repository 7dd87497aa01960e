//! Constraint compiler error types.

use factum_binder::BinderError;
use factum_model::ModelError;
use factum_query::QueryError;
use thiserror::Error;

/// Errors that can occur during constraint compilation.
#[derive(Debug, Error)]
pub enum ConstraintError {
    /// A presence constraint over a join, which is unsupported.
    #[error("Join presence constraints are not supported: {clause}")]
    JoinPresenceUnsupported { clause: String },

    /// An either/or presence form with other than one duplicated role.
    #[error("Either/or must have only one duplicated role, found {count}")]
    EitherOrAmbiguity { count: usize },

    /// A constrained occurrence whose fact type role was never attached.
    #[error("Fact type role not found for '{term}'")]
    RoleNotFound { term: String },

    /// The constraint's clause lists share no role player.
    #[error("A {kind} must cover some of the same roles")]
    NoCommonBinding { kind: &'static str },

    /// A common binding was not reached by any play of a built query.
    #[error("Constrained player '{term}' is not reached by the query")]
    MissingProjection { term: String },

    /// More than one role pair qualifies for a ring constraint.
    #[error("Ambiguous ring constraint, consider {pairs}")]
    RingAmbiguity { pairs: String },

    /// No role pair with a common supertype qualifies for a ring constraint.
    #[error("No matching role pair found for ring constraint over {players}")]
    RingNoMatch { players: String },

    /// Two ring type keywords that may not be combined.
    #[error("Incompatible ring constraint types ({first}, {second})")]
    RingIncompatible { first: String, second: String },

    /// Units on value constraints are recognized but unsupported.
    #[error("Units on value constraints are not yet processed")]
    UnitsOnValueConstraint,

    /// A value constraint carrying both ranges and a regular expression.
    #[error("A value constraint may have value ranges or a regular expression, not both")]
    MixedValueConstraint,

    /// An unparsable regular expression in a value constraint.
    #[error("Invalid regular expression /{pattern}/: {reason}")]
    InvalidRegex { pattern: String, reason: String },

    #[error(transparent)]
    Binder(#[from] BinderError),

    #[error(transparent)]
    Query(#[from] QueryError),

    #[error(transparent)]
    Model(#[from] ModelError),
}

/// Result type for constraint compiler operations.
pub type ConstraintResult<T> = Result<T, ConstraintError>;
