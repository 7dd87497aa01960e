//! Query builder error types.

use factum_binder::BinderError;
use factum_model::ModelError;
use thiserror::Error;

/// Errors that can occur while building a query.
#[derive(Debug, Error)]
pub enum QueryError {
    /// A clause carried no fact type and is not a bare object type.
    #[error("Clause '{clause}' has no matched fact type")]
    UnmatchedClause { clause: String },

    /// A bare object type clause's nested clauses yielded no objectification.
    #[error("'{clause}' lacks a proper objectification")]
    MissingObjectification { clause: String },

    /// A variable/role player mismatch that a subtyping step could resolve.
    /// The step is recognized but deliberately not synthesized.
    #[error(
        "Implicit subtyping step from {role_player} to {variable_player} in '{reading}' is not supported"
    )]
    ImplicitSubtypingStep {
        role_player: String,
        variable_player: String,
        reading: String,
    },

    /// A variable/role player mismatch with no common supertype.
    #[error("A {role_player} cannot satisfy {variable_player} in '{reading}'")]
    PlayerMismatch {
        role_player: String,
        variable_player: String,
        reading: String,
    },

    #[error(transparent)]
    Binder(#[from] BinderError),

    #[error(transparent)]
    Model(#[from] ModelError),
}

/// Result type for query builder operations.
pub type QueryResult<T> = Result<T, QueryError>;
