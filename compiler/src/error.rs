//! Compiler error types.

use factum_binder::BinderError;
use factum_constraint::ConstraintError;
use factum_expr::ExprError;
use factum_model::ModelError;
use factum_query::QueryError;
use factum_valuetype::ValueTypeError;
use thiserror::Error;

/// Errors that can occur while compiling a declaration.
#[derive(Debug, Error)]
pub enum CompileError {
    /// A fact type declaration whose readings matched different fact types.
    #[error("Reading '{second}' already belongs to another fact type than '{first}'")]
    MixedReadings { first: String, second: String },

    /// An alternate reading mentioning a player absent from the first.
    #[error("Reading '{reading}' mentions '{term}', which plays no role in the fact type")]
    ReadingPlayerMismatch { reading: String, term: String },

    #[error(transparent)]
    Binder(#[from] BinderError),

    #[error(transparent)]
    Expr(#[from] ExprError),

    #[error(transparent)]
    Query(#[from] QueryError),

    #[error(transparent)]
    Constraint(#[from] ConstraintError),

    #[error(transparent)]
    ValueType(#[from] ValueTypeError),

    #[error(transparent)]
    Model(#[from] ModelError),
}

/// Result type for compiler operations.
pub type CompileResult<T> = Result<T, CompileError>;
