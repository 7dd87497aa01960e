//! Expression compiler error types.

use factum_binder::BinderError;
use factum_model::ModelError;
use thiserror::Error;

/// Errors that can occur during expression compilation.
#[derive(Debug, Error)]
pub enum ExprError {
    /// A negated or uncertain operand, which is recognized but unsupported.
    #[error("Negated or uncertain fact types in expressions are not yet supported: {text}")]
    UncertainOperand { text: String },

    /// An aggregate or operator form with no compilable operands.
    #[error("Expression '{text}' has no operands")]
    EmptyOperation { text: String },

    #[error(transparent)]
    Binder(#[from] BinderError),

    #[error(transparent)]
    Model(#[from] ModelError),
}

/// Result type for expression compiler operations.
pub type ExprResult<T> = Result<T, ExprError>;
