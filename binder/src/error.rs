//! Binder error types.

use factum_model::ModelError;
use thiserror::Error;

/// Errors that can occur during reference resolution.
#[derive(Debug, Error)]
pub enum BinderError {
    /// A term could not be matched to any known or forward-allowed object type.
    #[error("Unresolved term '{term}'")]
    UnresolvedTerm { term: String },

    /// Nested clauses exceeded the defensive recursion bound.
    #[error("Clauses are nested deeper than {depth} levels")]
    NestingTooDeep { depth: usize },

    /// A noun phrase survived binding without a binding attached.
    #[error("Noun phrase '{term}' must have a binding")]
    UnboundPhrase { term: String },

    /// Loose binding found more than one equally valid candidate.
    #[error("Binding for '{term}' is ambiguous: {count} equally valid candidates")]
    AmbiguousBinding { term: String, count: usize },

    /// A constraint-listed role never matched any clause's binding.
    #[error("The constrained role '{term}' was not found in the invoked fact types")]
    ConstrainedRoleNotFound { term: String },

    /// A clause in a constraint matched no known fact type.
    #[error("Unrecognised fact type '{clause}'")]
    UnmatchedClause { clause: String },

    /// A negated clause where negation is not supported.
    #[error("Negated fact type '{clause}' is not yet supported here")]
    NegatedClauseUnsupported { clause: String },

    #[error(transparent)]
    Model(#[from] ModelError),
}

impl BinderError {
    pub fn unresolved_term(term: impl Into<String>) -> Self {
        Self::UnresolvedTerm { term: term.into() }
    }

    pub fn ambiguous_binding(term: impl Into<String>, count: usize) -> Self {
        Self::AmbiguousBinding {
            term: term.into(),
            count,
        }
    }

    pub fn constrained_role_not_found(term: impl Into<String>) -> Self {
        Self::ConstrainedRoleNotFound { term: term.into() }
    }
}

/// Result type for binder operations.
pub type BinderResult<T> = Result<T, BinderError>;
