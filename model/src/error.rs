//! Model repository error types.

use thiserror::Error;

/// Errors that can occur while populating the model repository.
#[derive(Debug, Error)]
pub enum ModelError {
    /// A name is already taken by an object type of a different kind.
    #[error("'{name}' is already defined as {existing} and cannot be redefined as {wanted}")]
    NameClash {
        name: String,
        existing: &'static str,
        wanted: &'static str,
    },

    /// A set-once field of a value type was given a second, different value.
    #[error("You may not change the {field} of {name} from {from} to {to}")]
    Redefinition {
        field: &'static str,
        name: String,
        from: String,
        to: String,
    },

    /// A unit name was defined twice.
    #[error("Redefinition of unit {name}")]
    DuplicateUnit { name: String },

    /// A query referenced objects outside itself.
    #[error("Invalid query: {reason}")]
    InvalidQuery { reason: String },
}

impl ModelError {
    pub fn name_clash(name: impl Into<String>, existing: &'static str, wanted: &'static str) -> Self {
        Self::NameClash {
            name: name.into(),
            existing,
            wanted,
        }
    }

    pub fn redefinition(
        field: &'static str,
        name: impl Into<String>,
        from: impl ToString,
        to: impl ToString,
    ) -> Self {
        Self::Redefinition {
            field,
            name: name.into(),
            from: from.to_string(),
            to: to.to_string(),
        }
    }
}

/// Result type for model operations.
pub type ModelResult<T> = Result<T, ModelError>;
