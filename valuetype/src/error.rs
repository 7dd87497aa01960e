//! Value type compiler error types.

use factum_constraint::ConstraintError;
use factum_model::ModelError;
use thiserror::Error;

/// Errors that can occur during value type compilation.
#[derive(Debug, Error)]
pub enum ValueTypeError {
    /// A unit name that is not defined.
    #[error("Unit {unit} for value type {value_type} is not defined")]
    UnknownUnit { unit: String, value_type: String },

    /// A parameter defined again anywhere in the supertype chain.
    #[error("You may not redefine parameter {parameter} of {value_type}")]
    ParameterRedefined {
        parameter: String,
        value_type: String,
    },

    /// A restriction or setting on a parameter that was never defined.
    #[error("Parameter {parameter} of {value_type} is not defined")]
    ParameterUndefined {
        parameter: String,
        value_type: String,
    },

    /// A parameter whose value type is not defined.
    #[error("Type {type_name} for parameter {parameter} of {value_type} is not defined")]
    UnknownParameterType {
        type_name: String,
        parameter: String,
        value_type: String,
    },

    /// A restriction for a parameter already restricted at this exact type.
    #[error("You can't change the existing restrictions on parameter {parameter} of {value_type}")]
    RestrictionRedefined {
        parameter: String,
        value_type: String,
    },

    /// A restriction that is not a subset of the nearest ancestor's.
    #[error("Value {value} is restricted by {restricted_by} to [{allowed}]")]
    RestrictionNarrowingViolation {
        value: String,
        restricted_by: String,
        allowed: String,
    },

    #[error(transparent)]
    Constraint(#[from] ConstraintError),

    #[error(transparent)]
    Model(#[from] ModelError),
}

/// Result type for value type compiler operations.
pub type ValueTypeResult<T> = Result<T, ValueTypeError>;
