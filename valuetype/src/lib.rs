//! FACTUM Value Type Compiler
//!
//! Compiles value type definitions (supertype, length, scale, unit, value
//! constraint), unit definitions, and named value type parameters with
//! their supertype-aware restriction narrowing rules.

mod error;
mod parameter;
mod unit;
mod value_type;

pub use error::{ValueTypeError, ValueTypeResult};
pub use parameter::apply_parameter_actions;
pub use unit::compile_unit;
pub use value_type::compile_value_type;
