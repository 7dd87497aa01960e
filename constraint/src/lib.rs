//! FACTUM Constraint Compiler
//!
//! Compiles constraint declarations into their metamodel forms. Each kind
//! binds its clause lists through the reference resolution engine, applies
//! its loose-binding policy, and derives role sequences either directly
//! (single plain clause) or through a built query (joins, literals, nested
//! clauses).

mod compiler;
mod error;
mod ring;
mod value;

pub use compiler::{
    compile_constraint, compile_context_note, compile_enforcement, ConstraintCompiler,
};
pub use error::{ConstraintError, ConstraintResult};
pub use ring::{compatible_ring_types, compile_ring};
pub use value::{compile_range, compile_value_constraint};
