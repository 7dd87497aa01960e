//! FACTUM Expression Compiler
//!
//! Compiles expression trees into the binder's clause arena, synthesizing
//! an implicit fact type the first time each operator and operand-type
//! combination is used, and into normalized expression graphs for derived
//! fact types.
//!
//! An operation behaves two ways at once: viewed as a result it is a noun
//! phrase with its own binding; viewed as a fact it is a clause with a
//! (synthesized) fact type. The exception is an equality comparison that is
//! merely a projection: it is dropped and replaced by its referenced operand.

mod compile;
mod error;
mod graph;

pub use compile::{
    apply_projections, ingest_conditions, ingest_operation, match_operation_fact_type,
    CompiledConditions,
};
pub use error::{ExprError, ExprResult};
pub use graph::compile_expression_graph;
