//! FACTUM Query Builder
//!
//! Converts a bound clause list into a derived query: one variable per
//! distinct binding, one step per clause that carries a fact type, and one
//! play per role occurrence. Objectified nested clauses recurse into
//! sub-steps before their outer clause's plays are created.

mod builder;
mod error;

pub use builder::{build_all_steps, build_query, build_step, build_variables, RolesByBinding};
pub use error::{QueryError, QueryResult};
