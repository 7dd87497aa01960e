//! FACTUM Declaration AST
//!
//! The plain-data abstract syntax handed over by the parser: noun phrases,
//! clauses, expressions, and classified declarations. Everything here is
//! inert structured data with source spans; no resolution state lives in
//! this crate.

mod ast;
mod decl;
mod expr;

pub use ast::*;
pub use decl::*;
pub use expr::*;
