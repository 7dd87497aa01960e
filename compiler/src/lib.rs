//! FACTUM Compiler
//!
//! The per-declaration driver: dispatches each classified declaration to
//! the compiler that owns it (value type, unit, fact type, constraint),
//! keeping the term index current as new object types appear.
//!
//! One declaration compiles to completion before the next begins; a fatal
//! error aborts only the declaration that raised it, and the caller decides
//! whether to continue with the rest.

mod compiler;
mod error;
mod fact_type;

pub use compiler::{CompiledValue, Compiler};
pub use error::{CompileError, CompileResult};
pub use fact_type::compile_fact_type;
