//! Integration test helpers for FACTUM.
//!
//! Tests build declaration ASTs directly (the parser is not part of this
//! workspace), so the helpers here keep scenario construction readable: a
//! mini reading notation, a schema builder, and model assertions.

mod builders;
mod inspect;

pub mod prelude {
    pub use crate::builders::{
        adorned, literal_noun, named, reading, schema, single, value_range, SchemaBuilder,
    };
    pub use crate::inspect::{constraint_role_players, role_sequence_players};
    pub use factum_ast::*;
    pub use factum_core::Value;
    pub use factum_model::{Constellation, Constraint, RingType};
}
