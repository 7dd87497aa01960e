//! FACTUM Model Repository
//!
//! The constellation: the repository of compiled schema objects. It holds
//! object types, fact types, roles, readings, role sequences, constraints,
//! derived queries, units, value type parameters, and expression graphs.
//!
//! All operations are lookup-or-create with stable handles: creating an
//! object returns an id usable as a relationship endpoint, and lookups that
//! find nothing return None, never an error.

mod constellation;
mod constraint;
mod error;
mod expression;
mod fact_type;
mod object_type;
mod parameter;
mod query;
mod signature;
mod unit;

pub use constellation::Constellation;
pub use constraint::*;
pub use error::{ModelError, ModelResult};
pub use expression::*;
pub use fact_type::*;
pub use object_type::*;
pub use parameter::*;
pub use query::*;
pub use signature::{reading_signature, SignaturePart};
pub use unit::*;
