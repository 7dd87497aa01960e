//! Identity types for FACTUM schema objects.
//!
//! All identifiers are 32-bit arena indices that are:
//! - Unique within their store
//! - Immutable once assigned
//! - Opaque to external users

use std::fmt;

macro_rules! define_id {
    ($(#[$doc:meta])* $name:ident, $prefix:literal) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(pub u32);

        impl $name {
            /// Create a new id from a raw value.
            pub fn new(id: u32) -> Self {
                Self(id)
            }

            /// Get the raw value.
            pub fn raw(&self) -> u32 {
                self.0
            }

            /// Get the raw value as a usize index.
            pub fn index(&self) -> usize {
                self.0 as usize
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "{}"), self.0)
            }
        }
    };
}

define_id!(
    /// Unique identifier for an object type (value type or entity type).
    ObjectTypeId,
    "ot"
);
define_id!(
    /// Unique identifier for a fact type.
    FactTypeId,
    "ft"
);
define_id!(
    /// Unique identifier for a role within a fact type.
    RoleId,
    "r"
);
define_id!(
    /// Unique identifier for a reading of a fact type.
    ReadingId,
    "rd"
);
define_id!(
    /// Unique identifier for a role sequence.
    RoleSequenceId,
    "rs"
);
define_id!(
    /// Unique identifier for a constraint.
    ConstraintId,
    "c"
);
define_id!(
    /// Unique identifier for a derived query.
    QueryId,
    "q"
);
define_id!(
    /// Unique identifier for a query variable.
    VariableId,
    "v"
);
define_id!(
    /// Unique identifier for a query step.
    StepId,
    "s"
);
define_id!(
    /// Unique identifier for a play (a role occurrence within a step).
    PlayId,
    "pl"
);
define_id!(
    /// Unique identifier for a unit.
    UnitId,
    "u"
);
define_id!(
    /// Unique identifier for a value type parameter.
    ParameterId,
    "p"
);
define_id!(
    /// Unique identifier for a node in an expression graph.
    ExpressionId,
    "x"
);
