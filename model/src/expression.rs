//! Normalized expression graphs for derived fact types.

use factum_core::{ExpressionId, ObjectTypeId};

/// One node of an expression graph.
#[derive(Debug, Clone)]
pub struct ExpressionNode {
    pub kind: ExpressionKind,
}

/// Expression node kinds.
#[derive(Debug, Clone)]
pub enum ExpressionKind {
    /// A literal constant, kept in source form.
    Literal { literal: String, is_string: bool },
    /// A reference to a role player.
    Term { object_type: ObjectTypeId },
    /// A unary operation.
    Unary {
        operator: String,
        operand: ExpressionId,
    },
    /// A binary operation.
    Binary {
        operator: String,
        first: ExpressionId,
        second: ExpressionId,
    },
    /// A ternary operation.
    Ternary {
        operator: String,
        first: ExpressionId,
        second: ExpressionId,
        third: ExpressionId,
    },
}
