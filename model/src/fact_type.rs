//! Fact types, roles, readings and role sequences.

use factum_core::{
    ExpressionId, FactTypeId, ObjectTypeId, PlayId, QueryId, ReadingId, RoleId, RoleSequenceId,
};

/// A fact type: a relationship kind over an ordered set of roles.
#[derive(Debug, Clone, Default)]
pub struct FactType {
    pub roles: Vec<RoleId>,
    pub readings: Vec<ReadingId>,
    /// The entity type objectifying this fact type, if any.
    pub objectified_as: Option<ObjectTypeId>,
    /// Derivation query, when the fact type is derived from conditions.
    pub derivation: Option<QueryId>,
    /// Value derivation expression, when the fact type projects a computation.
    pub derivation_expression: Option<ExpressionId>,
}

/// One role of a fact type, played by an object type.
#[derive(Debug, Clone)]
pub struct Role {
    pub fact_type: FactTypeId,
    pub object_type: ObjectTypeId,
    /// Explicit role name, if the defining reading gave one.
    pub role_name: Option<String>,
}

/// One textual ordering of a fact type's roles, with connective words.
/// The text holds positional markers: `"{0} has {1}"`.
#[derive(Debug, Clone)]
pub struct Reading {
    pub fact_type: FactTypeId,
    pub ordinal: u16,
    pub role_sequence: RoleSequenceId,
    pub text: String,
}

/// An ordered projection of roles, used by readings and constraints.
#[derive(Debug, Clone, Default)]
pub struct RoleSequence {
    pub role_refs: Vec<RoleRef>,
}

/// One position in a role sequence.
#[derive(Debug, Clone)]
pub struct RoleRef {
    pub role: RoleId,
    pub leading_adjective: Option<String>,
    pub trailing_adjective: Option<String>,
    /// The play this projection position came from, when derived via a query.
    pub play: Option<PlayId>,
}

impl RoleRef {
    pub fn new(role: RoleId) -> Self {
        Self {
            role,
            leading_adjective: None,
            trailing_adjective: None,
            play: None,
        }
    }

    pub fn with_adjectives(
        role: RoleId,
        leading: Option<String>,
        trailing: Option<String>,
    ) -> Self {
        Self {
            role,
            leading_adjective: leading,
            trailing_adjective: trailing,
            play: None,
        }
    }
}
