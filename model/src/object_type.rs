//! Object types: value types and entity types.

use factum_core::{ConstraintId, FactTypeId, ObjectTypeId, UnitId};

/// An object type: the player of roles in fact types.
#[derive(Debug, Clone)]
pub struct ObjectType {
    pub id: ObjectTypeId,
    pub name: String,
    pub kind: ObjectTypeKind,
    /// Direct supertypes, most specific first.
    pub supertypes: Vec<ObjectTypeId>,
    /// Whether instances may exist independently of any fact.
    pub is_independent: bool,
}

/// Kind-specific object type content.
#[derive(Debug, Clone)]
pub enum ObjectTypeKind {
    ValueType(ValueTypeFacets),
    EntityType(EntityTypeFacets),
}

/// The set-once facets of a value type.
#[derive(Debug, Clone, Default)]
pub struct ValueTypeFacets {
    pub length: Option<u32>,
    pub scale: Option<u32>,
    pub unit: Option<UnitId>,
    pub value_constraint: Option<ConstraintId>,
    /// Transaction phase at which an auto-assigned value is allocated.
    pub auto_assigned_at: Option<String>,
}

/// The facets of an entity type.
#[derive(Debug, Clone, Default)]
pub struct EntityTypeFacets {
    /// The fact type this entity type objectifies, if any.
    pub objectifies: Option<FactTypeId>,
}

impl ObjectType {
    /// Whether this is a value type.
    pub fn is_value_type(&self) -> bool {
        matches!(self.kind, ObjectTypeKind::ValueType(_))
    }

    /// Whether this is an entity type.
    pub fn is_entity_type(&self) -> bool {
        matches!(self.kind, ObjectTypeKind::EntityType(_))
    }

    /// The kind name, for diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self.kind {
            ObjectTypeKind::ValueType(_) => "a value type",
            ObjectTypeKind::EntityType(_) => "an entity type",
        }
    }

    /// Value type facets, if this is a value type.
    pub fn value_facets(&self) -> Option<&ValueTypeFacets> {
        match &self.kind {
            ObjectTypeKind::ValueType(f) => Some(f),
            ObjectTypeKind::EntityType(_) => None,
        }
    }

    pub(crate) fn value_facets_mut(&mut self) -> Option<&mut ValueTypeFacets> {
        match &mut self.kind {
            ObjectTypeKind::ValueType(f) => Some(f),
            ObjectTypeKind::EntityType(_) => None,
        }
    }

    /// The fact type this object type objectifies, if any.
    pub fn objectifies(&self) -> Option<FactTypeId> {
        match &self.kind {
            ObjectTypeKind::EntityType(f) => f.objectifies,
            ObjectTypeKind::ValueType(_) => None,
        }
    }
}
