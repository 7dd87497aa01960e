//! Compiled constraint forms.

use factum_core::{RoleId, RoleSequenceId, ValueRange};
use std::fmt;

/// A compiled constraint of any kind.
#[derive(Debug, Clone)]
pub enum Constraint {
    Presence(PresenceConstraint),
    Subset(SubsetConstraint),
    SetEquality(SetEqualityConstraint),
    SetExclusion(SetExclusionConstraint),
    Ring(RingConstraint),
    Value(ValueConstraint),
}

impl Constraint {
    /// The enforcement slot shared by all constraint kinds.
    pub fn enforcement_mut(&mut self) -> &mut Option<Enforcement> {
        match self {
            Constraint::Presence(c) => &mut c.enforcement,
            Constraint::Subset(c) => &mut c.enforcement,
            Constraint::SetEquality(c) => &mut c.enforcement,
            Constraint::SetExclusion(c) => &mut c.enforcement,
            Constraint::Ring(c) => &mut c.enforcement,
            Constraint::Value(c) => &mut c.enforcement,
        }
    }

    /// The kind name, for diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Constraint::Presence(_) => "presence constraint",
            Constraint::Subset(_) => "subset constraint",
            Constraint::SetEquality(_) => "set equality constraint",
            Constraint::SetExclusion(_) => "set exclusion constraint",
            Constraint::Ring(_) => "ring constraint",
            Constraint::Value(_) => "value constraint",
        }
    }

    pub fn as_presence(&self) -> Option<&PresenceConstraint> {
        match self {
            Constraint::Presence(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_ring(&self) -> Option<&RingConstraint> {
        match self {
            Constraint::Ring(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_value(&self) -> Option<&ValueConstraint> {
        match self {
            Constraint::Value(c) => Some(c),
            _ => None,
        }
    }
}

/// Frequency of a role combination within the population of a fact type.
#[derive(Debug, Clone)]
pub struct PresenceConstraint {
    pub name: String,
    pub role_sequence: RoleSequenceId,
    pub min_frequency: Option<u32>,
    pub max_frequency: Option<u32>,
    pub is_mandatory: bool,
    pub is_preferred_identifier: bool,
    pub enforcement: Option<Enforcement>,
}

/// One role sequence's population is a subset of another's.
#[derive(Debug, Clone)]
pub struct SubsetConstraint {
    pub subset_role_sequence: RoleSequenceId,
    pub superset_role_sequence: RoleSequenceId,
    pub enforcement: Option<Enforcement>,
}

/// The populations of all role sequences are equal.
#[derive(Debug, Clone)]
pub struct SetEqualityConstraint {
    pub role_sequences: Vec<RoleSequenceId>,
    pub enforcement: Option<Enforcement>,
}

/// The populations of all role sequences are mutually exclusive.
#[derive(Debug, Clone)]
pub struct SetExclusionConstraint {
    pub role_sequences: Vec<RoleSequenceId>,
    /// Exactly one, rather than at most one, must hold.
    pub is_mandatory: bool,
    pub enforcement: Option<Enforcement>,
}

/// Relational properties over a pair of roles with a common player ancestor.
#[derive(Debug, Clone)]
pub struct RingConstraint {
    pub role: RoleId,
    pub other_role: RoleId,
    pub ring_types: Vec<RingType>,
    pub enforcement: Option<Enforcement>,
}

/// The relational properties a ring constraint may assert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RingType {
    Acyclic,
    Intransitive,
    StronglyIntransitive,
    Symmetric,
    Asymmetric,
    Transitive,
    Antisymmetric,
    Irreflexive,
    Reflexive,
}

impl RingType {
    /// Parse a ring keyword as written in a declaration.
    pub fn parse(keyword: &str) -> Option<Self> {
        Some(match keyword {
            "acyclic" => RingType::Acyclic,
            "intransitive" => RingType::Intransitive,
            "stronglyintransitive" | "strongly-intransitive" => RingType::StronglyIntransitive,
            "symmetric" => RingType::Symmetric,
            "asymmetric" => RingType::Asymmetric,
            "transitive" => RingType::Transitive,
            "antisymmetric" => RingType::Antisymmetric,
            "irreflexive" => RingType::Irreflexive,
            "reflexive" => RingType::Reflexive,
            _ => return None,
        })
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RingType::Acyclic => "acyclic",
            RingType::Intransitive => "intransitive",
            RingType::StronglyIntransitive => "stronglyintransitive",
            RingType::Symmetric => "symmetric",
            RingType::Asymmetric => "asymmetric",
            RingType::Transitive => "transitive",
            RingType::Antisymmetric => "antisymmetric",
            RingType::Irreflexive => "irreflexive",
            RingType::Reflexive => "reflexive",
        }
    }
}

impl fmt::Display for RingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The ring types named among a clause's qualifier words.
pub fn clause_ring_types(qualifiers: &[String]) -> Vec<RingType> {
    qualifiers.iter().filter_map(|q| RingType::parse(q)).collect()
}

/// Allowed values: ranges or a regular expression, never both.
#[derive(Debug, Clone)]
pub struct ValueConstraint {
    pub ranges: Vec<ValueRange>,
    pub regular_expression: Option<String>,
    pub enforcement: Option<Enforcement>,
}

/// An enforcement directive attached to a constraint.
#[derive(Debug, Clone, PartialEq)]
pub struct Enforcement {
    pub action: String,
    pub agent: Option<String>,
}

/// A provenance note attached to a concept.
#[derive(Debug, Clone, PartialEq)]
pub struct ContextNote {
    pub kind: ContextNoteKind,
    pub description: String,
    pub according_to: Vec<String>,
    pub agreement: Option<Agreement>,
}

/// The kind of a context note.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextNoteKind {
    Because,
    SoThat,
    ToAvoid,
    AsOpposedTo,
}

/// Agreement metadata on a context note.
#[derive(Debug, Clone, PartialEq)]
pub struct Agreement {
    pub date: Option<String>,
    pub agents: Vec<String>,
}

/// A reference to any annotatable concept in the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConceptRef {
    ObjectType(factum_core::ObjectTypeId),
    FactType(factum_core::FactTypeId),
    Constraint(factum_core::ConstraintId),
}

/// A free-form annotation on a concept.
#[derive(Debug, Clone)]
pub struct ConceptAnnotation {
    pub concept: ConceptRef,
    pub text: String,
}
