//! Ring constraint compilation.
//!
//! A ring constraint applies relational properties to exactly one pair of
//! roles whose players share a common supertype. Zero or several qualifying
//! pairs are fatal, as are incompatible keyword combinations.

use crate::{ConstraintError, ConstraintResult};
use factum_core::{ConstraintId, RoleSequenceId};
use factum_model::{Constellation, Constraint, RingConstraint, RingType};
use log::trace;

/// The ring type combinations that may be declared together.
/// Any unordered pair not listed here (and not a repetition) is rejected.
const COMPATIBLE_PAIRS: &[(RingType, &[RingType])] = &[
    (
        RingType::StronglyIntransitive,
        &[RingType::Acyclic, RingType::Asymmetric, RingType::Symmetric],
    ),
    (
        RingType::Intransitive,
        &[RingType::Acyclic, RingType::Asymmetric, RingType::Symmetric],
    ),
    (RingType::Transitive, &[RingType::Acyclic]),
    (RingType::Acyclic, &[RingType::Transitive]),
    (RingType::Irreflexive, &[RingType::Symmetric]),
];

/// Whether two ring type keywords may be combined.
/// The relation is symmetric, and every keyword combines with itself.
pub fn compatible_ring_types(first: RingType, second: RingType) -> bool {
    if first == second {
        return true;
    }
    let listed = |a: RingType, b: RingType| {
        COMPATIBLE_PAIRS
            .iter()
            .any(|(key, others)| *key == a && others.contains(&b))
    };
    listed(first, second) || listed(second, first)
}

/// Compile a ring constraint over a role sequence.
/// Returns None when no ring keywords were given.
pub fn compile_ring(
    model: &mut Constellation,
    role_sequence: RoleSequenceId,
    ring_types: &[RingType],
) -> ConstraintResult<Option<ConstraintId>> {
    if ring_types.is_empty() {
        return Ok(None);
    }

    // Find the unique role pair whose players share a common supertype.
    let role_refs = model.role_sequence(role_sequence).role_refs.clone();
    let supertypes_by_position: Vec<_> = role_refs
        .iter()
        .map(|rr| model.supertypes_transitive(model.role(rr.role).object_type))
        .collect();
    let mut role_pairs = Vec::new();
    for i in 0..supertypes_by_position.len() {
        for j in i + 1..supertypes_by_position.len() {
            let common = supertypes_by_position[i]
                .iter()
                .find(|st| supertypes_by_position[j].contains(st));
            if common.is_some() {
                role_pairs.push((i, j));
            }
        }
    }
    if role_pairs.len() > 1 {
        let pairs = role_pairs
            .iter()
            .map(|&(i, j)| {
                format!(
                    "{}<->{}",
                    model.object_type_def(model.role(role_refs[i].role).object_type).name,
                    model.object_type_def(model.role(role_refs[j].role).object_type).name
                )
            })
            .collect::<Vec<_>>()
            .join(", ");
        return Err(ConstraintError::RingAmbiguity { pairs });
    }
    let Some(&(i, j)) = role_pairs.first() else {
        let players = role_refs
            .iter()
            .map(|rr| model.object_type_def(model.role(rr.role).object_type).name.clone())
            .collect::<Vec<_>>()
            .join(", ");
        return Err(ConstraintError::RingNoMatch { players });
    };

    // Validate pairwise compatibility of the declared keywords.
    for (a, first) in ring_types.iter().enumerate() {
        for second in &ring_types[a + 1..] {
            if !compatible_ring_types(*first, *second) {
                return Err(ConstraintError::RingIncompatible {
                    first: first.to_string(),
                    second: second.to_string(),
                });
            }
        }
    }

    // Order the keywords so the combining types follow the plain ones.
    let combining: Vec<RingType> = COMPATIBLE_PAIRS.iter().map(|(key, _)| *key).collect();
    let (plain, special): (Vec<RingType>, Vec<RingType>) = ring_types
        .iter()
        .copied()
        .partition(|rt| !combining.contains(rt));
    let ordered: Vec<RingType> = plain.into_iter().chain(special).collect();

    let constraint = model.add_constraint(Constraint::Ring(RingConstraint {
        role: role_refs[i].role,
        other_role: role_refs[j].role,
        ring_types: ordered,
        enforcement: None,
    }));
    trace!("added ring constraint {}", constraint);
    Ok(Some(constraint))
}
