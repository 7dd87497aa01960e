//! Assertions over compiled models.

use factum_core::{ConstraintId, RoleSequenceId};
use factum_model::{Constellation, Constraint};

/// The player names of a role sequence, in order.
pub fn role_sequence_players(model: &Constellation, rs: RoleSequenceId) -> Vec<String> {
    model
        .role_sequence(rs)
        .role_refs
        .iter()
        .map(|rr| {
            model
                .object_type_def(model.role(rr.role).object_type)
                .name
                .clone()
        })
        .collect()
}

/// The player names projected by each of a constraint's role sequences.
pub fn constraint_role_players(model: &Constellation, id: ConstraintId) -> Vec<Vec<String>> {
    let sequences: Vec<RoleSequenceId> = match model.constraint(id) {
        Constraint::Presence(c) => vec![c.role_sequence],
        Constraint::Subset(c) => vec![c.subset_role_sequence, c.superset_role_sequence],
        Constraint::SetEquality(c) => c.role_sequences.clone(),
        Constraint::SetExclusion(c) => c.role_sequences.clone(),
        Constraint::Ring(_) | Constraint::Value(_) => Vec::new(),
    };
    sequences
        .into_iter()
        .map(|rs| role_sequence_players(model, rs))
        .collect()
}
