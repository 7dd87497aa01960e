//! Building queries from bound clauses.

use crate::{QueryError, QueryResult};
use factum_ast::{Certainty, RoleName};
use factum_binder::{BindingIx, BoundPhrase, ClauseIx, CompilationContext};
use factum_core::{PlayId, QueryId, RoleId, StepId};
use log::trace;
use std::collections::HashMap;

/// The projected (role, play) reached for each binding, used by constraints
/// to assemble their projected role sequences.
pub type RolesByBinding = HashMap<BindingIx, (RoleId, PlayId)>;

/// Build a complete, validated query over a clause list.
pub fn build_query(
    ctx: &mut CompilationContext,
    clauses: &[ClauseIx],
) -> QueryResult<(QueryId, RolesByBinding)> {
    let query = build_variables(ctx, clauses)?;
    let roles_by_binding = build_all_steps(ctx, query, clauses)?;
    ctx.model.validate_query(query)?;
    Ok((query, roles_by_binding))
}

/// Make a variable for every binding present in these clauses.
pub fn build_variables(ctx: &mut CompilationContext, clauses: &[ClauseIx]) -> QueryResult<QueryId> {
    let query = ctx.model.add_query();
    trace!("building variables for query {}", query);
    for b in ctx.all_bindings_in_clauses(clauses)? {
        let binding = ctx.bindings.get(b);
        let player = binding.player;
        let role_name = match &binding.role_name {
            Some(RoleName::Name(name)) => Some(name.clone()),
            _ => None,
        };
        let literal = binding
            .phrases
            .iter()
            .find_map(|&p| ctx.noun(p).literal.clone());

        let variable = ctx.model.add_variable(query, player, role_name);
        ctx.bindings.set_variable(b, variable);
        if let Some(literal) = literal {
            let unit = literal
                .unit
                .as_deref()
                .and_then(|u| ctx.model.unit_by_name(u));
            ctx.model.set_variable_value(variable, literal.value, unit);
        }
    }
    Ok(query)
}

/// Build one step per clause, in clause order.
pub fn build_all_steps(
    ctx: &mut CompilationContext,
    query: QueryId,
    clauses: &[ClauseIx],
) -> QueryResult<RolesByBinding> {
    let mut roles_by_binding = RolesByBinding::new();
    trace!("building steps for query {}", query);
    for &clause in clauses {
        build_step(ctx, query, clause, &mut roles_by_binding)?;
    }
    Ok(roles_by_binding)
}

/// Build the step for one clause, recursing into objectified nested clauses.
///
/// A bare object type clause contributes no step of its own; its value is
/// its nested objectification step.
pub fn build_step(
    ctx: &mut CompilationContext,
    query: QueryId,
    clause: ClauseIx,
    roles_by_binding: &mut RolesByBinding,
) -> QueryResult<Option<StepId>> {
    let nouns = ctx.clause_nouns(clause);
    if nouns.is_empty() {
        return Ok(None);
    }

    let naked = ctx.is_naked_object_type(clause);
    let step = match ctx.clause(clause).fact_type {
        Some(fact_type) => {
            let certainty = ctx.clause(clause).certainty;
            Some(ctx.model.add_step(
                query,
                fact_type,
                certainty == Certainty::Negated,
                certainty == Certainty::Possible,
            ))
        }
        None if naked => None,
        None => {
            return Err(QueryError::UnmatchedClause {
                clause: ctx.clause_text(clause),
            });
        }
    };

    let roles = step_roles(ctx, clause, &nouns);
    let mut is_input = true;
    for (position, &p) in nouns.iter().enumerate() {
        // Objectified nested clauses become sub-steps first.
        let mut objectification_step = None;
        let nested = match ctx.phrase(p) {
            BoundPhrase::Noun(n) => n.nested_clauses.clone(),
            _ => Vec::new(),
        };
        for nested_clause in nested {
            let sub_step = build_step(ctx, query, nested_clause, roles_by_binding)?;
            if let Some(sub_step) = sub_step {
                objectification_step = Some(sub_step);
                let binding = ctx.phrase_binding(p).expect("bound noun");
                let player = ctx.bindings.get(binding).player;
                let objectifies = ctx.model.object_type_def(player).objectifies();
                if objectifies.is_some() && objectifies == ctx.clause(nested_clause).fact_type {
                    let variable = ctx.bindings.get(binding).variable.expect("variable built");
                    ctx.model.set_objectification_variable(sub_step, variable);
                }
            }
        }
        if naked {
            if !ctx.noun(p).nested_clauses.is_empty() && objectification_step.is_none() {
                return Err(QueryError::MissingObjectification {
                    clause: ctx.clause_text(clause),
                });
            }
            return Ok(objectification_step);
        }

        let step = step.expect("stepped clause");
        let binding = ctx.phrase_binding(p).expect("bound noun");
        let variable = ctx.bindings.get(binding).variable.expect("variable built");
        let role = roles[position];

        // A variable's player must satisfy the role's player exactly; a
        // resolvable mismatch would need an explicit subtyping step.
        let variable_player = ctx.model.variable(variable).object_type;
        let role_player = ctx.model.role(role).object_type;
        if variable_player != role_player {
            let reading = ctx.model.fact_type_text(ctx.model.step(step).fact_type);
            let role_name = ctx.model.object_type_def(role_player).name.clone();
            let variable_name = ctx.model.object_type_def(variable_player).name.clone();
            if ctx.model.common_supertype(variable_player, role_player).is_some() {
                return Err(QueryError::ImplicitSubtypingStep {
                    role_player: role_name,
                    variable_player: variable_name,
                    reading,
                });
            }
            return Err(QueryError::PlayerMismatch {
                role_player: role_name,
                variable_player: variable_name,
                reading,
            });
        }

        let play = ctx.model.add_play(step, role, variable, is_input);
        is_input = false;
        roles_by_binding.insert(binding, (role, play));
    }

    Ok(step)
}

/// The role at each noun position of a stepped clause.
fn step_roles(
    ctx: &CompilationContext,
    clause: ClauseIx,
    nouns: &[factum_binder::PhraseIx],
) -> Vec<RoleId> {
    if let Some(reading) = ctx.clause(clause).reading {
        return ctx
            .model
            .role_sequence(ctx.model.reading(reading).role_sequence)
            .role_refs
            .iter()
            .map(|rr| rr.role)
            .collect();
    }
    nouns
        .iter()
        .filter_map(|&p| match ctx.phrase(p) {
            BoundPhrase::Noun(n) => n.role,
            _ => None,
        })
        .collect()
}
