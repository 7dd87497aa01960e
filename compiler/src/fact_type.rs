//! Fact type declaration compilation.

use crate::{CompileError, CompileResult};
use factum_ast::FactTypeDecl;
use factum_binder::{
    ensure_fact_type, match_reading, BoundPhrase, ClauseIx, ClauseKind, CompilationContext,
};
use factum_core::FactTypeId;
use factum_expr::{
    apply_projections, compile_expression_graph, ingest_conditions, match_operation_fact_type,
};
use factum_model::{clause_ring_types, ConceptRef, Constellation, RoleRef};
use factum_query::build_query;
use log::trace;

/// Compile a fact type declaration: match or create the fact type from its
/// readings, compile any derivation conditions into a query, and objectify
/// the fact type when it is named.
pub fn compile_fact_type(
    model: &mut Constellation,
    decl: &FactTypeDecl,
) -> CompileResult<FactTypeId> {
    let mut ctx = CompilationContext::new(model);

    let reading_ixs = ctx.ingest_clauses(&decl.readings)?;
    let conditions = ingest_conditions(&mut ctx, &decl.conditions)?;

    let mut all = reading_ixs.clone();
    all.extend(&conditions.clauses);
    ctx.bind(&all, &conditions.extra_phrases)?;
    apply_projections(&mut ctx, &conditions)?;

    // The first reading matches an existing fact type or creates one; the
    // rest become alternate readings of the same fact type.
    let fact_type = ensure_fact_type(&mut ctx, reading_ixs[0])?;
    for &reading in &reading_ixs[1..] {
        match match_reading(&mut ctx, reading)? {
            Some(ft) if ft == fact_type => {}
            Some(_) => {
                return Err(CompileError::MixedReadings {
                    first: ctx.clause_text(reading_ixs[0]),
                    second: ctx.clause_text(reading),
                });
            }
            None => make_alternate_reading(&mut ctx, reading, fact_type, reading_ixs[0])?,
        }
    }

    // Conditions make this a derived fact type: every condition clause must
    // concern a known (or implicit operator) fact type, and together they
    // compile to a derivation query.
    if !conditions.clauses.is_empty() {
        for &clause in &conditions.clauses {
            match ctx.clause(clause).kind {
                ClauseKind::Reading => {
                    if match_reading(&mut ctx, clause)?.is_none()
                        && !ctx.is_naked_object_type(clause)
                    {
                        return Err(factum_binder::BinderError::UnmatchedClause {
                            clause: ctx.clause_text(clause),
                        }
                        .into());
                    }
                }
                ClauseKind::Operation(_) => {
                    match_operation_fact_type(&mut ctx, clause)?;
                }
            }
        }
        let (query, _roles_by_binding) = build_query(&mut ctx, &conditions.clauses)?;
        ctx.model.fact_type_mut(fact_type).derivation = Some(query);
        trace!("fact type {} derives from query {}", fact_type, query);
    }
    if let Some(expression) = &conditions.value_derivation {
        let graph = compile_expression_graph(&mut ctx, expression)?;
        ctx.model.fact_type_mut(fact_type).derivation_expression = Some(graph);
    }

    // Ring qualifiers on a reading constrain a role pair of its sequence.
    for &reading in &reading_ixs {
        let ring_types = clause_ring_types(&ctx.clause(reading).qualifiers);
        if !ring_types.is_empty() {
            let role_sequence = ctx
                .model
                .reading(ctx.clause(reading).reading.expect("matched reading"))
                .role_sequence;
            let _ = factum_constraint::compile_ring(ctx.model, role_sequence, &ring_types)?;
        }
    }

    drop(ctx);

    if let Some(name) = &decl.name {
        let entity_type = model.ensure_entity_type(name)?;
        model.set_objectifies(entity_type, fact_type);
        trace!("fact type {} objectified as '{}'", fact_type, name);
    }
    for pragma in &decl.pragmas {
        model.annotate(ConceptRef::FactType(fact_type), pragma.clone());
    }

    Ok(fact_type)
}

/// Create an alternate reading of an existing fact type, reusing the roles
/// reached by the first reading's bindings.
fn make_alternate_reading(
    ctx: &mut CompilationContext,
    clause: ClauseIx,
    fact_type: FactTypeId,
    first_reading: ClauseIx,
) -> CompileResult<()> {
    let mut role_by_binding = std::collections::HashMap::new();
    for p in ctx.clause_nouns(first_reading) {
        if let (Some(binding), Some(role)) = (ctx.phrase_binding(p), ctx.noun(p).role) {
            role_by_binding.insert(binding, role);
        }
    }

    let signature = factum_binder::clause_signature(ctx, clause)?;
    let nouns = ctx.clause_nouns(clause);
    let mut role_refs = Vec::with_capacity(nouns.len());
    for &p in &nouns {
        let binding = ctx
            .phrase_binding(p)
            .ok_or_else(|| factum_binder::BinderError::UnboundPhrase {
                term: ctx.clause_text(clause),
            })?;
        let Some(&role) = role_by_binding.get(&binding) else {
            return Err(CompileError::ReadingPlayerMismatch {
                reading: ctx.clause_text(clause),
                term: ctx.noun(p).term.clone(),
            });
        };
        let (leading, trailing) = match ctx.phrase(p) {
            BoundPhrase::Noun(n) => (n.leading_adjective.clone(), n.trailing_adjective.clone()),
            _ => (None, None),
        };
        role_refs.push(RoleRef::with_adjectives(role, leading, trailing));
        ctx.noun_mut(p).role = Some(role);
    }
    let role_sequence = ctx.model.add_role_sequence(role_refs);

    let mut words = Vec::new();
    let mut position = 0;
    for &p in &ctx.clause(clause).phrases.clone() {
        match ctx.phrase(p) {
            BoundPhrase::Word(w) => words.push(w.clone()),
            _ => {
                words.push(format!("{{{}}}", position));
                position += 1;
            }
        }
    }
    let reading = ctx
        .model
        .add_reading(fact_type, role_sequence, words.join(" "), signature);
    let bound = ctx.clause_mut(clause);
    bound.fact_type = Some(fact_type);
    bound.reading = Some(reading);
    Ok(())
}
