//! Matching clauses against existing fact type readings, and creating new
//! fact types from unmatched clause shapes.

use crate::{
    BinderError, BinderResult, BoundPhrase, ClauseIx, ClauseKind, CompilationContext, PhraseIx,
};
use factum_ast::RoleName;
use factum_core::FactTypeId;
use factum_model::{reading_signature, RoleRef, SignaturePart};
use log::trace;

/// Compute the structural signature of a clause: its connective words and
/// the player and adjectives at each noun position.
pub fn clause_signature(ctx: &CompilationContext, ix: ClauseIx) -> BinderResult<String> {
    let mut owned: Vec<(Option<String>, PhraseIx)> = Vec::new();
    let clause = ctx.clause(ix);
    match &clause.kind {
        ClauseKind::Reading => {
            for &p in &clause.phrases {
                match ctx.phrase(p) {
                    BoundPhrase::Word(w) => owned.push((Some(w.clone()), p)),
                    _ => owned.push((None, p)),
                }
            }
        }
        ClauseKind::Operation(op) => {
            // The synthesized reading is "<result> = [op0] <operator> <operands>".
            let result = clause.result.ok_or_else(|| BinderError::UnboundPhrase {
                term: ctx.clause_text(ix),
            })?;
            owned.push((None, result));
            owned.push((Some("=".to_string()), result));
            let operands = &clause.phrases;
            if operands.len() == 2 {
                owned.push((None, operands[0]));
                owned.push((Some(op.symbol()), operands[0]));
                owned.push((None, operands[1]));
            } else {
                owned.push((Some(op.symbol()), result));
                for &o in operands {
                    owned.push((None, o));
                }
            }
        }
    }

    let mut parts = Vec::new();
    for (word, p) in &owned {
        match word {
            Some(w) => parts.push(SignaturePart::Word(w)),
            None => {
                let player = ctx
                    .phrase_player(*p)
                    .ok_or_else(|| BinderError::UnboundPhrase {
                        term: ctx.clause_text(ix),
                    })?;
                let (leading, trailing) = match ctx.phrase(*p) {
                    BoundPhrase::Noun(n) => n.adjectives(),
                    _ => (None, None),
                };
                parts.push(SignaturePart::Role {
                    player,
                    leading_adjective: leading,
                    trailing_adjective: trailing,
                });
            }
        }
    }
    Ok(reading_signature(&parts))
}

/// Match a clause against the registered readings. On a match, the clause's
/// fact type and reading are attached and each noun phrase receives its role.
/// A naked object type clause matches nothing and is not an error here.
pub fn match_reading(
    ctx: &mut CompilationContext,
    ix: ClauseIx,
) -> BinderResult<Option<FactTypeId>> {
    if let Some(ft) = ctx.clause(ix).fact_type {
        return Ok(Some(ft));
    }
    if ctx.is_naked_object_type(ix) {
        return Ok(None);
    }
    let signature = clause_signature(ctx, ix)?;
    let Some(reading) = ctx.model.find_reading(&signature) else {
        return Ok(None);
    };
    let fact_type = ctx.model.reading(reading).fact_type;
    trace!(
        "clause '{}' matches existing reading {}",
        ctx.clause_text(ix),
        reading
    );
    assign_reading(ctx, ix, fact_type, reading);
    Ok(Some(fact_type))
}

/// Match a clause, or create a new fact type and reading from its shape.
pub fn ensure_fact_type(ctx: &mut CompilationContext, ix: ClauseIx) -> BinderResult<FactTypeId> {
    if let Some(ft) = match_reading(ctx, ix)? {
        return Ok(ft);
    }
    make_fact_type(ctx, ix)
}

/// Create a new fact type, roles and reading from a clause's shape.
pub fn make_fact_type(ctx: &mut CompilationContext, ix: ClauseIx) -> BinderResult<FactTypeId> {
    if ctx.is_naked_object_type(ix) {
        return Err(BinderError::UnmatchedClause {
            clause: ctx.clause_text(ix),
        });
    }
    let signature = clause_signature(ctx, ix)?;
    let nouns = ctx.clause_nouns(ix);

    let fact_type = ctx.model.add_fact_type();
    let mut role_refs = Vec::with_capacity(nouns.len());
    for &p in &nouns {
        let player = ctx.phrase_player(p).ok_or_else(|| BinderError::UnboundPhrase {
            term: ctx.clause_text(ix),
        })?;
        let (role_name, leading, trailing) = match ctx.phrase(p) {
            BoundPhrase::Noun(n) => (
                match &n.role_name {
                    Some(RoleName::Name(name)) => Some(name.clone()),
                    _ => None,
                },
                n.leading_adjective.clone(),
                n.trailing_adjective.clone(),
            ),
            _ => (None, None, None),
        };
        let role = ctx.model.add_role(fact_type, player, role_name);
        role_refs.push(RoleRef::with_adjectives(role, leading, trailing));
        if let BoundPhrase::Noun(_) = ctx.phrase(p) {
            ctx.noun_mut(p).role = Some(role);
        }
    }
    let role_sequence = ctx.model.add_role_sequence(role_refs);
    let text = reading_text(ctx, ix);
    let reading = ctx.model.add_reading(fact_type, role_sequence, text, signature);
    trace!(
        "created fact type {} for clause '{}'",
        fact_type,
        ctx.clause_text(ix)
    );

    let clause = ctx.clause_mut(ix);
    clause.fact_type = Some(fact_type);
    clause.reading = Some(reading);
    Ok(fact_type)
}

/// Attach a matched reading and distribute its roles over the clause's nouns.
fn assign_reading(
    ctx: &mut CompilationContext,
    ix: ClauseIx,
    fact_type: FactTypeId,
    reading: factum_core::ReadingId,
) {
    let roles: Vec<_> = ctx
        .model
        .role_sequence(ctx.model.reading(reading).role_sequence)
        .role_refs
        .iter()
        .map(|rr| rr.role)
        .collect();
    let nouns = ctx.clause_nouns(ix);
    for (&p, role) in nouns.iter().zip(roles) {
        if let BoundPhrase::Noun(_) = ctx.phrase(p) {
            ctx.noun_mut(p).role = Some(role);
        }
    }
    let clause = ctx.clause_mut(ix);
    clause.fact_type = Some(fact_type);
    clause.reading = Some(reading);
}

/// The positional reading text of a clause, e.g. `"{0} has {1}"`.
fn reading_text(ctx: &CompilationContext, ix: ClauseIx) -> String {
    let clause = ctx.clause(ix);
    let mut words = Vec::new();
    match &clause.kind {
        ClauseKind::Reading => {
            let mut position = 0;
            for &p in &clause.phrases {
                match ctx.phrase(p) {
                    BoundPhrase::Word(w) => words.push(w.clone()),
                    _ => {
                        words.push(format!("{{{}}}", position));
                        position += 1;
                    }
                }
            }
        }
        ClauseKind::Operation(op) => {
            words.push("{0}".to_string());
            words.push("=".to_string());
            if clause.phrases.len() == 2 {
                words.push("{1}".to_string());
                words.push(op.symbol());
                words.push("{2}".to_string());
            } else {
                words.push(op.symbol());
                for i in 0..clause.phrases.len() {
                    words.push(format!("{{{}}}", i + 1));
                }
            }
        }
    }
    words.join(" ")
}
