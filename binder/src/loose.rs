//! Loose binding: the fallback heuristics that pair an unresolved noun
//! phrase with a unique compatible binding when exact term and adjective
//! matching leaves it alone in its own binding.

use crate::{BinderError, BinderResult, BoundPhrase, ClauseIx, CompilationContext, PhraseIx};
use log::trace;

/// Best-effort loose binding across a constraint's clause lists.
///
/// Every noun phrase alone in its binding is offered the unique candidate
/// binding of the same player and role name that has no occurrence in the
/// same clause. Zero or several candidates leave the phrase as it is.
pub fn loose_bind_wherever_possible(ctx: &mut CompilationContext, clauses_lists: &[Vec<ClauseIx>]) {
    trace!("loose binding wherever possible");
    for clauses_list in clauses_lists {
        for &clause in clauses_list {
            for p in ctx.clause_nouns(clause) {
                if !matches!(ctx.phrase(p), BoundPhrase::Noun(_)) {
                    continue;
                }
                let Some(own) = ctx.phrase_binding(p) else {
                    continue;
                };
                if ctx.bindings.get(own).phrases.len() > 1 {
                    continue;
                }
                // This phrase matched no other phrase. Scout for a partner.
                let own_binding = ctx.bindings.get(own);
                let candidates: Vec<_> = ctx
                    .bindings
                    .iter_live()
                    .filter(|(ix, b)| {
                        *ix != own
                            && b.player == own_binding.player
                            && b.role_name == own_binding.role_name
                            && !b
                                .phrases
                                .iter()
                                .any(|&other| ctx.noun(other).clause == Some(clause))
                    })
                    .map(|(ix, _)| ix)
                    .collect();
                if candidates.len() != 1 {
                    continue;
                }
                trace!(
                    "loose binding {} to binding {:?}",
                    ctx.noun(p).describe(),
                    candidates[0]
                );
                ctx.rebind(p, candidates[0]);
            }
        }
    }
}

/// Strict loose binding over a constraint's explicit role list: every listed
/// role must occur in every clause list. An under-populated listed binding
/// pulls in the unique same-player phrase per clause list; several equally
/// valid phrases are an ambiguity error.
pub fn loose_bind_roles(
    ctx: &mut CompilationContext,
    clauses_lists: &[Vec<ClauseIx>],
    role_phrases: &[PhraseIx],
) -> BinderResult<()> {
    for &rp in role_phrases {
        let Some(own) = ctx.phrase_binding(rp) else {
            continue;
        };
        // One occurrence per clause list plus the role list mention itself.
        let expected = clauses_lists.len() + 1;
        if ctx.bindings.get(own).phrases.len() >= expected {
            continue;
        }
        trace!(
            "insufficient bindings for {}, attempting loose binding",
            ctx.noun(rp).describe()
        );
        for clauses_list in clauses_lists {
            let mut candidates = Vec::new();
            let mut already_bound = false;
            'clauses: for &clause in clauses_list {
                for p in ctx.clause_nouns(clause) {
                    if ctx.phrase_binding(p) == Some(own) {
                        already_bound = true;
                        break 'clauses;
                    }
                    if ctx.phrase_player(p) == ctx.noun(rp).player
                        && matches!(ctx.phrase(p), BoundPhrase::Noun(_))
                    {
                        candidates.push(p);
                    }
                }
            }
            if already_bound {
                continue;
            }
            match candidates.len() {
                1 => {
                    trace!(
                        "rebinding {} to {}",
                        ctx.noun(candidates[0]).describe(),
                        ctx.noun(rp).describe()
                    );
                    ctx.rebind(candidates[0], own);
                }
                0 => {}
                n => {
                    return Err(BinderError::ambiguous_binding(
                        ctx.noun(rp).describe(),
                        n,
                    ));
                }
            }
        }
    }
    Ok(())
}

/// Loose binding over a presence constraint's constrained role list: a
/// listed role alone in its binding joins the unique same-player phrase of
/// the constrained clauses; several equally valid phrases are an ambiguity
/// error.
pub fn bind_constrained_roles(
    ctx: &mut CompilationContext,
    clauses: &[ClauseIx],
    role_phrases: &[PhraseIx],
) -> BinderResult<()> {
    for &rp in role_phrases {
        let Some(own) = ctx.phrase_binding(rp) else {
            continue;
        };
        if ctx.bindings.get(own).phrases.len() > 1 {
            continue;
        }
        let mut candidates = Vec::new();
        for &clause in clauses {
            for p in ctx.clause_nouns(clause) {
                if ctx.phrase_player(p) == ctx.noun(rp).player
                    && matches!(ctx.phrase(p), BoundPhrase::Noun(_))
                {
                    candidates.push(p);
                }
            }
        }
        match candidates.len() {
            1 => {
                trace!(
                    "rebinding {} to {} in presence constraint",
                    ctx.noun(rp).describe(),
                    ctx.noun(candidates[0]).describe()
                );
                ctx.rebind(rp, ctx.phrase_binding(candidates[0]).expect("bound"));
            }
            0 => {}
            n => {
                return Err(BinderError::ambiguous_binding(ctx.noun(rp).describe(), n));
            }
        }
    }
    Ok(())
}
