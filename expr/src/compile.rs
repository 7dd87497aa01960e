//! Ingestion of expression trees into the clause arena, implicit fact type
//! synthesis, and equality projection.

use crate::{ExprError, ExprResult};
use factum_ast::{Certainty, Comparison, Condition, Expression, Literal, NounPhrase};
use factum_binder::{
    ensure_fact_type, BoundClause, BoundPhrase, ClauseIx, ClauseKind, CompilationContext, Operator,
    PhraseIx,
};
use factum_core::FactTypeId;
use log::trace;

/// The clause-arena form of a condition list, plus the deferred projections
/// and the standalone phrases that must participate in binding.
#[derive(Debug, Default)]
pub struct CompiledConditions {
    /// The clauses to match and build steps for, in condition order.
    pub clauses: Vec<ClauseIx>,
    /// Standalone noun phrases (projection targets) to bind with the clauses.
    pub extra_phrases: Vec<PhraseIx>,
    /// The expression side of the first equality projection, kept for
    /// derivation-graph compilation.
    pub value_derivation: Option<Expression>,
    /// Deferred projections: (target noun, source) pairs applied after
    /// binding.
    projections: Vec<(PhraseIx, ProjectionSource)>,
}

/// What an equality projection replaces its comparison with.
#[derive(Debug, Clone, Copy)]
enum ProjectionSource {
    /// The result of an operation clause.
    Operation(ClauseIx),
    /// Another standalone phrase (noun or literal).
    Phrase(PhraseIx),
}

/// Ingest a condition list. Equality comparisons with a bare player
/// reference on one side are projections: no comparison clause is created;
/// the referenced operand stands in for it.
pub fn ingest_conditions(
    ctx: &mut CompilationContext,
    conditions: &[Condition],
) -> ExprResult<CompiledConditions> {
    let mut out = CompiledConditions::default();
    for condition in conditions {
        match condition {
            Condition::Clause(clause) => {
                out.clauses.push(ctx.ingest_clause(clause)?);
            }
            Condition::Comparison(comparison) => {
                ingest_comparison(ctx, comparison, &mut out)?;
            }
        }
    }
    Ok(out)
}

fn ingest_comparison(
    ctx: &mut CompilationContext,
    comparison: &Comparison,
    out: &mut CompiledConditions,
) -> ExprResult<()> {
    let projectable = comparison.is_equality() && comparison.certainty == Certainty::Definite;
    if projectable {
        let lhs_noun = bare_player_reference(&comparison.lhs);
        let rhs_noun = bare_player_reference(&comparison.rhs);
        let (target, source) = match (lhs_noun, rhs_noun) {
            (Some(target), None) => (target, &comparison.rhs),
            (None, Some(target)) => (target, &comparison.lhs),
            (Some(target), Some(_)) => (target, &comparison.rhs),
            (None, None) => {
                // No projection; fall through to a plain comparison clause.
                let ix = ingest_operation(ctx, &Expression::Comparison(Box::new(comparison.clone())))?;
                out.clauses.push(ix);
                return Ok(());
            }
        };
        trace!("equality comparison is a projection onto '{}'", target.term);
        let target_phrase = ctx.ingest_noun(target, None)?;
        out.extra_phrases.push(target_phrase);
        match source {
            Expression::Noun(np) => {
                let p = ctx.ingest_noun(np, None)?;
                out.extra_phrases.push(p);
                out.projections
                    .push((target_phrase, ProjectionSource::Phrase(p)));
            }
            Expression::Literal(literal) => {
                let p = ingest_literal_phrase(ctx, literal, None)?;
                out.extra_phrases.push(p);
                out.projections
                    .push((target_phrase, ProjectionSource::Phrase(p)));
            }
            other => {
                let op = ingest_operation(ctx, other)?;
                out.clauses.push(op);
                out.projections
                    .push((target_phrase, ProjectionSource::Operation(op)));
                if out.value_derivation.is_none() {
                    out.value_derivation = Some(other.clone());
                }
            }
        }
        return Ok(());
    }

    let ix = ingest_operation(ctx, &Expression::Comparison(Box::new(comparison.clone())))?;
    out.clauses.push(ix);
    Ok(())
}

/// A bare player reference: a noun phrase with no literal standing in.
fn bare_player_reference(expr: &Expression) -> Option<&NounPhrase> {
    expr.as_noun().filter(|np| np.literal.is_none())
}

/// After binding, merge each projection source's binding into its target's,
/// so the referenced operand directly stands for the projected player.
pub fn apply_projections(
    ctx: &mut CompilationContext,
    compiled: &CompiledConditions,
) -> ExprResult<()> {
    for &(target, source) in &compiled.projections {
        let target_binding =
            ctx.phrase_binding(target)
                .ok_or_else(|| factum_binder::BinderError::UnboundPhrase {
                    term: ctx.noun(target).term.clone(),
                })?;
        let phrase = match source {
            ProjectionSource::Phrase(p) => p,
            ProjectionSource::Operation(c) => {
                ctx.clause(c)
                    .result
                    .ok_or_else(|| factum_binder::BinderError::UnboundPhrase {
                        term: ctx.clause_text(c),
                    })?
            }
        };
        ctx.rebind(phrase, target_binding);
    }
    Ok(())
}

/// Ingest an operation expression as an operation clause; nouns and
/// literals become its operand phrases, nested operations recurse.
pub fn ingest_operation(ctx: &mut CompilationContext, expr: &Expression) -> ExprResult<ClauseIx> {
    let (operator, operands, certainty, qualifiers, conjunction) = match expr {
        Expression::Sum(terms) => (Operator::Sum, terms.clone(), Certainty::Definite, vec![], None),
        Expression::Product(factors) => (
            Operator::Product,
            factors.clone(),
            Certainty::Definite,
            vec![],
            None,
        ),
        Expression::Negate(term) => (
            Operator::Negate,
            vec![(**term).clone()],
            Certainty::Definite,
            vec![],
            None,
        ),
        Expression::Reciprocal(factor) => (
            Operator::Reciprocal,
            vec![(**factor).clone()],
            Certainty::Definite,
            vec![],
            None,
        ),
        Expression::LogicalAnd(factors) => (
            Operator::LogicalAnd,
            factors.clone(),
            Certainty::Definite,
            vec![],
            None,
        ),
        Expression::LogicalOr(factors) => (
            Operator::LogicalOr,
            factors.clone(),
            Certainty::Definite,
            vec![],
            None,
        ),
        Expression::LogicalNot(term) => (
            Operator::LogicalNot,
            vec![(**term).clone()],
            Certainty::Definite,
            vec![],
            None,
        ),
        Expression::Ternary {
            condition,
            if_true,
            if_false,
        } => (
            Operator::Ternary,
            vec![(**condition).clone(), (**if_true).clone(), (**if_false).clone()],
            Certainty::Definite,
            vec![],
            None,
        ),
        Expression::Aggregate {
            operation,
            aggregand,
        } => (
            Operator::Aggregate(operation.clone()),
            vec![(**aggregand).clone()],
            Certainty::Definite,
            vec![],
            None,
        ),
        Expression::Comparison(c) => (
            Operator::Compare(c.operator),
            vec![c.lhs.clone(), c.rhs.clone()],
            c.certainty,
            c.qualifiers.clone(),
            c.conjunction.clone(),
        ),
        Expression::Noun(_) | Expression::Literal(_) => {
            return Err(ExprError::EmptyOperation {
                text: "bare operand is not an operation".to_string(),
            });
        }
    };
    if operands.is_empty() {
        return Err(ExprError::EmptyOperation {
            text: format!("{}", operator),
        });
    }

    let ix = ctx.push_clause(BoundClause {
        kind: ClauseKind::Operation(operator),
        phrases: Vec::new(),
        certainty,
        qualifiers,
        conjunction,
        fact_type: None,
        reading: None,
        result_player: None,
        result: None,
    });
    let mut phrases = Vec::with_capacity(operands.len());
    for operand in &operands {
        phrases.push(ingest_operand(ctx, operand, ix)?);
    }
    ctx.clause_mut(ix).phrases = phrases;
    Ok(ix)
}

fn ingest_operand(
    ctx: &mut CompilationContext,
    expr: &Expression,
    clause: ClauseIx,
) -> ExprResult<PhraseIx> {
    match expr {
        Expression::Noun(np) => Ok(ctx.ingest_noun(np, Some(clause))?),
        Expression::Literal(literal) => ingest_literal_phrase(ctx, literal, Some(clause)),
        operation => {
            let inner = ingest_operation(ctx, operation)?;
            Ok(ctx.push_phrase(BoundPhrase::Operation(inner)))
        }
    }
}

fn ingest_literal_phrase(
    ctx: &mut CompilationContext,
    literal: &Literal,
    clause: Option<ClauseIx>,
) -> ExprResult<PhraseIx> {
    let mut np = NounPhrase::default();
    np.literal = Some(literal.clone());
    Ok(ctx.ingest_noun(&np, clause)?)
}

/// Match or synthesize the implicit fact type of an operation clause and
/// all nested operation operands, depth-first. Reuse is by structural
/// identity, so one fact type serves each operator/operand-type combination.
pub fn match_operation_fact_type(
    ctx: &mut CompilationContext,
    ix: ClauseIx,
) -> ExprResult<FactTypeId> {
    for p in ctx.clause(ix).phrases.clone() {
        if let BoundPhrase::Operation(inner) = ctx.phrase(p) {
            let inner = *inner;
            match_operation_fact_type(ctx, inner)?;
        }
    }
    if ctx.clause(ix).certainty != Certainty::Definite {
        return Err(ExprError::UncertainOperand {
            text: ctx.clause_text(ix),
        });
    }
    Ok(ensure_fact_type(ctx, ix)?)
}
