//! Binding plumbing shared by all constraint kinds, and the per-kind
//! compilation entry points.

use crate::{compile_value_constraint, ConstraintError, ConstraintResult};
use factum_ast::{
    self as ast, Certainty, ClauseList, ConstraintBody, ConstraintDecl, NounPhrase, Quantifier,
};
use factum_binder::{
    bind_constrained_roles, loose_bind_roles, loose_bind_wherever_possible, match_reading,
    BinderError, BindingIx, ClauseIx, CompilationContext, PhraseIx,
};
use factum_core::{ConstraintId, RoleSequenceId};
use factum_model::{
    Agreement, ConceptRef, Constellation, Constraint, ContextNote, ContextNoteKind, Enforcement,
    PresenceConstraint, RoleRef, SetEqualityConstraint, SetExclusionConstraint, SubsetConstraint,
};
use log::trace;

/// Compiles constraint declarations against a model repository.
pub struct ConstraintCompiler<'m> {
    model: &'m mut Constellation,
}

/// Compile one constraint declaration.
pub fn compile_constraint(
    model: &mut Constellation,
    decl: &ConstraintDecl,
) -> ConstraintResult<ConstraintId> {
    ConstraintCompiler::new(model).compile(decl)
}

/// The loose-binding policy a set constraint applies after exact binding.
/// Presence constraints bind their constrained role list instead, and ring
/// and value constraints apply no loose binding at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LoosePolicy {
    /// Best-effort pairing across the clause lists.
    WhereverPossible,
    /// Every listed role must appear in every clause list.
    StrictRoles,
}

/// A constraint's clause lists after binding and fact type matching.
struct BoundLists {
    clauses_lists: Vec<Vec<ClauseIx>>,
    role_phrases: Vec<PhraseIx>,
    bindings_by_list: Vec<Vec<BindingIx>>,
}

impl<'m> ConstraintCompiler<'m> {
    pub fn new(model: &'m mut Constellation) -> Self {
        Self { model }
    }

    /// Compile one constraint declaration into its metamodel form, then
    /// attach its enforcement, context note and pragmas.
    pub fn compile(&mut self, decl: &ConstraintDecl) -> ConstraintResult<ConstraintId> {
        let (constraint, pragmas) = match &decl.body {
            ConstraintBody::Presence {
                clauses_lists,
                role_list,
                quantifier,
            } => (
                self.compile_presence(clauses_lists, role_list, quantifier)?,
                quantifier.pragmas.clone(),
            ),
            ConstraintBody::SetExclusion {
                clauses_lists,
                role_list,
                quantifier,
            } => (
                self.compile_set_exclusion(clauses_lists, role_list, quantifier)?,
                quantifier.pragmas.clone(),
            ),
            ConstraintBody::SetEquality { clauses_lists } => {
                (self.compile_set_equality(clauses_lists)?, Vec::new())
            }
            ConstraintBody::Subset { subset, superset } => {
                (self.compile_subset(subset, superset)?, Vec::new())
            }
            ConstraintBody::Value {
                constraint,
                value_type,
            } => {
                let vt = self.model.ensure_value_type(value_type)?;
                let id = compile_value_constraint(self.model, constraint)?;
                self.model.set_value_type_constraint(vt, id)?;
                (id, Vec::new())
            }
        };

        if let Some(enforcement) = &decl.enforcement {
            *self.model.constraint_mut(constraint).enforcement_mut() =
                Some(compile_enforcement(enforcement));
        }
        if let Some(note) = &decl.context_note {
            let note = compile_context_note(note);
            self.model
                .add_context_note(ConceptRef::Constraint(constraint), note);
        }
        for pragma in pragmas {
            self.model.annotate(ConceptRef::Constraint(constraint), pragma);
        }
        Ok(constraint)
    }

    // ==================== Shared Plumbing ====================

    /// The bindings common to every clause list, in first-list order.
    fn common_bindings(
        bound: &BoundLists,
        kind: &'static str,
    ) -> ConstraintResult<Vec<BindingIx>> {
        let mut common = bound.bindings_by_list[0].clone();
        for bindings in &bound.bindings_by_list[1..] {
            common.retain(|b| bindings.contains(b));
        }
        if common.is_empty() {
            return Err(ConstraintError::NoCommonBinding { kind });
        }
        Ok(common)
    }

    /// One projected role sequence per clause list, covering the common
    /// bindings in order. A list that joins several clauses, or contains
    /// literals or nested clauses, projects through a built query; a plain
    /// single clause projects its roles directly.
    fn role_sequences_for_common_bindings(
        ctx: &mut CompilationContext<'_>,
        bound: &BoundLists,
        common: &[BindingIx],
    ) -> ConstraintResult<Vec<RoleSequenceId>> {
        let mut role_sequences = Vec::with_capacity(bound.clauses_lists.len());
        for list in &bound.clauses_lists {
            let needs_query = list.len() > 1
                || list.iter().any(|&c| {
                    ctx.clause_nouns(c).iter().any(|&p| {
                        ctx.phrase(p)
                            .as_noun()
                            .is_some_and(|n| n.literal.is_some() || !n.nested_clauses.is_empty())
                    })
                });

            if needs_query {
                trace!("building query for constrained clause list");
                let (_query, roles_by_binding) = factum_query::build_query(ctx, list)?;
                let mut role_refs = Vec::with_capacity(common.len());
                for &binding in common {
                    let Some(&(role, play)) = roles_by_binding.get(&binding) else {
                        return Err(ConstraintError::MissingProjection {
                            term: ctx
                                .model
                                .object_type_def(ctx.bindings.get(binding).player)
                                .name
                                .clone(),
                        });
                    };
                    let mut role_ref = RoleRef::new(role);
                    role_ref.play = Some(play);
                    role_refs.push(role_ref);
                }
                role_sequences.push(ctx.model.add_role_sequence(role_refs));
            } else {
                let mut role_refs = Vec::with_capacity(common.len());
                for &binding in common {
                    let role = list
                        .iter()
                        .flat_map(|&c| ctx.clause_nouns(c))
                        .find(|&p| ctx.phrase_binding(p) == Some(binding))
                        .and_then(|p| ctx.phrase(p).as_noun().and_then(|n| n.role));
                    let Some(role) = role else {
                        return Err(ConstraintError::MissingProjection {
                            term: ctx
                                .model
                                .object_type_def(ctx.bindings.get(binding).player)
                                .name
                                .clone(),
                        });
                    };
                    role_refs.push(RoleRef::new(role));
                }
                role_sequences.push(ctx.model.add_role_sequence(role_refs));
            }
        }
        Ok(role_sequences)
    }

    // ==================== Presence ====================

    fn compile_presence(
        &mut self,
        clauses_lists: &[ClauseList],
        role_list: &[NounPhrase],
        quantifier: &Quantifier,
    ) -> ConstraintResult<ConstraintId> {
        // Each clauses list must be a single plain clause; a join inside a
        // presence constraint is unsupported.
        for list in clauses_lists {
            if list.len() > 1 || list.iter().any(|c| c.includes_nested_clauses()) {
                return Err(ConstraintError::JoinPresenceUnsupported {
                    clause: list
                        .iter()
                        .flat_map(|c| c.nouns())
                        .map(|np| np.term.clone())
                        .collect::<Vec<_>>()
                        .join(" "),
                });
            }
        }

        let mut ctx = CompilationContext::new(self.model);
        let bound = Self::bind_presence(&mut ctx, clauses_lists, role_list)?;
        let clauses: Vec<ClauseIx> = bound.clauses_lists.iter().flatten().copied().collect();

        let constrained: Vec<PhraseIx> = if bound.role_phrases.is_empty() {
            // An either/or form constrains its unique duplicated role.
            let common = Self::common_bindings(&bound, "presence constraint")?;
            if common.len() != 1 {
                return Err(ConstraintError::EitherOrAmbiguity { count: common.len() });
            }
            let mut phrases = ctx.bindings.get(common[0]).phrases.clone();
            phrases.reverse();
            phrases
        } else {
            bound.role_phrases.clone()
        };

        let mut role_refs = Vec::new();
        for &np in &constrained {
            let binding = ctx.phrase_binding(np).ok_or_else(|| {
                BinderError::UnboundPhrase {
                    term: ctx.noun(np).term.clone(),
                }
            })?;
            if ctx.bindings.get(binding).phrases.len() == 1 {
                return Err(
                    BinderError::constrained_role_not_found(ctx.noun(np).describe()).into(),
                );
            }
            for &other in &ctx.bindings.get(binding).phrases {
                if other == np {
                    continue;
                }
                let role = ctx.noun(other).role.ok_or_else(|| {
                    ConstraintError::RoleNotFound {
                        term: ctx.noun(other).describe(),
                    }
                })?;
                role_refs.push(RoleRef::new(role));
            }
        }
        let role_sequence = ctx.model.add_role_sequence(role_refs);

        let constraint = ctx.model.add_constraint(Constraint::Presence(PresenceConstraint {
            name: String::new(),
            role_sequence,
            min_frequency: quantifier.min,
            max_frequency: quantifier.max,
            is_mandatory: quantifier.min.is_some_and(|min| min > 0),
            is_preferred_identifier: false,
            enforcement: None,
        }));
        trace!(
            "made presence constraint {} min={:?} max={:?}",
            constraint,
            quantifier.min,
            quantifier.max
        );
        Ok(constraint)
    }

    fn bind_presence(
        ctx: &mut CompilationContext<'_>,
        clauses_lists: &[ClauseList],
        role_list: &[NounPhrase],
    ) -> ConstraintResult<BoundLists> {
        ctx.left_contraction_allowed = true;
        let mut lists = Vec::with_capacity(clauses_lists.len());
        for list in clauses_lists {
            lists.push(ctx.ingest_clauses(list)?);
        }
        let role_phrases = ctx.ingest_role_list(role_list)?;
        let all: Vec<ClauseIx> = lists.iter().flatten().copied().collect();
        ctx.bind(&all, &role_phrases)?;
        for &clause in &all {
            if match_reading(ctx, clause)?.is_none() {
                return Err(BinderError::UnmatchedClause {
                    clause: ctx.clause_text(clause),
                }
                .into());
            }
            if ctx.clause(clause).certainty == Certainty::Negated {
                return Err(BinderError::NegatedClauseUnsupported {
                    clause: ctx.clause_text(clause),
                }
                .into());
            }
        }
        // Loose binding over the constrained role list only.
        bind_constrained_roles(ctx, &all, &role_phrases)?;
        let bindings_by_list = lists
            .iter()
            .map(|list| ctx.all_bindings_in_clauses(list))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(BoundLists {
            clauses_lists: lists,
            role_phrases,
            bindings_by_list,
        })
    }

    // ==================== Set Comparison ====================

    fn compile_set_exclusion(
        &mut self,
        clauses_lists: &[ClauseList],
        role_list: &[NounPhrase],
        quantifier: &Quantifier,
    ) -> ConstraintResult<ConstraintId> {
        let policy = if role_list.is_empty() {
            LoosePolicy::WhereverPossible
        } else {
            LoosePolicy::StrictRoles
        };
        let mut ctx = CompilationContext::new(self.model);
        let bound = Self::bind_lists(&mut ctx, clauses_lists, role_list, policy)?;
        let common = Self::common_bindings(&bound, "set exclusion constraint")?;
        let role_sequences = Self::role_sequences_for_common_bindings(&mut ctx, &bound, &common)?;

        Ok(ctx
            .model
            .add_constraint(Constraint::SetExclusion(SetExclusionConstraint {
                role_sequences,
                is_mandatory: quantifier.min == Some(1),
                enforcement: None,
            })))
    }

    fn compile_set_equality(
        &mut self,
        clauses_lists: &[ClauseList],
    ) -> ConstraintResult<ConstraintId> {
        let mut ctx = CompilationContext::new(self.model);
        let bound = Self::bind_lists(&mut ctx, clauses_lists, &[], LoosePolicy::WhereverPossible)?;
        let common = Self::common_bindings(&bound, "set equality constraint")?;
        let role_sequences = Self::role_sequences_for_common_bindings(&mut ctx, &bound, &common)?;

        Ok(ctx
            .model
            .add_constraint(Constraint::SetEquality(SetEqualityConstraint {
                role_sequences,
                enforcement: None,
            })))
    }

    fn compile_subset(
        &mut self,
        subset: &ClauseList,
        superset: &ClauseList,
    ) -> ConstraintResult<ConstraintId> {
        let mut ctx = CompilationContext::new(self.model);
        let lists = vec![subset.clone(), superset.clone()];
        let bound = Self::bind_lists(&mut ctx, &lists, &[], LoosePolicy::WhereverPossible)?;
        let common = Self::common_bindings(&bound, "subset constraint")?;
        let role_sequences = Self::role_sequences_for_common_bindings(&mut ctx, &bound, &common)?;

        Ok(ctx.model.add_constraint(Constraint::Subset(SubsetConstraint {
            subset_role_sequence: role_sequences[0],
            superset_role_sequence: role_sequences[1],
            enforcement: None,
        })))
    }

    /// Bind all clause lists and the role list, match every clause against
    /// existing fact types, and apply the loose binding policy. Constrained
    /// roles are first identified here, so they cannot introduce role names.
    fn bind_lists(
        ctx: &mut CompilationContext<'_>,
        clauses_lists: &[ClauseList],
        role_list: &[NounPhrase],
        policy: LoosePolicy,
    ) -> ConstraintResult<BoundLists> {
        ctx.left_contraction_allowed = true;
        let mut lists = Vec::with_capacity(clauses_lists.len());
        for list in clauses_lists {
            lists.push(ctx.ingest_clauses(list)?);
        }
        let role_phrases = ctx.ingest_role_list(role_list)?;
        let all: Vec<ClauseIx> = lists.iter().flatten().copied().collect();
        ctx.bind(&all, &role_phrases)?;
        for &clause in &all {
            if match_reading(ctx, clause)?.is_none() {
                return Err(BinderError::UnmatchedClause {
                    clause: ctx.clause_text(clause),
                }
                .into());
            }
            if ctx.clause(clause).certainty == Certainty::Negated {
                return Err(BinderError::NegatedClauseUnsupported {
                    clause: ctx.clause_text(clause),
                }
                .into());
            }
        }
        match policy {
            LoosePolicy::WhereverPossible => loose_bind_wherever_possible(ctx, &lists),
            LoosePolicy::StrictRoles => loose_bind_roles(ctx, &lists, &role_phrases)?,
        }
        let bindings_by_list = lists
            .iter()
            .map(|list| ctx.all_bindings_in_clauses(list))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(BoundLists {
            clauses_lists: lists,
            role_phrases,
            bindings_by_list,
        })
    }
}

/// Convert a declared enforcement into its metamodel form.
pub fn compile_enforcement(enforcement: &ast::Enforcement) -> Enforcement {
    Enforcement {
        action: enforcement.action.clone(),
        agent: enforcement.agent.clone(),
    }
}

/// Convert a declared context note into its metamodel form.
pub fn compile_context_note(note: &ast::ContextNote) -> ContextNote {
    ContextNote {
        kind: match note.kind {
            ast::ContextNoteKind::Because => ContextNoteKind::Because,
            ast::ContextNoteKind::SoThat => ContextNoteKind::SoThat,
            ast::ContextNoteKind::ToAvoid => ContextNoteKind::ToAvoid,
            ast::ContextNoteKind::AsOpposedTo => ContextNoteKind::AsOpposedTo,
        },
        description: note.description.clone(),
        according_to: note.according_to.clone(),
        agreement: note.agreement.as_ref().map(|a| Agreement {
            date: a.date.clone(),
            agents: a.agents.clone(),
        }),
    }
}
