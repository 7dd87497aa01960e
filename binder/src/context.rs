//! The per-declaration compilation context.

use crate::{
    BinderError, BinderResult, Binding, BindingArena, BindingIx, BoundClause, BoundPhrase,
    ClauseIx, ClauseKind, NounRecord, Operator, PhraseIx,
};
use factum_ast::{Clause, ClauseItem, NounPhrase, RoleName};
use factum_core::ObjectTypeId;
use factum_model::Constellation;
use log::trace;
use std::collections::{HashMap, HashSet};

/// Nested clauses deeper than this abort compilation.
const MAX_CLAUSE_DEPTH: usize = 32;

/// Resolution state for one declaration.
///
/// Created fresh per top-level declaration, discarded once the declaration
/// (and any queries nested within it) has been compiled.
pub struct CompilationContext<'m> {
    /// The model repository being populated.
    pub model: &'m mut Constellation,
    clauses: Vec<BoundClause>,
    phrases: Vec<BoundPhrase>,
    /// The bindings of this declaration.
    pub bindings: BindingArena,
    /// Players already identified by role name, so forward role-name
    /// references resolve before textual term lookup.
    pub player_by_role_name: HashMap<String, ObjectTypeId>,
    /// Terms that may be forward-referenced in this declaration.
    pub allowed_forward_terms: HashSet<String>,
    /// Whether a repeated subject may be omitted in a following clause.
    pub left_contraction_allowed: bool,
}

impl<'m> CompilationContext<'m> {
    /// Create a fresh context over the model repository.
    pub fn new(model: &'m mut Constellation) -> Self {
        Self {
            model,
            clauses: Vec::new(),
            phrases: Vec::new(),
            bindings: BindingArena::new(),
            player_by_role_name: HashMap::new(),
            allowed_forward_terms: HashSet::new(),
            left_contraction_allowed: false,
        }
    }

    // ==================== Arena Access ====================

    /// Append a clause record.
    pub fn push_clause(&mut self, clause: BoundClause) -> ClauseIx {
        let ix = ClauseIx(self.clauses.len() as u32);
        self.clauses.push(clause);
        ix
    }

    /// Append a phrase record.
    pub fn push_phrase(&mut self, phrase: BoundPhrase) -> PhraseIx {
        let ix = PhraseIx(self.phrases.len() as u32);
        self.phrases.push(phrase);
        ix
    }

    pub fn clause(&self, ix: ClauseIx) -> &BoundClause {
        &self.clauses[ix.index()]
    }

    pub fn clause_mut(&mut self, ix: ClauseIx) -> &mut BoundClause {
        &mut self.clauses[ix.index()]
    }

    pub fn phrase(&self, ix: PhraseIx) -> &BoundPhrase {
        &self.phrases[ix.index()]
    }

    /// The noun record at a phrase index. Panics on a non-noun phrase; the
    /// caller is expected to have selected noun phrases.
    pub fn noun(&self, ix: PhraseIx) -> &NounRecord {
        self.phrases[ix.index()]
            .as_noun()
            .expect("phrase is not a noun")
    }

    pub fn noun_mut(&mut self, ix: PhraseIx) -> &mut NounRecord {
        self.phrases[ix.index()]
            .as_noun_mut()
            .expect("phrase is not a noun")
    }

    /// The player a phrase stands for, if identified.
    pub fn phrase_player(&self, ix: PhraseIx) -> Option<ObjectTypeId> {
        match &self.phrases[ix.index()] {
            BoundPhrase::Word(_) => None,
            BoundPhrase::Noun(n) => n.player,
            BoundPhrase::Operation(c) => self.clauses[c.index()].result_player,
        }
    }

    /// The live binding a phrase belongs to, if bound.
    pub fn phrase_binding(&self, ix: PhraseIx) -> Option<BindingIx> {
        let raw = match &self.phrases[ix.index()] {
            BoundPhrase::Word(_) => None,
            BoundPhrase::Noun(n) => n.binding,
            BoundPhrase::Operation(c) => self.clauses[c.index()]
                .result
                .and_then(|r| self.noun(r).binding),
        };
        raw.map(|b| self.bindings.resolve(b))
    }

    /// The binding record a phrase belongs to, if bound.
    pub fn binding_of(&self, ix: PhraseIx) -> Option<&Binding> {
        self.phrase_binding(ix).map(|b| self.bindings.get(b))
    }

    /// The noun-valued phrases of a clause, in role order.
    ///
    /// For a reading these are its noun phrases in reading order; for an
    /// operation, the synthesized result followed by the operands.
    pub fn clause_nouns(&self, ix: ClauseIx) -> Vec<PhraseIx> {
        let clause = &self.clauses[ix.index()];
        let mut nouns = Vec::new();
        if clause.is_operation() {
            if let Some(result) = clause.result {
                nouns.push(result);
            }
        }
        for &p in &clause.phrases {
            match &self.phrases[p.index()] {
                BoundPhrase::Word(_) => {}
                BoundPhrase::Noun(_) | BoundPhrase::Operation(_) => nouns.push(p),
            }
        }
        nouns
    }

    /// Whether a clause is a bare object type: a single noun, no words.
    pub fn is_naked_object_type(&self, ix: ClauseIx) -> bool {
        let clause = &self.clauses[ix.index()];
        matches!(clause.kind, ClauseKind::Reading)
            && clause.phrases.len() == 1
            && self.phrases[clause.phrases[0].index()].as_noun().is_some()
    }

    /// Display form of a clause, for diagnostics.
    pub fn clause_text(&self, ix: ClauseIx) -> String {
        let clause = &self.clauses[ix.index()];
        let mut words = Vec::new();
        if let ClauseKind::Operation(op) = &clause.kind {
            words.push(format!("({})", op));
        }
        for &p in &clause.phrases {
            match &self.phrases[p.index()] {
                BoundPhrase::Word(w) => words.push(w.clone()),
                BoundPhrase::Noun(n) => words.push(format!("{{{}}}", n.describe())),
                BoundPhrase::Operation(c) => {
                    words.push(format!("({})", self.clause_text(*c)));
                }
            }
        }
        words.join(" ")
    }

    // ==================== Ingestion ====================

    /// Flatten an AST clause (and its nested clauses) into the arena.
    pub fn ingest_clause(&mut self, clause: &Clause) -> BinderResult<ClauseIx> {
        self.ingest_clause_at(clause, 0)
    }

    /// Flatten a list of AST clauses.
    pub fn ingest_clauses(&mut self, clauses: &[Clause]) -> BinderResult<Vec<ClauseIx>> {
        clauses.iter().map(|c| self.ingest_clause(c)).collect()
    }

    fn ingest_clause_at(&mut self, clause: &Clause, depth: usize) -> BinderResult<ClauseIx> {
        if depth > MAX_CLAUSE_DEPTH {
            return Err(BinderError::NestingTooDeep {
                depth: MAX_CLAUSE_DEPTH,
            });
        }
        let ix = self.push_clause(BoundClause {
            kind: ClauseKind::Reading,
            phrases: Vec::new(),
            certainty: clause.certainty,
            qualifiers: clause.qualifiers.clone(),
            conjunction: clause.conjunction.clone(),
            fact_type: None,
            reading: None,
            result_player: None,
            result: None,
        });
        let mut phrase_ixs = Vec::with_capacity(clause.items.len());
        for item in &clause.items {
            let p = match item {
                ClauseItem::Word(w) => self.push_phrase(BoundPhrase::Word(w.clone())),
                ClauseItem::Noun(np) => self.ingest_noun_at(np, Some(ix), depth)?,
            };
            phrase_ixs.push(p);
        }
        self.clauses[ix.index()].phrases = phrase_ixs;
        Ok(ix)
    }

    fn ingest_noun_at(
        &mut self,
        np: &NounPhrase,
        clause: Option<ClauseIx>,
        depth: usize,
    ) -> BinderResult<PhraseIx> {
        let nested = np
            .nested_clauses
            .iter()
            .map(|c| self.ingest_clause_at(c, depth + 1))
            .collect::<BinderResult<Vec<_>>>()?;
        Ok(self.push_phrase(BoundPhrase::Noun(NounRecord {
            term: np.term.clone(),
            leading_adjective: np.leading_adjective.clone(),
            trailing_adjective: np.trailing_adjective.clone(),
            role_name: np.role_name.clone(),
            quantifier: np.quantifier.clone(),
            literal: np.literal.clone(),
            value_constraint: np.value_constraint.clone(),
            nested_clauses: nested,
            clause,
            player: None,
            resolved_by_role_name: false,
            binding: None,
            role: None,
        })))
    }

    /// Ingest the bare noun phrases of a constraint's role list.
    pub fn ingest_role_list(&mut self, role_list: &[NounPhrase]) -> BinderResult<Vec<PhraseIx>> {
        role_list
            .iter()
            .map(|np| self.ingest_noun_at(np, None, 0))
            .collect()
    }

    /// Ingest a single noun phrase, optionally attached to a clause.
    pub fn ingest_noun(
        &mut self,
        np: &NounPhrase,
        clause: Option<ClauseIx>,
    ) -> BinderResult<PhraseIx> {
        self.ingest_noun_at(np, clause, 0)
    }

    // ==================== Player Identification and Binding ====================

    /// Run all three binding passes over clauses and extra role-list phrases.
    ///
    /// Players defining a role name are identified first so those names
    /// resolve wherever they are used, even before their defining occurrence
    /// in reading order.
    pub fn bind(&mut self, clauses: &[ClauseIx], extra: &[PhraseIx]) -> BinderResult<()> {
        for &c in clauses {
            self.identify_role_name_players(c)?;
        }
        for &p in extra {
            self.identify_role_name_player(p)?;
        }
        for &c in clauses {
            self.identify_other_players(c)?;
        }
        for &p in extra {
            self.ensure_noun_player(p)?;
        }
        for &c in clauses {
            self.bind_clause(c)?;
        }
        for &p in extra {
            self.bind_noun(p)?;
        }
        Ok(())
    }

    /// Look up a player by name: the model first, then the role-name table,
    /// then implicit creation when the term is an allowed forward reference.
    pub fn object_type(&mut self, name: &str) -> Option<ObjectTypeId> {
        if let Some(id) = self.model.object_type(name) {
            return Some(id);
        }
        if let Some(&id) = self.player_by_role_name.get(name) {
            return Some(id);
        }
        if self.allowed_forward_terms.contains(name) {
            return self.model.ensure_entity_type(name).ok();
        }
        None
    }

    fn identify_role_name_players(&mut self, ix: ClauseIx) -> BinderResult<()> {
        for p in self.clauses[ix.index()].phrases.clone() {
            match &self.phrases[p.index()] {
                BoundPhrase::Word(_) => {}
                BoundPhrase::Operation(inner) => {
                    let inner = *inner;
                    self.identify_role_name_players(inner)?;
                }
                BoundPhrase::Noun(n) => {
                    for nc in n.nested_clauses.clone() {
                        self.identify_role_name_players(nc)?;
                    }
                    self.identify_role_name_player(p)?;
                }
            }
        }
        Ok(())
    }

    fn identify_role_name_player(&mut self, p: PhraseIx) -> BinderResult<()> {
        if !matches!(self.noun(p).role_name, Some(RoleName::Name(_))) {
            return Ok(());
        }
        let player = self.ensure_noun_player(p)?;
        if let Some(RoleName::Name(name)) = self.noun(p).role_name.clone() {
            trace!("role name '{}' denotes {}", name, player);
            self.player_by_role_name.insert(name, player);
        }
        Ok(())
    }

    fn identify_other_players(&mut self, ix: ClauseIx) -> BinderResult<()> {
        for p in self.clauses[ix.index()].phrases.clone() {
            match &self.phrases[p.index()] {
                BoundPhrase::Word(_) => {}
                BoundPhrase::Operation(inner) => {
                    let inner = *inner;
                    self.identify_other_players(inner)?;
                }
                BoundPhrase::Noun(n) => {
                    for nc in n.nested_clauses.clone() {
                        self.identify_other_players(nc)?;
                    }
                    self.ensure_noun_player(p)?;
                }
            }
        }
        if self.clauses[ix.index()].is_operation() {
            self.identify_operation_player(ix)?;
        }
        Ok(())
    }

    /// Resolve a noun's player: by literal kind, or by term lookup.
    pub fn ensure_noun_player(&mut self, p: PhraseIx) -> BinderResult<ObjectTypeId> {
        if let Some(player) = self.noun(p).player {
            return Ok(player);
        }
        let literal_kind = self.noun(p).literal.as_ref().map(|l| l.value.player_name());
        if let Some(kind) = literal_kind {
            let player = self.model.ensure_value_type(kind)?;
            self.noun_mut(p).player = Some(player);
            return Ok(player);
        }
        let term = self.noun(p).term.clone();
        let player = self
            .object_type(&term)
            .ok_or_else(|| BinderError::unresolved_term(&term))?;
        let by_role_name =
            self.model.object_type(&term).is_none() && self.player_by_role_name.contains_key(&term);
        let noun = self.noun_mut(p);
        noun.player = Some(player);
        noun.resolved_by_role_name = by_role_name;
        Ok(player)
    }

    /// The result player of an operation clause, by operator rule.
    fn identify_operation_player(&mut self, ix: ClauseIx) -> BinderResult<()> {
        if self.clauses[ix.index()].result_player.is_some() {
            return Ok(());
        }
        let operator = match &self.clauses[ix.index()].kind {
            ClauseKind::Operation(op) => op.clone(),
            ClauseKind::Reading => return Ok(()),
        };
        let player = match operator {
            // A comparison yields a Boolean, created on first use.
            Operator::Compare(_) => self.model.ensure_value_type("Boolean")?,
            // Division yields a Real.
            Operator::Reciprocal => self.model.ensure_value_type("Real")?,
            // A ternary takes the type of its true branch.
            Operator::Ternary => self.operand_player(ix, 1)?,
            // Everything else takes the left-most operand's type.
            _ => self.operand_player(ix, 0)?,
        };
        self.clauses[ix.index()].result_player = Some(player);
        Ok(())
    }

    fn operand_player(&self, ix: ClauseIx, operand: usize) -> BinderResult<ObjectTypeId> {
        let p = self.clauses[ix.index()].phrases[operand];
        self.phrase_player(p)
            .ok_or_else(|| BinderError::UnboundPhrase {
                term: self.clause_text(ix),
            })
    }

    fn bind_clause(&mut self, ix: ClauseIx) -> BinderResult<()> {
        for p in self.clauses[ix.index()].phrases.clone() {
            match &self.phrases[p.index()] {
                BoundPhrase::Word(_) => {}
                BoundPhrase::Operation(inner) => {
                    let inner = *inner;
                    self.bind_clause(inner)?;
                }
                BoundPhrase::Noun(n) => {
                    for nc in n.nested_clauses.clone() {
                        self.bind_clause(nc)?;
                    }
                    self.bind_noun(p)?;
                }
            }
        }
        if self.clauses[ix.index()].is_operation() {
            self.bind_operation_result(ix)?;
        }
        Ok(())
    }

    /// Join a noun phrase to the binding its resolution key selects.
    pub fn bind_noun(&mut self, p: PhraseIx) -> BinderResult<BindingIx> {
        if let Some(b) = self.noun(p).binding {
            return Ok(self.bindings.resolve(b));
        }
        let noun = self.noun(p);
        let player = noun.player.ok_or_else(|| BinderError::UnboundPhrase {
            term: noun.term.clone(),
        })?;
        let key = if let Some(literal) = &noun.literal {
            crate::BindingKey::Literal(player, literal.value.to_string())
        } else if let Some(role_name) = &noun.role_name {
            crate::BindingKey::RoleName(player, role_name.clone())
        } else if noun.resolved_by_role_name {
            // A textual use of a role name joins the defining occurrence.
            crate::BindingKey::RoleName(player, RoleName::Name(noun.term.clone()))
        } else {
            crate::BindingKey::Adjectives(
                player,
                noun.leading_adjective.clone(),
                noun.trailing_adjective.clone(),
            )
        };
        let role_name = noun.role_name.clone();
        let ix = self.bindings.ensure(key, player, role_name);
        self.bindings.add_phrase(ix, p);
        self.noun_mut(p).binding = Some(ix);
        trace!("bound {} to binding {:?}", self.noun(p).describe(), ix);
        Ok(ix)
    }

    /// Every operation result is a unique binding of its own.
    fn bind_operation_result(&mut self, ix: ClauseIx) -> BinderResult<()> {
        if self.clauses[ix.index()].result.is_some() {
            return Ok(());
        }
        let player =
            self.clauses[ix.index()]
                .result_player
                .ok_or_else(|| BinderError::UnboundPhrase {
                    term: self.clause_text(ix),
                })?;
        let term = self.model.object_type_def(player).name.clone();
        let p = self.push_phrase(BoundPhrase::Noun(NounRecord::synthetic(term, ix, player)));
        let b = self
            .bindings
            .ensure(crate::BindingKey::Result(ix), player, None);
        self.bindings.add_phrase(b, p);
        self.noun_mut(p).binding = Some(b);
        self.clauses[ix.index()].result = Some(p);
        Ok(())
    }

    // ==================== Rebinding ====================

    /// Move one occurrence into another binding (loose binding).
    pub fn rebind(&mut self, phrase: PhraseIx, target: BindingIx) {
        let old = self
            .noun(phrase)
            .binding
            .expect("cannot rebind an unbound phrase");
        let target = self.bindings.resolve(target);
        trace!(
            "rebinding {} into binding {:?}",
            self.noun(phrase).describe(),
            target
        );
        self.bindings.move_phrase(phrase, old, target);
        self.noun_mut(phrase).binding = Some(target);
    }

    // ==================== Binding Collection ====================

    /// The unique bindings referenced by these clauses, in first-use order,
    /// including bindings inside objectification steps.
    pub fn all_bindings_in_clauses(&self, clauses: &[ClauseIx]) -> BinderResult<Vec<BindingIx>> {
        let mut out = Vec::new();
        for &c in clauses {
            self.collect_bindings(c, &mut out)?;
        }
        let mut seen = HashSet::new();
        out.retain(|b| seen.insert(*b));
        Ok(out)
    }

    fn collect_bindings(&self, ix: ClauseIx, out: &mut Vec<BindingIx>) -> BinderResult<()> {
        let clause = &self.clauses[ix.index()];
        if clause.is_operation() {
            if let Some(result) = clause.result {
                out.push(self.require_binding(result)?);
            }
        }
        for &p in &clause.phrases {
            match &self.phrases[p.index()] {
                BoundPhrase::Word(_) => {}
                BoundPhrase::Operation(inner) => self.collect_bindings(*inner, out)?,
                BoundPhrase::Noun(n) => {
                    out.push(self.require_binding(p)?);
                    for &nc in &n.nested_clauses {
                        self.collect_bindings(nc, out)?;
                    }
                }
            }
        }
        Ok(())
    }

    fn require_binding(&self, p: PhraseIx) -> BinderResult<BindingIx> {
        self.phrase_binding(p)
            .ok_or_else(|| BinderError::UnboundPhrase {
                term: match self.phrases[p.index()].as_noun() {
                    Some(n) => n.term.clone(),
                    None => "<operation>".to_string(),
                },
            })
    }
}
