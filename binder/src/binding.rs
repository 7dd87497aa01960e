//! Bindings: equivalence classes of noun phrase occurrences.

use crate::{ClauseIx, PhraseIx};
use factum_ast::RoleName;
use factum_core::{ObjectTypeId, VariableId};
use std::collections::HashMap;

/// Index of a binding in the context's binding arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BindingIx(pub u32);

impl BindingIx {
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

/// The resolution key partitioning noun phrases into bindings.
///
/// A role name overrides adjectives; a literal occurrence binds by its
/// value; an operation result is always a binding of its own.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum BindingKey {
    /// Keyed by player and explicit role name or subscript.
    RoleName(ObjectTypeId, RoleName),
    /// Keyed by player and the disambiguating adjectives.
    Adjectives(ObjectTypeId, Option<String>, Option<String>),
    /// Keyed by player and literal value.
    Literal(ObjectTypeId, String),
    /// Unique to one operation clause's result.
    Result(ClauseIx),
}

/// One equivalence class of noun phrase occurrences denoting the same
/// role player instance within a declaration.
#[derive(Debug)]
pub struct Binding {
    pub player: ObjectTypeId,
    pub role_name: Option<RoleName>,
    /// Member occurrences, in binding order.
    pub phrases: Vec<PhraseIx>,
    /// Loose binding may redirect this binding into another.
    pub rebound_to: Option<BindingIx>,
    /// The query variable standing for this binding, once built.
    pub variable: Option<VariableId>,
}

/// Arena of bindings with stable indices and union-find-style redirects.
#[derive(Debug, Default)]
pub struct BindingArena {
    bindings: Vec<Binding>,
    by_key: HashMap<BindingKey, BindingIx>,
}

impl BindingArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Find or create the binding for a resolution key.
    pub fn ensure(
        &mut self,
        key: BindingKey,
        player: ObjectTypeId,
        role_name: Option<RoleName>,
    ) -> BindingIx {
        if let Some(&ix) = self.by_key.get(&key) {
            return self.resolve(ix);
        }
        let ix = BindingIx(self.bindings.len() as u32);
        self.bindings.push(Binding {
            player,
            role_name,
            phrases: Vec::new(),
            rebound_to: None,
            variable: None,
        });
        self.by_key.insert(key, ix);
        ix
    }

    /// Follow rebinding redirects to the live binding.
    pub fn resolve(&self, mut ix: BindingIx) -> BindingIx {
        while let Some(next) = self.bindings[ix.index()].rebound_to {
            ix = next;
        }
        ix
    }

    /// The live binding a given index resolves to.
    pub fn get(&self, ix: BindingIx) -> &Binding {
        &self.bindings[self.resolve(ix).index()]
    }

    pub fn get_mut(&mut self, ix: BindingIx) -> &mut Binding {
        let live = self.resolve(ix);
        &mut self.bindings[live.index()]
    }

    /// Add a member occurrence to a binding.
    pub fn add_phrase(&mut self, ix: BindingIx, phrase: PhraseIx) {
        self.get_mut(ix).phrases.push(phrase);
    }

    /// Move one occurrence from its binding into another binding.
    /// An emptied source binding is redirected to the target.
    pub fn move_phrase(&mut self, phrase: PhraseIx, from: BindingIx, to: BindingIx) {
        let from = self.resolve(from);
        let to = self.resolve(to);
        if from == to {
            return;
        }
        let source = &mut self.bindings[from.index()];
        source.phrases.retain(|&p| p != phrase);
        let emptied = source.phrases.is_empty();
        if emptied {
            source.rebound_to = Some(to);
        }
        self.bindings[to.index()].phrases.push(phrase);
    }

    /// Associate a query variable with a binding.
    pub fn set_variable(&mut self, ix: BindingIx, variable: VariableId) {
        self.get_mut(ix).variable = Some(variable);
    }

    /// Iterate live (non-redirected) bindings.
    pub fn iter_live(&self) -> impl Iterator<Item = (BindingIx, &Binding)> {
        self.bindings
            .iter()
            .enumerate()
            .filter(|(_, b)| b.rebound_to.is_none())
            .map(|(i, b)| (BindingIx(i as u32), b))
    }

    /// The number of bindings ever created, including redirected ones.
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}
