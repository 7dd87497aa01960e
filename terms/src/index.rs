//! The term index: known terms keyed by every whole-word prefix.

use factum_ast::NounPhrase;
use log::trace;
use std::collections::{HashMap, HashSet};

/// For each whole-word prefix, the full terms it can complete to, each mapped
/// to its underlying global term (None when the term is its own global term).
type PrefixMap = HashMap<String, HashMap<String, Option<String>>>;

/// Index of the terms known to a compilation unit.
///
/// Object-type names persist for the life of the unit; local names (role
/// names and adjectival compounds) are reset per declaration.
#[derive(Debug, Default)]
pub struct TermIndex {
    terms: PrefixMap,
    local_names: PrefixMap,
    allowed_forward: HashSet<String>,
}

impl TermIndex {
    /// Create an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new object type name.
    pub fn add_object_type(&mut self, name: &str) {
        if index_name(&mut self.terms, name, None) {
            trace!("new term '{}'", name);
        }
    }

    /// Register a local (per-declaration) role name.
    pub fn add_local_name(&mut self, name: &str) {
        if index_name(&mut self.local_names, name, None) {
            trace!("new local name '{}'", name);
        }
    }

    /// Register a leading-adjective compound, e.g. "given Name" for "Name".
    pub fn add_leading_adjective(&mut self, adjective: &str, term: &str) {
        let compound = format!("{} {}", adjective, term);
        if index_name(&mut self.local_names, &compound, Some(term)) {
            trace!("new compound term '{}- {}'", adjective, term);
        }
    }

    /// Register a trailing-adjective compound, e.g. "Name suffix" for "Name".
    pub fn add_trailing_adjective(&mut self, adjective: &str, term: &str) {
        let compound = format!("{} {}", term, adjective);
        if index_name(&mut self.local_names, &compound, Some(term)) {
            trace!("new compound term '{} -{}'", term, adjective);
        }
    }

    /// Forget all local names at the end of a declaration.
    pub fn reset_local_names(&mut self) {
        if !self.local_names.is_empty() {
            trace!("resetting {} local name entries", self.local_names.len());
        }
        self.local_names.clear();
    }

    /// Replace the set of terms that may be forward-referenced.
    pub fn set_allowed_forward<I, S>(&mut self, terms: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_forward = terms.into_iter().map(Into::into).collect();
    }

    /// Allow forward references to the unadorned terms of a role list.
    /// Adjectival phrases cannot be forward-referenced.
    pub fn allow_forward_in(&mut self, role_list: &[NounPhrase]) {
        let forwards: Vec<String> = role_list
            .iter()
            .filter(|np| np.leading_adjective.is_none() && np.trailing_adjective.is_none())
            .map(|np| np.term.clone())
            .collect();
        self.set_allowed_forward(forwards);
    }

    /// Whether `name` is an allowed forward reference.
    pub fn is_allowed_forward(&self, name: &str) -> bool {
        self.allowed_forward.contains(name)
    }

    /// Whether `name` is a complete known object-type term.
    pub fn is_object_type(&self, name: &str) -> bool {
        self.terms.get(name).is_some_and(|c| c.contains_key(name))
    }

    /// Whether `name` is a complete known local name.
    pub fn is_local_name(&self, name: &str) -> bool {
        self.local_names
            .get(name)
            .is_some_and(|c| c.contains_key(name))
    }

    pub(crate) fn term_completions(&self, prefix: &str) -> Option<&HashMap<String, Option<String>>> {
        self.terms.get(prefix)
    }

    pub(crate) fn local_completions(
        &self,
        prefix: &str,
    ) -> Option<&HashMap<String, Option<String>>> {
        self.local_names.get(prefix)
    }
}

/// Index `name` under all of its whole-word prefixes.
/// Returns true if the full name was not already present.
fn index_name(index: &mut PrefixMap, name: &str, global: Option<&str>) -> bool {
    let words: Vec<&str> = name.split_whitespace().collect();
    let mut added = false;
    let mut prefix = String::new();
    for word in words {
        if !prefix.is_empty() {
            prefix.push(' ');
        }
        prefix.push_str(word);
        let completions = index.entry(prefix.clone()).or_default();
        if !completions.contains_key(name) {
            added = true;
        }
        completions.insert(name.to_string(), global.map(str::to_string));
    }
    added
}
