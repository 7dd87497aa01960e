//! FACTUM Reference Resolution
//!
//! The binding engine: given the clauses of one declaration, identify the
//! object-type player of every noun phrase occurrence, partition the
//! occurrences into bindings (equivalence classes denoting one role player),
//! match each clause against existing fact type readings, and apply loose
//! binding when exact matching leaves an occurrence unresolved.
//!
//! All resolution state lives in a per-declaration [`CompilationContext`];
//! nothing here survives the declaration being compiled.

mod binding;
mod clause;
mod context;
mod error;
mod loose;
mod matching;

pub use binding::{Binding, BindingArena, BindingIx, BindingKey};
pub use clause::{BoundClause, BoundPhrase, ClauseIx, ClauseKind, NounRecord, Operator, PhraseIx};
pub use context::CompilationContext;
pub use error::{BinderError, BinderResult};
pub use loose::{bind_constrained_roles, loose_bind_roles, loose_bind_wherever_possible};
pub use matching::{clause_signature, ensure_fact_type, match_reading};
