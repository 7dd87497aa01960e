//! The per-declaration dispatch.

use crate::{compile_fact_type, CompileError, CompileResult};
use factum_ast::{Definition, Span};
use factum_core::{ConstraintId, FactTypeId, ObjectTypeId, UnitId};
use factum_model::Constellation;
use factum_terms::TermIndex;
use log::{debug, trace};

/// What a successfully compiled declaration produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompiledValue {
    Schema,
    ObjectType(ObjectTypeId),
    FactType(FactTypeId),
    Constraint(ConstraintId),
    Unit(UnitId),
}

/// Compiles a stream of declarations into a model repository, keeping the
/// term index current with every object type that appears.
#[derive(Debug, Default)]
pub struct Compiler {
    model: Constellation,
    terms: TermIndex,
}

impl Compiler {
    /// Create a compiler over an empty, unnamed vocabulary.
    pub fn new() -> Self {
        Self::default()
    }

    /// The model repository compiled so far.
    pub fn model(&self) -> &Constellation {
        &self.model
    }

    /// The term index maintained for the parser.
    pub fn terms(&self) -> &TermIndex {
        &self.terms
    }

    /// Finish compilation and take the model.
    pub fn into_model(self) -> Constellation {
        self.model
    }

    /// Compile one declaration to completion. A fatal error aborts this
    /// declaration only; the repository keeps whatever object types were
    /// created before the failure (forward creations are not rolled back).
    pub fn compile_definition(&mut self, definition: &Definition) -> CompileResult<CompiledValue> {
        self.terms.reset_local_names();
        let value = match definition {
            Definition::Schema(decl) => {
                trace!("schema '{}'", decl.name);
                self.model.set_vocabulary(&decl.name);
                CompiledValue::Schema
            }
            Definition::ValueType(decl) => {
                let vt = factum_valuetype::compile_value_type(&mut self.model, decl)?;
                self.terms.add_object_type(&decl.name);
                if decl.base_name != decl.name {
                    self.terms.add_object_type(&decl.base_name);
                }
                CompiledValue::ObjectType(vt)
            }
            Definition::Unit(decl) => {
                let unit = factum_valuetype::compile_unit(&mut self.model, decl)?;
                CompiledValue::Unit(unit)
            }
            Definition::FactType(decl) => {
                let ft = compile_fact_type(&mut self.model, decl)?;
                if let Some(name) = &decl.name {
                    self.terms.add_object_type(name);
                }
                CompiledValue::FactType(ft)
            }
            Definition::Constraint(decl) => {
                let c = factum_constraint::compile_constraint(&mut self.model, decl)?;
                CompiledValue::Constraint(c)
            }
        };
        Ok(value)
    }

    /// Compile every declaration, collecting the failures with their spans.
    /// One bad declaration is reported and skipped; the rest still compile.
    pub fn compile_all(&mut self, definitions: &[Definition]) -> Vec<(Span, CompileError)> {
        let mut failures = Vec::new();
        for definition in definitions {
            if let Err(error) = self.compile_definition(definition) {
                debug!("declaration failed: {}", error);
                failures.push((definition_span(definition), error));
            }
        }
        failures
    }
}

fn definition_span(definition: &Definition) -> Span {
    match definition {
        Definition::Schema(d) => d.span,
        Definition::ValueType(d) => d.span,
        Definition::Unit(d) => d.span,
        Definition::FactType(d) => d.span,
        Definition::Constraint(d) => d.span,
    }
}
