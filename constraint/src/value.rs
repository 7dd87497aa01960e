//! Value constraint compilation.

use crate::{compile_context_note, compile_enforcement, ConstraintError, ConstraintResult};
use factum_ast::{RangeDecl, ValueConstraintDecl};
use factum_core::{Bound, ConstraintId, ValueRange};
use factum_model::{ConceptRef, Constellation, Constraint, ValueConstraint};
use regex_lite::Regex;

/// Convert a declared range to its metamodel form; every given endpoint
/// becomes an inclusive bound.
pub fn compile_range(range: &RangeDecl) -> ValueRange {
    match range {
        RangeDecl::Single(value) => ValueRange::single(value.clone()),
        RangeDecl::Range { min, max } => ValueRange::new(
            min.clone().map(Bound::inclusive),
            max.clone().map(Bound::inclusive),
        ),
    }
}

/// Compile a value constraint: allowed ranges or a regular expression.
pub fn compile_value_constraint(
    model: &mut Constellation,
    decl: &ValueConstraintDecl,
) -> ConstraintResult<ConstraintId> {
    if decl.units.is_some() {
        return Err(ConstraintError::UnitsOnValueConstraint);
    }
    if !decl.ranges.is_empty() && decl.regular_expression.is_some() {
        return Err(ConstraintError::MixedValueConstraint);
    }

    let regular_expression = match &decl.regular_expression {
        Some(pattern) => {
            Regex::new(pattern).map_err(|e| ConstraintError::InvalidRegex {
                pattern: pattern.clone(),
                reason: e.to_string(),
            })?;
            Some(pattern.clone())
        }
        None => None,
    };
    let ranges = decl.ranges.iter().map(compile_range).collect();

    let constraint = model.add_constraint(Constraint::Value(ValueConstraint {
        ranges,
        regular_expression,
        enforcement: decl.enforcement.as_ref().map(compile_enforcement),
    }));
    if let Some(note) = &decl.context_note {
        model.add_context_note(ConceptRef::Constraint(constraint), compile_context_note(note));
    }
    Ok(constraint)
}
