//! Value type definition compilation.

use crate::{apply_parameter_actions, ValueTypeError, ValueTypeResult};
use factum_ast::ValueTypeDecl;
use factum_constraint::{compile_context_note, compile_value_constraint};
use factum_core::ObjectTypeId;
use factum_model::{ConceptRef, Constellation};
use log::trace;

/// Compile a value type definition: create or extend the value type, apply
/// its set-once facets, then its named parameter actions in order.
pub fn compile_value_type(
    model: &mut Constellation,
    decl: &ValueTypeDecl,
) -> ValueTypeResult<ObjectTypeId> {
    // Create the base type unless the definition is its own root.
    let base_type = if decl.base_name != decl.name {
        Some(model.ensure_value_type(&decl.base_name)?)
    } else {
        None
    };

    let vt = model.ensure_value_type(&decl.name)?;
    trace!("compiling value type '{}'", decl.name);

    // Apply independence and the remaining pragmas.
    for pragma in &decl.pragmas {
        if pragma == "independent" {
            model.set_independent(vt);
        } else {
            model.annotate(ConceptRef::ObjectType(vt), pragma.clone());
        }
    }

    if let Some(base_type) = base_type {
        if base_type != vt {
            model.set_value_type_supertype(vt, base_type)?;
        }
    }

    if let Some(length) = decl.length {
        model.set_value_type_length(vt, length)?;
    }
    if let Some(scale) = decl.scale {
        model.set_value_type_scale(vt, scale)?;
    }
    if let Some(phase) = &decl.auto_assigned_at {
        model.set_value_type_auto_assigned_at(vt, phase.clone())?;
    }

    if let Some((unit_name, exponent)) = &decl.unit {
        let unit = resolve_unit(model, &decl.name, unit_name, *exponent)?;
        model.set_value_type_unit(vt, unit)?;
    }

    if let Some(vc) = &decl.value_constraint {
        let constraint = compile_value_constraint(model, vc)?;
        model.set_value_type_constraint(vt, constraint)?;
    }

    if let Some(note) = &decl.context_note {
        model.add_context_note(ConceptRef::ObjectType(vt), compile_context_note(note));
    }

    apply_parameter_actions(model, vt, &decl.parameters)?;

    Ok(vt)
}

/// Resolve a unit by name; a non-unit exponent creates a derived unit on
/// first use.
fn resolve_unit(
    model: &mut Constellation,
    value_type: &str,
    unit_name: &str,
    exponent: i32,
) -> ValueTypeResult<factum_core::UnitId> {
    let base = model
        .unit_by_name(unit_name)
        .ok_or_else(|| ValueTypeError::UnknownUnit {
            unit: unit_name.to_string(),
            value_type: value_type.to_string(),
        })?;
    if exponent == 1 {
        return Ok(base);
    }
    let derived_name = format!("{}^{}", model.unit(base).name, exponent);
    if let Some(existing) = model.unit_by_name(&derived_name) {
        return Ok(existing);
    }
    let derived = model.add_unit(derived_name, None, None, None, false, None)?;
    model.add_derivation(derived, base, exponent);
    Ok(derived)
}
