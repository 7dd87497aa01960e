//! Named value type parameters: definitions, restrictions and settings.

use crate::{ValueTypeError, ValueTypeResult};
use factum_ast::{ParameterAction, ParameterRestrictionDecl, RangeDecl, RestrictionStyle};
use factum_constraint::compile_range;
use factum_core::{Bound, ObjectTypeId, ParameterId, Value, ValueRange};
use factum_model::Constellation;
use log::trace;

/// Apply parameter definitions, restrictions and settings to a value type,
/// in declaration order.
pub fn apply_parameter_actions(
    model: &mut Constellation,
    vt: ObjectTypeId,
    actions: &[ParameterAction],
) -> ValueTypeResult<()> {
    for action in actions {
        apply_one(model, vt, action)?;
    }
    Ok(())
}

fn apply_one(
    model: &mut Constellation,
    vt: ObjectTypeId,
    action: &ParameterAction,
) -> ValueTypeResult<()> {
    let vt_name = model.object_type_def(vt).name.clone();

    // Look up an existing definition of the parameter in the supertype chain.
    let find = |model: &Constellation, name: &str| -> Option<ParameterId> {
        model
            .supertypes_transitive(vt)
            .into_iter()
            .find_map(|st| model.parameter_of_exact(st, name))
    };

    let (parameter, restriction) = match action {
        ParameterAction::Definition {
            name,
            value_type,
            restriction,
        } => {
            if find(model, name).is_some() {
                return Err(ValueTypeError::ParameterRedefined {
                    parameter: name.clone(),
                    value_type: vt_name,
                });
            }
            let parameter_value_type = model.value_type(value_type).ok_or_else(|| {
                ValueTypeError::UnknownParameterType {
                    type_name: value_type.clone(),
                    parameter: name.clone(),
                    value_type: vt_name.clone(),
                }
            })?;
            trace!("defining parameter {} for {}", name, vt_name);
            let parameter = model.add_parameter(vt, name, parameter_value_type);
            (parameter, restriction.clone())
        }
        ParameterAction::Restriction { name, restriction } => {
            let parameter = find(model, name).ok_or_else(|| ValueTypeError::ParameterUndefined {
                parameter: name.clone(),
                value_type: vt_name.clone(),
            })?;
            trace!("restricting parameter {} for {}", name, vt_name);
            (parameter, Some(restriction.clone()))
        }
        ParameterAction::Setting { name, value } => {
            let parameter = find(model, name).ok_or_else(|| ValueTypeError::ParameterUndefined {
                parameter: name.clone(),
                value_type: vt_name.clone(),
            })?;
            trace!("setting parameter {} for {} to {}", name, vt_name, value);
            // A setting is a single-valued restriction.
            (
                parameter,
                Some(ParameterRestrictionDecl::Ranges(vec![RangeDecl::Single(
                    value.clone(),
                )])),
            )
        }
    };

    if let Some(restriction) = restriction {
        apply_restriction(model, vt, parameter, &restriction)?;
    }
    Ok(())
}

/// Normalize a restriction to value ranges, check it against the nearest
/// restricted ancestor, and record it.
fn apply_restriction(
    model: &mut Constellation,
    vt: ObjectTypeId,
    parameter: ParameterId,
    restriction: &ParameterRestrictionDecl,
) -> ValueTypeResult<()> {
    let ranges: Vec<ValueRange> = match restriction {
        ParameterRestrictionDecl::Ranges(ranges) => ranges.iter().map(compile_range).collect(),
        ParameterRestrictionDecl::Comparison { value, style } => {
            let (style_name, range) = normalize_comparison(value, *style);
            model.set_restriction_style(parameter, style_name);
            vec![range]
        }
    };

    // Find the restrictions for this parameter at the closest restricted
    // supertype.
    let mut restricted_at = None;
    for st in model.supertypes_transitive(vt) {
        let existing: Vec<ValueRange> = model
            .restrictions_at(st, parameter)
            .iter()
            .map(|r| r.range.clone())
            .collect();
        if !existing.is_empty() {
            restricted_at = Some((st, existing));
            break;
        }
    }

    if let Some((restricted_supertype, allowed)) = &restricted_at {
        if *restricted_supertype == vt {
            return Err(ValueTypeError::RestrictionRedefined {
                parameter: model.parameter(parameter).name.clone(),
                value_type: model.object_type_def(vt).name.clone(),
            });
        }
        // This restriction may not widen the supertype's restriction.
        for range in &ranges {
            if !allowed.iter().any(|a| a.includes(range)) {
                return Err(ValueTypeError::RestrictionNarrowingViolation {
                    value: range.to_string(),
                    restricted_by: model.object_type_def(*restricted_supertype).name.clone(),
                    allowed: allowed
                        .iter()
                        .map(|a| a.to_string())
                        .collect::<Vec<_>>()
                        .join(", "),
                });
            }
        }
    }

    for range in ranges {
        model.add_parameter_restriction(vt, parameter, range);
    }
    Ok(())
}

/// Normalize a `value <op> X` restriction to a range per its style.
fn normalize_comparison(value: &Value, style: RestrictionStyle) -> (&'static str, ValueRange) {
    match style {
        RestrictionStyle::Exact => ("", ValueRange::single(value.clone())),
        RestrictionStyle::Min => (
            "min",
            ValueRange::new(Some(Bound::inclusive(value.clone())), None),
        ),
        RestrictionStyle::Max => (
            "max",
            ValueRange::new(None, Some(Bound::inclusive(value.clone()))),
        ),
    }
}
