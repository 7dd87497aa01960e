//! Unit definition compilation.

use crate::ValueTypeResult;
use factum_ast::UnitDecl;
use factum_core::UnitId;
use factum_model::{Coefficient, Constellation};
use log::trace;

/// Compile a unit definition. Base units that are not yet defined are
/// created as implicitly fundamental units.
pub fn compile_unit(model: &mut Constellation, decl: &UnitDecl) -> ValueTypeResult<UnitId> {
    let coefficient = if decl.numerator / decl.denominator as f64 != 1.0 {
        Some(Coefficient {
            numerator: decl.numerator,
            denominator: decl.denominator,
            is_precise: !decl.approximate,
        })
    } else {
        None
    };
    let offset = if decl.offset == 0.0 {
        None
    } else {
        Some(decl.offset)
    };

    trace!(
        "defining unit {}{}",
        decl.singular,
        decl.plural
            .as_deref()
            .map(|p| format!("/{}", p))
            .unwrap_or_default()
    );
    let unit = model.add_unit(
        decl.singular.clone(),
        decl.plural.clone(),
        coefficient,
        offset,
        decl.base_units.is_empty(),
        decl.ephemera_url.clone(),
    )?;

    for (base_name, exponent) in &decl.base_units {
        let base = match model.unit_by_name(base_name) {
            Some(base) => base,
            None => model.add_unit(base_name.clone(), None, None, None, true, None)?,
        };
        model.add_derivation(unit, base, *exponent);
    }
    Ok(unit)
}
