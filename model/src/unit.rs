//! Units of measurement.

use factum_core::UnitId;

/// A unit of measurement.
#[derive(Debug, Clone)]
pub struct Unit {
    pub id: UnitId,
    pub name: String,
    pub plural_name: Option<String>,
    pub coefficient: Option<Coefficient>,
    pub offset: Option<f64>,
    /// A fundamental unit has no base units.
    pub is_fundamental: bool,
    pub ephemera_url: Option<String>,
    /// Base units with exponents, for derived units.
    pub derivations: Vec<Derivation>,
}

/// The conversion coefficient of a derived unit.
#[derive(Debug, Clone, PartialEq)]
pub struct Coefficient {
    pub numerator: f64,
    pub denominator: i64,
    pub is_precise: bool,
}

/// One base unit contribution to a derived unit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Derivation {
    pub base_unit: UnitId,
    pub exponent: i32,
}

impl Unit {
    /// Whether `name` matches this unit's singular or plural name.
    pub fn is_named(&self, name: &str) -> bool {
        self.name == name || self.plural_name.as_deref() == Some(name)
    }
}
