//! Value ranges and bounds.
//!
//! A ValueRange is a one- or two-sided interval over literal values, used by
//! value constraints and by value type parameter restrictions. An absent bound
//! means the range is unbounded on that side.

use crate::Value;
use std::cmp::Ordering;
use std::fmt;

/// One endpoint of a value range.
#[derive(Debug, Clone, PartialEq)]
pub struct Bound {
    /// The endpoint value.
    pub value: Value,
    /// Whether the endpoint itself is allowed.
    pub is_inclusive: bool,
}

impl Bound {
    /// Create an inclusive bound.
    pub fn inclusive(value: Value) -> Self {
        Self {
            value,
            is_inclusive: true,
        }
    }
}

/// A range of allowed values, optionally unbounded on either side.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueRange {
    /// Lower bound, or None for unbounded below.
    pub minimum: Option<Bound>,
    /// Upper bound, or None for unbounded above.
    pub maximum: Option<Bound>,
}

impl ValueRange {
    /// Create a range from optional endpoints.
    pub fn new(minimum: Option<Bound>, maximum: Option<Bound>) -> Self {
        Self { minimum, maximum }
    }

    /// A range admitting a single value.
    pub fn single(value: Value) -> Self {
        Self {
            minimum: Some(Bound::inclusive(value.clone())),
            maximum: Some(Bound::inclusive(value)),
        }
    }

    /// Whether this range wholly includes `other`.
    ///
    /// Endpoints of incomparable kinds (e.g. a string range against an
    /// integer range) never include one another.
    pub fn includes(&self, other: &ValueRange) -> bool {
        let min_ok = match (&self.minimum, &other.minimum) {
            (None, _) => true,
            (Some(_), None) => false,
            (Some(own), Some(theirs)) => match own.value.partial_cmp_same_kind(&theirs.value) {
                Some(Ordering::Less) => true,
                Some(Ordering::Equal) => own.is_inclusive || !theirs.is_inclusive,
                Some(Ordering::Greater) => false,
                None => false,
            },
        };
        if !min_ok {
            return false;
        }
        match (&self.maximum, &other.maximum) {
            (None, _) => true,
            (Some(_), None) => false,
            (Some(own), Some(theirs)) => match own.value.partial_cmp_same_kind(&theirs.value) {
                Some(Ordering::Greater) => true,
                Some(Ordering::Equal) => own.is_inclusive || !theirs.is_inclusive,
                Some(Ordering::Less) => false,
                None => false,
            },
        }
    }

    /// Whether a single value falls within this range.
    pub fn contains(&self, value: &Value) -> bool {
        self.includes(&ValueRange::single(value.clone()))
    }
}

impl fmt::Display for ValueRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.minimum, &self.maximum) {
            (Some(min), Some(max)) if min.value == max.value => write!(f, "{}", min.value),
            (min, max) => {
                if let Some(min) = min {
                    write!(f, "{}", min.value)?;
                }
                write!(f, "..")?;
                if let Some(max) = max {
                    write!(f, "{}", max.value)?;
                }
                Ok(())
            }
        }
    }
}
