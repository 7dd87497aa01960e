//! Structural identity keys for fact type readings.
//!
//! Two clauses denote the same reading iff their connective words, the
//! players at each noun position, and the disambiguating adjectives all
//! match. The signature is the canonical string form of that structure.

use factum_core::ObjectTypeId;
use std::fmt::Write;

/// One element of a reading signature.
#[derive(Debug, Clone)]
pub enum SignaturePart<'a> {
    /// A connective word.
    Word(&'a str),
    /// A role position.
    Role {
        player: ObjectTypeId,
        leading_adjective: Option<&'a str>,
        trailing_adjective: Option<&'a str>,
    },
}

/// Compute the canonical signature of a reading structure.
pub fn reading_signature(parts: &[SignaturePart<'_>]) -> String {
    let mut sig = String::new();
    for part in parts {
        if !sig.is_empty() {
            sig.push(' ');
        }
        match part {
            SignaturePart::Word(w) => sig.push_str(w),
            SignaturePart::Role {
                player,
                leading_adjective,
                trailing_adjective,
            } => {
                let _ = write!(
                    sig,
                    "{{{}|{}|{}}}",
                    player,
                    leading_adjective.unwrap_or(""),
                    trailing_adjective.unwrap_or("")
                );
            }
        }
    }
    sig
}
