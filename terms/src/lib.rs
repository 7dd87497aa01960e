//! FACTUM Term Index
//!
//! Tracks which word sequences are known object-type names or local role
//! names, indexing every whole-word prefix so the lookup layer can recognize
//! multi-word terms incrementally, one word at a time.

mod index;
mod matcher;

pub use index::TermIndex;
pub use matcher::TermMatcher;
