//! Readable construction of declaration ASTs and fixture schemas.

use factum_ast::{
    Clause, ClauseItem, FactTypeDecl, Literal, NounPhrase, RangeDecl, RoleName, Span,
};
use factum_core::Value;
use factum_model::Constellation;

/// Build a clause from a mini notation: capitalized tokens are terms,
/// lowercase tokens are connective words, and `adj-Term` / `Term-adj`
/// tokens carry adjectives.
///
/// `reading("Person has given-Name")` is a clause of three items.
pub fn reading(spec: &str) -> Clause {
    let items = spec
        .split_whitespace()
        .map(|token| {
            if let Some((left, right)) = token.split_once('-') {
                if starts_upper(right) && !starts_upper(left) {
                    return ClauseItem::Noun(adorned(right, left));
                }
                if starts_upper(left) && !starts_upper(right) {
                    let mut np = NounPhrase::new(left);
                    np.trailing_adjective = Some(right.to_string());
                    return ClauseItem::Noun(np);
                }
            }
            if starts_upper(token) {
                ClauseItem::Noun(NounPhrase::new(token))
            } else {
                ClauseItem::Word(token.to_string())
            }
        })
        .collect();
    Clause::new(items)
}

fn starts_upper(s: &str) -> bool {
    s.chars().next().is_some_and(|c| c.is_uppercase())
}

/// A noun phrase with a leading adjective.
pub fn adorned(term: &str, leading: &str) -> NounPhrase {
    let mut np = NounPhrase::new(term);
    np.leading_adjective = Some(leading.to_string());
    np
}

/// A noun phrase with an explicit role name.
pub fn named(term: &str, role_name: &str) -> NounPhrase {
    let mut np = NounPhrase::new(term);
    np.role_name = Some(RoleName::Name(role_name.to_string()));
    np
}

/// A noun phrase standing for a literal value.
pub fn literal_noun(value: impl Into<Value>) -> NounPhrase {
    let mut np = NounPhrase::default();
    np.literal = Some(Literal::new(value));
    np
}

/// A single allowed value in a range list.
pub fn single(value: impl Into<Value>) -> RangeDecl {
    RangeDecl::Single(value.into())
}

/// A bounded or half-open allowed range.
pub fn value_range(min: Option<Value>, max: Option<Value>) -> RangeDecl {
    RangeDecl::Range { min, max }
}

/// Start a fixture schema.
pub fn schema() -> SchemaBuilder {
    SchemaBuilder::new()
}

/// Builds a fixture Constellation: object types, subtyping, and fact types
/// declared in the mini reading notation.
pub struct SchemaBuilder {
    model: Constellation,
}

impl SchemaBuilder {
    pub fn new() -> Self {
        Self {
            model: Constellation::new("Test"),
        }
    }

    /// Declare entity types.
    pub fn entities(mut self, names: &[&str]) -> Self {
        for name in names {
            self.model.ensure_entity_type(name).expect("entity type");
        }
        self
    }

    /// Declare value types.
    pub fn values(mut self, names: &[&str]) -> Self {
        for name in names {
            self.model.ensure_value_type(name).expect("value type");
        }
        self
    }

    /// Declare a subtype relationship between existing object types.
    pub fn subtype(mut self, sub: &str, supertype: &str) -> Self {
        let sub = self.model.object_type(sub).expect("subtype exists");
        let st = self.model.object_type(supertype).expect("supertype exists");
        self.model.add_supertype(sub, st);
        self
    }

    /// Declare a fact type from a reading in the mini notation.
    pub fn fact(mut self, spec: &str) -> Self {
        let decl = FactTypeDecl {
            name: None,
            readings: vec![reading(spec)],
            conditions: Vec::new(),
            pragmas: Vec::new(),
            span: Span::default(),
        };
        factum_compiler::compile_fact_type(&mut self.model, &decl).expect("fact type");
        self
    }

    pub fn build(self) -> Constellation {
        self.model
    }
}

impl Default for SchemaBuilder {
    fn default() -> Self {
        Self::new()
    }
}
