//! Reference resolution scenarios.
//!
//! Focus areas: the binding partition invariants, subscript and role-name
//! disambiguation, forward references, and loose binding determinism.

use factum_binder::{BinderError, CompilationContext};
use factum_constraint::compile_constraint;
use factum_tests::prelude::*;

#[test]
fn test_binding_partition_is_an_equivalence_relation() {
    // GIVEN - a declaration where Person occurs four times across clauses
    let mut model = schema()
        .entities(&["Person"])
        .values(&["Name", "Age"])
        .build();
    let mut ctx = CompilationContext::new(&mut model);
    let clauses = [
        ctx.ingest_clause(&reading("Person has Name")).unwrap(),
        ctx.ingest_clause(&reading("Person is of Age")).unwrap(),
        ctx.ingest_clause(&reading("Person likes Person")).unwrap(),
    ];

    // WHEN
    ctx.bind(&clauses, &[]).unwrap();

    // THEN - every noun phrase belongs to exactly one binding, no binding
    // is empty, and all Person occurrences share one binding.
    let bindings = ctx.all_bindings_in_clauses(&clauses).unwrap();
    assert_eq!(bindings.len(), 3);
    for &b in &bindings {
        assert!(!ctx.bindings.get(b).phrases.is_empty());
    }
    let person_bindings: Vec<_> = clauses
        .iter()
        .flat_map(|&c| ctx.clause_nouns(c))
        .filter(|&p| ctx.noun(p).term == "Person")
        .map(|p| ctx.phrase_binding(p).unwrap())
        .collect();
    assert_eq!(person_bindings.len(), 4);
    assert!(person_bindings.windows(2).all(|w| w[0] == w[1]));
}

#[test]
fn test_subscripts_split_same_player_occurrences() {
    // GIVEN - "Person(1) likes Person(2)"
    let mut model = schema().entities(&["Person"]).build();
    let mut ctx = CompilationContext::new(&mut model);
    let mut first = NounPhrase::new("Person");
    first.role_name = Some(RoleName::Subscript(1));
    let mut second = NounPhrase::new("Person");
    second.role_name = Some(RoleName::Subscript(2));
    let c = ctx
        .ingest_clause(&Clause::new(vec![
            ClauseItem::Noun(first),
            ClauseItem::word("likes"),
            ClauseItem::Noun(second),
        ]))
        .unwrap();

    // WHEN
    ctx.bind(&[c], &[]).unwrap();

    // THEN - the subscripts keep the two occurrences apart.
    let nouns = ctx.clause_nouns(c);
    assert_ne!(ctx.phrase_binding(nouns[0]), ctx.phrase_binding(nouns[1]));
}

#[test]
fn test_role_name_resolves_before_textual_lookup() {
    // GIVEN - 'boss' is declared as a role name of Person, and also used
    // as a plain term in an earlier clause.
    let mut model = schema().entities(&["Person"]).values(&["Salary"]).build();
    let mut ctx = CompilationContext::new(&mut model);
    // "boss" is lowercase, so it is built as a noun explicitly.
    let uses = ctx
        .ingest_clause(&Clause::new(vec![
            ClauseItem::Noun(NounPhrase::new("boss")),
            ClauseItem::word("earns"),
            ClauseItem::Noun(NounPhrase::new("Salary")),
        ]))
        .unwrap();
    let defines = ctx
        .ingest_clause(&Clause::new(vec![
            ClauseItem::Noun(named("Person", "boss")),
            ClauseItem::word("supervises"),
            ClauseItem::Noun(NounPhrase::new("Person")),
        ]))
        .unwrap();

    // WHEN - the defining clause comes later in reading order
    ctx.bind(&[uses, defines], &[]).unwrap();

    // THEN - the textual 'boss' resolved to Person and joined the defining
    // occurrence's binding.
    let person = ctx.model.object_type("Person").unwrap();
    let boss = ctx.clause_nouns(uses)[0];
    assert_eq!(ctx.noun(boss).player, Some(person));
    assert_eq!(
        ctx.phrase_binding(boss),
        ctx.phrase_binding(ctx.clause_nouns(defines)[0])
    );
}

#[test]
fn test_unresolved_term_is_fatal_without_forward_permission() {
    let mut model = schema().entities(&["Person"]).build();
    let mut ctx = CompilationContext::new(&mut model);
    let c = ctx.ingest_clause(&reading("Person owns Widget")).unwrap();

    let result = ctx.bind(&[c], &[]);
    assert!(matches!(result, Err(BinderError::UnresolvedTerm { term }) if term == "Widget"));
}

#[test]
fn test_forward_reference_creates_the_entity_type() {
    let mut model = schema().entities(&["Person"]).build();
    let mut ctx = CompilationContext::new(&mut model);
    ctx.allowed_forward_terms.insert("Widget".to_string());
    let c = ctx.ingest_clause(&reading("Person owns Widget")).unwrap();

    ctx.bind(&[c], &[]).unwrap();

    let widget = ctx.model.object_type("Widget").unwrap();
    assert!(ctx.model.object_type_def(widget).is_entity_type());
}

mod loose_binding_determinism {
    use super::*;

    fn name_schema() -> Constellation {
        schema()
            .entities(&["Competitor"])
            .values(&["FamilyName", "GivenName"])
            .fact("Competitor has FamilyName")
            .fact("Competitor has GivenName")
            .build()
    }

    #[test]
    fn test_unique_candidate_always_merges() {
        // GIVEN - a presence constraint whose listed roles each have one
        // unambiguous clause occurrence
        let mut model = name_schema();
        let decl = ConstraintDecl {
            body: ConstraintBody::Presence {
                clauses_lists: vec![
                    vec![reading("Competitor has FamilyName")],
                    vec![reading("Competitor has GivenName")],
                ],
                role_list: vec![NounPhrase::new("FamilyName"), NounPhrase::new("GivenName")],
                quantifier: Quantifier::at_most_one(),
            },
            enforcement: None,
            context_note: None,
            span: Span::default(),
        };

        // WHEN/THEN - compilation succeeds deterministically
        compile_constraint(&mut model, &decl).unwrap();
    }

    #[test]
    fn test_zero_candidates_fail_with_role_not_found() {
        // GIVEN - a listed role that never occurs in the clauses
        let mut model = name_schema();
        model.ensure_value_type("Nickname").unwrap();
        let decl = ConstraintDecl {
            body: ConstraintBody::Presence {
                clauses_lists: vec![vec![reading("Competitor has FamilyName")]],
                role_list: vec![NounPhrase::new("Nickname")],
                quantifier: Quantifier::at_most_one(),
            },
            enforcement: None,
            context_note: None,
            span: Span::default(),
        };

        let result = compile_constraint(&mut model, &decl);
        assert!(matches!(
            result,
            Err(factum_constraint::ConstraintError::Binder(
                BinderError::ConstrainedRoleNotFound { .. }
            ))
        ));
    }

    #[test]
    fn test_two_candidates_fail_with_ambiguity() {
        // GIVEN - a listed adorned Person facing two equal occurrences
        let mut model = schema()
            .entities(&["Person"])
            .fact("Person likes Person")
            .build();
        let decl = ConstraintDecl {
            body: ConstraintBody::Presence {
                clauses_lists: vec![vec![reading("Person likes Person")]],
                role_list: vec![adorned("Person", "happy")],
                quantifier: Quantifier::at_most_one(),
            },
            enforcement: None,
            context_note: None,
            span: Span::default(),
        };

        let result = compile_constraint(&mut model, &decl);
        assert!(matches!(
            result,
            Err(factum_constraint::ConstraintError::Binder(
                BinderError::AmbiguousBinding { .. }
            ))
        ));
    }
}
