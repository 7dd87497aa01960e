//! Query building scenarios.
//!
//! Focus areas: the completeness invariants (one variable per binding, one
//! step per fact-bearing clause, every play inside its query), literal
//! variables, and objectification recursion.

use factum_binder::{ensure_fact_type, match_reading, CompilationContext};
use factum_query::{build_query, build_step, build_variables, RolesByBinding};
use factum_tests::prelude::*;

fn person_schema() -> Constellation {
    schema()
        .entities(&["Person"])
        .values(&["Name", "Age", "Score"])
        .fact("Person has Name")
        .fact("Person is of Age")
        .fact("Person scores Score")
        .build()
}

#[test]
fn test_query_completeness_over_a_three_clause_join() {
    // GIVEN
    let mut model = person_schema();
    let mut ctx = CompilationContext::new(&mut model);
    let clauses = [
        ctx.ingest_clause(&reading("Person has Name")).unwrap(),
        ctx.ingest_clause(&reading("Person is of Age")).unwrap(),
        ctx.ingest_clause(&reading("Person scores Score")).unwrap(),
    ];
    ctx.bind(&clauses, &[]).unwrap();
    for &c in &clauses {
        match_reading(&mut ctx, c).unwrap().expect("known fact type");
    }

    // WHEN
    let (query, roles_by_binding) = build_query(&mut ctx, &clauses).unwrap();

    // THEN - four distinct bindings, three steps, and every play's variable
    // belongs to the query's variable list exactly once.
    let q = ctx.model.query(query);
    assert_eq!(q.variables.len(), 4);
    assert_eq!(q.steps.len(), 3);
    assert_eq!(roles_by_binding.len(), 4);
    ctx.model.validate_query(query).unwrap();

    // The shared Person variable is played in every step.
    let person = ctx.model.object_type("Person").unwrap();
    let person_var = q
        .variables
        .iter()
        .copied()
        .find(|&v| ctx.model.variable(v).object_type == person)
        .unwrap();
    for &s in &q.steps {
        let plays = &ctx.model.step(s).plays;
        assert!(plays
            .iter()
            .any(|&p| ctx.model.play(p).variable == person_var));
    }
}

#[test]
fn test_literal_occurrence_fixes_its_variable() {
    // GIVEN - "Person is of Age 21"
    let mut model = person_schema();
    let mut ctx = CompilationContext::new(&mut model);
    let mut clause = reading("Person is of");
    clause.items.push(ClauseItem::Noun(literal_noun(21i64)));
    let c = ctx.ingest_clause(&clause).unwrap();
    ctx.bind(&[c], &[]).unwrap();
    ensure_fact_type(&mut ctx, c).unwrap();

    // WHEN
    let (query, _) = build_query(&mut ctx, &[c]).unwrap();

    // THEN
    let fixed: Vec<_> = ctx
        .model
        .query(query)
        .variables
        .iter()
        .filter(|&&v| ctx.model.variable(v).value.is_some())
        .collect();
    assert_eq!(fixed.len(), 1);
}

#[test]
fn test_objectification_marks_the_outer_variable() {
    // GIVEN - Enrolment objectifies "Person has Name"; a naked Enrolment
    // reference carries the defining clause nested inside it.
    let mut model = schema()
        .entities(&["Person"])
        .values(&["Name"])
        .fact("Person has Name")
        .build();
    let naming = {
        let mut ctx = CompilationContext::new(&mut model);
        let c = ctx.ingest_clause(&reading("Person has Name")).unwrap();
        ctx.bind(&[c], &[]).unwrap();
        match_reading(&mut ctx, c).unwrap().unwrap()
    };
    let enrolment = model.ensure_entity_type("Enrolment").unwrap();
    model.set_objectifies(enrolment, naming);

    let mut ctx = CompilationContext::new(&mut model);
    let mut outer = NounPhrase::new("Enrolment");
    outer.nested_clauses = vec![reading("Person has Name")];
    let c = ctx
        .ingest_clause(&Clause::new(vec![ClauseItem::Noun(outer)]))
        .unwrap();
    ctx.bind(&[c], &[]).unwrap();
    let nested = ctx.noun(ctx.clause_nouns(c)[0]).nested_clauses.clone();
    match_reading(&mut ctx, nested[0]).unwrap().unwrap();

    // WHEN
    let query = build_variables(&mut ctx, &[c]).unwrap();
    let mut roles_by_binding = RolesByBinding::new();
    let step = build_step(&mut ctx, query, c, &mut roles_by_binding)
        .unwrap()
        .expect("objectification step");

    // THEN - the naked clause yields no step of its own; the nested step
    // records the Enrolment variable as its objectification.
    assert_eq!(ctx.model.query(query).steps.len(), 1);
    let variable = ctx.model.step(step).objectification_variable.unwrap();
    assert_eq!(ctx.model.variable(variable).object_type, enrolment);
}

#[test]
fn test_unrelated_entity_does_not_objectify() {
    // GIVEN - Sighting does not objectify "Person has Name"
    let mut model = schema()
        .entities(&["Person", "Sighting"])
        .values(&["Name"])
        .fact("Person has Name")
        .build();

    let mut ctx = CompilationContext::new(&mut model);
    let mut outer = NounPhrase::new("Sighting");
    outer.nested_clauses = vec![reading("Person has Name")];
    let c = ctx
        .ingest_clause(&Clause::new(vec![ClauseItem::Noun(outer)]))
        .unwrap();
    ctx.bind(&[c], &[]).unwrap();
    let nested = ctx.noun(ctx.clause_nouns(c)[0]).nested_clauses.clone();
    match_reading(&mut ctx, nested[0]).unwrap().unwrap();

    // WHEN
    let query = build_variables(&mut ctx, &[c]).unwrap();
    let mut roles_by_binding = RolesByBinding::new();
    let step = build_step(&mut ctx, query, c, &mut roles_by_binding)
        .unwrap()
        .expect("nested step");

    // THEN - the nested step exists but objectifies nothing.
    assert!(ctx.model.step(step).objectification_variable.is_none());
}
