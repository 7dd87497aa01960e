//! Fact type declaration scenarios.
//!
//! Focus areas: reading reuse across declarations, alternate readings,
//! objectification, and derived fact types with expression conditions.

use factum_ast::{Comparison, ComparisonOp, Condition, Expression, FactTypeDecl};
use factum_compiler::{compile_fact_type, Compiler};
use factum_tests::prelude::*;

fn decl(readings: Vec<Clause>) -> FactTypeDecl {
    FactTypeDecl {
        name: None,
        readings,
        conditions: Vec::new(),
        pragmas: Vec::new(),
        span: Span::default(),
    }
}

#[test]
fn test_identical_declaration_reuses_the_fact_type() {
    // GIVEN
    let mut model = schema()
        .entities(&["Person"])
        .values(&["Name"])
        .build();

    // WHEN - the same reading is declared twice
    let first = compile_fact_type(&mut model, &decl(vec![reading("Person has Name")])).unwrap();
    let second = compile_fact_type(&mut model, &decl(vec![reading("Person has Name")])).unwrap();

    // THEN
    assert_eq!(first, second);
    assert_eq!(model.fact_type(first).readings.len(), 1);
}

#[test]
fn test_alternate_reading_reverses_the_roles() {
    let mut model = schema()
        .entities(&["Person"])
        .values(&["Name"])
        .build();

    let ft = compile_fact_type(
        &mut model,
        &decl(vec![reading("Person has Name"), reading("Name is of Person")]),
    )
    .unwrap();

    assert_eq!(model.fact_type(ft).roles.len(), 2);
    assert_eq!(model.fact_type(ft).readings.len(), 2);
    let alternate = model.fact_type(ft).readings[1];
    assert_eq!(
        role_sequence_players(&model, model.reading(alternate).role_sequence),
        vec!["Name".to_string(), "Person".to_string()]
    );
}

#[test]
fn test_adjectives_are_kept_on_the_reading() {
    let mut model = schema()
        .entities(&["Person"])
        .values(&["Name"])
        .build();

    let ft = compile_fact_type(&mut model, &decl(vec![reading("Person has given-Name")])).unwrap();

    let first = model.fact_type(ft).readings[0];
    let refs = &model.role_sequence(model.reading(first).role_sequence).role_refs;
    assert_eq!(refs[1].leading_adjective.as_deref(), Some("given"));
}

#[test]
fn test_objectified_fact_type_is_nameable() {
    // GIVEN/WHEN
    let mut model = schema()
        .entities(&["Person", "Course"])
        .build();
    let mut d = decl(vec![reading("Person is enrolled in Course")]);
    d.name = Some("Enrolment".to_string());
    let ft = compile_fact_type(&mut model, &d).unwrap();

    // THEN - Enrolment exists as an entity type objectifying the fact type
    let enrolment = model.object_type("Enrolment").unwrap();
    assert_eq!(model.object_type_def(enrolment).objectifies(), Some(ft));
}

#[test]
fn test_derived_fact_type_with_aggregate_condition() {
    // GIVEN - "Team has total-Score" derived from the members' scores
    let mut model = schema()
        .entities(&["Team", "Person"])
        .values(&["Score"])
        .fact("Person plays for Team")
        .fact("Person scores Score")
        .build();
    let mut d = decl(vec![reading("Team has total-Score")]);
    d.conditions = vec![
        Condition::Clause(reading("Person plays for Team")),
        Condition::Clause(reading("Person scores Score")),
        Condition::Comparison(Comparison::new(
            ComparisonOp::Eq,
            Expression::Noun(adorned("Score", "total")),
            Expression::Aggregate {
                operation: "sum".to_string(),
                aggregand: Box::new(Expression::Noun(NounPhrase::new("Score"))),
            },
        )),
    ];

    // WHEN
    let ft = compile_fact_type(&mut model, &d).unwrap();

    // THEN - a derivation query over the two condition clauses plus the
    // aggregate operation, and a derivation expression graph.
    let query = model.fact_type(ft).derivation.expect("derivation");
    assert_eq!(model.query(query).steps.len(), 3);
    model.validate_query(query).unwrap();
    assert!(model.fact_type(ft).derivation_expression.is_some());
}

#[test]
fn test_full_compilation_flow() {
    // GIVEN - a small vocabulary compiled declaration by declaration
    let mut compiler = Compiler::new();
    let definitions = vec![Definition::FactType(FactTypeDecl {
        name: Some("Ownership".to_string()),
        readings: vec![reading("Owner owns Asset")],
        conditions: Vec::new(),
        pragmas: vec!["separate".to_string()],
        span: Span::default(),
    })];

    // WHEN - Owner and Asset are unknown, so the declaration fails
    let failures = compiler.compile_all(&definitions);

    // THEN
    assert_eq!(failures.len(), 1);
}
