//! Constraint compilation scenarios.
//!
//! These tests run whole constraint declarations against fixture schemas.
//! Focus areas: presence constraints (role lists and either/or), set
//! comparison constraints with loose binding, ring constraints from reading
//! qualifiers, and value constraints.

use factum_constraint::{compile_constraint, ConstraintError};
use factum_tests::prelude::*;

fn constraint(body: ConstraintBody) -> ConstraintDecl {
    ConstraintDecl {
        body,
        enforcement: None,
        context_note: None,
        span: Span::default(),
    }
}

mod presence {
    use super::*;

    fn competitor_schema() -> Constellation {
        schema()
            .entities(&["Competitor"])
            .values(&["FamilyName", "GivenName"])
            .fact("Competitor has FamilyName")
            .fact("Competitor has GivenName")
            .build()
    }

    #[test]
    fn test_cardinality_one_over_two_role_composite() {
        // GIVEN - "each combination FamilyName, GivenName occurs at most
        // one time in Competitor has FamilyName, Competitor has GivenName"
        let mut model = competitor_schema();
        let decl = constraint(ConstraintBody::Presence {
            clauses_lists: vec![
                vec![reading("Competitor has FamilyName")],
                vec![reading("Competitor has GivenName")],
            ],
            role_list: vec![NounPhrase::new("FamilyName"), NounPhrase::new("GivenName")],
            quantifier: Quantifier::at_most_one(),
        });

        // WHEN
        let id = compile_constraint(&mut model, &decl).unwrap();

        // THEN
        let pc = model.constraint(id).as_presence().unwrap();
        assert_eq!(pc.max_frequency, Some(1));
        assert!(!pc.is_mandatory);
        assert_eq!(
            constraint_role_players(&model, id),
            vec![vec!["FamilyName".to_string(), "GivenName".to_string()]]
        );
    }

    #[test]
    fn test_either_or_constrains_the_unique_duplicated_role() {
        // GIVEN - "each Person drives or walks" as two unary clause lists
        let mut model = schema()
            .entities(&["Person"])
            .fact("Person drives")
            .fact("Person walks")
            .build();
        let decl = constraint(ConstraintBody::Presence {
            clauses_lists: vec![vec![reading("Person drives")], vec![reading("Person walks")]],
            role_list: vec![],
            quantifier: Quantifier::new(Some(1), None),
        });

        // WHEN
        let id = compile_constraint(&mut model, &decl).unwrap();

        // THEN - mandatory disjunction over the two Person roles
        let pc = model.constraint(id).as_presence().unwrap();
        assert!(pc.is_mandatory);
        assert_eq!(
            constraint_role_players(&model, id),
            vec![vec!["Person".to_string(), "Person".to_string()]]
        );
    }

    #[test]
    fn test_join_presence_is_unsupported() {
        let mut model = competitor_schema();
        let decl = constraint(ConstraintBody::Presence {
            clauses_lists: vec![vec![
                reading("Competitor has FamilyName"),
                reading("Competitor has GivenName"),
            ]],
            role_list: vec![NounPhrase::new("Competitor")],
            quantifier: Quantifier::at_most_one(),
        });

        let result = compile_constraint(&mut model, &decl);
        assert!(matches!(
            result,
            Err(ConstraintError::JoinPresenceUnsupported { .. })
        ));
    }

    #[test]
    fn test_enforcement_and_note_attach_after_compilation() {
        let mut model = competitor_schema();
        let mut decl = constraint(ConstraintBody::Presence {
            clauses_lists: vec![vec![reading("Competitor has FamilyName")]],
            role_list: vec![NounPhrase::new("FamilyName")],
            quantifier: Quantifier::at_most_one(),
        });
        decl.enforcement = Some(Enforcement::new("assert"));
        decl.context_note = Some(ContextNote {
            kind: ContextNoteKind::Because,
            description: "family names distinguish competitors".to_string(),
            according_to: vec!["registrar".to_string()],
            agreement: None,
        });

        let id = compile_constraint(&mut model, &decl).unwrap();

        let pc = model.constraint(id).as_presence().unwrap();
        assert_eq!(pc.enforcement.as_ref().unwrap().action, "assert");
        assert_eq!(
            model
                .context_notes_of(factum_model::ConceptRef::Constraint(id))
                .len(),
            1
        );
    }
}

mod set_comparison {
    use super::*;

    fn name_schema() -> Constellation {
        schema()
            .entities(&["Person"])
            .values(&["Name"])
            .fact("Person has given-Name")
            .fact("Person has family-Name")
            .fact("Person uses Name")
            .build()
    }

    #[test]
    fn test_set_equality_pairs_adjectival_names_across_sides() {
        // GIVEN - Person has given-Name iff Person has family-Name
        let mut model = name_schema();
        let decl = constraint(ConstraintBody::SetEquality {
            clauses_lists: vec![
                vec![reading("Person has given-Name")],
                vec![reading("Person has family-Name")],
            ],
        });

        // WHEN
        let id = compile_constraint(&mut model, &decl).unwrap();

        // THEN - each adorned Name is the other's unique loose-binding
        // candidate, so both (Person, Name) pairs are compared.
        assert_eq!(
            constraint_role_players(&model, id),
            vec![
                vec!["Person".to_string(), "Name".to_string()],
                vec!["Person".to_string(), "Name".to_string()]
            ]
        );
    }

    #[test]
    fn test_loose_binding_pairs_bare_and_adorned_names() {
        // GIVEN - the bare Name on one side has a unique adorned partner
        let mut model = name_schema();
        let decl = constraint(ConstraintBody::Subset {
            subset: vec![reading("Person has given-Name")],
            superset: vec![reading("Person uses Name")],
        });

        // WHEN
        let id = compile_constraint(&mut model, &decl).unwrap();

        // THEN - Person and the paired Name are both common bindings.
        let players = constraint_role_players(&model, id);
        assert_eq!(players[0], vec!["Person".to_string(), "Name".to_string()]);
        assert_eq!(players[1], vec!["Person".to_string(), "Name".to_string()]);
    }

    #[test]
    fn test_strict_role_list_exclusion() {
        let mut model = name_schema();
        let decl = constraint(ConstraintBody::SetExclusion {
            clauses_lists: vec![
                vec![reading("Person has given-Name")],
                vec![reading("Person has family-Name")],
            ],
            role_list: vec![NounPhrase::new("Person")],
            quantifier: Quantifier::new(Some(1), Some(1)),
        });

        let id = compile_constraint(&mut model, &decl).unwrap();

        let Constraint::SetExclusion(xc) = model.constraint(id) else {
            panic!("expected set exclusion");
        };
        assert!(xc.is_mandatory);
        assert_eq!(xc.role_sequences.len(), 2);
    }

    #[test]
    fn test_disjoint_clause_lists_are_fatal() {
        let mut model = schema()
            .entities(&["Person", "Venue"])
            .values(&["Name", "Address"])
            .fact("Person has Name")
            .fact("Venue is at Address")
            .build();
        let decl = constraint(ConstraintBody::SetEquality {
            clauses_lists: vec![
                vec![reading("Person has Name")],
                vec![reading("Venue is at Address")],
            ],
        });

        let result = compile_constraint(&mut model, &decl);
        assert!(matches!(
            result,
            Err(ConstraintError::NoCommonBinding { .. })
        ));
    }

    #[test]
    fn test_join_side_builds_a_query() {
        // GIVEN - the superset side joins two clauses through Person
        let mut model = schema()
            .entities(&["Person"])
            .values(&["Name", "Age"])
            .fact("Person has Name")
            .fact("Person is of Age")
            .fact("Person uses Name")
            .build();
        let decl = constraint(ConstraintBody::Subset {
            subset: vec![reading("Person uses Name")],
            superset: vec![reading("Person has Name"), reading("Person is of Age")],
        });

        // WHEN
        let id = compile_constraint(&mut model, &decl).unwrap();

        // THEN - the superset sequence's role refs carry plays from the
        // built query; the plain subset side carries none.
        let Constraint::Subset(sc) = model.constraint(id) else {
            panic!("expected subset");
        };
        let subset_refs = &model.role_sequence(sc.subset_role_sequence).role_refs;
        assert!(subset_refs.iter().all(|rr| rr.play.is_none()));
        let superset_refs = &model.role_sequence(sc.superset_role_sequence).role_refs;
        assert!(superset_refs.iter().all(|rr| rr.play.is_some()));
    }
}

mod ring {
    use super::*;
    use factum_ast::FactTypeDecl;
    use factum_compiler::{compile_fact_type, CompileError};

    fn supervision(qualifiers: &[&str]) -> FactTypeDecl {
        let mut clause = reading("Person supervises Person");
        clause.qualifiers = qualifiers.iter().map(|q| q.to_string()).collect();
        FactTypeDecl {
            name: None,
            readings: vec![clause],
            conditions: Vec::new(),
            pragmas: Vec::new(),
            span: Span::default(),
        }
    }

    #[test]
    fn test_ring_from_reading_qualifiers() {
        // GIVEN/WHEN
        let mut model = Constellation::new("Test");
        model.ensure_entity_type("Person").unwrap();
        compile_fact_type(&mut model, &supervision(&["acyclic", "transitive"])).unwrap();

        // THEN - a ring constraint over the two Person roles exists, with
        // the combining keyword ordered last.
        let ring = model
            .all_constraints()
            .find_map(|(_, c)| c.as_ring())
            .expect("ring constraint");
        assert_eq!(ring.ring_types, vec![RingType::Acyclic, RingType::Transitive]);
    }

    #[test]
    fn test_incompatible_ring_keywords_are_fatal() {
        let mut model = Constellation::new("Test");
        model.ensure_entity_type("Person").unwrap();

        let result = compile_fact_type(&mut model, &supervision(&["transitive", "symmetric"]));
        assert!(matches!(
            result,
            Err(CompileError::Constraint(
                ConstraintError::RingIncompatible { .. }
            ))
        ));
    }

    #[test]
    fn test_ring_without_common_ancestor_is_no_match() {
        // GIVEN - a role pair whose players share no supertype
        let mut model = Constellation::new("Test");
        model.ensure_entity_type("Person").unwrap();
        model.ensure_value_type("Name").unwrap();
        let mut clause = reading("Person has Name");
        clause.qualifiers = vec!["transitive".to_string(), "asymmetric".to_string()];
        let decl = FactTypeDecl {
            name: None,
            readings: vec![clause],
            conditions: Vec::new(),
            pragmas: Vec::new(),
            span: Span::default(),
        };

        // WHEN/THEN - zero qualifying pairs, never a silent role choice.
        let result = compile_fact_type(&mut model, &decl);
        assert!(matches!(
            result,
            Err(CompileError::Constraint(ConstraintError::RingNoMatch { .. }))
        ));
    }
}

mod value {
    use super::*;

    #[test]
    fn test_value_constraint_on_value_type() {
        // GIVEN - Rank is restricted to 1..5
        let mut model = schema().values(&["Rank"]).build();
        let decl = constraint(ConstraintBody::Value {
            constraint: ValueConstraintDecl {
                ranges: vec![value_range(
                    Some(Value::from(1i64)),
                    Some(Value::from(5i64)),
                )],
                ..Default::default()
            },
            value_type: "Rank".to_string(),
        });

        // WHEN
        let id = compile_constraint(&mut model, &decl).unwrap();

        // THEN - the constraint is attached to the value type's facets
        let rank = model.object_type("Rank").unwrap();
        assert_eq!(
            model
                .object_type_def(rank)
                .value_facets()
                .unwrap()
                .value_constraint,
            Some(id)
        );
        let vc = model.constraint(id).as_value().unwrap();
        assert!(vc.ranges[0].contains(&Value::from(3i64)));
        assert!(!vc.ranges[0].contains(&Value::from(9i64)));
    }

    #[test]
    fn test_units_on_value_constraints_are_unsupported() {
        let mut model = schema().values(&["Distance"]).build();
        let decl = constraint(ConstraintBody::Value {
            constraint: ValueConstraintDecl {
                ranges: vec![single(1i64)],
                units: Some("mm".to_string()),
                ..Default::default()
            },
            value_type: "Distance".to_string(),
        });

        let result = compile_constraint(&mut model, &decl);
        assert!(matches!(
            result,
            Err(ConstraintError::UnitsOnValueConstraint)
        ));
    }
}
