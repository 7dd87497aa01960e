//! Value type parameter scenarios.
//!
//! These tests mirror a vocabulary where a root Name type defines an
//! Encoding parameter with a restricted value set, and a family of subtypes
//! narrow or fix it. Focus areas: definition/restriction/setting ordering,
//! narrowing enforcement down the supertype chain, and the redefinition
//! rules.

use factum_ast::{
    ParameterAction, ParameterRestrictionDecl, RangeDecl, RestrictionStyle, ValueTypeDecl,
};
use factum_compiler::{CompileError, CompiledValue, Compiler};
use factum_tests::prelude::*;
use factum_valuetype::ValueTypeError;

fn value_type(name: &str, base: &str, parameters: Vec<ParameterAction>) -> Definition {
    Definition::ValueType(ValueTypeDecl {
        name: name.to_string(),
        base_name: base.to_string(),
        length: None,
        scale: None,
        parameters,
        unit: None,
        value_constraint: None,
        pragmas: Vec::new(),
        context_note: None,
        auto_assigned_at: None,
        span: Span::default(),
    })
}

fn restriction(name: &str, ranges: Vec<RangeDecl>) -> ParameterAction {
    ParameterAction::Restriction {
        name: name.to_string(),
        restriction: ParameterRestrictionDecl::Ranges(ranges),
    }
}

fn setting(name: &str, value: impl Into<Value>) -> ParameterAction {
    ParameterAction::Setting {
        name: name.to_string(),
        value: value.into(),
    }
}

/// The root vocabulary: Name defines Encoding over a mixed allowed set.
fn name_vocabulary() -> Vec<Definition> {
    vec![
        value_type("String", "String", vec![]),
        value_type(
            "Name",
            "String",
            vec![
                ParameterAction::Definition {
                    name: "Encoding".to_string(),
                    value_type: "String".to_string(),
                    restriction: Some(ParameterRestrictionDecl::Ranges(vec![
                        value_range(Some(Value::from(1i64)), Some(Value::from(4i64))),
                        value_range(Some(Value::from("ASCII")), Some(Value::from("blarf"))),
                        single("latin1"),
                        single("utf8"),
                    ])),
                },
            ],
        ),
        value_type("Company Name", "Name", vec![setting("Encoding", "ASCII")]),
        value_type("Family Name", "Name", vec![setting("Encoding", "latin1")]),
        value_type("Farnarkle Name", "Name", vec![setting("Encoding", 4i64)]),
        value_type(
            "Personal Name",
            "Name",
            vec![restriction(
                "Encoding",
                vec![single("latin1"), single("utf8")],
            )],
        ),
        value_type("Given Name", "Personal Name", vec![setting("Encoding", "utf8")]),
    ]
}

#[test]
fn test_expected_model_for_the_name_vocabulary() {
    // GIVEN/WHEN
    let mut compiler = Compiler::new();
    let failures = compiler.compile_all(&name_vocabulary());

    // THEN
    assert!(failures.is_empty(), "{:?}", failures);
    let model = compiler.model();
    let name = model.object_type("Name").unwrap();
    let parameter = model.parameter_of_exact(name, "Encoding").unwrap();
    assert_eq!(model.parameter(parameter).name, "Encoding");

    // The root keeps its four allowed ranges; each subtype carries its own.
    assert_eq!(model.restrictions_at(name, parameter).len(), 4);
    for (type_name, value) in [
        ("Company Name", Value::from("ASCII")),
        ("Family Name", Value::from("latin1")),
        ("Farnarkle Name", Value::from(4i64)),
        ("Given Name", Value::from("utf8")),
    ] {
        let vt = model.object_type(type_name).unwrap();
        let rows = model.restrictions_at(vt, parameter);
        assert_eq!(rows.len(), 1, "{}", type_name);
        assert!(rows[0].range.contains(&value), "{}", type_name);
    }
}

#[test]
fn test_value_outside_the_allowed_strings_fails() {
    // GIVEN - the root allows 'ascii'.. instead of 'ASCII'..
    let mut definitions = name_vocabulary();
    let Definition::ValueType(name_decl) = &mut definitions[1] else {
        panic!("expected value type");
    };
    let ParameterAction::Definition { restriction, .. } = &mut name_decl.parameters[0] else {
        panic!("expected definition");
    };
    *restriction = Some(ParameterRestrictionDecl::Ranges(vec![
        value_range(Some(Value::from(1i64)), Some(Value::from(4i64))),
        value_range(Some(Value::from("ascii")), Some(Value::from("blarf"))),
        single("latin1"),
        single("utf8"),
    ]));

    // WHEN - Company Name still asks for 'ASCII'
    let mut compiler = Compiler::new();
    let failures = compiler.compile_all(&definitions);

    // THEN
    assert_eq!(failures.len(), 1);
    assert!(matches!(
        failures[0].1,
        CompileError::ValueType(ValueTypeError::RestrictionNarrowingViolation { .. })
    ));
}

#[test]
fn test_changing_restrictions_at_the_same_type_fails() {
    // GIVEN - a second restriction directly on Name
    let mut definitions = name_vocabulary();
    definitions.insert(
        2,
        value_type("Name", "String", vec![restriction("Encoding", vec![single("utf8")])]),
    );

    // WHEN
    let mut compiler = Compiler::new();
    let failures = compiler.compile_all(&definitions);

    // THEN
    assert_eq!(failures.len(), 1);
    assert!(matches!(
        failures[0].1,
        CompileError::ValueType(ValueTypeError::RestrictionRedefined { .. })
    ));
}

#[test]
fn test_widening_at_a_subtype_fails() {
    // GIVEN - Personal Name asks for an encoding the root disallows
    let mut definitions = name_vocabulary();
    definitions[5] = value_type(
        "Personal Name",
        "Name",
        vec![restriction(
            "Encoding",
            vec![single("iso-8859-1"), single("utf8")],
        )],
    );

    let mut compiler = Compiler::new();
    let failures = compiler.compile_all(&definitions);

    // THEN - the widening fails before any Personal Name row is recorded,
    // so the later Given Name setting checks against the root and passes.
    assert_eq!(failures.len(), 1);
    assert!(matches!(
        failures[0].1,
        CompileError::ValueType(ValueTypeError::RestrictionNarrowingViolation { .. })
    ));
}

#[test]
fn test_setting_on_undefined_parameter_fails() {
    let definitions = vec![
        value_type("String", "String", vec![]),
        value_type("Name", "String", vec![setting("Collation", "binary")]),
    ];

    let mut compiler = Compiler::new();
    let failures = compiler.compile_all(&definitions);

    assert_eq!(failures.len(), 1);
    assert!(matches!(
        failures[0].1,
        CompileError::ValueType(ValueTypeError::ParameterUndefined { .. })
    ));
}

#[test]
fn test_comparison_restriction_styles() {
    // GIVEN - a numeric parameter restricted with "value >= 2" at a subtype
    let definitions = vec![
        value_type("Integer", "Integer", vec![]),
        value_type(
            "Scale",
            "Integer",
            vec![ParameterAction::Definition {
                name: "Digits".to_string(),
                value_type: "Integer".to_string(),
                restriction: Some(ParameterRestrictionDecl::Ranges(vec![value_range(
                    Some(Value::from(1i64)),
                    None,
                )])),
            }],
        ),
        value_type(
            "Fine Scale",
            "Scale",
            vec![ParameterAction::Restriction {
                name: "Digits".to_string(),
                restriction: ParameterRestrictionDecl::Comparison {
                    value: Value::from(2i64),
                    style: RestrictionStyle::Min,
                },
            }],
        ),
    ];

    let mut compiler = Compiler::new();
    let failures = compiler.compile_all(&definitions);
    assert!(failures.is_empty(), "{:?}", failures);

    let model = compiler.model();
    let scale = model.object_type("Scale").unwrap();
    let parameter = model.parameter_of_exact(scale, "Digits").unwrap();
    assert_eq!(
        model.parameter(parameter).restriction_style.as_deref(),
        Some("min")
    );
    let fine = model.object_type("Fine Scale").unwrap();
    let rows = model.restrictions_at(fine, parameter);
    assert!(rows[0].range.contains(&Value::from(100i64)));
    assert!(!rows[0].range.contains(&Value::from(1i64)));
}

#[test]
fn test_compiled_values_report_object_types() {
    let mut compiler = Compiler::new();
    let value = compiler
        .compile_definition(&value_type("Name", "String", vec![]))
        .unwrap();
    assert!(matches!(value, CompiledValue::ObjectType(_)));
}
