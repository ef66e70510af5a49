// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! End-to-end semantic analysis of whole programs.

use cool_semant::ast::{Attribute, BinaryOp, CaseBranch, Class, Expression, Formal, Method, Program};
use cool_semant::prelude::*;
use cool_semant::semantic_analysis::SemanticErrorKind;

const FILE: &str = "prog.cl";

fn main_class(body: Expression) -> Class {
    Class::new(
        "Main",
        "IO",
        vec![Method::new("main", vec![], "Object", body, 2).into()],
        FILE,
        1,
    )
}

fn kinds(result: &AnalysisResult) -> Vec<SemanticErrorKind> {
    result.errors.iter().map(|e| e.kind.clone()).collect()
}

/// ```cool
/// class Counter inherits IO {
///     count : Int <- 0;
///     inc(by : Int) : SELF_TYPE { { count <- count + by; self; } };
///     get() : Int { count };
/// };
///
/// class Main inherits IO {
///     main() : Object { (new Counter).inc(2).inc(3).get() };
/// };
/// ```
fn counter_program() -> Program {
    let counter = Class::new(
        "Counter",
        "IO",
        vec![
            Attribute::new("count", "Int", Expression::int(0, 2), 2).into(),
            Method::new(
                "inc",
                vec![Formal::new("by", "Int", 3)],
                "SELF_TYPE",
                Expression::block(
                    vec![
                        Expression::assign(
                            "count",
                            Expression::binary(
                                BinaryOp::Add,
                                Expression::object("count", 3),
                                Expression::object("by", 3),
                                3,
                            ),
                            3,
                        ),
                        Expression::object("self", 3),
                    ],
                    3,
                ),
                3,
            )
            .into(),
            Method::new("get", vec![], "Int", Expression::object("count", 4), 4).into(),
        ],
        FILE,
        1,
    );

    let chain = Expression::dispatch(
        Expression::dispatch(
            Expression::dispatch(
                Expression::new_object("Counter", 8),
                "inc",
                vec![Expression::int(2, 8)],
                8,
            ),
            "inc",
            vec![Expression::int(3, 8)],
            8,
        ),
        "get",
        vec![],
        8,
    );
    Program::new(vec![counter, main_class(chain)])
}

#[test]
fn well_typed_program_has_no_errors_and_is_annotated() {
    let mut program = counter_program();
    let result = analyse(&mut program);
    assert!(!result.has_errors(), "{:?}", result.errors);

    let main = &program.classes[1];
    let Feature::Method(method) = &main.features[0] else {
        panic!("expected method");
    };
    assert_eq!(method.body.static_type, Some(StaticType::int()));

    let ExprKind::Dispatch { receiver, .. } = &method.body.kind else {
        panic!("expected dispatch");
    };
    // `inc` returns SELF_TYPE, so the chain keeps the receiver's class.
    assert_eq!(
        receiver.static_type,
        Some(StaticType::Class("Counter".into()))
    );
}

#[test]
fn tables_are_returned_for_code_generation() {
    let mut program = counter_program();
    let result = analyse(&mut program);
    let tables = &result.tables;
    assert!(tables.hierarchy.has_class("Counter"));
    assert_eq!(tables.ancestors.depth("Counter"), Some(2));
    let inc = tables
        .methods
        .resolve(&tables.ancestors, "Counter", "inc")
        .unwrap();
    assert_eq!(inc.return_type, "SELF_TYPE");
    assert!(tables.methods.resolve(&tables.ancestors, "Counter", "out_string").is_some());
}

#[test]
fn missing_main_fails_even_without_other_errors() {
    let mut program = Program::new(vec![Class::new("A", "Object", vec![], FILE, 1)]);
    let result = analyse(&mut program);
    assert_eq!(kinds(&result), vec![SemanticErrorKind::MissingMainClass]);
    let rendered: Vec<String> = result.diagnostics().iter().map(ToString::to_string).collect();
    assert_eq!(rendered, vec!["Class Main is not defined."]);
}

#[test]
fn errors_are_reported_in_phase_order_and_analysis_continues() {
    let mut program = Program::new(vec![
        Class::new("A", "Missing", vec![], FILE, 3),
        Class::new("A", "Object", vec![], FILE, 5),
        Class::new(
            "B",
            "Object",
            vec![
                Method::new("f", vec![], "Int", Expression::int(1, 8), 8).into(),
                Method::new("f", vec![], "Int", Expression::int(1, 9), 9).into(),
            ],
            FILE,
            7,
        ),
        main_class(Expression::dispatch(
            Expression::object("self", 12),
            "nope",
            vec![],
            12,
        )),
    ]);
    let result = analyse(&mut program);
    assert_eq!(
        kinds(&result),
        vec![
            SemanticErrorKind::DuplicateClass { name: "A".into() },
            SemanticErrorKind::UndefinedParent {
                class: "A".into(),
                parent: "Missing".into()
            },
            SemanticErrorKind::DuplicateMethod { method: "f".into() },
            SemanticErrorKind::UndefinedMethod {
                method: "nope".into()
            },
        ]
    );
    let lines: Vec<u32> = result.errors.iter().map(|e| e.span.line()).collect();
    assert_eq!(lines, vec![5, 3, 9, 12]);
    assert_eq!(
        result.diagnostics()[3].to_string(),
        "prog.cl:12: Dispatch to undefined method nope."
    );
}

#[test]
fn inheritance_cycle_is_reported_once_per_class() {
    let mut program = Program::new(vec![
        Class::new("A", "B", vec![], FILE, 1),
        Class::new("B", "A", vec![], FILE, 2),
        main_class(Expression::int(0, 4)),
    ]);
    let result = analyse(&mut program);
    assert_eq!(
        kinds(&result),
        vec![
            SemanticErrorKind::InheritanceCycle { class: "A".into() },
            SemanticErrorKind::InheritanceCycle { class: "B".into() },
        ]
    );
}

#[test]
fn case_over_int_and_bool_is_object() {
    let case = Expression::case(
        Expression::new_object("IO", 2),
        vec![
            CaseBranch::new("i", "Int", Expression::object("i", 3), 3),
            CaseBranch::new("b", "Bool", Expression::object("b", 4), 4),
        ],
        2,
    );
    let mut program = Program::new(vec![main_class(case)]);
    let result = analyse(&mut program);
    assert!(!result.has_errors(), "{:?}", result.errors);
    let Feature::Method(main) = &program.classes[0].features[0] else {
        panic!("expected method");
    };
    assert_eq!(main.body.static_type, Some(StaticType::object()));
}

#[test]
fn annotated_program_survives_json_round_trip() {
    let mut program = counter_program();
    let json = serde_json::to_string(&program).unwrap();
    let mut decoded: Program = serde_json::from_str(&json).unwrap();
    assert_eq!(decoded, program);

    analyse(&mut program);
    analyse(&mut decoded);
    let annotated = serde_json::to_value(&decoded).unwrap();
    let reparsed: Program = serde_json::from_value(annotated).unwrap();
    assert_eq!(reparsed, program);
}

#[test]
fn halt_message_is_fixed() {
    assert_eq!(HALT_MESSAGE, "Compilation halted due to static semantic errors.");
}
