// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Shared test helpers for `semantic_analysis` tests.

use crate::ast::{Attribute, Class, Expression, Feature, Formal, Method, Program};
use crate::semantic_analysis::{SemanticError, SemanticErrorKind};

pub const TEST_FILE: &str = "test.cl";

/// A class declared on line 1 of [`TEST_FILE`].
pub fn class(name: &str, parent: &str, features: Vec<Feature>) -> Class {
    class_at(name, parent, features, 1)
}

pub fn class_at(name: &str, parent: &str, features: Vec<Feature>, line: u32) -> Class {
    Class::new(name, parent, features, TEST_FILE, line)
}

/// A method declared on the same line as its body.
pub fn method(name: &str, formals: &[(&str, &str)], return_type: &str, body: Expression) -> Feature {
    let line = body.span.line();
    let formals = formals
        .iter()
        .map(|(name, type_name)| Formal::new(*name, *type_name, line))
        .collect();
    Method::new(name, formals, return_type, body, line).into()
}

pub fn attr(name: &str, type_name: &str) -> Feature {
    Attribute::new(name, type_name, Expression::no_expr(1), 1).into()
}

pub fn attr_init(name: &str, type_name: &str, init: Expression) -> Feature {
    let line = init.span.line();
    Attribute::new(name, type_name, init, line).into()
}

/// `class Main { main() : Object { 0 }; };`
pub fn main_class() -> Class {
    class(
        "Main",
        "Object",
        vec![method("main", &[], "Object", Expression::int(0, 1))],
    )
}

/// The given classes followed by a valid `Main`.
pub fn program(mut classes: Vec<Class>) -> Program {
    classes.push(main_class());
    Program::new(classes)
}

pub fn kinds(errors: &[SemanticError]) -> Vec<&SemanticErrorKind> {
    errors.iter().map(|error| &error.kind).collect()
}
