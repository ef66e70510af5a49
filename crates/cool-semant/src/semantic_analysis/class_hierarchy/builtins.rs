// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Built-in class definitions for the class hierarchy.
//!
//! **DDD Context:** Semantic Analysis
//!
//! `Object`, `IO`, `Int`, `Bool` and `String` are registered before any user
//! class. Their bodies live in the runtime; only their shapes matter here.

use super::{AttributeInfo, ClassInfo, FormalInfo, MethodInfo};
use crate::names::{
    BASIC_CLASS_FILE, BOOL, INT, IO, OBJECT, PRIM_SLOT, SEALED_CLASSES, SELF_TYPE, STRING,
};
use crate::source_analysis::Span;

/// Create a built-in method signature.
fn builtin_method(
    name: &str,
    formals: &[(&str, &str)],
    return_type: &str,
    defined_in: &str,
) -> MethodInfo {
    MethodInfo {
        name: name.into(),
        formals: formals
            .iter()
            .map(|(name, type_name)| FormalInfo {
                name: (*name).into(),
                type_name: (*type_name).into(),
            })
            .collect(),
        return_type: return_type.into(),
        defined_in: defined_in.into(),
        span: Span::SYNTHETIC,
    }
}

fn builtin_attribute(name: &str, type_name: &str) -> AttributeInfo {
    AttributeInfo {
        name: name.into(),
        type_name: type_name.into(),
        span: Span::SYNTHETIC,
    }
}

fn builtin_class(
    name: &str,
    parent: Option<&str>,
    methods: Vec<MethodInfo>,
    attributes: Vec<AttributeInfo>,
) -> ClassInfo {
    ClassInfo {
        name: name.into(),
        parent: parent.map(Into::into),
        filename: BASIC_CLASS_FILE.into(),
        span: Span::SYNTHETIC,
        is_sealed: SEALED_CLASSES.contains(&name),
        methods,
        attributes,
        declaration: None,
    }
}

/// Returns the built-in classes in registration order (root first).
pub(super) fn builtin_classes() -> Vec<ClassInfo> {
    vec![
        builtin_class(
            OBJECT,
            None,
            vec![
                builtin_method("abort", &[], OBJECT, OBJECT),
                builtin_method("type_name", &[], STRING, OBJECT),
                builtin_method("copy", &[], SELF_TYPE, OBJECT),
            ],
            vec![],
        ),
        builtin_class(
            IO,
            Some(OBJECT),
            vec![
                builtin_method("out_string", &[("arg", STRING)], SELF_TYPE, IO),
                builtin_method("out_int", &[("arg", INT)], SELF_TYPE, IO),
                builtin_method("in_string", &[], STRING, IO),
                builtin_method("in_int", &[], INT, IO),
            ],
            vec![],
        ),
        builtin_class(
            INT,
            Some(OBJECT),
            vec![],
            vec![builtin_attribute("_val", PRIM_SLOT)],
        ),
        builtin_class(
            BOOL,
            Some(OBJECT),
            vec![],
            vec![builtin_attribute("_val", PRIM_SLOT)],
        ),
        builtin_class(
            STRING,
            Some(OBJECT),
            vec![
                builtin_method("length", &[], INT, STRING),
                builtin_method("concat", &[("arg", STRING)], STRING, STRING),
                builtin_method("substr", &[("arg", INT), ("arg2", INT)], STRING, STRING),
            ],
            vec![
                builtin_attribute("_val", INT),
                builtin_attribute("_str_field", PRIM_SLOT),
            ],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use ecow::EcoString;

    #[test]
    fn root_comes_first_and_has_no_parent() {
        let classes = builtin_classes();
        assert_eq!(classes[0].name, OBJECT);
        assert!(classes[0].parent.is_none());
        assert!(classes[1..].iter().all(|c| c.parent.as_deref() == Some(OBJECT)));
    }

    #[test]
    fn only_bool_and_string_are_sealed() {
        let sealed: Vec<_> = builtin_classes()
            .into_iter()
            .filter(|c| c.is_sealed)
            .map(|c| c.name)
            .collect();
        assert_eq!(sealed, vec![EcoString::from(BOOL), EcoString::from(STRING)]);
    }

    #[test]
    fn io_methods_return_self_type() {
        let classes = builtin_classes();
        let io = &classes[1];
        let out_string = io.methods.iter().find(|m| m.name == "out_string").unwrap();
        assert_eq!(out_string.return_type, SELF_TYPE);
        assert_eq!(out_string.formals.len(), 1);
        assert_eq!(out_string.formals[0].type_name, STRING);
    }

    #[test]
    fn builtins_have_no_declaration_index() {
        assert!(builtin_classes().iter().all(|c| c.declaration.is_none()));
    }
}
