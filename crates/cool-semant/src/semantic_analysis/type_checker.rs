// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Type inference and checking for class bodies.
//!
//! **DDD Context:** Semantic Analysis
//!
//! The checker walks every user class once the class, ancestor and method
//! tables are complete. Each expression gets a [`StaticType`] written into
//! its `static_type` slot; violations are collected rather than raised, and a
//! best-guess type (usually `Object` or the declared type) is substituted so
//! the rest of the class is still checked.
//!
//! # Scope layout
//!
//! For a class `C` with ancestors `A1 ... An` below `Object`, one frame per
//! ancestor is opened (outermost first) and held for the whole class. Methods
//! add a frame for their formals; `let` and each `case` branch add one more.
//! All frames are owned by [`ScopeGuard`](super::scope::ScopeGuard)s.

use super::ProgramTables;
use super::error::{SemanticError, SemanticErrorKind};
use super::scope::{BindingKind, TypeEnv};
use crate::ast::{Attribute, BinaryOp, CaseBranch, Class, ExprKind, Expression, Feature, Method, Program};
use crate::names;
use crate::semantic_analysis::class_hierarchy::MethodInfo;
use crate::source_analysis::Span;
use crate::types::StaticType;
use ecow::EcoString;
use tracing::debug;

/// Infers and checks the static types of every user class.
pub(crate) struct TypeChecker<'t> {
    tables: &'t ProgramTables,
    current_class: EcoString,
    current_file: EcoString,
    errors: Vec<SemanticError>,
}

impl<'t> TypeChecker<'t> {
    pub(crate) fn new(tables: &'t ProgramTables) -> Self {
        Self {
            tables,
            current_class: EcoString::new(),
            current_file: EcoString::new(),
            errors: Vec::new(),
        }
    }

    pub(crate) fn into_errors(self) -> Vec<SemanticError> {
        self.errors
    }

    /// Check every class that made it into the class table.
    ///
    /// Rejected declarations (duplicates, basic-class redefinitions) are
    /// skipped; their bodies stay unannotated.
    pub(crate) fn check_program(&mut self, program: &mut Program) {
        let tables = self.tables;
        for (index, class) in program.classes.iter_mut().enumerate() {
            let installed = tables
                .hierarchy
                .get_class(&class.name)
                .and_then(|info| info.declaration);
            if installed == Some(index) {
                self.check_class(class);
            }
        }
    }

    fn report(&mut self, kind: SemanticErrorKind, span: Span) {
        self.errors
            .push(SemanticError::new(kind, self.current_file.clone(), span));
    }

    fn check_class(&mut self, class: &mut Class) {
        let tables = self.tables;
        self.current_class = class.name.clone();
        self.current_file = class.filename.clone();
        let errors_before = self.errors.len();

        let mut chain: Vec<&EcoString> = tables
            .ancestors
            .ancestors(&class.name)
            .filter(|ancestor| *ancestor != tables.ancestors.root())
            .collect();
        chain.reverse();

        let mut env = TypeEnv::new();
        let mut scope = env.enter_scope();
        for (position, ancestor) in chain.into_iter().enumerate() {
            if position > 0 {
                scope.push_frame();
            }
            let Some(info) = tables.hierarchy.get_class(ancestor) else {
                continue;
            };
            let is_current = *ancestor == class.name;

            for attribute in &info.attributes {
                if attribute.name == names::SELF {
                    continue;
                }
                if scope.declared_in_current_scope(&attribute.name) {
                    if is_current {
                        self.report(
                            SemanticErrorKind::DuplicateAttribute {
                                name: attribute.name.clone(),
                            },
                            attribute.span,
                        );
                    }
                    continue;
                }
                if is_current && scope.lookup(&attribute.name).is_some() {
                    self.report(
                        SemanticErrorKind::InheritedAttributeRedefined {
                            name: attribute.name.clone(),
                        },
                        attribute.span,
                    );
                    continue;
                }
                scope.bind(
                    &attribute.name,
                    StaticType::from_name(&attribute.type_name),
                    BindingKind::Attribute,
                    attribute.span,
                );
            }
        }

        for feature in &mut class.features {
            match feature {
                Feature::Method(method) => self.check_method(method, &mut scope),
                Feature::Attribute(attribute) => self.check_attribute(attribute, &mut scope),
            }
        }
        drop(scope);

        for method in class.methods() {
            let info = MethodInfo::from_method(method, &class.name);
            for kind in tables
                .methods
                .check_override(&tables.ancestors, &class.name, &info)
            {
                self.report(kind, method.span);
            }
        }

        debug!(
            class = %class.name,
            errors = self.errors.len() - errors_before,
            "checked class"
        );
    }

    fn is_known_type(&self, type_name: &str) -> bool {
        type_name == names::SELF_TYPE || self.tables.hierarchy.has_class(type_name)
    }

    fn check_method(&mut self, method: &mut Method, env: &mut TypeEnv) {
        let tables = self.tables;
        let mut scope = env.enter_scope();

        for formal in &method.formals {
            if formal.name == names::SELF {
                self.report(SemanticErrorKind::SelfFormal, formal.span);
                continue;
            }
            if scope.declared_in_current_scope(&formal.name) {
                self.report(
                    SemanticErrorKind::DuplicateFormal {
                        name: formal.name.clone(),
                    },
                    formal.span,
                );
                continue;
            }
            if !tables.hierarchy.has_class(&formal.type_name) {
                self.report(
                    SemanticErrorKind::UndefinedFormalType {
                        name: formal.name.clone(),
                        type_name: formal.type_name.clone(),
                    },
                    formal.span,
                );
            }
            scope.bind(
                &formal.name,
                StaticType::from_name(&formal.type_name),
                BindingKind::Formal,
                formal.span,
            );
        }

        let return_known = self.is_known_type(&method.return_type);
        if !return_known {
            self.report(
                SemanticErrorKind::UndefinedReturnType {
                    method: method.name.clone(),
                    type_name: method.return_type.clone(),
                },
                method.span,
            );
        }

        let body_type = self.infer(&mut method.body, &mut scope);
        let declared = StaticType::from_name(&method.return_type);
        if return_known && !self.conforms(&body_type, &declared) {
            self.report(
                SemanticErrorKind::ReturnTypeMismatch {
                    method: method.name.clone(),
                    expected: method.return_type.clone(),
                    found: body_type.name().into(),
                },
                method.span,
            );
        }
    }

    fn check_attribute(&mut self, attribute: &mut Attribute, env: &mut TypeEnv) {
        let declared_known = self.is_known_type(&attribute.type_name);
        if !declared_known {
            self.report(
                SemanticErrorKind::UndefinedAttributeType {
                    name: attribute.name.clone(),
                    type_name: attribute.type_name.clone(),
                },
                attribute.span,
            );
        }

        let init_type = self.infer(&mut attribute.init, env);
        let declared = StaticType::from_name(&attribute.type_name);
        if declared_known && !self.conforms(&init_type, &declared) {
            self.report(
                SemanticErrorKind::AttributeInitMismatch {
                    name: attribute.name.clone(),
                    expected: attribute.type_name.clone(),
                    found: init_type.name().into(),
                },
                attribute.span,
            );
        }

        if attribute.name == names::SELF {
            self.report(SemanticErrorKind::SelfAttribute, attribute.span);
        }
    }

    fn conforms(&self, found: &StaticType, expected: &StaticType) -> bool {
        self.tables
            .ancestors
            .conforms(found, expected, &self.current_class)
    }

    fn join(&self, a: &StaticType, b: &StaticType) -> StaticType {
        self.tables.ancestors.join(a, b, &self.current_class)
    }

    /// Infers the type of an expression, records it on the node and returns it.
    pub(crate) fn infer(&mut self, expr: &mut Expression, env: &mut TypeEnv) -> StaticType {
        let span = expr.span;
        let ty = match &mut expr.kind {
            ExprKind::Object { name } => self.infer_object(name, span, env),
            ExprKind::Assign { name, value } => {
                let value_type = self.infer(value, env);
                self.infer_assign(name, value_type, span, env)
            }
            ExprKind::Int(_) => StaticType::int(),
            ExprKind::Str(_) => StaticType::string(),
            ExprKind::Bool(_) => StaticType::bool(),
            ExprKind::New { type_name } => self.infer_new(type_name, span),
            ExprKind::IsVoid(operand) => {
                self.infer(operand, env);
                StaticType::bool()
            }
            ExprKind::Not(operand) => {
                let operand_type = self.infer(operand, env);
                self.expect_operand("not", names::BOOL, &operand_type, span);
                StaticType::bool()
            }
            ExprKind::Neg(operand) => {
                let operand_type = self.infer(operand, env);
                self.expect_operand("~", names::INT, &operand_type, span);
                StaticType::int()
            }
            ExprKind::Binary { op, left, right } => {
                let left_type = self.infer(left, env);
                let right_type = self.infer(right, env);
                self.infer_binary(*op, &left_type, &right_type, span)
            }
            ExprKind::Block(body) => {
                let mut last = StaticType::object();
                for expr in body {
                    last = self.infer(expr, env);
                }
                last
            }
            ExprKind::Let {
                name,
                type_name,
                init,
                body,
            } => self.infer_let(name, type_name, init, body, span, env),
            ExprKind::Case {
                scrutinee,
                branches,
            } => {
                self.infer(scrutinee, env);
                self.infer_case(branches, env)
            }
            ExprKind::Loop { predicate, body } => {
                let predicate_type = self.infer(predicate, env);
                if !predicate_type.is_class(names::BOOL) {
                    self.report(SemanticErrorKind::LoopPredicate, span);
                }
                self.infer(body, env);
                StaticType::object()
            }
            ExprKind::Cond {
                predicate,
                then_branch,
                else_branch,
            } => {
                let predicate_type = self.infer(predicate, env);
                if !predicate_type.is_class(names::BOOL) {
                    self.report(SemanticErrorKind::IfPredicate, span);
                }
                let then_type = self.infer(then_branch, env);
                let else_type = self.infer(else_branch, env);
                self.join(&then_type, &else_type)
            }
            ExprKind::Dispatch {
                receiver,
                method,
                args,
            } => {
                let receiver_type = self.infer(receiver, env);
                let arg_types = self.infer_args(args, env);
                let start = receiver_type.resolve_self(&self.current_class);
                self.check_call(start.name(), method, &arg_types, &receiver_type, span)
            }
            ExprKind::StaticDispatch {
                receiver,
                type_name,
                method,
                args,
            } => {
                let receiver_type = self.infer(receiver, env);
                let arg_types = self.infer_args(args, env);
                self.infer_static_dispatch(type_name, method, &arg_types, &receiver_type, span)
            }
            ExprKind::NoExpr => StaticType::NoType,
        };
        expr.static_type = Some(ty.clone());
        ty
    }

    fn infer_args(&mut self, args: &mut [Expression], env: &mut TypeEnv) -> Vec<StaticType> {
        args.iter_mut().map(|arg| self.infer(arg, env)).collect()
    }

    fn infer_object(&mut self, name: &EcoString, span: Span, env: &TypeEnv) -> StaticType {
        if name == names::SELF {
            return StaticType::SelfType;
        }
        if let Some(ty) = env.lookup_type(name) {
            return ty.clone();
        }
        self.report(
            SemanticErrorKind::UndeclaredIdentifier { name: name.clone() },
            span,
        );
        StaticType::object()
    }

    fn infer_assign(
        &mut self,
        name: &EcoString,
        value_type: StaticType,
        span: Span,
        env: &TypeEnv,
    ) -> StaticType {
        if name == names::SELF {
            self.report(SemanticErrorKind::AssignToSelf, span);
            return value_type;
        }
        let Some(declared) = env.lookup_type(name).cloned() else {
            self.report(
                SemanticErrorKind::UndeclaredIdentifier { name: name.clone() },
                span,
            );
            return value_type;
        };
        if self.conforms(&value_type, &declared) {
            value_type
        } else {
            self.report(
                SemanticErrorKind::AssignMismatch {
                    name: name.clone(),
                    expected: declared.name().into(),
                    found: value_type.name().into(),
                },
                span,
            );
            declared
        }
    }

    fn infer_new(&mut self, type_name: &EcoString, span: Span) -> StaticType {
        if type_name == names::SELF_TYPE {
            StaticType::SelfType
        } else if self.tables.hierarchy.has_class(type_name) {
            StaticType::Class(type_name.clone())
        } else {
            self.report(
                SemanticErrorKind::NewUndefinedClass {
                    type_name: type_name.clone(),
                },
                span,
            );
            StaticType::object()
        }
    }

    fn expect_operand(
        &mut self,
        operator: &'static str,
        expected: &'static str,
        found: &StaticType,
        span: Span,
    ) {
        if !found.is_class(expected) {
            self.report(
                SemanticErrorKind::UnaryOperand {
                    operator,
                    expected,
                    found: found.name().into(),
                },
                span,
            );
        }
    }

    fn infer_binary(
        &mut self,
        op: BinaryOp,
        left: &StaticType,
        right: &StaticType,
        span: Span,
    ) -> StaticType {
        if op == BinaryOp::Eq {
            let basic = left.is_basic_value() || right.is_basic_value();
            if basic && left != right {
                self.report(
                    SemanticErrorKind::IllegalComparison {
                        left: left.name().into(),
                        right: right.name().into(),
                    },
                    span,
                );
            }
            return StaticType::bool();
        }

        if !left.is_class(names::INT) || !right.is_class(names::INT) {
            self.report(
                SemanticErrorKind::NonIntArguments {
                    operator: op.symbol(),
                    left: left.name().into(),
                    right: right.name().into(),
                },
                span,
            );
        }
        if op.is_arithmetic() {
            StaticType::int()
        } else {
            StaticType::bool()
        }
    }

    fn infer_let(
        &mut self,
        name: &EcoString,
        type_name: &EcoString,
        init: &mut Expression,
        body: &mut Expression,
        span: Span,
        env: &mut TypeEnv,
    ) -> StaticType {
        let mut scope = env.enter_scope();

        let declared = if self.is_known_type(type_name) {
            StaticType::from_name(type_name)
        } else {
            self.report(
                SemanticErrorKind::UndefinedLetType {
                    name: name.clone(),
                    type_name: type_name.clone(),
                },
                span,
            );
            StaticType::object()
        };

        if name == names::SELF {
            self.report(SemanticErrorKind::SelfInLet, span);
        } else {
            scope.bind(name, declared.clone(), BindingKind::Let, span);
        }

        let init_type = self.infer(init, &mut scope);
        if !self.conforms(&init_type, &declared) {
            self.report(
                SemanticErrorKind::LetInitMismatch {
                    name: name.clone(),
                    expected: declared.name().into(),
                    found: init_type.name().into(),
                },
                span,
            );
        }

        self.infer(body, &mut scope)
    }

    /// Result is the join of the branch body types, folded left to right.
    fn infer_case(&mut self, branches: &mut [CaseBranch], env: &mut TypeEnv) -> StaticType {
        let mut seen: Vec<EcoString> = Vec::with_capacity(branches.len());
        let mut result: Option<StaticType> = None;

        for branch in branches.iter_mut() {
            if seen.contains(&branch.type_name) {
                self.report(
                    SemanticErrorKind::DuplicateCaseBranch {
                        type_name: branch.type_name.clone(),
                    },
                    branch.span,
                );
            } else {
                seen.push(branch.type_name.clone());
            }

            let mut scope = env.enter_scope();
            let declared = if self.tables.hierarchy.has_class(&branch.type_name) {
                StaticType::Class(branch.type_name.clone())
            } else {
                self.report(
                    SemanticErrorKind::UndefinedCaseBranchType {
                        name: branch.name.clone(),
                        type_name: branch.type_name.clone(),
                    },
                    branch.span,
                );
                StaticType::object()
            };
            if branch.name == names::SELF {
                self.report(SemanticErrorKind::SelfInCase, branch.span);
            } else {
                scope.bind(&branch.name, declared, BindingKind::CaseBranch, branch.span);
            }

            let body_type = self.infer(&mut branch.body, &mut scope);
            result = Some(match result {
                None => body_type,
                Some(acc) => self.join(&acc, &body_type),
            });
        }

        result.unwrap_or_else(StaticType::object)
    }

    fn infer_static_dispatch(
        &mut self,
        type_name: &EcoString,
        method: &EcoString,
        arg_types: &[StaticType],
        receiver_type: &StaticType,
        span: Span,
    ) -> StaticType {
        let target = if type_name == names::SELF_TYPE {
            StaticType::SelfType
        } else if self.tables.hierarchy.has_class(type_name) {
            StaticType::Class(type_name.clone())
        } else {
            self.report(
                SemanticErrorKind::StaticDispatchUndefinedClass {
                    type_name: type_name.clone(),
                },
                span,
            );
            return StaticType::object();
        };

        // An unknown receiver class was already reported where it was declared.
        if let StaticType::Class(found) = receiver_type {
            if !self.tables.hierarchy.has_class(found) {
                return StaticType::object();
            }
        }

        if !self.conforms(receiver_type, &target) {
            self.report(
                SemanticErrorKind::StaticDispatchMismatch {
                    expected: type_name.clone(),
                    found: receiver_type.name().into(),
                },
                span,
            );
            return StaticType::object();
        }

        let start = target.resolve_self(&self.current_class);
        self.check_call(start.name(), method, arg_types, receiver_type, span)
    }

    /// Resolves `method` from `start` and checks the already-inferred arguments.
    ///
    /// A `SELF_TYPE` return becomes the receiver's own static type.
    fn check_call(
        &mut self,
        start: &str,
        method: &EcoString,
        arg_types: &[StaticType],
        receiver_type: &StaticType,
        span: Span,
    ) -> StaticType {
        let tables = self.tables;
        if !tables.hierarchy.has_class(start) {
            return StaticType::object();
        }
        let Some(info) = tables.methods.resolve(&tables.ancestors, start, method) else {
            self.report(
                SemanticErrorKind::UndefinedMethod {
                    method: method.clone(),
                },
                span,
            );
            return StaticType::object();
        };

        let mut arguments_ok = info.arity() == arg_types.len();
        if !arguments_ok {
            self.report(
                SemanticErrorKind::WrongArgumentCount {
                    method: method.clone(),
                },
                span,
            );
        }

        // Overlapping positions are still checked after a count mismatch.
        for (formal, arg_type) in info.formals.iter().zip(arg_types) {
            let expected = StaticType::from_name(&formal.type_name);
            if !self.conforms(arg_type, &expected) {
                self.report(
                    SemanticErrorKind::ArgumentMismatch {
                        method: method.clone(),
                        formal: formal.name.clone(),
                        expected: formal.type_name.clone(),
                        found: arg_type.name().into(),
                    },
                    span,
                );
                arguments_ok = false;
            }
        }
        if !arguments_ok {
            return StaticType::object();
        }

        match StaticType::from_name(&info.return_type) {
            StaticType::SelfType => receiver_type.clone(),
            declared => declared,
        }
    }
}
