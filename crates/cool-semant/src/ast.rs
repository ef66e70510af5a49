// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Abstract Syntax Tree (AST) definitions for Cool.
//!
//! The tree arrives fully formed from the parser: a forest of class
//! declarations, each with its features and expression bodies. Every node
//! carries a [`Span`]; the file name is recorded once per [`Class`].
//!
//! # Design Philosophy
//!
//! - **Closed expression variant** - [`ExprKind`] has one case per
//!   expression form, so type inference is a single exhaustive match.
//! - **Type slot on every expression** - the checker writes the inferred
//!   [`StaticType`] into [`Expression::static_type`] for the code generator.
//! - **Serializable** - the parser hands the tree over as JSON and gets the
//!   annotated tree back the same way.
//!
//! # Example
//!
//! ```
//! use cool_semant::ast::{BinaryOp, Expression};
//!
//! // Source: x + 1
//! let sum = Expression::binary(
//!     BinaryOp::Add,
//!     Expression::object("x", 3),
//!     Expression::int(1, 3),
//!     3,
//! );
//! assert!(sum.static_type.is_none());
//! ```

use crate::source_analysis::Span;
use crate::types::StaticType;
use ecow::EcoString;
use serde::{Deserialize, Serialize};

/// A whole program: every class declaration handed over by the parser.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Program {
    pub classes: Vec<Class>,
}

impl Program {
    #[must_use]
    pub fn new(classes: Vec<Class>) -> Self {
        Self { classes }
    }
}

/// A class declaration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Class {
    /// Class name.
    pub name: EcoString,
    /// Declared parent. The parser supplies `Object` when the source omits it.
    pub parent: EcoString,
    /// Methods and attributes, in declaration order.
    pub features: Vec<Feature>,
    /// File the class was declared in.
    pub filename: EcoString,
    pub span: Span,
}

impl Class {
    #[must_use]
    pub fn new(
        name: impl Into<EcoString>,
        parent: impl Into<EcoString>,
        features: Vec<Feature>,
        filename: impl Into<EcoString>,
        line: u32,
    ) -> Self {
        Self {
            name: name.into(),
            parent: parent.into(),
            features,
            filename: filename.into(),
            span: Span::new(line),
        }
    }

    /// Methods declared directly in this class.
    pub fn methods(&self) -> impl Iterator<Item = &Method> {
        self.features.iter().filter_map(|feature| match feature {
            Feature::Method(method) => Some(method),
            Feature::Attribute(_) => None,
        })
    }

    /// Attributes declared directly in this class.
    pub fn attributes(&self) -> impl Iterator<Item = &Attribute> {
        self.features.iter().filter_map(|feature| match feature {
            Feature::Attribute(attribute) => Some(attribute),
            Feature::Method(_) => None,
        })
    }
}

/// A method or attribute declared in a class body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Feature {
    Method(Method),
    Attribute(Attribute),
}

impl Feature {
    /// The feature's name.
    #[must_use]
    pub fn name(&self) -> &EcoString {
        match self {
            Self::Method(method) => &method.name,
            Self::Attribute(attribute) => &attribute.name,
        }
    }

    #[must_use]
    pub fn span(&self) -> Span {
        match self {
            Self::Method(method) => method.span,
            Self::Attribute(attribute) => attribute.span,
        }
    }
}

/// A method definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Method {
    pub name: EcoString,
    pub formals: Vec<Formal>,
    /// Declared return type name; may be `SELF_TYPE`.
    pub return_type: EcoString,
    pub body: Expression,
    pub span: Span,
}

impl Method {
    #[must_use]
    pub fn new(
        name: impl Into<EcoString>,
        formals: Vec<Formal>,
        return_type: impl Into<EcoString>,
        body: Expression,
        line: u32,
    ) -> Self {
        Self {
            name: name.into(),
            formals,
            return_type: return_type.into(),
            body,
            span: Span::new(line),
        }
    }
}

impl From<Method> for Feature {
    fn from(method: Method) -> Self {
        Self::Method(method)
    }
}

/// A named, typed method parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Formal {
    pub name: EcoString,
    pub type_name: EcoString,
    pub span: Span,
}

impl Formal {
    #[must_use]
    pub fn new(name: impl Into<EcoString>, type_name: impl Into<EcoString>, line: u32) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            span: Span::new(line),
        }
    }
}

/// An attribute declaration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attribute {
    pub name: EcoString,
    pub type_name: EcoString,
    /// Initializer; an [`ExprKind::NoExpr`] node when absent.
    pub init: Expression,
    pub span: Span,
}

impl Attribute {
    #[must_use]
    pub fn new(
        name: impl Into<EcoString>,
        type_name: impl Into<EcoString>,
        init: Expression,
        line: u32,
    ) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            init,
            span: Span::new(line),
        }
    }
}

impl From<Attribute> for Feature {
    fn from(attribute: Attribute) -> Self {
        Self::Attribute(attribute)
    }
}

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Lt,
    Le,
    Eq,
}

impl BinaryOp {
    /// Source spelling of the operator.
    #[must_use]
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Eq => "=",
        }
    }

    /// Returns true for `+ - * /`.
    #[must_use]
    pub fn is_arithmetic(self) -> bool {
        matches!(self, Self::Add | Self::Sub | Self::Mul | Self::Div)
    }
}

/// One `id : Type => body` branch of a `case` expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseBranch {
    pub name: EcoString,
    pub type_name: EcoString,
    pub body: Expression,
    pub span: Span,
}

impl CaseBranch {
    #[must_use]
    pub fn new(
        name: impl Into<EcoString>,
        type_name: impl Into<EcoString>,
        body: Expression,
        line: u32,
    ) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            body,
            span: Span::new(line),
        }
    }
}

/// The expression forms of the language.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ExprKind {
    /// Identifier reference, including `self`.
    Object { name: EcoString },
    /// `name <- value`
    Assign {
        name: EcoString,
        value: Box<Expression>,
    },
    Int(i64),
    Str(EcoString),
    Bool(bool),
    /// `new T`
    New { type_name: EcoString },
    /// `isvoid e`
    IsVoid(Box<Expression>),
    /// `not e`
    Not(Box<Expression>),
    /// `~e`
    Neg(Box<Expression>),
    Binary {
        op: BinaryOp,
        left: Box<Expression>,
        right: Box<Expression>,
    },
    /// `{ e1; e2; ... }`
    Block(Vec<Expression>),
    /// `let name : T [<- init] in body`
    Let {
        name: EcoString,
        type_name: EcoString,
        init: Box<Expression>,
        body: Box<Expression>,
    },
    /// `case scrutinee of branches esac`
    Case {
        scrutinee: Box<Expression>,
        branches: Vec<CaseBranch>,
    },
    /// `while predicate loop body pool`
    Loop {
        predicate: Box<Expression>,
        body: Box<Expression>,
    },
    /// `if predicate then .. else .. fi`
    Cond {
        predicate: Box<Expression>,
        then_branch: Box<Expression>,
        else_branch: Box<Expression>,
    },
    /// `receiver.method(args)`
    Dispatch {
        receiver: Box<Expression>,
        method: EcoString,
        args: Vec<Expression>,
    },
    /// `receiver@T.method(args)`
    StaticDispatch {
        receiver: Box<Expression>,
        type_name: EcoString,
        method: EcoString,
        args: Vec<Expression>,
    },
    /// An absent optional expression.
    NoExpr,
}

/// An expression node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expression {
    pub kind: ExprKind,
    pub span: Span,
    /// Written by the type checker.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub static_type: Option<StaticType>,
}

impl Expression {
    #[must_use]
    pub fn new(kind: ExprKind, line: u32) -> Self {
        Self {
            kind,
            span: Span::new(line),
            static_type: None,
        }
    }

    #[must_use]
    pub fn object(name: impl Into<EcoString>, line: u32) -> Self {
        Self::new(ExprKind::Object { name: name.into() }, line)
    }

    #[must_use]
    pub fn assign(name: impl Into<EcoString>, value: Expression, line: u32) -> Self {
        Self::new(
            ExprKind::Assign {
                name: name.into(),
                value: Box::new(value),
            },
            line,
        )
    }

    #[must_use]
    pub fn int(value: i64, line: u32) -> Self {
        Self::new(ExprKind::Int(value), line)
    }

    #[must_use]
    pub fn string(value: impl Into<EcoString>, line: u32) -> Self {
        Self::new(ExprKind::Str(value.into()), line)
    }

    #[must_use]
    pub fn boolean(value: bool, line: u32) -> Self {
        Self::new(ExprKind::Bool(value), line)
    }

    #[must_use]
    pub fn new_object(type_name: impl Into<EcoString>, line: u32) -> Self {
        Self::new(
            ExprKind::New {
                type_name: type_name.into(),
            },
            line,
        )
    }

    #[must_use]
    pub fn is_void(operand: Expression, line: u32) -> Self {
        Self::new(ExprKind::IsVoid(Box::new(operand)), line)
    }

    #[must_use]
    pub fn not(operand: Expression, line: u32) -> Self {
        Self::new(ExprKind::Not(Box::new(operand)), line)
    }

    #[must_use]
    pub fn neg(operand: Expression, line: u32) -> Self {
        Self::new(ExprKind::Neg(Box::new(operand)), line)
    }

    #[must_use]
    pub fn binary(op: BinaryOp, left: Expression, right: Expression, line: u32) -> Self {
        Self::new(
            ExprKind::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            },
            line,
        )
    }

    #[must_use]
    pub fn block(body: Vec<Expression>, line: u32) -> Self {
        Self::new(ExprKind::Block(body), line)
    }

    #[must_use]
    pub fn let_in(
        name: impl Into<EcoString>,
        type_name: impl Into<EcoString>,
        init: Expression,
        body: Expression,
        line: u32,
    ) -> Self {
        Self::new(
            ExprKind::Let {
                name: name.into(),
                type_name: type_name.into(),
                init: Box::new(init),
                body: Box::new(body),
            },
            line,
        )
    }

    #[must_use]
    pub fn case(scrutinee: Expression, branches: Vec<CaseBranch>, line: u32) -> Self {
        Self::new(
            ExprKind::Case {
                scrutinee: Box::new(scrutinee),
                branches,
            },
            line,
        )
    }

    #[must_use]
    pub fn while_loop(predicate: Expression, body: Expression, line: u32) -> Self {
        Self::new(
            ExprKind::Loop {
                predicate: Box::new(predicate),
                body: Box::new(body),
            },
            line,
        )
    }

    #[must_use]
    pub fn cond(
        predicate: Expression,
        then_branch: Expression,
        else_branch: Expression,
        line: u32,
    ) -> Self {
        Self::new(
            ExprKind::Cond {
                predicate: Box::new(predicate),
                then_branch: Box::new(then_branch),
                else_branch: Box::new(else_branch),
            },
            line,
        )
    }

    #[must_use]
    pub fn dispatch(
        receiver: Expression,
        method: impl Into<EcoString>,
        args: Vec<Expression>,
        line: u32,
    ) -> Self {
        Self::new(
            ExprKind::Dispatch {
                receiver: Box::new(receiver),
                method: method.into(),
                args,
            },
            line,
        )
    }

    #[must_use]
    pub fn static_dispatch(
        receiver: Expression,
        type_name: impl Into<EcoString>,
        method: impl Into<EcoString>,
        args: Vec<Expression>,
        line: u32,
    ) -> Self {
        Self::new(
            ExprKind::StaticDispatch {
                receiver: Box::new(receiver),
                type_name: type_name.into(),
                method: method.into(),
                args,
            },
            line,
        )
    }

    #[must_use]
    pub fn no_expr(line: u32) -> Self {
        Self::new(ExprKind::NoExpr, line)
    }

    /// Returns true for an absent optional expression.
    #[must_use]
    pub fn is_no_expr(&self) -> bool {
        matches!(self.kind, ExprKind::NoExpr)
    }

    /// Visits this node and every descendant, parents before children.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a Expression)) {
        visit(self);
        match &self.kind {
            ExprKind::Object { .. }
            | ExprKind::Int(_)
            | ExprKind::Str(_)
            | ExprKind::Bool(_)
            | ExprKind::New { .. }
            | ExprKind::NoExpr => {}
            ExprKind::Assign { value, .. } => value.walk(visit),
            ExprKind::IsVoid(operand) | ExprKind::Not(operand) | ExprKind::Neg(operand) => {
                operand.walk(visit);
            }
            ExprKind::Binary { left, right, .. } => {
                left.walk(visit);
                right.walk(visit);
            }
            ExprKind::Block(body) => body.iter().for_each(|expr| expr.walk(visit)),
            ExprKind::Let { init, body, .. } => {
                init.walk(visit);
                body.walk(visit);
            }
            ExprKind::Case {
                scrutinee,
                branches,
            } => {
                scrutinee.walk(visit);
                for branch in branches {
                    branch.body.walk(visit);
                }
            }
            ExprKind::Loop { predicate, body } => {
                predicate.walk(visit);
                body.walk(visit);
            }
            ExprKind::Cond {
                predicate,
                then_branch,
                else_branch,
            } => {
                predicate.walk(visit);
                then_branch.walk(visit);
                else_branch.walk(visit);
            }
            ExprKind::Dispatch { receiver, args, .. }
            | ExprKind::StaticDispatch { receiver, args, .. } => {
                receiver.walk(visit);
                args.iter().for_each(|arg| arg.walk(visit));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn class_splits_methods_and_attributes() {
        let class = Class::new(
            "Counter",
            "Object",
            vec![
                Attribute::new("n", "Int", Expression::no_expr(2), 2).into(),
                Method::new("get", vec![], "Int", Expression::object("n", 3), 3).into(),
            ],
            "counter.cl",
            1,
        );
        assert_eq!(class.methods().count(), 1);
        assert_eq!(class.attributes().count(), 1);
        assert_eq!(class.features[1].name(), "get");
        assert_eq!(class.features[1].span().line(), 3);
    }

    #[test]
    fn walk_visits_every_node_in_order() {
        let expr = Expression::block(
            vec![
                Expression::dispatch(
                    Expression::object("self", 1),
                    "f",
                    vec![Expression::int(1, 1), Expression::int(2, 1)],
                    1,
                ),
                Expression::not(Expression::boolean(true, 2), 2),
            ],
            1,
        );
        let mut count = 0;
        expr.walk(&mut |_| count += 1);
        assert_eq!(count, 7);
    }

    #[test]
    fn binary_op_classification() {
        assert!(BinaryOp::Add.is_arithmetic());
        assert!(BinaryOp::Div.is_arithmetic());
        assert!(!BinaryOp::Lt.is_arithmetic());
        assert!(!BinaryOp::Eq.is_arithmetic());
        assert_eq!(BinaryOp::Le.symbol(), "<=");
    }

    #[test]
    fn no_expr_is_detected() {
        assert!(Expression::no_expr(0).is_no_expr());
        assert!(!Expression::int(0, 0).is_no_expr());
    }
}
