// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Class table and inheritance graph.
//!
//! **DDD Context:** Semantic Analysis
//!
//! This module assembles the global class table from the built-in classes and
//! the parsed declarations, validates declaration-level rules and builds the
//! parent → children adjacency consumed by the [`AncestorIndex`].
//!
//! Classes with a missing or sealed parent are reported and then hung
//! directly under `Object`, so later passes still run over them without
//! cascading failures. Cycles among user classes survive that correction and
//! are caught by [`ClassHierarchy::check_reachability`] once the ancestor
//! index has walked the graph.
//!
//! [`AncestorIndex`]: super::ancestor_index::AncestorIndex

use crate::ast::{Class, Method, Program};
use crate::names;
use crate::semantic_analysis::ancestor_index::AncestorIndex;
use crate::semantic_analysis::error::{SemanticError, SemanticErrorKind};
use crate::source_analysis::Span;
use ecow::EcoString;
use std::collections::HashMap;
use tracing::debug;

mod builtins;

/// A formal parameter in a method signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormalInfo {
    pub name: EcoString,
    pub type_name: EcoString,
}

/// Signature of a method declared directly in a class.
///
/// **DDD Context:** Semantic Analysis (Value Object)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodInfo {
    pub name: EcoString,
    pub formals: Vec<FormalInfo>,
    /// Declared return type name; may be `SELF_TYPE`.
    pub return_type: EcoString,
    /// Class that declares this method.
    pub defined_in: EcoString,
    pub span: Span,
}

impl MethodInfo {
    /// Extracts the signature of a parsed method.
    #[must_use]
    pub fn from_method(method: &Method, defined_in: &EcoString) -> Self {
        Self {
            name: method.name.clone(),
            formals: method
                .formals
                .iter()
                .map(|formal| FormalInfo {
                    name: formal.name.clone(),
                    type_name: formal.type_name.clone(),
                })
                .collect(),
            return_type: method.return_type.clone(),
            defined_in: defined_in.clone(),
            span: method.span,
        }
    }

    #[must_use]
    pub fn arity(&self) -> usize {
        self.formals.len()
    }
}

/// An attribute declared directly in a class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeInfo {
    pub name: EcoString,
    pub type_name: EcoString,
    pub span: Span,
}

/// Information about a class in the table.
///
/// **DDD Context:** Semantic Analysis (Value Object)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassInfo {
    pub name: EcoString,
    /// Declared parent (`None` only for `Object`).
    pub parent: Option<EcoString>,
    pub filename: EcoString,
    pub span: Span,
    /// Whether this class can never be subclassed.
    pub is_sealed: bool,
    /// Methods declared directly in this class, duplicates included.
    pub methods: Vec<MethodInfo>,
    /// Attributes declared directly in this class, duplicates included.
    pub attributes: Vec<AttributeInfo>,
    /// Index into [`Program::classes`]; `None` for built-ins.
    pub declaration: Option<usize>,
}

impl ClassInfo {
    fn from_declaration(class: &Class, index: usize) -> Self {
        Self {
            name: class.name.clone(),
            parent: Some(class.parent.clone()),
            filename: class.filename.clone(),
            span: class.span,
            is_sealed: false,
            methods: class
                .methods()
                .map(|method| MethodInfo::from_method(method, &class.name))
                .collect(),
            attributes: class
                .attributes()
                .map(|attribute| AttributeInfo {
                    name: attribute.name.clone(),
                    type_name: attribute.type_name.clone(),
                    span: attribute.span,
                })
                .collect(),
            declaration: Some(index),
        }
    }

    /// Returns `true` if this class can be subclassed.
    #[must_use]
    pub fn can_be_subclassed(&self) -> bool {
        !self.is_sealed
    }

    /// Returns `true` for the five built-in classes.
    #[must_use]
    pub fn is_builtin(&self) -> bool {
        self.declaration.is_none()
    }
}

/// The global class table plus its (corrected) inheritance graph.
///
/// Immutable once [`ClassHierarchy::build`] returns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassHierarchy {
    classes: HashMap<EcoString, ClassInfo>,
    /// Registration order: built-ins first, then user classes as declared.
    order: Vec<EcoString>,
    /// Parent used for graph construction (missing/sealed parents replaced by the root).
    graph_parents: HashMap<EcoString, EcoString>,
    children: HashMap<EcoString, Vec<EcoString>>,
}

impl ClassHierarchy {
    /// Build the class table from built-in definitions and a parsed program.
    ///
    /// Returns the hierarchy and the declaration errors found along the way.
    #[must_use]
    pub fn build(program: &Program) -> (Self, Vec<SemanticError>) {
        let mut hierarchy = Self::with_builtins();
        let mut errors = hierarchy.install_classes(program);
        errors.extend(hierarchy.link_parents());
        debug!(
            classes = hierarchy.order.len(),
            errors = errors.len(),
            "installed classes"
        );
        (hierarchy, errors)
    }

    /// Create a table holding only the built-in classes, already linked.
    #[must_use]
    pub fn with_builtins() -> Self {
        let mut hierarchy = Self {
            classes: HashMap::new(),
            order: Vec::new(),
            graph_parents: HashMap::new(),
            children: HashMap::new(),
        };
        for info in builtins::builtin_classes() {
            hierarchy.insert(info);
        }
        let errors = hierarchy.link_parents();
        debug_assert!(errors.is_empty(), "built-in classes must link cleanly");
        hierarchy
    }

    /// Name of the root class.
    #[must_use]
    pub fn root(&self) -> &'static str {
        names::OBJECT
    }

    /// Look up a class by name.
    #[must_use]
    pub fn get_class(&self, name: &str) -> Option<&ClassInfo> {
        self.classes.get(name)
    }

    /// Check if a class exists in the table.
    #[must_use]
    pub fn has_class(&self, name: &str) -> bool {
        self.classes.contains_key(name)
    }

    /// Returns class names in registration order.
    pub fn class_names(&self) -> impl Iterator<Item = &EcoString> {
        self.order.iter()
    }

    /// Returns classes in registration order.
    pub fn classes(&self) -> impl Iterator<Item = &ClassInfo> {
        self.order.iter().filter_map(|name| self.classes.get(name))
    }

    /// Number of classes in the table.
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Always false: the built-ins are present from construction.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// The parent used for graph purposes.
    ///
    /// Identical to the declared parent unless that parent was missing or
    /// sealed, in which case it is the root. `None` for the root itself.
    #[must_use]
    pub fn graph_parent(&self, name: &str) -> Option<&EcoString> {
        self.graph_parents.get(name)
    }

    /// Direct children of a class in the graph, in registration order.
    #[must_use]
    pub fn children(&self, name: &str) -> &[EcoString] {
        self.children.get(name).map_or(&[], Vec::as_slice)
    }

    /// Reports every class the ancestor index could not reach from the root.
    ///
    /// Missing parents were already re-pointed at the root, so anything left
    /// unreached sits on (or hangs below) an inheritance cycle.
    #[must_use]
    pub fn check_reachability(&self, ancestors: &AncestorIndex) -> Vec<SemanticError> {
        self.classes()
            .filter(|info| !ancestors.is_reachable(&info.name))
            .map(|info| {
                SemanticError::new(
                    SemanticErrorKind::InheritanceCycle {
                        class: info.name.clone(),
                    },
                    info.filename.clone(),
                    info.span,
                )
            })
            .collect()
    }

    fn insert(&mut self, info: ClassInfo) {
        self.order.push(info.name.clone());
        self.classes.insert(info.name.clone(), info);
    }

    /// Add user classes from a parsed program. The first declaration of a
    /// name wins; later ones are reported and dropped.
    fn install_classes(&mut self, program: &Program) -> Vec<SemanticError> {
        let mut errors = Vec::new();

        for (index, class) in program.classes.iter().enumerate() {
            let rejection = if class.name == names::SELF_TYPE {
                Some(SemanticErrorKind::BasicClassRedefined {
                    name: class.name.clone(),
                })
            } else if let Some(existing) = self.classes.get(&class.name) {
                Some(if existing.is_builtin() {
                    SemanticErrorKind::BasicClassRedefined {
                        name: class.name.clone(),
                    }
                } else {
                    SemanticErrorKind::DuplicateClass {
                        name: class.name.clone(),
                    }
                })
            } else {
                None
            };

            match rejection {
                Some(kind) => {
                    errors.push(SemanticError::new(kind, class.filename.clone(), class.span));
                }
                None => self.insert(ClassInfo::from_declaration(class, index)),
            }
        }

        errors
    }

    /// Validate declared parents and (re)build the adjacency lists.
    fn link_parents(&mut self) -> Vec<SemanticError> {
        let mut errors = Vec::new();
        self.graph_parents.clear();
        self.children.clear();

        for name in &self.order {
            let info = &self.classes[name];
            let Some(parent) = &info.parent else {
                continue;
            };

            let graph_parent = match self.classes.get(parent) {
                None => {
                    errors.push(SemanticError::new(
                        SemanticErrorKind::UndefinedParent {
                            class: name.clone(),
                            parent: parent.clone(),
                        },
                        info.filename.clone(),
                        info.span,
                    ));
                    EcoString::from(names::OBJECT)
                }
                Some(parent_info) if !parent_info.can_be_subclassed() => {
                    errors.push(SemanticError::new(
                        SemanticErrorKind::SealedParent {
                            class: name.clone(),
                            parent: parent.clone(),
                        },
                        info.filename.clone(),
                        info.span,
                    ));
                    EcoString::from(names::OBJECT)
                }
                Some(_) => parent.clone(),
            };

            self.children
                .entry(graph_parent.clone())
                .or_default()
                .push(name.clone());
            self.graph_parents.insert(name.clone(), graph_parent);
        }

        errors
    }
}

impl Default for ClassHierarchy {
    fn default() -> Self {
        Self::with_builtins()
    }
}
