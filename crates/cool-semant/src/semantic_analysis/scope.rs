// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Scoped type environment for semantic analysis.
//!
//! This module maps identifiers to their declared static types while the
//! checker walks a class. Frames are organized hierarchically:
//! - Base (depth 0, always empty)
//! - One frame per non-root ancestor's attributes, outermost ancestor first
//! - Method formals
//! - `let` bindings and `case` branches (innermost)
//!
//! Frames are only opened through [`TypeEnv::enter_scope`], which returns a
//! [`ScopeGuard`]. The guard closes every frame it opened when dropped, so
//! the stack stays balanced on every exit path.
//!
//! **DDD Context:** Semantic Analysis
//!
//! This module implements the `Binding` value object from the DDD model.

use crate::source_analysis::Span;
use crate::types::StaticType;
use ecow::EcoString;
use std::collections::HashMap;
use std::ops::{Deref, DerefMut};

/// The kind of binding in a scope.
///
/// **DDD Context:** Semantic Analysis - Value Object
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingKind {
    /// Attribute of the current class or one of its ancestors
    Attribute,
    /// Method parameter
    Formal,
    /// `let` binding
    Let,
    /// Identifier bound by a `case` branch
    CaseBranch,
}

/// A binding in a scope.
///
/// **DDD Context:** Semantic Analysis - Value Object
///
/// # Fields
///
/// - `name`: The identifier
/// - `ty`: The declared type
/// - `kind`: Where the binding came from
/// - `defined_at`: Source location of the declaration
/// - `depth`: Frame depth at which it was bound
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    pub name: EcoString,
    pub ty: StaticType,
    pub kind: BindingKind,
    pub defined_at: Span,
    pub depth: usize,
}

#[derive(Debug, Clone, Default)]
struct Frame {
    bindings: HashMap<EcoString, Binding>,
}

/// A stack of frames mapping identifiers to declared types.
#[derive(Debug, Clone)]
pub struct TypeEnv {
    frames: Vec<Frame>,
}

impl TypeEnv {
    /// Creates an environment holding only the base frame (depth 0).
    #[must_use]
    pub fn new() -> Self {
        Self {
            frames: vec![Frame::default()],
        }
    }

    /// Opens a new frame, closed again when the returned guard drops.
    pub fn enter_scope(&mut self) -> ScopeGuard<'_> {
        self.push();
        ScopeGuard {
            env: self,
            frames: 1,
        }
    }

    fn push(&mut self) {
        self.frames.push(Frame::default());
    }

    /// Returns `false` if only the base frame is left.
    fn pop(&mut self) -> bool {
        if self.frames.len() > 1 {
            self.frames.pop();
            true
        } else {
            false
        }
    }

    /// Binds `name` in the innermost frame, replacing any binding of the
    /// same name in that frame.
    pub fn bind(&mut self, name: &EcoString, ty: StaticType, kind: BindingKind, span: Span) {
        let depth = self.current_depth();
        let binding = Binding {
            name: name.clone(),
            ty,
            kind,
            defined_at: span,
            depth,
        };
        if let Some(frame) = self.frames.last_mut() {
            frame.bindings.insert(name.clone(), binding);
        }
    }

    /// Looks up a name, innermost frame first.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<&Binding> {
        self.frames
            .iter()
            .rev()
            .find_map(|frame| frame.bindings.get(name))
    }

    /// Declared type of a name, if bound.
    #[must_use]
    pub fn lookup_type(&self, name: &str) -> Option<&StaticType> {
        self.lookup(name).map(|binding| &binding.ty)
    }

    /// Returns true if `name` is bound in the innermost frame.
    #[must_use]
    pub fn declared_in_current_scope(&self, name: &str) -> bool {
        self.frames
            .last()
            .is_some_and(|frame| frame.bindings.contains_key(name))
    }

    /// Returns the current frame depth (0 = base).
    #[must_use]
    pub fn current_depth(&self) -> usize {
        self.frames.len() - 1
    }
}

impl Default for TypeEnv {
    fn default() -> Self {
        Self::new()
    }
}

/// Keeps one or more frames open on a [`TypeEnv`].
///
/// Derefs to the environment, so bindings and nested scopes go through the
/// guard. Dropping it pops exactly the frames it pushed.
#[derive(Debug)]
pub struct ScopeGuard<'env> {
    env: &'env mut TypeEnv,
    frames: usize,
}

impl ScopeGuard<'_> {
    /// Opens one more frame owned by this guard.
    pub fn push_frame(&mut self) {
        self.env.push();
        self.frames += 1;
    }
}

impl Deref for ScopeGuard<'_> {
    type Target = TypeEnv;

    fn deref(&self) -> &TypeEnv {
        self.env
    }
}

impl DerefMut for ScopeGuard<'_> {
    fn deref_mut(&mut self) -> &mut TypeEnv {
        self.env
    }
}

impl Drop for ScopeGuard<'_> {
    fn drop(&mut self) {
        for _ in 0..self.frames {
            let popped = self.env.pop();
            debug_assert!(popped, "scope guard closed the base frame");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_span() -> Span {
        Span::new(1)
    }

    fn name(text: &str) -> EcoString {
        EcoString::from(text)
    }

    #[test]
    fn new_env_starts_at_base_depth() {
        let env = TypeEnv::new();
        assert_eq!(env.current_depth(), 0);
    }

    #[test]
    fn guard_increments_and_restores_depth() {
        let mut env = TypeEnv::new();
        {
            let scope = env.enter_scope();
            assert_eq!(scope.current_depth(), 1);
        }
        assert_eq!(env.current_depth(), 0);
    }

    #[test]
    fn cannot_pop_base_frame() {
        let mut env = TypeEnv::new();
        assert!(!env.pop());
        assert_eq!(env.current_depth(), 0);
    }

    #[test]
    fn bind_and_lookup() {
        let mut env = TypeEnv::new();
        let mut scope = env.enter_scope();
        scope.bind(&name("x"), StaticType::int(), BindingKind::Formal, test_span());

        let binding = scope.lookup("x").unwrap();
        assert_eq!(binding.ty, StaticType::int());
        assert_eq!(binding.kind, BindingKind::Formal);
        assert_eq!(binding.depth, 1);
        assert!(scope.lookup("y").is_none());
    }

    #[test]
    fn inner_binding_shadows_outer() {
        let mut env = TypeEnv::new();
        let mut outer = env.enter_scope();
        outer.bind(&name("x"), StaticType::int(), BindingKind::Attribute, test_span());
        {
            let mut inner = outer.enter_scope();
            inner.bind(&name("x"), StaticType::bool(), BindingKind::Let, test_span());
            assert_eq!(inner.lookup_type("x"), Some(&StaticType::bool()));
        }
        assert_eq!(outer.lookup_type("x"), Some(&StaticType::int()));
    }

    #[test]
    fn rebinding_in_same_frame_replaces() {
        let mut env = TypeEnv::new();
        let mut scope = env.enter_scope();
        scope.bind(&name("x"), StaticType::int(), BindingKind::Formal, test_span());
        scope.bind(&name("x"), StaticType::string(), BindingKind::Formal, test_span());
        assert_eq!(scope.lookup_type("x"), Some(&StaticType::string()));
    }

    #[test]
    fn declared_in_current_scope_ignores_outer_frames() {
        let mut env = TypeEnv::new();
        let mut outer = env.enter_scope();
        outer.bind(&name("a"), StaticType::int(), BindingKind::Attribute, test_span());
        let mut inner = outer.enter_scope();
        assert!(!inner.declared_in_current_scope("a"));
        inner.bind(&name("b"), StaticType::int(), BindingKind::Formal, test_span());
        assert!(inner.declared_in_current_scope("b"));
    }

    #[test]
    fn multi_frame_guard_pops_everything_it_pushed() {
        let mut env = TypeEnv::new();
        {
            let mut scope = env.enter_scope();
            scope.bind(&name("a"), StaticType::int(), BindingKind::Attribute, test_span());
            scope.push_frame();
            scope.push_frame();
            scope.bind(&name("b"), StaticType::int(), BindingKind::Attribute, test_span());
            assert_eq!(scope.current_depth(), 3);
            assert_eq!(scope.lookup("a").unwrap().depth, 1);
        }
        assert_eq!(env.current_depth(), 0);
        assert!(env.lookup("a").is_none());
        assert!(env.lookup("b").is_none());
    }

    #[test]
    fn guard_closes_on_early_return() {
        fn bail(env: &mut TypeEnv) -> Option<()> {
            let mut scope = env.enter_scope();
            scope.bind(&name("x"), StaticType::int(), BindingKind::Let, test_span());
            scope.lookup("missing")?;
            Some(())
        }

        let mut env = TypeEnv::new();
        assert!(bail(&mut env).is_none());
        assert_eq!(env.current_depth(), 0);
    }
}
