// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Binary-lifting ancestor index over the class graph.
//!
//! **DDD Context:** Semantic Analysis
//!
//! Every class gets a dense id, its depth below `Object` and a table of its
//! 2^j-th ancestors. That turns "k-th ancestor" and "least common ancestor"
//! into `O(log n)` lookups, which in turn give the two type-level operations
//! the checker needs:
//!
//! - [`AncestorIndex::conforms`]: `T1 ≤ T2` iff `lca(T1, T2) == T2`
//! - [`AncestorIndex::join`]: the least upper bound of two types
//!
//! Classes the walk from the root never reaches (those on or below an
//! inheritance cycle) keep depth 0 and a table full of the root. They are
//! reported separately; queries about them stay total.

use super::class_hierarchy::ClassHierarchy;
use crate::names;
use crate::types::StaticType;
use ecow::EcoString;
use std::collections::HashMap;
use tracing::debug;

/// Number of lifting levels; supports hierarchies up to 2^20 deep.
pub const MAX_LEVEL: usize = 20;

/// Precomputed ancestor tables for every class in a [`ClassHierarchy`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AncestorIndex {
    ids: HashMap<EcoString, usize>,
    names: Vec<EcoString>,
    depth: Vec<u32>,
    /// `up[v][j]` is the 2^j-th ancestor of `v`, saturating at the root.
    up: Vec<[usize; MAX_LEVEL]>,
    reached: Vec<bool>,
    root: usize,
}

impl AncestorIndex {
    /// Build the index by walking the hierarchy's parent → children adjacency
    /// from the root.
    #[must_use]
    pub fn build(hierarchy: &ClassHierarchy) -> Self {
        let mut ids = HashMap::new();
        let mut names = Vec::new();
        let root = intern(&mut ids, &mut names, &EcoString::from(hierarchy.root()));
        for name in hierarchy.class_names() {
            intern(&mut ids, &mut names, name);
        }

        let parents: Vec<Option<usize>> = names
            .iter()
            .map(|name| {
                hierarchy
                    .graph_parent(name)
                    .and_then(|parent| ids.get(parent).copied())
            })
            .collect();
        let children: Vec<Vec<usize>> = names
            .iter()
            .map(|name| {
                hierarchy
                    .children(name)
                    .iter()
                    .filter_map(|child| ids.get(child).copied())
                    .collect()
            })
            .collect();

        let index = Self::from_tree(ids, names, root, &parents, &children);
        debug!(
            classes = index.names.len(),
            unreached = index.reached.iter().filter(|reached| !**reached).count(),
            "built ancestor index"
        );
        index
    }

    /// Build the index from `(class, parent)` pairs.
    ///
    /// Parents that name no listed class are treated as the root. The root is
    /// added if the pairs do not mention it.
    pub fn from_parent_links(
        root: &str,
        links: impl IntoIterator<Item = (EcoString, Option<EcoString>)>,
    ) -> Self {
        let mut ids = HashMap::new();
        let mut names = Vec::new();

        let root_id = intern(&mut ids, &mut names, &EcoString::from(root));
        let mut edges = Vec::new();
        for (class, parent) in links {
            let id = intern(&mut ids, &mut names, &class);
            edges.push((id, parent));
        }

        let mut parents = vec![None; names.len()];
        for (id, parent) in edges {
            if id == root_id {
                continue;
            }
            let parent_id = parent
                .and_then(|parent| ids.get(&parent).copied())
                .unwrap_or(root_id);
            parents[id] = Some(parent_id);
        }

        let mut children: Vec<Vec<usize>> = vec![Vec::new(); names.len()];
        for (id, parent) in parents.iter().enumerate() {
            if let Some(parent) = parent {
                children[*parent].push(id);
            }
        }

        Self::from_tree(ids, names, root_id, &parents, &children)
    }

    /// Fills depth and lifting tables by a preorder walk over `children`.
    fn from_tree(
        ids: HashMap<EcoString, usize>,
        names: Vec<EcoString>,
        root: usize,
        parents: &[Option<usize>],
        children: &[Vec<usize>],
    ) -> Self {
        let count = names.len();
        let mut depth = vec![0_u32; count];
        let mut up = vec![[root; MAX_LEVEL]; count];
        let mut reached = vec![false; count];

        // A node's ancestors are complete before it is filled.
        let mut stack = vec![root];
        reached[root] = true;
        while let Some(node) = stack.pop() {
            if node != root {
                if let Some(parent) = parents[node] {
                    depth[node] = depth[parent] + 1;
                    up[node][0] = parent;
                    for level in 1..MAX_LEVEL {
                        up[node][level] = up[up[node][level - 1]][level - 1];
                    }
                }
            }
            for &child in children[node].iter().rev() {
                if !reached[child] {
                    reached[child] = true;
                    stack.push(child);
                }
            }
        }

        Self {
            ids,
            names,
            depth,
            up,
            reached,
            root,
        }
    }

    /// Name of the root class.
    #[must_use]
    pub fn root(&self) -> &EcoString {
        &self.names[self.root]
    }

    /// Returns `true` if the class is in the index.
    #[must_use]
    pub fn contains(&self, class: &str) -> bool {
        self.ids.contains_key(class)
    }

    /// Returns `true` if the class hangs (transitively) below the root.
    #[must_use]
    pub fn is_reachable(&self, class: &str) -> bool {
        self.ids.get(class).is_some_and(|&id| self.reached[id])
    }

    /// Number of edges between a class and the root; `None` if unknown.
    #[must_use]
    pub fn depth(&self, class: &str) -> Option<u32> {
        self.ids.get(class).map(|&id| self.depth[id])
    }

    /// Direct parent; `None` for the root, unknown classes and unreached classes.
    #[must_use]
    pub fn parent(&self, class: &str) -> Option<&EcoString> {
        let &id = self.ids.get(class)?;
        if id == self.root || !self.reached[id] {
            return None;
        }
        Some(&self.names[self.up[id][0]])
    }

    /// Iterates from the class itself up to and including the root.
    ///
    /// Empty for unknown classes; just the class then the root for unreached ones.
    pub fn ancestors<'a>(&'a self, class: &str) -> impl Iterator<Item = &'a EcoString> + use<'a> {
        let start = self.ids.get(class).copied();
        let root = self.root;
        let mut next = start;
        std::iter::from_fn(move || {
            let current = next?;
            next = if current == root {
                None
            } else {
                Some(self.up[current][0])
            };
            Some(&self.names[current])
        })
    }

    /// The k-th ancestor of a class (`k = 0` is the class itself).
    ///
    /// `k` larger than the depth yields the root. `None` for unknown classes.
    #[must_use]
    pub fn kth_ancestor(&self, class: &str, k: u32) -> Option<&EcoString> {
        let &id = self.ids.get(class)?;
        Some(&self.names[self.lift(id, k.min(self.depth[id]))])
    }

    /// Least common ancestor of two classes.
    ///
    /// Unknown classes are treated as the root, except that a class is
    /// always its own least common ancestor.
    #[must_use]
    pub fn lca(&self, a: &str, b: &str) -> EcoString {
        if a == b {
            return EcoString::from(a);
        }
        let (Some(&a), Some(&b)) = (self.ids.get(a), self.ids.get(b)) else {
            return self.root().clone();
        };
        self.names[self.lca_ids(a, b)].clone()
    }

    /// Least upper bound of two static types.
    ///
    /// `SELF_TYPE ⊔ SELF_TYPE` stays `SELF_TYPE`; otherwise `SELF_TYPE` is
    /// resolved to the current class first. The no-type marker is neutral.
    #[must_use]
    pub fn join(&self, a: &StaticType, b: &StaticType, current_class: &str) -> StaticType {
        match (a, b) {
            (StaticType::NoType, other) | (other, StaticType::NoType) => other.clone(),
            (StaticType::SelfType, StaticType::SelfType) => StaticType::SelfType,
            _ => {
                let a = a.resolve_self(current_class);
                let b = b.resolve_self(current_class);
                StaticType::Class(self.lca(a.name(), b.name()))
            }
        }
    }

    /// Whether `t1` conforms to `t2`.
    ///
    /// - the no-type marker conforms to everything
    /// - `SELF_TYPE ≤ SELF_TYPE`
    /// - a class type never conforms to `SELF_TYPE`
    /// - otherwise `SELF_TYPE` becomes the current class and `T1 ≤ T2` iff
    ///   `lca(T1, T2) == T2`
    #[must_use]
    pub fn conforms(&self, t1: &StaticType, t2: &StaticType, current_class: &str) -> bool {
        match (t1, t2) {
            (StaticType::NoType, _) | (StaticType::SelfType, StaticType::SelfType) => true,
            (_, StaticType::SelfType) => false,
            (_, StaticType::NoType) => false,
            (_, StaticType::Class(expected)) => {
                let found = t1.resolve_self(current_class);
                self.lca(found.name(), expected) == *expected
            }
        }
    }

    fn lift(&self, mut node: usize, k: u32) -> usize {
        for level in 0..MAX_LEVEL {
            if k & (1 << level) != 0 {
                node = self.up[node][level];
            }
        }
        node
    }

    fn lca_ids(&self, mut a: usize, mut b: usize) -> usize {
        if self.depth[a] < self.depth[b] {
            std::mem::swap(&mut a, &mut b);
        }
        a = self.lift(a, self.depth[a] - self.depth[b]);
        if a == b {
            return a;
        }
        for level in (0..MAX_LEVEL).rev() {
            if self.up[a][level] != self.up[b][level] {
                a = self.up[a][level];
                b = self.up[b][level];
            }
        }
        self.up[a][0]
    }
}

impl Default for AncestorIndex {
    fn default() -> Self {
        Self::from_parent_links(names::OBJECT, std::iter::empty())
    }
}

fn intern(ids: &mut HashMap<EcoString, usize>, names: &mut Vec<EcoString>, name: &EcoString) -> usize {
    if let Some(&id) = ids.get(name) {
        return id;
    }
    names.push(name.clone());
    ids.insert(name.clone(), names.len() - 1);
    names.len() - 1
}

#[cfg(test)]
mod tests {
    use super::*;

    /// ```text
    /// Object
    /// ├── IO ── A ── B ── C
    /// │         └── D
    /// └── Int
    /// ```
    fn sample() -> AncestorIndex {
        AncestorIndex::from_parent_links(
            "Object",
            [
                ("Object", None),
                ("IO", Some("Object")),
                ("Int", Some("Object")),
                ("A", Some("IO")),
                ("B", Some("A")),
                ("C", Some("B")),
                ("D", Some("A")),
            ]
            .into_iter()
            .map(|(class, parent)| (EcoString::from(class), parent.map(EcoString::from))),
        )
    }

    #[test]
    fn depth_counts_edges_to_root() {
        let index = sample();
        assert_eq!(index.depth("Object"), Some(0));
        assert_eq!(index.depth("IO"), Some(1));
        assert_eq!(index.depth("C"), Some(4));
        assert_eq!(index.depth("Nope"), None);
    }

    #[test]
    fn kth_ancestor_walks_and_saturates() {
        let index = sample();
        assert_eq!(index.kth_ancestor("C", 0).map(EcoString::as_str), Some("C"));
        assert_eq!(index.kth_ancestor("C", 1).map(EcoString::as_str), Some("B"));
        assert_eq!(index.kth_ancestor("C", 3).map(EcoString::as_str), Some("IO"));
        assert_eq!(index.kth_ancestor("C", 4).map(EcoString::as_str), Some("Object"));
        assert_eq!(index.kth_ancestor("C", 99).map(EcoString::as_str), Some("Object"));
        assert!(index.kth_ancestor("Nope", 1).is_none());
    }

    #[test]
    fn lca_of_related_and_unrelated_classes() {
        let index = sample();
        assert_eq!(index.lca("C", "D"), "A");
        assert_eq!(index.lca("D", "C"), "A");
        assert_eq!(index.lca("C", "A"), "A");
        assert_eq!(index.lca("C", "Int"), "Object");
        assert_eq!(index.lca("B", "B"), "B");
        assert_eq!(index.lca("Object", "C"), "Object");
    }

    #[test]
    fn lca_with_unknown_class_is_root() {
        let index = sample();
        assert_eq!(index.lca("C", "Missing"), "Object");
        assert_eq!(index.lca("Missing", "Missing"), "Missing");
    }

    #[test]
    fn ancestors_iterates_to_root() {
        let index = sample();
        let chain: Vec<&str> = index.ancestors("C").map(EcoString::as_str).collect();
        assert_eq!(chain, vec!["C", "B", "A", "IO", "Object"]);
        assert_eq!(index.ancestors("Nope").count(), 0);
        assert_eq!(index.parent("C").map(EcoString::as_str), Some("B"));
        assert!(index.parent("Object").is_none());
    }

    #[test]
    fn conformance_follows_inheritance() {
        let index = sample();
        let class = |name: &str| StaticType::Class(name.into());
        assert!(index.conforms(&class("C"), &class("A"), "C"));
        assert!(index.conforms(&class("C"), &class("Object"), "C"));
        assert!(!index.conforms(&class("A"), &class("C"), "C"));
        assert!(!index.conforms(&class("D"), &class("B"), "C"));
        assert!(index.conforms(&class("Int"), &class("Int"), "C"));
    }

    #[test]
    fn conformance_with_self_type() {
        let index = sample();
        let class = |name: &str| StaticType::Class(name.into());
        assert!(index.conforms(&StaticType::SelfType, &StaticType::SelfType, "B"));
        assert!(index.conforms(&StaticType::SelfType, &class("A"), "B"));
        assert!(!index.conforms(&StaticType::SelfType, &class("C"), "B"));
        assert!(!index.conforms(&class("B"), &StaticType::SelfType, "B"));
        assert!(index.conforms(&StaticType::NoType, &class("C"), "B"));
        assert!(index.conforms(&StaticType::NoType, &StaticType::SelfType, "B"));
    }

    #[test]
    fn join_rules() {
        let index = sample();
        let class = |name: &str| StaticType::Class(name.into());
        assert_eq!(index.join(&class("C"), &class("D"), "B"), class("A"));
        assert_eq!(
            index.join(&StaticType::SelfType, &StaticType::SelfType, "B"),
            StaticType::SelfType
        );
        assert_eq!(index.join(&StaticType::SelfType, &class("D"), "B"), class("A"));
        assert_eq!(index.join(&StaticType::NoType, &class("D"), "B"), class("D"));
        assert_eq!(index.join(&class("Int"), &StaticType::NoType, "B"), class("Int"));
    }

    #[test]
    fn cycle_members_are_unreached_and_treated_as_root_children() {
        let index = AncestorIndex::from_parent_links(
            "Object",
            [
                ("Object", None),
                ("X", Some("Y")),
                ("Y", Some("X")),
                ("Z", Some("Object")),
            ]
            .into_iter()
            .map(|(class, parent)| (EcoString::from(class), parent.map(EcoString::from))),
        );
        assert!(!index.is_reachable("X"));
        assert!(!index.is_reachable("Y"));
        assert!(index.is_reachable("Z"));
        assert_eq!(index.depth("X"), Some(0));
        assert_eq!(index.lca("X", "Z"), "Object");
        assert_eq!(index.kth_ancestor("X", 3).map(EcoString::as_str), Some("X"));
        assert!(index.parent("X").is_none());
    }

    #[test]
    fn deep_chain_uses_lifting() {
        let links = (0..1000).map(|i| {
            let parent = if i == 0 {
                "Object".into()
            } else {
                EcoString::from(format!("C{}", i - 1))
            };
            (EcoString::from(format!("C{i}")), Some(parent))
        });
        let index = AncestorIndex::from_parent_links("Object", links);
        assert_eq!(index.depth("C999"), Some(1000));
        assert_eq!(index.kth_ancestor("C999", 500).map(EcoString::as_str), Some("C499"));
        assert_eq!(index.lca("C999", "C3"), "C3");
    }

    #[test]
    fn build_walks_hierarchy_children_from_root() {
        use crate::semantic_analysis::test_helpers::{class, program};

        let prog = program(vec![
            class("A", "IO", vec![]),
            class("B", "A", vec![]),
            class("X", "Y", vec![]),
            class("Y", "X", vec![]),
        ]);
        let (hierarchy, _) = ClassHierarchy::build(&prog);
        let index = AncestorIndex::build(&hierarchy);

        assert_eq!(index.depth("B"), Some(3));
        assert_eq!(index.depth("Main"), Some(1));
        assert_eq!(index.lca("B", "String"), "Object");
        assert!(index.is_reachable("Bool"));
        assert!(!index.is_reachable("X"));
        assert!(!index.is_reachable("Y"));
        assert_eq!(index.lca("X", "B"), "Object");
    }
}
