// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Category tree building.
//!
//! A grouped axis is described by a nested specification where each node is
//! either a leaf (a plain label) or a group (`{name, categories}`). The
//! builder turns that into arena-backed tree storage plus a flat leaf list
//! whose index order matches the host axis's tick positions.

extern crate alloc;

use alloc::string::{String, ToString};
use alloc::vec::Vec;

use smallvec::SmallVec;

/// Index of a node in [`CategoryTree`] arena storage.
///
/// Parent/child links are plain indices, so the tree has no reference cycles
/// and destruction order never matters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CategoryId(pub u32);

impl CategoryId {
    fn index(self) -> usize {
        self.0 as usize
    }
}

/// Caller-facing nested category specification.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CategorySpec {
    /// A leaf category, directly bound to one tick position.
    Leaf(String),
    /// A group spanning the leaves of its descendants.
    Group {
        /// Display name of the group.
        name: String,
        /// Ordered child categories.
        categories: Vec<CategorySpec>,
    },
}

impl CategorySpec {
    /// Creates a leaf category.
    pub fn leaf(name: impl Into<String>) -> Self {
        Self::Leaf(name.into())
    }

    /// Creates a group category.
    pub fn group(name: impl Into<String>, categories: Vec<Self>) -> Self {
        Self::Group {
            name: name.into(),
            categories,
        }
    }
}

impl From<&str> for CategorySpec {
    fn from(value: &str) -> Self {
        Self::Leaf(value.into())
    }
}

impl From<String> for CategorySpec {
    fn from(value: String) -> Self {
        Self::Leaf(value)
    }
}

impl From<f64> for CategorySpec {
    fn from(value: f64) -> Self {
        Self::Leaf(value.to_string())
    }
}

impl From<i64> for CategorySpec {
    fn from(value: i64) -> Self {
        Self::Leaf(value.to_string())
    }
}

/// Errors returned when building a [`CategoryTree`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryError {
    /// A group node has neither a usable name nor nested categories.
    ///
    /// This is a contract violation by the caller; the axis must not silently
    /// render a partial tree.
    MalformedGroup {
        /// Nesting depth at which the malformed group was found.
        depth: usize,
    },
}

impl core::fmt::Display for CategoryError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::MalformedGroup { depth } => {
                write!(f, "group at depth {depth} has neither a name nor categories")
            }
        }
    }
}

impl core::error::Error for CategoryError {}

/// A node in the built category hierarchy.
#[derive(Clone, Debug)]
pub struct Category {
    /// Display name.
    pub name: String,
    /// Enclosing group, or `None` for root-level categories.
    pub parent: Option<CategoryId>,
    /// Ordered immediate children; empty for leaves.
    pub children: Vec<CategoryId>,
    /// Number of descendant leaf categories (1 for a leaf itself).
    pub leaf_count: usize,
    /// Nesting depth (0 for root-level nodes).
    pub depth: usize,
}

impl Category {
    /// Returns `true` when this node has no children.
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// Arena-backed category hierarchy plus the flat leaf list.
#[derive(Clone, Debug, Default)]
pub struct CategoryTree {
    nodes: Vec<Category>,
    roots: Vec<CategoryId>,
    leaves: Vec<CategoryId>,
    max_depth: usize,
}

impl CategoryTree {
    /// Builds a tree from a nested specification.
    ///
    /// The produced leaf list preserves the input's left-to-right document
    /// order; its index is the leaf's tick position on the host axis. Each
    /// leaf increments `leaf_count` on every ancestor up to the root.
    ///
    /// An empty specification yields an empty (ungrouped) tree. A group with
    /// neither a name nor children fails fast with
    /// [`CategoryError::MalformedGroup`].
    pub fn build(spec: &[CategorySpec]) -> Result<Self, CategoryError> {
        let mut tree = Self::default();
        tree.add_all(spec, None, 0)?;
        Ok(tree)
    }

    fn add_all(
        &mut self,
        spec: &[CategorySpec],
        parent: Option<CategoryId>,
        depth: usize,
    ) -> Result<(), CategoryError> {
        for node in spec {
            match node {
                CategorySpec::Leaf(name) => self.add_leaf(name.clone(), parent, depth),
                CategorySpec::Group { name, categories } => {
                    if name.is_empty() && categories.is_empty() {
                        return Err(CategoryError::MalformedGroup { depth });
                    }
                    let id = self.add_node(name.clone(), parent, depth);
                    self.add_all(categories, Some(id), depth + 1)?;
                }
            }
        }
        self.max_depth = self.max_depth.max(depth);
        Ok(())
    }

    fn add_node(&mut self, name: String, parent: Option<CategoryId>, depth: usize) -> CategoryId {
        debug_assert!(self.nodes.len() < u32::MAX as usize, "category arena overflow");
        #[allow(
            clippy::cast_possible_truncation,
            reason = "arena sizes stay far below u32::MAX"
        )]
        let id = CategoryId(self.nodes.len() as u32);
        self.nodes.push(Category {
            name,
            parent,
            children: Vec::new(),
            leaf_count: 0,
            depth,
        });
        match parent {
            Some(p) => self.nodes[p.index()].children.push(id),
            None => self.roots.push(id),
        }
        id
    }

    fn add_leaf(&mut self, name: String, parent: Option<CategoryId>, depth: usize) {
        let id = self.add_node(name, parent, depth);
        self.leaves.push(id);
        self.nodes[id.index()].leaf_count = 1;
        let mut up = parent;
        while let Some(p) = up {
            self.nodes[p.index()].leaf_count += 1;
            up = self.nodes[p.index()].parent;
        }
    }

    /// Returns the node for an id.
    #[must_use]
    pub fn node(&self, id: CategoryId) -> &Category {
        &self.nodes[id.index()]
    }

    /// Root-level categories in document order.
    #[must_use]
    pub fn roots(&self) -> &[CategoryId] {
        &self.roots
    }

    /// The flat leaf list; index equals the leaf's tick position.
    #[must_use]
    pub fn leaves(&self) -> &[CategoryId] {
        &self.leaves
    }

    /// The leaf at a tick position, if the position is in range.
    #[must_use]
    pub fn leaf_at(&self, pos: usize) -> Option<CategoryId> {
        self.leaves.get(pos).copied()
    }

    /// Highest nesting depth encountered (0 for a flat, non-grouped axis).
    #[must_use]
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Whether any group nodes exist.
    #[must_use]
    pub fn is_grouped(&self) -> bool {
        self.max_depth > 0
    }

    /// Leaf display names in tick-position order.
    ///
    /// This is what gets delegated to the host's default flat category
    /// assignment.
    #[must_use]
    pub fn leaf_names(&self) -> Vec<String> {
        self.leaves
            .iter()
            .map(|id| self.node(*id).name.clone())
            .collect()
    }

    /// Ancestors of a node, from immediate parent up to the root.
    #[must_use]
    pub fn ancestors(&self, id: CategoryId) -> SmallVec<[CategoryId; 4]> {
        let mut out = SmallVec::new();
        let mut up = self.node(id).parent;
        while let Some(p) = up {
            out.push(p);
            up = self.node(p).parent;
        }
        out
    }

    /// Position of a node within its immediate parent's child list.
    ///
    /// Returns `None` for root-level nodes.
    #[must_use]
    pub fn child_index(&self, id: CategoryId) -> Option<usize> {
        let parent = self.node(id).parent?;
        self.node(parent).children.iter().position(|c| *c == id)
    }

    /// The ancestor-chain display path of a node, leaf-first.
    ///
    /// E.g. a leaf `Mon` inside `Week 1` yields `"Mon, Week 1"`.
    #[must_use]
    pub fn path(&self, id: CategoryId) -> String {
        let mut out = self.node(id).name.clone();
        for anc in self.ancestors(id) {
            out.push_str(", ");
            out.push_str(&self.node(anc).name);
        }
        out
    }
}
