// Copyright 2025 the TreeViz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The canonical tree.
//!
//! Nodes live in an arena indexed by [`NodeId`]; parent links are plain ids, so nothing owns a
//! parent. The tree is rebuilt from scratch on every data change and is read-only afterwards.

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use kurbo::Point;
use peniko::Color;
use treeviz_core::{ColorRamp, NodeKey};

/// Index of a node in a [`Hierarchy`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

/// A normalized node.
#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    /// Display name.
    pub name: String,
    /// Area weight, `>= 0`.
    pub size: f64,
    /// Value driving the colour mapping.
    pub color_size: f64,
    /// Resolved colour.
    pub color: Color,
    /// `true` if the colour came from an explicit colour string in the source record.
    pub pinned: bool,
    /// Parent node, `None` for the root.
    pub parent: Option<NodeId>,
    /// Position in the parent's `children_reference`.
    pub index: usize,
    /// Depth below the root.
    pub depth: usize,
    /// Children in render order (layout value descending, ties in source order).
    pub children: Vec<NodeId>,
    /// Children in source order; index paths resolve through this list.
    pub children_reference: Vec<NodeId>,
    /// Layout weight: `size` for leaves, the sum of the children's values otherwise.
    pub value: f64,
    /// Smallest child size (widened when all children are equal).
    pub min_size: f64,
    /// Largest child size.
    pub max_size: f64,
    /// Smallest child colour value.
    pub min_color: f64,
    /// Largest child colour value (widened by 1 when all children are equal).
    pub max_color: f64,
    /// Colour ramp applied to the children, for internal nodes.
    pub color_scale: Option<ColorRamp>,
    /// Precomputed Voronoi region, in the configured region space.
    pub region: Vec<Point>,
}

impl Node {
    /// Returns `true` if the source record had a children field.
    pub fn is_internal(&self) -> bool {
        self.color_scale.is_some()
    }

    /// Returns `true` if the node has at least one child.
    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }
}

/// Errors returned by [`Hierarchy::resolve_path`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathError {
    /// The index at `step` does not exist.
    OutOfRange {
        /// Position in the path.
        step: usize,
        /// Offending index.
        index: usize,
        /// Number of children available at that step.
        len: usize,
    },
}

impl fmt::Display for PathError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfRange { step, index, len } => write!(
                f,
                "path step {step}: index {index} out of range for {len} children"
            ),
        }
    }
}

impl core::error::Error for PathError {}

/// A canonical tree.
#[derive(Clone, Debug, PartialEq)]
pub struct Hierarchy {
    nodes: Vec<Node>,
}

impl Hierarchy {
    pub(crate) fn from_nodes(nodes: Vec<Node>) -> Self {
        Self { nodes }
    }

    /// Returns the root id.
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Returns a node.
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    /// Returns the number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if the tree has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterates over all nodes in pre-order (parents before children, source order).
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes.iter().enumerate().map(|(i, n)| (NodeId(i), n))
    }

    /// Returns the deepest depth in the tree.
    pub fn max_depth(&self) -> usize {
        self.nodes.iter().map(|n| n.depth).max().unwrap_or(0)
    }

    /// Returns `id` itself if it exists, else the root.
    pub fn or_root(&self, id: NodeId) -> NodeId {
        if id.0 < self.nodes.len() {
            id
        } else {
            self.root()
        }
    }

    /// Iterates from `id` up to the root, inclusive.
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
        Ancestors {
            tree: self,
            next: self.node(id).map(|_| id),
        }
    }

    /// Returns `true` if `ancestor` is `node` or one of its ancestors.
    pub fn is_ancestor_of(&self, ancestor: NodeId, node: NodeId) -> bool {
        self.ancestors(node).any(|a| a == ancestor)
    }

    /// Returns the source-order index path from the root to `id`.
    pub fn path_to(&self, id: NodeId) -> Vec<usize> {
        let mut path: Vec<usize> = self
            .ancestors(id)
            .filter_map(|a| {
                let node = self.node(a)?;
                node.parent.map(|_| node.index)
            })
            .collect();
        path.reverse();
        path
    }

    /// Walks `path` through `children_reference` from the root.
    pub fn resolve_path(&self, path: &[usize]) -> Result<NodeId, PathError> {
        let mut current = self.root();
        for (step, &index) in path.iter().enumerate() {
            let children = self
                .node(current)
                .map(|n| n.children_reference.as_slice())
                .unwrap_or_default();
            current = *children.get(index).ok_or(PathError::OutOfRange {
                step,
                index,
                len: children.len(),
            })?;
        }
        Ok(current)
    }

    /// Returns the identity key of `id`: its root-to-node name path.
    pub fn key(&self, id: NodeId) -> NodeKey {
        let mut names: Vec<&str> = self
            .ancestors(id)
            .filter_map(|a| self.node(a).map(|n| n.name.as_str()))
            .collect();
        names.reverse();
        NodeKey::from_names(names)
    }

    /// Counts parent hops from `node` to the nearest node on the root-to-`focal` path.
    pub fn distance_to_path(&self, node: NodeId, focal: NodeId) -> usize {
        let on_path = self.path_mask(focal);
        self.distance_with_mask(node, &on_path)
    }

    pub(crate) fn path_mask(&self, focal: NodeId) -> Vec<bool> {
        let mut mask = alloc::vec![false; self.nodes.len()];
        for a in self.ancestors(self.or_root(focal)) {
            mask[a.0] = true;
        }
        mask
    }

    pub(crate) fn distance_with_mask(&self, node: NodeId, on_path: &[bool]) -> usize {
        self.ancestors(node)
            .position(|a| on_path.get(a.0).copied().unwrap_or(false))
            .unwrap_or(usize::MAX)
    }
}

/// Iterator returned by [`Hierarchy::ancestors`].
#[derive(Clone, Debug)]
pub struct Ancestors<'a> {
    tree: &'a Hierarchy,
    next: Option<NodeId>,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = self.tree.node(current).and_then(|n| n.parent);
        Some(current)
    }
}
