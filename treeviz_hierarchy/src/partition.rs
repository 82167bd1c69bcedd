// Copyright 2025 the TreeViz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Adjacency partition layout, the basis of the sunburst.
//!
//! Coordinates are normalized: `x`/`dx` span `0..1` across siblings in proportion to value,
//! and `y`/`dy` place depth `d` at `d / levels` with a band height of `1 / levels`.

extern crate alloc;

use alloc::vec::Vec;

use kurbo::Size;
use serde::Deserialize;
use treeviz_core::{Geometry, Partition};

use crate::layout::{HierarchyLayout, LayoutNode, visibility_mask};
use crate::tree::{Hierarchy, NodeId};

/// Sibling ordering of a [`PartitionLayout`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortBy {
    /// Largest value first.
    #[default]
    Value,
    /// Source order.
    Original,
}

/// Recursive angular and radial subdivision.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PartitionLayout {
    /// Sibling ordering.
    pub sort_by: SortBy,
    /// Visible-depth limit.
    pub max_visible_levels: Option<usize>,
}

impl PartitionLayout {
    /// Creates a value-sorted layout with no depth limit.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the sibling ordering.
    #[must_use]
    pub fn with_sort_by(mut self, sort_by: SortBy) -> Self {
        self.sort_by = sort_by;
        self
    }

    /// Sets the visible-depth limit.
    #[must_use]
    pub fn with_max_visible_levels(mut self, levels: Option<usize>) -> Self {
        self.max_visible_levels = levels;
        self
    }

    fn children<'t>(&self, tree: &'t Hierarchy, id: NodeId) -> &'t [NodeId] {
        let Some(n) = tree.node(id) else {
            return &[];
        };
        match self.sort_by {
            SortBy::Value => &n.children,
            SortBy::Original => &n.children_reference,
        }
    }
}

impl HierarchyLayout for PartitionLayout {
    fn layout(&self, tree: &Hierarchy, _viewport: Size, focal: NodeId) -> Vec<LayoutNode> {
        if tree.is_empty() {
            return Vec::new();
        }
        let focal = tree.or_root(focal);
        let visible = visibility_mask(tree, focal, self.max_visible_levels);
        let on_path = tree.path_mask(focal);
        let dy = 1.0 / (tree.max_depth() + 1) as f64;

        let mut out = Vec::with_capacity(tree.len());
        let mut stack = alloc::vec![(tree.root(), 0.0, 1.0)];
        while let Some((id, x, dx)) = stack.pop() {
            let Some(node) = tree.node(id) else {
                continue;
            };
            if visible[id.0] {
                out.push(LayoutNode {
                    id,
                    depth: node.depth,
                    distance: tree.distance_with_mask(id, &on_path),
                    geom: Geometry::Partition(Partition::new(x, node.depth as f64 * dy, dx, dy)),
                });
            }
            let k = if node.value > 0.0 { dx / node.value } else { 0.0 };
            let mut cx = x;
            let mut placed = Vec::new();
            for &child in self.children(tree, id) {
                let cdx = tree.node(child).map_or(0.0, |c| c.value) * k;
                placed.push((child, cx, cdx));
                cx += cdx;
            }
            // Reverse so the stack pops siblings in order.
            stack.extend(placed.into_iter().rev());
        }
        out
    }
}
