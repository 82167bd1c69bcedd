// Copyright 2025 the TreeViz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Common layout output and the visible-depth filter.

extern crate alloc;

use alloc::vec::Vec;

use kurbo::Size;
use treeviz_core::Geometry;

use crate::tree::{Hierarchy, NodeId};

/// A positioned node produced by a layout pass.
#[derive(Clone, Debug, PartialEq)]
pub struct LayoutNode {
    /// The canonical node.
    pub id: NodeId,
    /// Depth of the node below the root.
    pub depth: usize,
    /// Parent hops to the focal node's root-to-node path.
    pub distance: usize,
    /// Computed geometry.
    pub geom: Geometry,
}

/// A strategy turning a canonical tree into positioned nodes.
pub trait HierarchyLayout {
    /// Lays out `tree` for a `viewport` around `focal`.
    ///
    /// A focal id that is not part of the tree is treated as the root.
    fn layout(&self, tree: &Hierarchy, viewport: Size, focal: NodeId) -> Vec<LayoutNode>;
}

/// Returns, per node, whether it lies within `max_visible_levels` hops of the focal path.
///
/// `None` disables the limit. A limit of 0 is treated as 1, so the focal path itself always
/// stays visible.
pub fn visibility_mask(
    tree: &Hierarchy,
    focal: NodeId,
    max_visible_levels: Option<usize>,
) -> Vec<bool> {
    let Some(max) = max_visible_levels else {
        return alloc::vec![true; tree.len()];
    };
    let max = max.max(1);
    let on_path = tree.path_mask(focal);
    let mut distance: Vec<usize> = alloc::vec![0; tree.len()];
    // Pre-order storage puts every parent before its children.
    for (id, node) in tree.iter() {
        distance[id.0] = match node.parent {
            _ if on_path[id.0] => 0,
            Some(parent) => distance[parent.0].saturating_add(1),
            None => 0,
        };
    }
    distance.into_iter().map(|d| d < max).collect()
}

/// Returns the ids of all visible nodes in pre-order.
pub fn visible_nodes(
    tree: &Hierarchy,
    focal: NodeId,
    max_visible_levels: Option<usize>,
) -> Vec<NodeId> {
    visibility_mask(tree, focal, max_visible_levels)
        .into_iter()
        .enumerate()
        .filter_map(|(i, visible)| visible.then_some(NodeId(i)))
        .collect()
}

/// Returns the deepest depth that is rendered while `focal` is zoomed.
pub fn cur_max_level(tree: &Hierarchy, focal: NodeId, max_visible_levels: Option<usize>) -> usize {
    let depth = tree.node(tree.or_root(focal)).map_or(0, |n| n.depth);
    match max_visible_levels {
        Some(max) => depth + max.max(1) - 1,
        None => tree.max_depth(),
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use alloc::vec;

    use serde_json::json;

    use super::*;
    use crate::{HierarchyConfig, normalize};

    #[test]
    fn visibility_follows_hops_from_the_focal_path() {
        let tree = normalize(
            &json!({ "children": [
                { "name": "a", "children": [{ "name": "a1", "children": [{ "name": "a11" }] }] },
                { "name": "b" }
            ] }),
            &HierarchyConfig::default(),
        );
        let names = |ids: Vec<NodeId>| {
            ids.into_iter()
                .map(|id| tree.node(id).unwrap().name.clone())
                .collect::<Vec<_>>()
        };
        let root = tree.root();
        assert_eq!(names(visible_nodes(&tree, root, Some(2))), vec!["", "a", "b"]);
        let a1 = tree.resolve_path(&[0, 0]).unwrap();
        assert_eq!(
            names(visible_nodes(&tree, a1, Some(2))),
            vec!["", "a", "a1", "a11", "b"]
        );
        assert_eq!(visible_nodes(&tree, a1, Some(1)).len(), 3);
        assert_eq!(visible_nodes(&tree, root, None).len(), 5);
        assert_eq!(visible_nodes(&tree, NodeId(99), Some(1)), vec![root]);
        assert_eq!(cur_max_level(&tree, a1, Some(2)), 3);
        assert_eq!(cur_max_level(&tree, root, None), 3);
    }
}
