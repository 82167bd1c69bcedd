// Copyright 2025 the TreeViz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Precomputed Voronoi regions scaled to the viewport.

extern crate alloc;

use alloc::vec::Vec;

use kurbo::{Affine, Size};
use treeviz_core::Geometry;

use crate::layout::{HierarchyLayout, LayoutNode};
use crate::tree::{Hierarchy, NodeId};

/// Places the leaf regions carried by the source data.
///
/// Regions are never recomputed; their points are scaled from the reference space into the
/// viewport. Scaling is relative to the reference space rather than to the previous viewport, so
/// repeated resizes to the same size always produce the same points.
#[derive(Clone, Debug, PartialEq)]
pub struct VoronoiLayout {
    /// Coordinate space the region points are expressed in.
    pub space: Size,
}

impl Default for VoronoiLayout {
    fn default() -> Self {
        Self {
            space: Size::new(600.0, 600.0),
        }
    }
}

impl VoronoiLayout {
    /// Creates a layout for regions in `space`.
    pub fn new(space: Size) -> Self {
        Self { space }
    }

    /// Returns the transform from the reference space into `viewport`.
    pub fn transform(&self, viewport: Size) -> Affine {
        let sx = if self.space.width > 0.0 {
            viewport.width / self.space.width
        } else {
            1.0
        };
        let sy = if self.space.height > 0.0 {
            viewport.height / self.space.height
        } else {
            1.0
        };
        Affine::scale_non_uniform(sx, sy)
    }
}

impl HierarchyLayout for VoronoiLayout {
    /// Emits every leaf with at least three region points, in pre-order.
    ///
    /// Regions tile the plane at leaf level, so the focal node only affects `distance`.
    fn layout(&self, tree: &Hierarchy, viewport: Size, focal: NodeId) -> Vec<LayoutNode> {
        let transform = self.transform(viewport);
        let on_path = tree.path_mask(focal);
        tree.iter()
            .filter(|(_, node)| !node.has_children() && node.region.len() >= 3)
            .map(|(id, node)| LayoutNode {
                id,
                depth: node.depth,
                distance: tree.distance_with_mask(id, &on_path),
                geom: Geometry::Polygon(node.region.iter().map(|p| transform * *p).collect()),
            })
            .collect()
    }
}
