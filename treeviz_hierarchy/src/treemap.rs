// Copyright 2025 the TreeViz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Squarified treemap layout.

extern crate alloc;

use alloc::vec::Vec;

use kurbo::Size;
use treeviz_core::{Geometry, Partition};

use crate::layout::{HierarchyLayout, LayoutNode, visibility_mask};
use crate::tree::{Hierarchy, NodeId};

/// The golden ratio, the default target aspect ratio of squarified cells.
pub const GOLDEN_RATIO: f64 = 1.618_033_988_749_895;

/// Recursive rectangle subdivision weighted by node value.
///
/// Output rectangles are in viewport pixels. The output is ordered by depth, then by value
/// descending, with ties kept in pre-order.
#[derive(Clone, Debug, PartialEq)]
pub struct TreemapLayout {
    /// Inset applied to a node before subdividing it, when it has siblings.
    pub padding: f64,
    /// Target aspect ratio of the cells.
    pub ratio: f64,
    /// Visible-depth limit, see [`visibility_mask`].
    pub max_visible_levels: Option<usize>,
}

impl Default for TreemapLayout {
    fn default() -> Self {
        Self {
            padding: 0.0,
            ratio: GOLDEN_RATIO,
            max_visible_levels: None,
        }
    }
}

impl TreemapLayout {
    /// Creates a layout with no padding and no depth limit.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the sibling padding.
    #[must_use]
    pub fn with_padding(mut self, padding: f64) -> Self {
        self.padding = padding.max(0.0);
        self
    }

    /// Sets the target aspect ratio.
    #[must_use]
    pub fn with_ratio(mut self, ratio: f64) -> Self {
        self.ratio = ratio;
        self
    }

    /// Sets the visible-depth limit.
    #[must_use]
    pub fn with_max_visible_levels(mut self, levels: Option<usize>) -> Self {
        self.max_visible_levels = levels;
        self
    }

    /// Computes the rectangle of every node, indexed by [`NodeId`].
    pub fn rects(&self, tree: &Hierarchy, viewport: Size) -> Vec<Partition> {
        let mut rects = alloc::vec![Partition::default(); tree.len()];
        if tree.is_empty() {
            return rects;
        }
        rects[0] = Partition::new(0.0, 0.0, viewport.width, viewport.height);
        // Pre-order: a parent's rectangle is final before its children are placed.
        for (id, node) in tree.iter() {
            if node.children.is_empty() {
                continue;
            }
            let padded = node
                .parent
                .and_then(|p| tree.node(p))
                .is_some_and(|p| p.children.len() > 1);
            let inset = if padded { self.padding } else { 0.0 };
            let rect = pad(rects[id.0], inset);
            self.squarify(tree, id, rect, &mut rects);
        }
        rects
    }

    fn squarify(&self, tree: &Hierarchy, id: NodeId, mut rect: Partition, rects: &mut [Partition]) {
        let Some(node) = tree.node(id) else {
            return;
        };
        let k = if node.value > 0.0 {
            rect.dx * rect.dy / node.value
        } else {
            0.0
        };
        let cells: Vec<Cell> = node
            .children
            .iter()
            .map(|&child| {
                let area = tree.node(child).map_or(0.0, |c| c.value) * k;
                Cell {
                    id: child,
                    area: if area.is_nan() || area <= 0.0 { 0.0 } else { area },
                }
            })
            .collect();

        let mut row = Row::default();
        let mut u = rect.dx.min(rect.dy);
        let mut best = f64::INFINITY;
        let mut next = 0;
        while next < cells.len() {
            row.push(cells[next]);
            let score = row.worst(u, self.ratio);
            if score <= best {
                next += 1;
                best = score;
            } else {
                row.pop();
                row.position(u, &mut rect, false, rects);
                u = rect.dx.min(rect.dy);
                row.clear();
                best = f64::INFINITY;
            }
        }
        if !row.cells.is_empty() {
            row.position(u, &mut rect, true, rects);
        }
    }
}

impl HierarchyLayout for TreemapLayout {
    fn layout(&self, tree: &Hierarchy, viewport: Size, focal: NodeId) -> Vec<LayoutNode> {
        let rects = self.rects(tree, viewport);
        let focal = tree.or_root(focal);
        let visible = visibility_mask(tree, focal, self.max_visible_levels);
        let on_path = tree.path_mask(focal);
        let mut out: Vec<(f64, LayoutNode)> = tree
            .iter()
            .filter(|(id, _)| visible[id.0])
            .map(|(id, node)| {
                let item = LayoutNode {
                    id,
                    depth: node.depth,
                    distance: tree.distance_with_mask(id, &on_path),
                    geom: Geometry::Partition(rects[id.0]),
                };
                (node.value, item)
            })
            .collect();
        out.sort_by(|(va, a), (vb, b)| a.depth.cmp(&b.depth).then(vb.total_cmp(va)));
        out.into_iter().map(|(_, item)| item).collect()
    }
}

/// Insets `rect` by `p` on every side, collapsing onto the centre when too small.
fn pad(rect: Partition, p: f64) -> Partition {
    let mut x = rect.x + p;
    let mut y = rect.y + p;
    let mut dx = rect.dx - 2.0 * p;
    let mut dy = rect.dy - 2.0 * p;
    if dx < 0.0 {
        x += dx / 2.0;
        dx = 0.0;
    }
    if dy < 0.0 {
        y += dy / 2.0;
        dy = 0.0;
    }
    Partition::new(x, y, dx, dy)
}

#[derive(Clone, Copy, Debug)]
struct Cell {
    id: NodeId,
    area: f64,
}

#[derive(Debug, Default)]
struct Row {
    cells: Vec<Cell>,
    area: f64,
}

impl Row {
    fn push(&mut self, cell: Cell) {
        self.area += cell.area;
        self.cells.push(cell);
    }

    fn pop(&mut self) {
        if let Some(cell) = self.cells.pop() {
            self.area -= cell.area;
        }
    }

    fn clear(&mut self) {
        self.cells.clear();
        self.area = 0.0;
    }

    /// Worst aspect ratio of the row when laid along a side of length `u`.
    fn worst(&self, u: f64, ratio: f64) -> f64 {
        let mut rmin = f64::INFINITY;
        let mut rmax = 0.0_f64;
        for cell in self.cells.iter().filter(|c| c.area > 0.0) {
            rmin = rmin.min(cell.area);
            rmax = rmax.max(cell.area);
        }
        let s = self.area * self.area;
        let u = u * u;
        if s == 0.0 {
            return f64::INFINITY;
        }
        (u * rmax * ratio / s).max(s / (u * rmin * ratio))
    }

    /// Places the row along the side `u` of `rect` and removes its strip from `rect`.
    fn position(&self, u: f64, rect: &mut Partition, flush: bool, out: &mut [Partition]) {
        let mut v = if u > 0.0 { self.area / u } else { 0.0 };
        let mut x = rect.x;
        let mut y = rect.y;
        let Some(last) = self.cells.last() else {
            return;
        };
        if u == rect.dx {
            if flush || v > rect.dy {
                v = rect.dy;
            }
            for cell in &self.cells {
                let dx = (rect.x + rect.dx - x).min(if v > 0.0 { cell.area / v } else { 0.0 });
                out[cell.id.0] = Partition::new(x, y, dx, v);
                x += dx;
            }
            // Absorb rounding error in the last cell.
            out[last.id.0].dx += rect.x + rect.dx - x;
            rect.y += v;
            rect.dy -= v;
        } else {
            if flush || v > rect.dx {
                v = rect.dx;
            }
            for cell in &self.cells {
                let dy = (rect.y + rect.dy - y).min(if v > 0.0 { cell.area / v } else { 0.0 });
                out[cell.id.0] = Partition::new(x, y, v, dy);
                y += dy;
            }
            out[last.id.0].dy += rect.y + rect.dy - y;
            rect.x += v;
            rect.dx -= v;
        }
    }
}
