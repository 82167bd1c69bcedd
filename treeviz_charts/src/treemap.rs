// Copyright 2025 the TreeViz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Zoomable squarified treemap.
//!
//! The layout is computed once per viewport in pixels; zooming tweens the view scales so the
//! focal node's rectangle fills the viewport. Nodes deeper than the visible-depth limit are
//! culled. Expanded parents are drawn in a grey ramp by depth and only the remaining
//! ("leaf-like") nodes carry labels and respond to taps, which zoom out to their parent.

extern crate alloc;

use alloc::sync::Arc;
use alloc::vec::Vec;

use kurbo::{Point, Size};
use peniko::Color;
use treeviz_core::{
    Geometry, GroupShape, LayoutItem, Paint, Partition, Placement, Projector, ScaleLinear,
    ScaleStops, Scene, Shape, ShapeKind, TextAnchor, TextBaseline, TextMeasurer, TextShape,
    ViewScales, Visual, lerp_color,
};
use treeviz_hierarchy::{Hierarchy, HierarchyLayout, NodeId, TreemapLayout, cur_max_level};

use crate::options::VisualizationOptions;
use crate::visualization::{Canvas, Visualization};

/// Fill of the shallowest expanded parent.
const PARENT_DARK: Color = Color::from_rgb8(0x88, 0x88, 0x88);

/// Maps treemap pixel rectangles through the current view scales.
#[derive(Clone, Debug, PartialEq)]
pub struct TreemapProjector {
    /// Inset subtracted from drawn width and height.
    pub spacing: f64,
    /// Show labels regardless of fit.
    pub allow_text_overflow: bool,
}

/// Returns the on-screen width and height of `p`.
fn extent(view: &ViewScales, p: &Partition) -> (f64, f64) {
    (
        view.x.map(p.x + p.dx) - view.x.map(p.x),
        view.y.map(p.y + p.dy) - view.y.map(p.y),
    )
}

impl Projector for TreemapProjector {
    fn body_kind(&self) -> ShapeKind {
        ShapeKind::Rect
    }

    fn collapse(&self, parent: Option<&Visual>, own: &Visual) -> Visual {
        let c = parent.unwrap_or(own).geom.center();
        Visual {
            geom: Geometry::Partition(Partition::new(c.x, c.y, 0.0, 0.0)),
            opacity: 0.0,
        }
    }

    fn place_group(&self, at: &Placement<'_>, group: &mut GroupShape) {
        if let Geometry::Partition(p) = &at.visual.geom {
            group.left = at.view.x.map(p.x);
            group.top = at.view.y.map(p.y);
        }
    }

    fn place_body(&self, at: &Placement<'_>, body: &mut Shape) {
        if let (Geometry::Partition(p), Shape::Rect(rect)) = (&at.visual.geom, body) {
            let (w, h) = extent(at.view, p);
            rect.left = 0.0;
            rect.top = 0.0;
            rect.width = (w - self.spacing).max(0.0);
            rect.height = (h - self.spacing).max(0.0);
        }
    }

    fn place_label(&self, at: &Placement<'_>, label: &mut TextShape) -> bool {
        let Geometry::Partition(p) = &at.visual.geom else {
            return false;
        };
        let (w, h) = extent(at.view, p);
        label.left = w / 2.0;
        label.top = h / 2.0;
        label.angle = 0.0;
        label.anchor = TextAnchor::Middle;
        label.baseline = TextBaseline::Middle;
        // Deeper labels need more slack: every level adds one inset.
        let slack = 2.0 * self.spacing * at.depth as f64;
        self.allow_text_overflow || (w - slack >= label.extent.0 && h - slack >= label.extent.1)
    }
}

/// A zoomable treemap.
#[derive(Debug)]
pub struct Treemap {
    canvas: Canvas,
    layout: TreemapLayout,
    projector: TreemapProjector,
    label_fill: Paint,
    duration: f64,
}

impl Treemap {
    /// Creates an uninitialized treemap.
    pub fn new(options: &VisualizationOptions, measurer: Arc<dyn TextMeasurer>) -> Self {
        Self {
            canvas: Canvas::new(measurer, options.text_style()),
            layout: TreemapLayout::new()
                .with_padding(options.spacing)
                .with_max_visible_levels(options.max_visible_levels),
            projector: TreemapProjector {
                spacing: options.spacing,
                allow_text_overflow: options.allow_text_overflow,
            },
            label_fill: options.label_paint(),
            duration: options.duration,
        }
    }

    /// Returns the projector.
    pub fn projector(&self) -> &TreemapProjector {
        &self.projector
    }

    fn render(&mut self, tree: &Hierarchy, focal: NodeId, duration: f64) {
        if !self.canvas.is_open() {
            tracing::debug!("treemap render before init");
            return;
        }
        let focal = tree.or_root(focal);
        let size = self.canvas.size;
        let nodes = self.layout.layout(tree, size, focal);
        let cur_max = cur_max_level(tree, focal, self.layout.max_visible_levels);
        let max_depth = tree.max_depth();

        let mut zoomed = Partition::new(0.0, 0.0, size.width, size.height);
        let mut items = Vec::with_capacity(nodes.len());
        let mut ids = Vec::with_capacity(nodes.len());
        for n in &nodes {
            let (Some(node), Geometry::Partition(rect)) = (tree.node(n.id), &n.geom) else {
                continue;
            };
            if n.id == focal {
                zoomed = *rect;
            }
            let expanded = node.has_children() && node.depth < cur_max;
            let fill = if expanded {
                Paint::from_color(parent_fill(node.depth, max_depth))
            } else {
                Paint::from_color(node.color)
            };
            items.push(
                LayoutItem::new(tree.key(n.id), n.geom.clone())
                    .with_parent(node.parent.map(|p| tree.key(p)))
                    .with_depth(node.depth)
                    .with_fill(fill)
                    .with_label(node.name.as_str(), !expanded)
                    .with_label_fill(self.label_fill)
                    .with_interactive(!expanded),
            );
            ids.push(n.id);
        }
        self.canvas.index(&items, &ids);

        let view = zoom_view(&zoomed, size);
        let focal_key = tree.key(focal);
        let Some(engine) = self.canvas.engine.as_mut() else {
            return;
        };
        if duration > 0.0 {
            engine.tween_view(view, duration);
        } else {
            engine.set_view(view);
        }
        engine.reconcile(&items, Some(&focal_key), duration, &self.projector);
    }
}

/// Grey ramp for expanded parents, darkest at the root.
fn parent_fill(depth: usize, max_depth: usize) -> Color {
    let t = depth as f64 / max_depth.saturating_sub(1).max(1) as f64;
    lerp_color(PARENT_DARK, Color::WHITE, t.clamp(0.0, 1.0))
}

/// View scales that stretch `zoomed` over the whole viewport.
fn zoom_view(zoomed: &Partition, size: Size) -> ViewScales {
    let p = if zoomed.dx > 0.0 && zoomed.dy > 0.0 {
        *zoomed
    } else {
        Partition::new(0.0, 0.0, size.width.max(1.0), size.height.max(1.0))
    };
    ViewScales::new(
        ScaleLinear::new((p.x, p.x + p.dx), (0.0, size.width)),
        ScaleStops::linear((p.y, p.y + p.dy), (0.0, size.height)),
    )
}

impl Visualization for Treemap {
    fn name(&self) -> &str {
        "treemap"
    }

    fn init(&mut self, tree: &Hierarchy, focal: NodeId, size: Size) {
        if self.canvas.open("treemap", size, &self.projector) {
            self.render(tree, focal, 0.0);
        }
    }

    fn update(&mut self, tree: &Hierarchy, focal: NodeId) {
        self.render(tree, focal, self.duration);
    }

    fn zoom(&mut self, tree: &Hierarchy, focal: NodeId) {
        self.render(tree, focal, self.duration);
    }

    fn resize(&mut self, tree: &Hierarchy, focal: NodeId, size: Size) {
        if !self.canvas.is_open() || self.canvas.size == size {
            return;
        }
        self.canvas.size = size;
        self.render(tree, focal, 0.0);
    }

    fn remove(&mut self) {
        self.canvas.close();
    }

    fn tick(&mut self, now: f64) {
        self.canvas.tick(now, &self.projector);
    }

    fn is_animating(&self) -> bool {
        self.canvas.is_animating()
    }

    fn scene(&self) -> Option<&Scene> {
        self.canvas.scene()
    }

    fn node_at(&self, pt: Point) -> Option<NodeId> {
        self.canvas.node_at(pt)
    }

    /// Taps on leaf-like nodes zoom out to their parent.
    fn tap(&mut self, tree: &Hierarchy, pt: Point, _now: f64) -> Option<NodeId> {
        let hit = self.node_at(pt)?;
        Some(tree.node(hit)?.parent.unwrap_or_else(|| tree.root()))
    }
}
