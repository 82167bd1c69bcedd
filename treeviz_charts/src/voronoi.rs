// Copyright 2025 the TreeViz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Voronoi map of precomputed leaf regions.
//!
//! Regions come with the data and are only scaled to the viewport. Cells inherit the nearest
//! explicit colour up the tree and get lighter with depth. There is no zoom animation; a double
//! tap on a cell reports it so the host can publish it as the zoom target.

extern crate alloc;

use alloc::sync::Arc;
use alloc::vec::Vec;

use kurbo::{Point, Size};
use peniko::Color;
use peniko::color::{Hsl, Srgb};
use treeviz_core::{
    Geometry, GroupShape, LayoutItem, Paint, Placement, Projector, Scene, Shape, ShapeKind,
    TextMeasurer, TextShape, Visual,
};
use treeviz_hierarchy::{Hierarchy, HierarchyLayout, NodeId, VoronoiLayout};

use crate::options::VisualizationOptions;
use crate::visualization::{Canvas, Visualization};

/// Fill of cells without a coloured ancestor.
const BASE_COLOR: Color = Color::from_rgb8(0xe0, 0xd3, 0xc1);

/// Lightness factor applied once per level below the first two.
const BRIGHTEN: f32 = 1.707_469_4;

/// Longest gap between two taps that still counts as a double tap, in milliseconds.
pub const DOUBLE_TAP_MS: f64 = 500.0;

/// Draws region polygons as given; labels are never shown.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct VoronoiProjector;

impl Projector for VoronoiProjector {
    fn body_kind(&self) -> ShapeKind {
        ShapeKind::Polygon
    }

    fn collapse(&self, _parent: Option<&Visual>, own: &Visual) -> Visual {
        own.clone().with_opacity(0.0)
    }

    fn place_group(&self, _at: &Placement<'_>, group: &mut GroupShape) {
        group.left = 0.0;
        group.top = 0.0;
    }

    fn place_body(&self, at: &Placement<'_>, body: &mut Shape) {
        if let (Geometry::Polygon(points), Shape::Polygon(poly)) = (&at.visual.geom, body) {
            poly.points.clone_from(points);
        }
    }

    fn place_label(&self, _at: &Placement<'_>, _label: &mut TextShape) -> bool {
        false
    }
}

/// Colour of `id`: its nearest pinned colour (itself included), lightened by depth.
fn cell_color(tree: &Hierarchy, id: NodeId) -> Color {
    let base = core::iter::once(id)
        .chain(tree.ancestors(id))
        .filter_map(|a| tree.node(a))
        .find(|n| n.pinned)
        .map_or(BASE_COLOR, |n| n.color);
    let steps = tree.node(id).map_or(0, |n| n.depth.saturating_sub(2));
    brighten(base, steps)
}

/// Multiplies HSL lightness by [`BRIGHTEN`] `steps` times.
fn brighten(color: Color, steps: usize) -> Color {
    if steps == 0 {
        return color;
    }
    let mut hsl = color.convert::<Hsl>();
    for _ in 0..steps {
        hsl.components[2] = (hsl.components[2] * BRIGHTEN).min(100.0);
    }
    hsl.convert::<Srgb>()
}

/// A Voronoi map.
#[derive(Debug)]
pub struct Voronoi {
    canvas: Canvas,
    layout: VoronoiLayout,
    duration: f64,
    last_tap: Option<f64>,
}

impl Voronoi {
    /// Creates an uninitialized Voronoi map.
    pub fn new(options: &VisualizationOptions, measurer: Arc<dyn TextMeasurer>) -> Self {
        Self {
            canvas: Canvas::new(measurer, options.text_style()),
            layout: VoronoiLayout::new(options.hierarchy.region_space),
            duration: options.duration,
            last_tap: None,
        }
    }

    fn render(&mut self, tree: &Hierarchy, focal: NodeId, duration: f64) {
        if !self.canvas.is_open() {
            tracing::debug!("voronoi render before init");
            return;
        }
        let nodes = self.layout.layout(tree, self.canvas.size, focal);
        let mut items = Vec::with_capacity(nodes.len());
        let mut ids = Vec::with_capacity(nodes.len());
        for n in &nodes {
            let Some(node) = tree.node(n.id) else {
                continue;
            };
            items.push(
                LayoutItem::new(tree.key(n.id), n.geom.clone())
                    .with_parent(node.parent.map(|p| tree.key(p)))
                    .with_depth(node.depth)
                    .with_fill(Paint::from_color(cell_color(tree, n.id)))
                    .with_label(node.name.as_str(), false)
                    .with_interactive(true),
            );
            ids.push(n.id);
        }
        self.canvas.index(&items, &ids);
        if let Some(engine) = self.canvas.engine.as_mut() {
            engine.reconcile(&items, None, duration, &VoronoiProjector);
        }
    }
}

impl Visualization for Voronoi {
    fn name(&self) -> &str {
        "voronoi"
    }

    fn init(&mut self, tree: &Hierarchy, focal: NodeId, size: Size) {
        if self.canvas.open("voronoi", size, &VoronoiProjector) {
            self.render(tree, focal, 0.0);
        }
    }

    fn update(&mut self, tree: &Hierarchy, focal: NodeId) {
        self.render(tree, focal, self.duration);
    }

    fn zoom(&mut self, _tree: &Hierarchy, focal: NodeId) {
        tracing::trace!(node = focal.0, "voronoi does not zoom");
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
        self.last_tap = None;
    }

    fn tick(&mut self, now: f64) {
        self.canvas.tick(now, &VoronoiProjector);
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

    /// Only the second of two taps within [`DOUBLE_TAP_MS`] resolves to a node.
    fn tap(&mut self, _tree: &Hierarchy, pt: Point, now: f64) -> Option<NodeId> {
        let hit = self.node_at(pt)?;
        let double = self.last_tap.is_some_and(|last| now - last < DOUBLE_TAP_MS);
        self.last_tap = Some(now);
        double.then_some(hit)
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use serde_json::json;
    use treeviz_core::{HeuristicTextMeasurer, NodeKey, to_hex};
    use treeviz_hierarchy::{HierarchyConfig, normalize};

    use super::*;

    fn tree() -> Hierarchy {
        normalize(
            &json!({ "name": "map", "children": [
                { "name": "west", "color": "#ff0000", "coords": ["0,0", "300,0", "300,600", "0,600"],
                  "children": [
                      { "name": "w1", "coords": ["0,0", "300,0", "300,300", "0,300"] },
                      { "name": "w2", "children": [
                          { "name": "w2a", "coords": ["0,300", "300,300", "300,600", "0,600"] }
                      ] }
                  ] },
                { "name": "east", "coords": ["300,0", "600,0", "600,600", "300,600"] }
            ] }),
            &HierarchyConfig::default(),
        )
    }

    fn voronoi() -> Voronoi {
        Voronoi::new(&VisualizationOptions::new("voronoi"), Arc::new(HeuristicTextMeasurer))
    }

    fn fill(map: &Voronoi, key: &str) -> Color {
        let engine = map.canvas.engine.as_ref().unwrap();
        let id = engine.object_for(&NodeKey::new(key)).unwrap();
        let (body, _) = engine.parts_of(id).unwrap();
        engine.scene().get(body).unwrap().shape.fill().unwrap()
    }

    #[test]
    fn leaves_inherit_and_lighten_colours() {
        let tree = tree();
        let mut map = voronoi();
        map.init(&tree, tree.root(), Size::new(300.0, 300.0));
        let engine = map.canvas.engine.as_ref().unwrap();
        assert_eq!(engine.live_nodes(), 3, "only leaves are drawn");

        assert_eq!(to_hex(fill(&map, "map > east")), "#e0d3c1");
        assert_eq!(to_hex(fill(&map, "map > west > w1")), "#ff0000");
        // One level deeper: lightness goes from 50% to about 85%.
        let w2a = fill(&map, "map > west > w2 > w2a");
        assert_eq!(w2a, brighten(Color::from_rgb8(0xff, 0, 0), 1));
        assert_eq!(to_hex(w2a), "#ffb4b4");
    }

    #[test]
    fn regions_scale_to_the_viewport() {
        let tree = tree();
        let mut map = voronoi();
        map.init(&tree, tree.root(), Size::new(300.0, 300.0));
        let engine = map.canvas.engine.as_ref().unwrap();
        let id = engine.object_for(&NodeKey::new("map > east")).unwrap();
        let (body, _) = engine.parts_of(id).unwrap();
        let Shape::Polygon(poly) = &engine.scene().get(body).unwrap().shape else {
            panic!("expected polygon");
        };
        assert_eq!(poly.points[1], Point::new(300.0, 0.0));
        assert_eq!(poly.points[3], Point::new(150.0, 300.0));

        map.resize(&tree, tree.root(), Size::new(600.0, 600.0));
        assert!(!map.is_animating());
        let engine = map.canvas.engine.as_ref().unwrap();
        let Shape::Polygon(poly) = &engine.scene().get(body).unwrap().shape else {
            panic!("expected polygon");
        };
        assert_eq!(poly.points[3], Point::new(300.0, 600.0));
    }

    #[test]
    fn double_tap_selects_and_zoom_is_ignored() {
        let tree = tree();
        let mut map = voronoi();
        map.init(&tree, tree.root(), Size::new(600.0, 600.0));
        let inside = Point::new(450.0, 300.0);
        let east = tree.resolve_path(&[1]).ok();

        assert_eq!(map.tap(&tree, inside, 0.0), None);
        assert_eq!(map.tap(&tree, inside, 200.0), east);
        assert_eq!(map.tap(&tree, inside, 900.0), None);
        assert_eq!(map.tap(&tree, Point::new(-5.0, -5.0), 950.0), None);

        let before = map.scene().unwrap().len();
        map.zoom(&tree, east.unwrap());
        assert!(!map.is_animating());
        assert_eq!(map.scene().unwrap().len(), before);
    }
}
