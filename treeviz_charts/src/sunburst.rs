// Copyright 2025 the TreeViz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Zoomable sunburst.
//!
//! Partition space is `[0, 1]` on both axes. The view maps `x` onto angles in `[0, 2π]` and
//! `y` (depth bands) onto radii, so zooming is a view tween: the focal node's angular span opens
//! up to the full circle and its band moves towards the centre.
//!
//! Radii are uniform by default. With per-level fractions configured, every visible depth gets
//! its own band width and the `y` scale becomes piecewise.

extern crate alloc;

use alloc::sync::Arc;
use alloc::vec::Vec;

use core::f64::consts::{FRAC_PI_2, PI, TAU};

use kurbo::{Point, Size, Vec2};
use treeviz_core::{
    Geometry, GroupShape, LayoutItem, Paint, Partition, Placement, Projector, ScaleLinear,
    ScaleStops, Scene, Shape, ShapeKind, TextAnchor, TextBaseline, TextMeasurer, TextShape,
    ViewScales, Visual,
};
use treeviz_hierarchy::{Hierarchy, HierarchyLayout, NodeId, PartitionLayout, cur_max_level};

use crate::options::VisualizationOptions;
use crate::visualization::{Canvas, Visualization};

/// Projects partition rectangles onto annular sectors around the canvas centre.
#[derive(Clone, Debug, PartialEq)]
pub struct SunburstProjector {
    /// Canvas centre; every group is placed here.
    pub center: Point,
    /// Show labels regardless of fit.
    pub allow_text_overflow: bool,
    /// Rotate labels along their arc.
    pub rotated_text: bool,
}

/// Angles and radii of one sector, clamped to drawable values.
#[derive(Clone, Copy, Debug)]
struct Sector {
    start: f64,
    end: f64,
    inner: f64,
    outer: f64,
}

impl Sector {
    fn of(view: &ViewScales, p: &Partition) -> Self {
        Self {
            start: view.x.map(p.x).clamp(0.0, TAU),
            end: view.x.map(p.x + p.dx).clamp(0.0, TAU),
            inner: view.y.map(p.y).max(0.0),
            outer: view.y.map(p.y + p.dy).max(0.0),
        }
    }
}

impl Projector for SunburstProjector {
    fn body_kind(&self) -> ShapeKind {
        ShapeKind::Arc
    }

    /// Children grow out of, and shrink back into, the outer edge of their parent.
    fn collapse(&self, parent: Option<&Visual>, own: &Visual) -> Visual {
        let geom = match (&own.geom, parent.map(|p| &p.geom)) {
            (Geometry::Partition(o), Some(Geometry::Partition(p))) => {
                Geometry::Partition(Partition::new(o.x, p.y + p.dy, o.dx, 0.0))
            }
            (Geometry::Partition(o), _) => Geometry::Partition(Partition::new(o.x, o.y, o.dx, 0.0)),
            (other, _) => other.clone(),
        };
        Visual { geom, opacity: 0.0 }
    }

    fn place_group(&self, _at: &Placement<'_>, group: &mut GroupShape) {
        group.left = self.center.x;
        group.top = self.center.y;
    }

    fn place_body(&self, at: &Placement<'_>, body: &mut Shape) {
        if let (Geometry::Partition(p), Shape::Arc(arc)) = (&at.visual.geom, body) {
            let s = Sector::of(at.view, p);
            arc.start_angle = s.start;
            arc.end_angle = s.end;
            arc.inner_radius = s.inner;
            arc.outer_radius = s.outer;
        }
    }

    fn place_label(&self, at: &Placement<'_>, label: &mut TextShape) -> bool {
        let Geometry::Partition(p) = &at.visual.geom else {
            return false;
        };
        let s = Sector::of(at.view, p);
        let arc_width = (s.end - s.start) * s.inner;
        let (w, h) = label.extent;

        let rad = at.view.x.map(p.x + p.dx / 2.0);
        let offset = at.view.y.map(p.y) + 2.0;
        let pos = Vec2::from_angle(rad - FRAC_PI_2) * offset;
        label.left = pos.x;
        label.top = pos.y;

        let mut angle = rad.to_degrees() - 90.0;
        let fits = if at.focal {
            angle -= 90.0;
            label.anchor = TextAnchor::Middle;
            label.baseline = TextBaseline::Hanging;
            s.outer - s.inner - 4.0 >= h && (arc_width - 2.0 >= w || s.inner < 1.0)
        } else {
            // Keep text on the left half upright.
            if angle > 90.0 {
                angle = (angle + 180.0) % 360.0;
            }
            label.anchor = if rad > PI {
                TextAnchor::End
            } else {
                TextAnchor::Start
            };
            label.baseline = TextBaseline::Middle;
            s.outer - s.inner - 4.0 >= w && arc_width - 2.0 >= h
        };
        label.angle = if self.rotated_text { angle } else { 0.0 };
        self.allow_text_overflow || fits
    }
}

/// Band fractions for the banded radius mode.
#[derive(Clone, Debug, PartialEq)]
struct Bands {
    levels: Vec<f64>,
    fr: f64,
    parent_fr: f64,
}

impl Bands {
    /// Cumulative band edges in pixels, one per depth boundary, starting at 0.
    ///
    /// Only the focal node's parent band (weighted by `parent_fr`) and the bands from the focal
    /// depth to `cur_max` have width; every other depth collapses to a zero-width band.
    fn radii(&self, focal_depth: usize, cur_max: usize, max_depth: usize, radius: f64) -> Vec<f64> {
        let n = self.levels.len().max(max_depth + 1);
        let mut edges = Vec::with_capacity(n + 1);
        edges.push(0.0);
        let mut sum = 0.0;
        for i in 0..n {
            let weight = self.levels.get(i).copied().unwrap_or(self.fr);
            if focal_depth >= 1 && i == focal_depth - 1 {
                sum += self.parent_fr;
            } else if i + 1 > focal_depth && i <= cur_max {
                sum += weight;
            }
            edges.push(sum);
        }
        if sum > 0.0 {
            for edge in &mut edges[1..] {
                *edge = *edge / sum * radius;
            }
        }
        edges
    }
}

/// Evenly spaced domain stops matching `range`.
fn band_domain(range: &[f64]) -> Vec<f64> {
    let last = range.len().saturating_sub(1).max(1) as f64;
    (0..range.len()).map(|i| i as f64 / last).collect()
}

/// A zoomable sunburst.
#[derive(Debug)]
pub struct Sunburst {
    canvas: Canvas,
    layout: PartitionLayout,
    projector: SunburstProjector,
    bands: Option<Bands>,
    label_fill: Paint,
    duration: f64,
}

impl Sunburst {
    /// Creates an uninitialized sunburst.
    pub fn new(options: &VisualizationOptions, measurer: Arc<dyn TextMeasurer>) -> Self {
        Self {
            canvas: Canvas::new(measurer, options.text_style()),
            layout: PartitionLayout::new()
                .with_sort_by(options.sort_by)
                .with_max_visible_levels(options.max_visible_levels),
            projector: SunburstProjector {
                center: Point::ORIGIN,
                allow_text_overflow: options.allow_text_overflow,
                rotated_text: options.enable_rotated_text,
            },
            bands: options.levels_fr.as_ref().map(|levels| Bands {
                levels: levels.clone(),
                fr: options.fr,
                parent_fr: options.parent_fr,
            }),
            label_fill: options.label_paint(),
            duration: options.duration,
        }
    }

    /// Returns the projector.
    pub fn projector(&self) -> &SunburstProjector {
        &self.projector
    }

    fn radius(&self) -> f64 {
        self.canvas.size.width.min(self.canvas.size.height) / 2.0
    }

    /// View scales that zoom onto `p`, the focal node's partition cell.
    fn zoom_view(
        &self,
        p: &Partition,
        focal_depth: usize,
        cur_max: usize,
        max_depth: usize,
    ) -> ViewScales {
        let radius = self.radius();
        let x = ScaleLinear::new((p.x, p.x + p.dx), (0.0, TAU));
        let y = match &self.bands {
            Some(bands) => {
                let range = bands.radii(focal_depth, cur_max, max_depth, radius);
                ScaleStops::new(band_domain(&range), range)
            }
            None => {
                let inner = if p.y > 0.0 { p.dy * radius / 2.0 } else { 0.0 };
                let outer_domain = (cur_max + 1) as f64 / (max_depth + 1) as f64;
                ScaleStops::linear((p.y, outer_domain), (inner, radius))
            }
        };
        ViewScales::new(x, y)
    }

    fn render(&mut self, tree: &Hierarchy, focal: NodeId, duration: f64) {
        if !self.canvas.is_open() {
            tracing::debug!("sunburst render before init");
            return;
        }
        let focal = tree.or_root(focal);
        let nodes = self.layout.layout(tree, self.canvas.size, focal);

        let mut zoomed = Partition::new(0.0, 0.0, 1.0, 1.0);
        let mut items = Vec::with_capacity(nodes.len());
        let mut ids = Vec::with_capacity(nodes.len());
        for n in &nodes {
            let Some(node) = tree.node(n.id) else {
                continue;
            };
            if n.id == focal
                && let Geometry::Partition(p) = &n.geom
            {
                zoomed = *p;
            }
            items.push(
                LayoutItem::new(tree.key(n.id), n.geom.clone())
                    .with_parent(node.parent.map(|p| tree.key(p)))
                    .with_depth(node.depth)
                    .with_fill(Paint::from_color(node.color))
                    .with_label(node.name.as_str(), true)
                    .with_label_fill(self.label_fill)
                    .with_interactive(true),
            );
            ids.push(n.id);
        }
        self.canvas.index(&items, &ids);

        let focal_depth = tree.node(focal).map_or(0, |n| n.depth);
        let cur_max = cur_max_level(tree, focal, self.layout.max_visible_levels);
        let view = self.zoom_view(&zoomed, focal_depth, cur_max, tree.max_depth());
        let size = self.canvas.size;
        self.projector.center = Point::new(size.width / 2.0, size.height / 2.0);

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

impl Visualization for Sunburst {
    fn name(&self) -> &str {
        "sunburst"
    }

    fn init(&mut self, tree: &Hierarchy, focal: NodeId, size: Size) {
        if self.canvas.open("sunburst", size, &self.projector) {
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
}

#[cfg(test)]
mod tests {
    extern crate std;

    use alloc::vec;

    use serde_json::json;
    use treeviz_core::{ArcShape, HeuristicTextMeasurer, NodeKey, TextStyle, to_hex};
    use treeviz_hierarchy::{HierarchyConfig, normalize};

    use super::*;

    fn sunburst(options: &VisualizationOptions) -> Sunburst {
        Sunburst::new(options, Arc::new(HeuristicTextMeasurer))
    }

    fn arc(burst: &Sunburst, key: &str) -> ArcShape {
        let engine = burst.canvas.engine.as_ref().unwrap();
        let id = engine.object_for(&NodeKey::new(key)).unwrap();
        let (body, _) = engine.parts_of(id).unwrap();
        match &engine.scene().get(body).unwrap().shape {
            Shape::Arc(a) => a.clone(),
            _ => panic!("expected arc"),
        }
    }

    fn three_levels() -> Hierarchy {
        normalize(
            &json!({ "name": "root", "children": [
                { "name": "a", "area": 1, "children": [{ "name": "a1", "area": 1 }] },
                { "name": "b", "area": 1 }
            ] }),
            &HierarchyConfig::default(),
        )
    }

    #[test]
    fn only_child_spans_the_whole_ring() {
        let tree = normalize(
            &json!({ "name": "root", "children": [{ "name": "all", "area": 5 }] }),
            &HierarchyConfig::default(),
        );
        let mut burst = sunburst(&VisualizationOptions::new("sunburst"));
        burst.init(&tree, tree.root(), Size::new(200.0, 100.0));
        let all = arc(&burst, "root > all");
        assert_eq!(all.start_angle, 0.0);
        assert!((all.end_angle - TAU).abs() < 1e-12);
        assert!((all.inner_radius - 25.0).abs() < 1e-12);
        assert!((all.outer_radius - 50.0).abs() < 1e-12);
        assert_eq!(burst.projector().center, Point::new(100.0, 50.0));
    }

    #[test]
    fn labels_use_the_configured_font_color() {
        let tree = normalize(
            &json!({ "name": "root", "children": [{ "name": "all", "area": 5 }] }),
            &HierarchyConfig::default(),
        );
        let options = VisualizationOptions::new("sunburst").with_font_color("#ff0000");
        let mut burst = sunburst(&options);
        burst.init(&tree, tree.root(), Size::new(200.0, 100.0));
        let engine = burst.canvas.engine.as_ref().unwrap();
        let id = engine.object_for(&NodeKey::new("root > all")).unwrap();
        let (_, label) = engine.parts_of(id).unwrap();
        let Shape::Text(text) = &engine.scene().get(label).unwrap().shape else {
            panic!("expected text");
        };
        assert_eq!(to_hex(text.fill), "#ff0000");
    }

    #[test]
    fn zoom_opens_the_focal_span() {
        let tree = three_levels();
        let mut burst = sunburst(&VisualizationOptions::new("sunburst"));
        burst.init(&tree, tree.root(), Size::new(300.0, 300.0));
        let a = tree.resolve_path(&[0]).unwrap();
        burst.zoom(&tree, a);
        burst.tick(500.0);
        assert!(burst.is_animating());
        burst.tick(1000.0);

        let a_arc = arc(&burst, "root > a");
        assert!(a_arc.start_angle.abs() < 1e-9);
        assert!((a_arc.end_angle - TAU).abs() < 1e-9);
        // The focal band starts at half its own width.
        assert!((a_arc.inner_radius - 25.0).abs() < 1e-9);
        let b_arc = arc(&burst, "root > b");
        assert_eq!(b_arc.start_angle, b_arc.end_angle);

        // Taps zoom to the node under the pointer.
        let hit = burst.tap(&tree, Point::new(270.0, 150.0), 1000.0);
        assert_eq!(hit, tree.resolve_path(&[0, 0]).ok());
    }

    #[test]
    fn banded_radii_follow_the_configured_fractions() {
        let bands = Bands {
            levels: vec![1.0, 2.0],
            fr: 1.0,
            parent_fr: 0.5,
        };
        assert_eq!(bands.radii(0, 2, 2, 100.0), vec![0.0, 25.0, 75.0, 100.0]);
        // Zoomed one level in: the root band shrinks to the parent fraction.
        let zoomed = bands.radii(1, 2, 2, 70.0);
        for (got, want) in zoomed.iter().zip([0.0, 10.0, 50.0, 70.0]) {
            assert!((got - want).abs() < 1e-9, "{zoomed:?}");
        }
        assert_eq!(band_domain(&[0.0, 1.0, 2.0]), vec![0.0, 0.5, 1.0]);

        let tree = three_levels();
        let options =
            VisualizationOptions::new("sunburst").with_levels_fr(vec![1.0, 2.0], 1.0, 0.5);
        let mut burst = sunburst(&options);
        burst.init(&tree, tree.root(), Size::new(200.0, 200.0));
        let root = arc(&burst, "root");
        assert!((root.outer_radius - 25.0).abs() < 1e-9);
        let a1 = arc(&burst, "root > a > a1");
        assert!((a1.inner_radius - 75.0).abs() < 1e-9);
        assert!((a1.outer_radius - 100.0).abs() < 1e-9);
    }

    #[test]
    fn label_placement_and_fit() {
        let view = ViewScales::new(
            ScaleLinear::new((0.0, 1.0), (0.0, TAU)),
            ScaleStops::linear((0.0, 1.0), (0.0, 100.0)),
        );
        let projector = SunburstProjector {
            center: Point::ORIGIN,
            allow_text_overflow: false,
            rotated_text: true,
        };
        // A wedge on the left half, centred at 270°.
        let visual = Visual::opaque(Geometry::Partition(Partition::new(0.5, 0.5, 0.5, 0.5)));
        let at = Placement {
            view: &view,
            visual: &visual,
            depth: 1,
            focal: false,
        };
        let Shape::Text(mut label) = Shape::text("label".into(), TextStyle::default(), (20.0, 8.0))
        else {
            panic!("expected text");
        };
        assert!(projector.place_label(&at, &mut label));
        assert_eq!(label.anchor, TextAnchor::End);
        assert!((label.angle - 0.0).abs() < 1e-9);
        assert!((label.left - -52.0).abs() < 1e-9);
        assert!(label.top.abs() < 1e-9);

        label.extent = (60.0, 8.0);
        assert!(!projector.place_label(&at, &mut label));
        let overflow = SunburstProjector {
            allow_text_overflow: true,
            ..projector
        };
        assert!(overflow.place_label(&at, &mut label));
    }
}
