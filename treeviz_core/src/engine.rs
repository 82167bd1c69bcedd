// Copyright 2025 the TreeViz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Identity-keyed scene reconciliation.
//!
//! [`Engine::reconcile`] diffs a freshly laid-out node list against the scene by [`NodeKey`]:
//!
//! - **enter**: keys new to the scene get a group (plus body and label) that grows out of its
//!   parent's position with opacity 0.
//! - **update**: keys already present tween from their last *rendered* visual to the new one.
//! - **exit**: keys missing from the new list collapse towards their parent, fade out, and are
//!   removed when that transition completes.
//!
//! All geometry lives in layout units. On every [`Engine::tick`] the visualization's
//! [`Projector`] maps each node's current visual through the current [`ViewScales`], so tweening
//! the view scales moves every node as one coherent zoom.

extern crate alloc;

use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;

use hashbrown::{HashMap, HashSet};
use kurbo::Point;
use peniko::Color;

use crate::color::Paint;
use crate::geometry::{Geometry, Visual};
use crate::measure::{TextMeasurer, TextStyle};
use crate::scale::{ScaleLinear, ScaleStops};
use crate::scene::{EventKind, Lifecycle, NodeKey, ObjectId, Scene};
use crate::shape::{GroupShape, Prop, PropValue, Shape, ShapeKind, TextShape};
use crate::tween::{
    EndAction, Easing, Sample, Timeline, Tween, TweenKind, TweenName, TweenTarget,
};
use crate::z_order;

/// The coordinate scales shared by every node of a visualization.
///
/// `x` is always linear. `y` is piecewise so sunbursts can map depth bands onto uneven radii.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ViewScales {
    /// First-axis scale (treemap x, sunburst angle).
    pub x: ScaleLinear,
    /// Second-axis scale (treemap y, sunburst radius).
    pub y: ScaleStops,
}

impl ViewScales {
    /// Creates view scales.
    pub fn new(x: ScaleLinear, y: ScaleStops) -> Self {
        Self { x, y }
    }

    /// Interpolates both scales.
    pub fn lerp(&self, other: &Self, t: f64) -> Self {
        Self {
            x: self.x.lerp(&other.x, t),
            y: self.y.lerp(&other.y, t),
        }
    }
}

/// One positioned node handed to [`Engine::reconcile`].
#[derive(Clone, Debug, PartialEq)]
pub struct LayoutItem {
    /// Identity key.
    pub key: NodeKey,
    /// Identity key of the parent, if it has one.
    pub parent: Option<NodeKey>,
    /// Tree depth.
    pub depth: usize,
    /// Target geometry in layout units.
    pub geom: Geometry,
    /// Target body paint.
    pub fill: Paint,
    /// Label text.
    pub label: String,
    /// Target label paint.
    pub label_fill: Paint,
    /// Whether the label may be shown at all.
    pub show_label: bool,
    /// Whether the body responds to taps.
    pub interactive: bool,
}

impl LayoutItem {
    /// Creates an item with a black, hidden label and no tap hook.
    pub fn new(key: NodeKey, geom: Geometry) -> Self {
        Self {
            key,
            parent: None,
            depth: 0,
            geom,
            fill: Paint::from_color(Color::BLACK),
            label: String::new(),
            label_fill: Paint::from_color(Color::BLACK),
            show_label: false,
            interactive: false,
        }
    }

    /// Sets the parent key.
    #[must_use]
    pub fn with_parent(mut self, parent: Option<NodeKey>) -> Self {
        self.parent = parent;
        self
    }

    /// Sets the depth.
    #[must_use]
    pub fn with_depth(mut self, depth: usize) -> Self {
        self.depth = depth;
        self
    }

    /// Sets the body paint.
    #[must_use]
    pub fn with_fill(mut self, fill: Paint) -> Self {
        self.fill = fill;
        self
    }

    /// Sets the label text and whether it may be shown.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>, show: bool) -> Self {
        self.label = label.into();
        self.show_label = show;
        self
    }

    /// Sets the label paint.
    #[must_use]
    pub fn with_label_fill(mut self, fill: Paint) -> Self {
        self.label_fill = fill;
        self
    }

    /// Sets whether the body responds to taps.
    #[must_use]
    pub fn with_interactive(mut self, interactive: bool) -> Self {
        self.interactive = interactive;
        self
    }
}

/// Inputs to one projection of a node.
#[derive(Clone, Copy, Debug)]
pub struct Placement<'a> {
    /// Current view scales.
    pub view: &'a ViewScales,
    /// Current node visual.
    pub visual: &'a Visual,
    /// Tree depth.
    pub depth: usize,
    /// Whether this node is the current focal node.
    pub focal: bool,
}

/// Maps layout-space visuals onto concrete shapes.
///
/// Each visualization provides one. The engine calls it for every live node on every frame.
pub trait Projector {
    /// The shape kind used for node bodies.
    fn body_kind(&self) -> ShapeKind;

    /// Returns the collapsed, transparent visual a node enters from or exits to.
    ///
    /// `parent` is the parent's visual when the parent is known.
    fn collapse(&self, parent: Option<&Visual>, own: &Visual) -> Visual;

    /// Positions the node group. Opacity is managed by the engine.
    fn place_group(&self, at: &Placement<'_>, group: &mut GroupShape);

    /// Sets body geometry. Fill and opacity are managed by the engine.
    fn place_body(&self, at: &Placement<'_>, body: &mut Shape);

    /// Positions the label and returns whether it fits inside the node.
    fn place_label(&self, at: &Placement<'_>, label: &mut TextShape) -> bool;
}

#[derive(Clone, Debug)]
struct NodeSlot {
    key: NodeKey,
    parent: Option<NodeKey>,
    body: ObjectId,
    label: ObjectId,
    depth: usize,
    focal: bool,
    show_label: bool,
    label_fill: Paint,
}

/// Counts of one [`Engine::reconcile`] pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ReconcileStats {
    /// Objects created.
    pub entered: usize,
    /// Objects retargeted.
    pub updated: usize,
    /// Objects sent to their exit transition.
    pub exited: usize,
}

/// Owns the scene and drives every transition on it.
pub struct Engine {
    scene: Scene,
    timeline: Timeline,
    index: HashMap<NodeKey, ObjectId>,
    nodes: HashMap<ObjectId, NodeSlot>,
    view: ViewScales,
    now: f64,
    easing: Easing,
    measurer: Arc<dyn TextMeasurer>,
    text_style: TextStyle,
}

impl core::fmt::Debug for Engine {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Engine")
            .field("objects", &self.scene.len())
            .field("nodes", &self.index.len())
            .field("tweens", &self.timeline.len())
            .field("now", &self.now)
            .finish_non_exhaustive()
    }
}

impl Engine {
    /// Creates an engine measuring labels with `measurer`.
    pub fn new(measurer: Arc<dyn TextMeasurer>) -> Self {
        Self {
            scene: Scene::new(),
            timeline: Timeline::new(),
            index: HashMap::new(),
            nodes: HashMap::new(),
            view: ViewScales::default(),
            now: 0.0,
            easing: Easing::default(),
            measurer,
            text_style: TextStyle::default(),
        }
    }

    /// Sets the label text style used for newly measured labels.
    #[must_use]
    pub fn with_text_style(mut self, style: TextStyle) -> Self {
        self.text_style = style;
        self
    }

    /// Sets the easing curve for all subsequently scheduled tweens.
    #[must_use]
    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    /// Returns the scene.
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Returns the current view scales.
    pub fn view(&self) -> &ViewScales {
        &self.view
    }

    /// Returns the engine clock in milliseconds.
    pub fn now(&self) -> f64 {
        self.now
    }

    /// Returns `true` while any tween is active.
    pub fn is_animating(&self) -> bool {
        !self.timeline.is_empty()
    }

    /// Returns the live (non-exiting) group for `key`.
    pub fn object_for(&self, key: &NodeKey) -> Option<ObjectId> {
        self.index.get(key).copied()
    }

    /// Returns the number of live (non-exiting) nodes.
    pub fn live_nodes(&self) -> usize {
        self.index.len()
    }

    /// Returns the last rendered visual of the live node for `key`.
    pub fn visual_of(&self, key: &NodeKey) -> Option<&Visual> {
        let id = self.index.get(key)?;
        self.scene.get(*id)?.old.as_ref()
    }

    /// Returns the node key an object belongs to.
    pub fn key_of(&self, id: ObjectId) -> Option<&NodeKey> {
        let obj = self.scene.get(id)?;
        let group = obj.parent.unwrap_or(id);
        self.nodes.get(&group).map(|slot| &slot.key)
    }

    /// Returns the body and label objects of the group `id`.
    pub fn parts_of(&self, id: ObjectId) -> Option<(ObjectId, ObjectId)> {
        self.nodes.get(&id).map(|slot| (slot.body, slot.label))
    }

    /// Returns the key of the top-most node body under `pt` listening for `kind`.
    pub fn hit(&self, pt: Point, kind: EventKind) -> Option<NodeKey> {
        let id = self.scene.hit(pt, kind)?;
        self.key_of(id).cloned()
    }

    /// Replaces the view scales immediately, cancelling any view tween.
    pub fn set_view(&mut self, view: ViewScales) {
        self.timeline.cancel(TweenTarget::View, TweenName::View);
        self.view = view;
    }

    /// Tweens the view scales from their current value to `to`.
    pub fn tween_view(&mut self, to: ViewScales, duration: f64) {
        let tween = Tween::new(
            TweenTarget::View,
            TweenName::View,
            self.now,
            duration,
            TweenKind::View {
                from: self.view.clone(),
                to,
            },
        )
        .with_easing(self.easing);
        self.timeline.schedule(tween);
    }

    /// Reconciles the scene against `items`.
    ///
    /// Enters are scheduled first, then updates, then exits. `focal` marks the node the view is
    /// centred on; its group is raised within its depth band. Shapes are projected at the
    /// current clock before returning, so the scene is renderable immediately.
    pub fn reconcile<P: Projector + ?Sized>(
        &mut self,
        items: &[LayoutItem],
        focal: Option<&NodeKey>,
        duration: f64,
        projector: &P,
    ) -> ReconcileStats {
        let mut stats = ReconcileStats::default();
        let targets: HashMap<&NodeKey, &LayoutItem> =
            items.iter().map(|item| (&item.key, item)).collect();

        let mut entered: HashSet<&NodeKey> = HashSet::new();
        for item in items {
            if self.index.contains_key(&item.key) || entered.contains(&item.key) {
                continue;
            }
            let parent = item
                .parent
                .as_ref()
                .and_then(|p| self.rendered(p).or_else(|| target_visual(&targets, p)));
            let to = Visual::opaque(item.geom.clone());
            let from = projector.collapse(parent.as_ref(), &to);
            self.enter(item, from, to, duration, projector.body_kind());
            entered.insert(&item.key);
            stats.entered += 1;
        }

        for item in items {
            if entered.contains(&item.key) {
                continue;
            }
            if self.update(item, duration) {
                stats.updated += 1;
            }
        }

        let mut exiting: Vec<(ObjectId, NodeKey)> = self
            .index
            .iter()
            .filter(|(key, _)| !targets.contains_key(key))
            .map(|(key, id)| (*id, key.clone()))
            .collect();
        exiting.sort_by_key(|(id, _)| *id);
        for (id, key) in exiting {
            self.index.remove(&key);
            let parent = self
                .nodes
                .get(&id)
                .and_then(|slot| slot.parent.as_ref())
                .and_then(|p| target_visual(&targets, p).or_else(|| self.rendered(p)));
            self.exit(id, parent.as_ref(), duration, projector);
            stats.exited += 1;
        }

        for slot in self.nodes.values_mut() {
            slot.focal = focal == Some(&slot.key);
        }
        if let Some(id) = focal.and_then(|key| self.index.get(key)) {
            self.scene.raise(*id);
        }

        tracing::debug!(
            entered = stats.entered,
            updated = stats.updated,
            exited = stats.exited,
            "reconciled scene"
        );
        let now = self.now;
        self.tick(now, projector);
        stats
    }

    /// Advances every tween to `now` and re-projects all nodes.
    pub fn tick<P: Projector + ?Sized>(&mut self, now: f64, projector: &P) {
        self.now = now;
        let scene = &mut self.scene;
        let view = &mut self.view;
        let nodes = &mut self.nodes;
        let finished = self.timeline.advance(now, |target, sample| {
            let TweenTarget::Object(id) = target else {
                if let Sample::View(v) = sample {
                    *view = v;
                }
                return;
            };
            match sample {
                Sample::Group(visual) => {
                    if let Some(obj) = scene.get_mut(id) {
                        obj.old = Some(visual);
                    }
                }
                Sample::Body(paint) => {
                    if let Some(slot) = nodes.get(&id) {
                        apply_paint(scene, slot.body, paint);
                    }
                }
                Sample::Label(paint) => {
                    if let Some(slot) = nodes.get_mut(&id) {
                        slot.label_fill = paint;
                    }
                }
                Sample::View(_) => {}
            }
        });

        for done in finished {
            let TweenTarget::Object(id) = done.target else {
                continue;
            };
            match done.on_end {
                EndAction::Remove => self.remove_node(id),
                EndAction::Settle if done.name == TweenName::Geometry => {
                    if let Some(obj) = self.scene.get_mut(id)
                        && matches!(obj.lifecycle, Lifecycle::Entering | Lifecycle::Updating)
                    {
                        obj.lifecycle = Lifecycle::Steady;
                    }
                }
                EndAction::Settle => {}
            }
        }

        self.project(projector);
    }

    /// Removes every object and cancels every tween.
    pub fn clear(&mut self) {
        let groups: Vec<ObjectId> = self.nodes.keys().copied().collect();
        for id in groups {
            self.remove_node(id);
        }
        self.index.clear();
        self.timeline = Timeline::new();
    }

    fn rendered(&self, key: &NodeKey) -> Option<Visual> {
        self.visual_of(key).cloned()
    }

    fn enter(
        &mut self,
        item: &LayoutItem,
        from: Visual,
        to: Visual,
        duration: f64,
        body: ShapeKind,
    ) {
        let group = self.scene.insert(
            None,
            Some(item.key.clone()),
            Shape::empty(ShapeKind::Group),
            z_order::node(item.depth),
        );
        let body_id = self.scene.insert(
            Some(group),
            Some(item.key.clone()),
            Shape::empty(body),
            z_order::body(item.depth),
        );
        let extent = self.measurer.measure(&item.label, &self.text_style);
        let label_id = self.scene.insert(
            Some(group),
            Some(item.key.clone()),
            Shape::text(item.label.clone(), self.text_style.clone(), extent),
            z_order::label(item.depth),
        );
        apply_paint(&mut self.scene, body_id, item.fill);
        self.scene.listen(body_id, EventKind::Tap, item.interactive);
        if let Some(obj) = self.scene.get_mut(group) {
            obj.old = Some(from.clone());
        }

        self.nodes.insert(
            group,
            NodeSlot {
                key: item.key.clone(),
                parent: item.parent.clone(),
                body: body_id,
                label: label_id,
                depth: item.depth,
                focal: false,
                show_label: item.show_label,
                label_fill: item.label_fill,
            },
        );
        self.index.insert(item.key.clone(), group);
        self.schedule(group, TweenName::Geometry, duration, TweenKind::Group { from, to });
    }

    /// Retargets a live node. Returns `false` if the key has no live object.
    fn update(&mut self, item: &LayoutItem, duration: f64) -> bool {
        let Some(&group) = self.index.get(&item.key) else {
            return false;
        };
        let Some(slot) = self.nodes.get_mut(&group) else {
            return false;
        };
        slot.parent = item.parent.clone();
        slot.depth = item.depth;
        slot.show_label = item.show_label;
        let (body, label, label_from) = (slot.body, slot.label, slot.label_fill);

        let Some(obj) = self.scene.get_mut(group) else {
            return false;
        };
        let to = Visual::opaque(item.geom.clone());
        let from = obj.old.clone().unwrap_or_else(|| to.clone());
        obj.lifecycle = Lifecycle::Updating;
        obj.z_index = z_order::node(item.depth);

        let body_from = self
            .scene
            .get(body)
            .map(|b| Paint::new(b.shape.fill().unwrap_or(Color::TRANSPARENT), b.shape.opacity()));
        self.scene.listen(body, EventKind::Tap, item.interactive);
        self.relabel(label, &item.label);

        self.schedule(group, TweenName::Geometry, duration, TweenKind::Group { from, to });
        if let Some(from) = body_from
            && from != item.fill
        {
            self.schedule(
                group,
                TweenName::Fill,
                duration,
                TweenKind::Body {
                    from,
                    to: item.fill,
                },
            );
        }
        if label_from != item.label_fill {
            self.schedule(
                group,
                TweenName::Label,
                duration,
                TweenKind::Label {
                    from: label_from,
                    to: item.label_fill,
                },
            );
        }
        true
    }

    fn exit<P: Projector + ?Sized>(
        &mut self,
        group: ObjectId,
        parent: Option<&Visual>,
        duration: f64,
        projector: &P,
    ) {
        let Some(obj) = self.scene.get_mut(group) else {
            return;
        };
        // Nothing was ever rendered, so there is nothing to collapse.
        let Some(from) = obj.old.clone() else {
            tracing::debug!(object = group.0, "removing unrendered node without exit");
            self.remove_node(group);
            return;
        };
        obj.lifecycle = Lifecycle::Exiting;
        let to = projector.collapse(parent, &from);
        if let Some(body) = self.nodes.get(&group).map(|slot| slot.body) {
            self.scene.listen(body, EventKind::Tap, false);
        }
        let tween = Tween::new(
            TweenTarget::Object(group),
            TweenName::Geometry,
            self.now,
            duration,
            TweenKind::Group { from, to },
        )
        .with_easing(self.easing)
        .with_end_action(EndAction::Remove);
        self.timeline.schedule(tween);
    }

    fn schedule(&mut self, group: ObjectId, name: TweenName, duration: f64, kind: TweenKind) {
        let tween = Tween::new(TweenTarget::Object(group), name, self.now, duration, kind)
            .with_easing(self.easing);
        self.timeline.schedule(tween);
    }

    fn relabel(&mut self, label: ObjectId, text: &str) {
        let Some(obj) = self.scene.get_mut(label) else {
            return;
        };
        if let Shape::Text(t) = &mut obj.shape
            && t.text != text
        {
            t.extent = self.measurer.measure(text, &t.style);
            t.text = text.into();
        }
    }

    fn remove_node(&mut self, group: ObjectId) {
        self.timeline.cancel_object(group);
        let removed = self.scene.remove(group);
        if let Some(slot) = self.nodes.remove(&group) {
            if self.index.get(&slot.key) == Some(&group) {
                self.index.remove(&slot.key);
            }
            tracing::trace!(key = %slot.key, objects = removed.len(), "removed node");
        }
    }

    fn project<P: Projector + ?Sized>(&mut self, projector: &P) {
        for (&group, slot) in &self.nodes {
            let Some(visual) = self.scene.get(group).and_then(|g| g.old.clone()) else {
                continue;
            };
            let at = Placement {
                view: &self.view,
                visual: &visual,
                depth: slot.depth,
                focal: slot.focal,
            };
            if let Some(Shape::Group(g)) = self.scene.get_mut(group).map(|o| &mut o.shape) {
                projector.place_group(&at, g);
                g.opacity = visual.opacity;
            }
            if let Some(body) = self.scene.get_mut(slot.body) {
                projector.place_body(&at, &mut body.shape);
            }
            if let Some(Shape::Text(t)) = self.scene.get_mut(slot.label).map(|o| &mut o.shape) {
                let fits = projector.place_label(&at, t);
                t.fill = slot.label_fill.color;
                t.opacity = if slot.show_label && fits {
                    slot.label_fill.opacity
                } else {
                    0.0
                };
            }
        }
    }
}

fn target_visual(targets: &HashMap<&NodeKey, &LayoutItem>, key: &NodeKey) -> Option<Visual> {
    targets.get(key).map(|item| Visual::opaque(item.geom.clone()))
}

fn apply_paint(scene: &mut Scene, id: ObjectId, paint: Paint) {
    let fill = scene.set(id, Prop::Fill, PropValue::Color(paint.color));
    let opacity = scene.set(id, Prop::Opacity, PropValue::Scalar(paint.opacity));
    if let Err(err) = fill.and(opacity) {
        tracing::warn!(?id, ?err, "failed to apply paint");
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use crate::geometry::Partition;
    use crate::measure::HeuristicTextMeasurer;
    use crate::shape::RectShape;

    /// Treats partition space as pixels: group at `(x, y)`, rect of `dx × dy`.
    struct Identity;

    impl Projector for Identity {
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
            if let (Geometry::Partition(p), Shape::Rect(r)) = (&at.visual.geom, body) {
                r.width = p.dx * at.view.x.factor();
                r.height = p.dy;
            }
        }

        fn place_label(&self, at: &Placement<'_>, label: &mut TextShape) -> bool {
            match &at.visual.geom {
                Geometry::Partition(p) => p.dx >= label.extent.0,
                Geometry::Polygon(_) => false,
            }
        }
    }

    fn item(name: &str, x: f64) -> LayoutItem {
        LayoutItem::new(
            NodeKey::new(name),
            Geometry::Partition(Partition::new(x, 0.0, 10.0, 10.0)),
        )
        .with_parent(Some(NodeKey::new("root")))
        .with_depth(1)
        .with_label(name, true)
        .with_interactive(true)
    }

    fn engine() -> Engine {
        Engine::new(Arc::new(HeuristicTextMeasurer))
    }

    fn group_left(engine: &Engine, key: &str) -> f64 {
        let id = engine.object_for(&NodeKey::new(key)).unwrap();
        match &engine.scene().get(id).unwrap().shape {
            Shape::Group(g) => g.left,
            _ => panic!("expected group"),
        }
    }

    #[test]
    fn enter_update_exit_preserves_identity() {
        let mut engine = engine();
        let stats = engine.reconcile(&[item("A", 0.0), item("B", 10.0)], None, 100.0, &Identity);
        assert_eq!(stats.entered, 2);
        engine.tick(100.0, &Identity);
        let b = engine.object_for(&NodeKey::new("B")).unwrap();
        let a = engine.object_for(&NodeKey::new("A")).unwrap();
        assert_eq!(engine.scene().get(b).unwrap().lifecycle, Lifecycle::Steady);

        let before = engine.scene().len();
        let stats = engine.reconcile(&[item("B", 0.0), item("C", 10.0)], None, 100.0, &Identity);
        assert_eq!(
            stats,
            ReconcileStats {
                entered: 1,
                updated: 1,
                exited: 1
            }
        );
        // B keeps its object, C adds exactly one group (plus body and label).
        assert_eq!(engine.object_for(&NodeKey::new("B")), Some(b));
        assert_eq!(engine.scene().len(), before + 3);
        assert_eq!(engine.scene().get(a).unwrap().lifecycle, Lifecycle::Exiting);
        assert!(engine.object_for(&NodeKey::new("A")).is_none());

        engine.tick(150.0, &Identity);
        assert!(engine.scene().get(a).is_some(), "A is removed only after its exit");
        engine.tick(200.0, &Identity);
        assert!(engine.scene().get(a).is_none());
        assert_eq!(engine.scene().len(), before);
        assert_eq!(engine.object_for(&NodeKey::new("B")), Some(b));
        assert!(!engine.is_animating());
    }

    #[test]
    fn unrendered_nodes_are_removed_at_once_on_exit() {
        let mut engine = engine();
        engine.reconcile(&[item("A", 0.0), item("B", 10.0)], None, 100.0, &Identity);
        let a = engine.object_for(&NodeKey::new("A")).unwrap();
        engine.scene.get_mut(a).unwrap().old = None;

        let stats = engine.reconcile(&[item("B", 10.0)], None, 100.0, &Identity);
        assert_eq!(stats.exited, 1);
        assert!(engine.scene().get(a).is_none());
        assert!(engine.object_for(&NodeKey::new("A")).is_none());
        assert!(engine.object_for(&NodeKey::new("B")).is_some());
    }

    #[test]
    fn updates_start_from_the_rendered_state() {
        let mut engine = engine();
        engine.reconcile(&[item("A", 0.0)], None, 0.0, &Identity);
        assert_eq!(group_left(&engine, "A"), 0.0);

        engine.reconcile(&[item("A", 100.0)], None, 100.0, &Identity);
        engine.tick(50.0, &Identity);
        assert_eq!(group_left(&engine, "A"), 50.0);

        // Retarget mid-flight: the new tween starts at 50, not at 0 or 100.
        engine.reconcile(&[item("A", 0.0)], None, 100.0, &Identity);
        assert_eq!(group_left(&engine, "A"), 50.0);
        engine.tick(100.0, &Identity);
        assert_eq!(group_left(&engine, "A"), 25.0);
        engine.tick(150.0, &Identity);
        assert_eq!(group_left(&engine, "A"), 0.0);
    }

    #[test]
    fn entering_nodes_grow_out_of_their_parent() {
        let mut engine = engine();
        let root = LayoutItem::new(
            NodeKey::new("root"),
            Geometry::Partition(Partition::new(0.0, 0.0, 100.0, 100.0)),
        );
        engine.reconcile(&[root.clone(), item("A", 0.0)], None, 100.0, &Identity);
        let a = engine.visual_of(&NodeKey::new("A")).unwrap();
        assert_eq!(a.opacity, 0.0);
        assert_eq!(
            a.geom,
            Geometry::Partition(Partition::new(50.0, 50.0, 0.0, 0.0))
        );
        engine.tick(100.0, &Identity);
        assert_eq!(engine.visual_of(&NodeKey::new("A")).unwrap().opacity, 1.0);
    }

    #[test]
    fn view_tween_moves_every_node() {
        let mut engine = engine();
        engine.reconcile(&[item("A", 10.0), item("B", 20.0)], None, 0.0, &Identity);
        engine.tween_view(
            ViewScales::new(
                ScaleLinear::new((0.0, 1.0), (0.0, 2.0)),
                ScaleStops::default(),
            ),
            100.0,
        );
        assert!(engine.is_animating());
        engine.tick(100.0, &Identity);
        assert_eq!(group_left(&engine, "A"), 20.0);
        assert_eq!(group_left(&engine, "B"), 40.0);
        let b = engine.object_for(&NodeKey::new("B")).unwrap();
        let (body, _) = engine.parts_of(b).unwrap();
        let Shape::Rect(RectShape { width, .. }) = engine.scene().get(body).unwrap().shape else {
            panic!("expected rect");
        };
        assert_eq!(width, 20.0);
    }

    #[test]
    fn labels_hide_when_they_do_not_fit() {
        let mut engine = engine();
        // 11px * 0.6 * 2 chars = 13.2 > 10.
        engine.reconcile(&[item("AB", 0.0), item("C", 20.0)], None, 0.0, &Identity);
        let opacity = |key: &str| {
            let id = engine.object_for(&NodeKey::new(key)).unwrap();
            let (_, label) = engine.parts_of(id).unwrap();
            engine.scene().get(label).unwrap().shape.opacity()
        };
        assert_eq!(opacity("AB"), 0.0);
        assert_eq!(opacity("C"), 1.0);
    }

    #[test]
    fn hit_resolves_keys_and_skips_exiting_nodes() {
        let mut engine = engine();
        engine.reconcile(&[item("A", 0.0), item("B", 20.0)], None, 0.0, &Identity);
        assert_eq!(
            engine.hit(Point::new(25.0, 5.0), EventKind::Tap),
            Some(NodeKey::new("B"))
        );
        engine.reconcile(&[item("A", 0.0)], None, 100.0, &Identity);
        assert_eq!(engine.hit(Point::new(25.0, 5.0), EventKind::Tap), None);
        assert_eq!(
            engine.hit(Point::new(5.0, 5.0), EventKind::Tap),
            Some(NodeKey::new("A"))
        );
    }

    #[test]
    fn reappearing_key_gets_a_fresh_object() {
        let mut engine = engine();
        engine.reconcile(&[item("A", 0.0)], None, 0.0, &Identity);
        let first = engine.object_for(&NodeKey::new("A")).unwrap();
        engine.reconcile(&[], None, 100.0, &Identity);
        engine.tick(50.0, &Identity);
        engine.reconcile(&[item("A", 0.0)], None, 100.0, &Identity);
        let second = engine.object_for(&NodeKey::new("A")).unwrap();
        assert_ne!(first, second);
        engine.tick(200.0, &Identity);
        assert!(engine.scene().get(first).is_none());
        assert_eq!(engine.object_for(&NodeKey::new("A")), Some(second));
    }

    #[test]
    fn clear_empties_the_scene() {
        let mut engine = engine();
        engine.reconcile(&[item("A", 0.0)], None, 100.0, &Identity);
        engine.clear();
        assert!(engine.scene().is_empty());
        assert!(!engine.is_animating());
        assert_eq!(engine.live_nodes(), 0);
    }
}
