// Copyright 2025 the TreeViz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The interface every visualization implements, and the state they share.

extern crate alloc;

use alloc::boxed::Box;
use alloc::sync::Arc;

use hashbrown::HashMap;
use kurbo::{Point, Size};
use treeviz_core::{
    Engine, EventKind, LayoutItem, NodeKey, Projector, Scene, TextMeasurer, TextStyle,
};
use treeviz_hierarchy::{Hierarchy, NodeId};

use crate::blank::BlankVisualization;
use crate::options::{VisualizationKind, VisualizationOptions};
use crate::sunburst::Sunburst;
use crate::treemap::Treemap;
use crate::voronoi::Voronoi;

/// A visualization of a [`Hierarchy`] that a host can swap at runtime.
///
/// Calls made before [`Visualization::init`] or after [`Visualization::remove`] are ignored, as
/// is a second `init`.
pub trait Visualization: core::fmt::Debug {
    /// The type name this visualization was created for.
    fn name(&self) -> &str;

    /// Creates the scene for a `size` viewport, zoomed on `focal`, without animation.
    fn init(&mut self, tree: &Hierarchy, focal: NodeId, size: Size);

    /// Re-lays out `tree` after a data change and animates towards it.
    fn update(&mut self, tree: &Hierarchy, focal: NodeId);

    /// Animates to a new focal node.
    fn zoom(&mut self, tree: &Hierarchy, focal: NodeId);

    /// Adopts a new viewport size without animation.
    fn resize(&mut self, tree: &Hierarchy, focal: NodeId, size: Size);

    /// Drops the scene.
    fn remove(&mut self);

    /// Advances transitions to `now` (milliseconds).
    fn tick(&mut self, now: f64);

    /// Returns `true` while a transition is running.
    fn is_animating(&self) -> bool;

    /// The rendered scene, once initialized.
    fn scene(&self) -> Option<&Scene>;

    /// The top-most interactive node under `pt` (scene coordinates).
    fn node_at(&self, pt: Point) -> Option<NodeId>;

    /// Resolves a tap at `pt` into the node to zoom to, if any.
    fn tap(&mut self, tree: &Hierarchy, pt: Point, now: f64) -> Option<NodeId> {
        let _ = (tree, now);
        self.node_at(pt)
    }
}

/// Creates the visualization named in `options`, or a blank one for unknown names.
pub fn create_visualization(
    options: &VisualizationOptions,
    measurer: Arc<dyn TextMeasurer>,
) -> Box<dyn Visualization> {
    match options.kind() {
        Some(VisualizationKind::Treemap) => Box::new(Treemap::new(options, measurer)),
        Some(VisualizationKind::Sunburst) => Box::new(Sunburst::new(options, measurer)),
        Some(VisualizationKind::Voronoi) => Box::new(Voronoi::new(options, measurer)),
        None => Box::new(BlankVisualization::new(options.visualization.as_str())),
    }
}

/// Engine, viewport and key index of one initialized visualization.
pub(crate) struct Canvas {
    pub(crate) engine: Option<Engine>,
    pub(crate) size: Size,
    now: f64,
    keys: HashMap<NodeKey, NodeId>,
    measurer: Arc<dyn TextMeasurer>,
    style: TextStyle,
}

impl core::fmt::Debug for Canvas {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Canvas")
            .field("engine", &self.engine)
            .field("size", &self.size)
            .field("now", &self.now)
            .field("keys", &self.keys.len())
            .finish_non_exhaustive()
    }
}

impl Canvas {
    pub(crate) fn new(measurer: Arc<dyn TextMeasurer>, style: TextStyle) -> Self {
        Self {
            engine: None,
            size: Size::ZERO,
            now: 0.0,
            keys: HashMap::new(),
            measurer,
            style,
        }
    }

    /// Creates the engine with its clock at the last tick. Returns `false` if the canvas was
    /// already open.
    pub(crate) fn open<P: Projector>(&mut self, name: &str, size: Size, projector: &P) -> bool {
        if self.engine.is_some() {
            tracing::debug!(name, "ignoring repeated init");
            return false;
        }
        let mut engine =
            Engine::new(Arc::clone(&self.measurer)).with_text_style(self.style.clone());
        engine.tick(self.now, projector);
        self.engine = Some(engine);
        self.size = size;
        tracing::debug!(name, width = size.width, height = size.height, "visualization initialized");
        true
    }

    pub(crate) fn close(&mut self) {
        if let Some(mut engine) = self.engine.take() {
            engine.clear();
        }
        self.keys.clear();
    }

    pub(crate) fn is_open(&self) -> bool {
        self.engine.is_some()
    }

    /// Replaces the key index; `ids[i]` is the node behind `items[i]`.
    pub(crate) fn index(&mut self, items: &[LayoutItem], ids: &[NodeId]) {
        self.keys = items
            .iter()
            .zip(ids)
            .map(|(item, id)| (item.key.clone(), *id))
            .collect();
    }

    pub(crate) fn node_at(&self, pt: Point) -> Option<NodeId> {
        let key = self.engine.as_ref()?.hit(pt, EventKind::Tap)?;
        self.keys.get(&key).copied()
    }

    pub(crate) fn tick<P: Projector>(&mut self, now: f64, projector: &P) {
        self.now = now;
        if let Some(engine) = &mut self.engine {
            engine.tick(now, projector);
        }
    }

    pub(crate) fn is_animating(&self) -> bool {
        self.engine.as_ref().is_some_and(Engine::is_animating)
    }

    pub(crate) fn scene(&self) -> Option<&Scene> {
        self.engine.as_ref().map(Engine::scene)
    }
}
