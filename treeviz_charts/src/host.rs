// Copyright 2025 the TreeViz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The host binding: one visualization bound to data, zoom state and gestures.
//!
//! [`VisualizationHost`] owns the canonical tree and forwards the uniform
//! `init`/`update`/`zoom`/`resize`/`remove` lifecycle to whichever [`Visualization`] the options
//! name, so the type can be swapped at runtime. Frames are driven from outside through
//! [`VisualizationHost::tick`]; zoom and selection paths written directly to the controller's
//! observables are picked up there.

extern crate alloc;

use alloc::boxed::Box;
use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;

use kurbo::{Point, Size};
use serde_json::Value;
use treeviz_core::{Scene, TextMeasurer};
use treeviz_hierarchy::{Hierarchy, NodeId, normalize};

use crate::controller::ZoomController;
use crate::gesture::{GestureEvent, GestureTransform};
use crate::options::VisualizationOptions;
use crate::visualization::{Visualization, create_visualization};

/// Binds options, data and interaction state to a swappable visualization.
pub struct VisualizationHost {
    options: VisualizationOptions,
    tree: Hierarchy,
    controller: ZoomController,
    gesture: GestureTransform,
    visualization: Box<dyn Visualization>,
    measurer: Arc<dyn TextMeasurer>,
    size: Size,
    now: f64,
    initialized: bool,
    rendered_zoom: u64,
    rendered_selection: u64,
}

impl core::fmt::Debug for VisualizationHost {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("VisualizationHost")
            .field("visualization", &self.visualization)
            .field("nodes", &self.tree.len())
            .field("controller", &self.controller)
            .field("gesture", &self.gesture)
            .field("size", &self.size)
            .field("now", &self.now)
            .field("initialized", &self.initialized)
            .finish_non_exhaustive()
    }
}

impl VisualizationHost {
    /// Normalizes the option data and creates the configured visualization.
    ///
    /// Nothing is drawn until [`Self::init`].
    pub fn new(options: VisualizationOptions, measurer: Arc<dyn TextMeasurer>) -> Self {
        let tree = normalize(&options.data, &options.hierarchy);
        let controller = ZoomController::new()
            .with_zoom_path(options.zoomed_item_path.clone())
            .with_selected_path(options.selected_item_path.clone());
        let visualization = create_visualization(&options, Arc::clone(&measurer));
        Self {
            gesture: gesture_for(&options),
            options,
            tree,
            controller,
            visualization,
            measurer,
            size: Size::ZERO,
            now: 0.0,
            initialized: false,
            rendered_zoom: 0,
            rendered_selection: 0,
        }
    }

    /// The current options.
    pub fn options(&self) -> &VisualizationOptions {
        &self.options
    }

    /// The canonical tree.
    pub fn tree(&self) -> &Hierarchy {
        &self.tree
    }

    /// The zoom and selection state.
    pub fn controller(&self) -> &ZoomController {
        &self.controller
    }

    /// The zoom and selection state, for subscribing or publishing paths directly.
    ///
    /// A zoom path set here is rendered on the next [`Self::tick`].
    pub fn controller_mut(&mut self) -> &mut ZoomController {
        &mut self.controller
    }

    /// The live gesture transform, to be layered over the scene when drawing.
    pub fn gesture(&self) -> &GestureTransform {
        &self.gesture
    }

    /// The active visualization.
    pub fn visualization(&self) -> &dyn Visualization {
        self.visualization.as_ref()
    }

    /// The rendered scene, if the active visualization has one.
    pub fn scene(&self) -> Option<&Scene> {
        self.visualization.scene()
    }

    /// The viewport size.
    pub fn size(&self) -> Size {
        self.size
    }

    /// Returns `true` between [`Self::init`] and [`Self::remove`].
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Returns `true` while a transition is running.
    pub fn is_animating(&self) -> bool {
        self.visualization.is_animating()
    }

    /// Draws the visualization into a `size` viewport at the published zoom path.
    pub fn init(&mut self, size: Size) {
        if self.initialized {
            tracing::debug!("host already initialized");
            return;
        }
        self.size = size;
        let focal = self.controller.resolve(&self.tree);
        self.visualization.init(&self.tree, focal, size);
        self.mark_rendered();
        self.initialized = true;
    }

    /// Re-lays out the current tree and animates towards it.
    pub fn update(&mut self) {
        self.visualization.update(&self.tree, self.controller.focal());
    }

    /// Replaces the data.
    ///
    /// The selection resets to the root and the zoom path is re-resolved against the new tree
    /// (and republished as `[]` if it no longer fits); the zoom itself is kept.
    pub fn set_data(&mut self, data: Value) {
        self.options.data = data;
        self.tree = normalize(&self.options.data, &self.options.hierarchy);
        self.controller.reset_selection(&self.tree);
        let focal = self.controller.resolve(&self.tree);
        self.mark_rendered();
        tracing::debug!(nodes = self.tree.len(), "data replaced");
        if self.initialized {
            self.visualization.update(&self.tree, focal);
        }
    }

    /// Zooms to `node`, or back to the root if it is already focal.
    pub fn zoom(&mut self, node: NodeId) -> NodeId {
        let focal = self.controller.select_zoom(&self.tree, node);
        self.render_zoom(focal);
        focal
    }

    /// Publishes a zoom path from outside and zooms to what it resolves to.
    pub fn publish_zoom_path(&mut self, path: Vec<usize>) -> NodeId {
        let focal = self.controller.publish_zoom_path(&self.tree, path);
        self.render_zoom(focal);
        focal
    }

    /// Publishes a selection path from outside and zooms to the selected node.
    ///
    /// Invalid paths clear the selection and leave the view alone.
    pub fn publish_selected_path(&mut self, path: Option<Vec<usize>>) -> Option<NodeId> {
        let selected = self.controller.publish_selected_path(&self.tree, path);
        self.render_selection(selected);
        selected
    }

    /// Handles a tap at `pt` in viewport coordinates. Returns the node zoomed to, if any.
    pub fn tap(&mut self, pt: Point) -> Option<NodeId> {
        let local = self.gesture.affine().inverse() * pt;
        let node = self.visualization.tap(&self.tree, local, self.now)?;
        Some(self.zoom(node))
    }

    /// Marks the node under `pt` as held.
    pub fn hold(&mut self, pt: Point) -> Option<NodeId> {
        let local = self.gesture.affine().inverse() * pt;
        let node = self.visualization.node_at(local)?;
        self.controller.hold(&self.tree, node);
        Some(node)
    }

    /// Clears the held node.
    pub fn release(&mut self) {
        self.controller.release();
    }

    /// Feeds a touch event to the gesture transform. Returns `true` if it changed.
    pub fn gesture_event(&mut self, event: &GestureEvent) -> bool {
        self.gesture.handle(event)
    }

    /// Adopts a new viewport size and drops any gesture feedback. Returns `false` if the size
    /// did not change.
    pub fn resize(&mut self, size: Size) -> bool {
        if size == self.size {
            return false;
        }
        self.size = size;
        self.gesture.reset();
        if self.initialized {
            self.visualization
                .resize(&self.tree, self.controller.focal(), size);
        }
        true
    }

    /// Tears the visualization down. A later [`Self::init`] draws it again.
    pub fn remove(&mut self) {
        self.visualization.remove();
        self.initialized = false;
    }

    /// Advances to `now` (milliseconds), then starts the zoom for any selection or zoom path
    /// published directly on the controller since the last frame. A selection wins over a zoom
    /// path published in the same frame.
    pub fn tick(&mut self, now: f64) {
        self.now = now;
        self.visualization.tick(now);
        if !self.initialized {
            return;
        }
        if self.controller.selected_path().revision() != self.rendered_selection {
            self.controller.resolve(&self.tree);
            let selected = self.controller.selected();
            tracing::debug!(node = ?selected.map(|n| n.0), "selection path changed externally");
            self.render_selection(selected);
        }
        if self.controller.zoom_path().revision() != self.rendered_zoom {
            let focal = self.controller.resolve(&self.tree);
            tracing::debug!(node = focal.0, "zoom path changed externally");
            self.render_zoom(focal);
        }
    }

    /// Switches to another visualization type.
    ///
    /// The current visualization is removed, the selection resets to the root and the gesture
    /// to identity; the new one is initialized if the host was.
    pub fn set_visualization_type(&mut self, name: impl Into<String>) {
        let name = name.into();
        tracing::debug!(from = %self.options.visualization, to = %name, "switching visualization");
        self.visualization.remove();
        self.options.visualization = name;
        self.controller.reset_selection(&self.tree);
        self.gesture.reset();
        self.visualization = create_visualization(&self.options, Arc::clone(&self.measurer));
        self.visualization.tick(self.now);
        if self.initialized {
            let focal = self.controller.resolve(&self.tree);
            self.visualization.init(&self.tree, focal, self.size);
        }
        self.mark_rendered();
    }

    fn mark_rendered(&mut self) {
        self.rendered_zoom = self.controller.zoom_path().revision();
        self.rendered_selection = self.controller.selected_path().revision();
    }

    fn render_zoom(&mut self, focal: NodeId) {
        self.mark_rendered();
        if self.initialized {
            self.visualization.zoom(&self.tree, focal);
        }
    }

    /// Moves the zoom to a newly selected node. Cleared selections only record the revision.
    fn render_selection(&mut self, selected: Option<NodeId>) {
        let Some(node) = selected else {
            self.rendered_selection = self.controller.selected_path().revision();
            return;
        };
        let focal = self
            .controller
            .publish_zoom_path(&self.tree, self.tree.path_to(node));
        self.render_zoom(focal);
    }
}

fn gesture_for(options: &VisualizationOptions) -> GestureTransform {
    GestureTransform::new()
        .with_touch(options.enable_touch)
        .with_zoom(options.enable_zoom)
        .with_rotate(options.enable_rotate)
}
