// Copyright 2025 the TreeViz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Zoom and selection state.
//!
//! Both are published as index paths through each parent's source-ordered children, so they
//! survive re-sorting and can be written from outside. Paths that no longer resolve are
//! recovered locally: an invalid zoom path is republished as `[]` (the root), an invalid
//! selection path is cleared.

extern crate alloc;

use alloc::vec::Vec;

use treeviz_hierarchy::{Hierarchy, NodeId};

use crate::observable::Observable;

/// Tracks the focal (zoomed) node, the selected node and the held node.
#[derive(Debug, Default)]
pub struct ZoomController {
    zoom_path: Observable<Vec<usize>>,
    selected_path: Observable<Option<Vec<usize>>>,
    held_path: Observable<Option<Vec<usize>>>,
    focal: NodeId,
    selected: Option<NodeId>,
}

impl ZoomController {
    /// Creates a controller focused on the root with nothing selected.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the initial zoom path. It is validated on the next [`Self::resolve`].
    #[must_use]
    pub fn with_zoom_path(mut self, path: Vec<usize>) -> Self {
        self.zoom_path = Observable::new(path);
        self
    }

    /// Sets the initial selection path. It is validated on the next [`Self::resolve`].
    #[must_use]
    pub fn with_selected_path(mut self, path: Option<Vec<usize>>) -> Self {
        self.selected_path = Observable::new(path);
        self
    }

    /// The published zoom path.
    pub fn zoom_path(&self) -> &Observable<Vec<usize>> {
        &self.zoom_path
    }

    /// The zoom path, for subscribing.
    pub fn zoom_path_mut(&mut self) -> &mut Observable<Vec<usize>> {
        &mut self.zoom_path
    }

    /// The published selection path.
    pub fn selected_path(&self) -> &Observable<Option<Vec<usize>>> {
        &self.selected_path
    }

    /// The selection path, for subscribing.
    pub fn selected_path_mut(&mut self) -> &mut Observable<Option<Vec<usize>>> {
        &mut self.selected_path
    }

    /// The path of the node currently held down, if any.
    pub fn held_path(&self) -> &Observable<Option<Vec<usize>>> {
        &self.held_path
    }

    /// The held path, for subscribing.
    pub fn held_path_mut(&mut self) -> &mut Observable<Option<Vec<usize>>> {
        &mut self.held_path
    }

    /// The focal node as of the last resolution.
    pub fn focal(&self) -> NodeId {
        self.focal
    }

    /// The selected node as of the last resolution.
    pub fn selected(&self) -> Option<NodeId> {
        self.selected
    }

    /// Re-resolves both paths against `tree`, recovering invalid ones, and returns the focal
    /// node.
    pub fn resolve(&mut self, tree: &Hierarchy) -> NodeId {
        self.resolve_zoom(tree);
        self.resolve_selection(tree);
        self.focal
    }

    /// Zooms to `node`, or back to the root if `node` is already focal.
    ///
    /// Publishes the target's path on both the zoom and the selection path and returns it.
    pub fn select_zoom(&mut self, tree: &Hierarchy, node: NodeId) -> NodeId {
        let node = tree.or_root(node);
        let target = if node == self.focal { tree.root() } else { node };
        let path = tree.path_to(target);
        self.selected_path.set(Some(path.clone()));
        self.zoom_path.set(path);
        self.focal = target;
        self.selected = Some(target);
        tracing::debug!(node = target.0, "select zoom");
        target
    }

    /// Publishes an externally supplied zoom path and returns the resolved focal node.
    pub fn publish_zoom_path(&mut self, tree: &Hierarchy, path: Vec<usize>) -> NodeId {
        self.zoom_path.set(path);
        self.resolve_zoom(tree);
        self.focal
    }

    /// Publishes an externally supplied selection path and returns the resolved node.
    pub fn publish_selected_path(
        &mut self,
        tree: &Hierarchy,
        path: Option<Vec<usize>>,
    ) -> Option<NodeId> {
        self.selected_path.set(path);
        self.resolve_selection(tree);
        self.selected
    }

    /// Resets the selection to the root without touching the zoom path.
    pub fn reset_selection(&mut self, tree: &Hierarchy) {
        self.selected_path.set(Some(Vec::new()));
        self.selected = Some(tree.root());
    }

    /// Marks `node` as held.
    pub fn hold(&mut self, tree: &Hierarchy, node: NodeId) {
        self.held_path.set(Some(tree.path_to(tree.or_root(node))));
    }

    /// Clears the held node.
    pub fn release(&mut self) {
        self.held_path.set(None);
    }

    fn resolve_zoom(&mut self, tree: &Hierarchy) {
        self.focal = match tree.resolve_path(self.zoom_path.get()) {
            Ok(id) => id,
            Err(err) => {
                tracing::warn!(path = ?self.zoom_path.get(), %err, "resetting invalid zoom path");
                self.zoom_path.set(Vec::new());
                tree.root()
            }
        };
    }

    fn resolve_selection(&mut self, tree: &Hierarchy) {
        let Some(path) = self.selected_path.get() else {
            self.selected = None;
            return;
        };
        self.selected = match tree.resolve_path(path) {
            Ok(id) => Some(id),
            Err(err) => {
                tracing::warn!(?path, %err, "clearing invalid selection path");
                self.selected_path.set(None);
                None
            }
        };
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use alloc::vec;

    use serde_json::json;
    use treeviz_hierarchy::{HierarchyConfig, normalize};

    use super::*;

    fn tree() -> Hierarchy {
        normalize(
            &json!({ "name": "root", "children": [
                { "name": "a", "children": [{ "name": "a1" }, { "name": "a2" }] },
                { "name": "b" }
            ] }),
            &HierarchyConfig::default(),
        )
    }

    #[test]
    fn invalid_zoom_path_is_republished_as_root() {
        let tree = tree();
        let mut controller = ZoomController::new();
        let focal = controller.publish_zoom_path(&tree, vec![5]);
        assert_eq!(focal, tree.root());
        assert!(controller.zoom_path().get().is_empty());
        assert_eq!(controller.zoom_path().revision(), 2);

        let a2 = controller.publish_zoom_path(&tree, vec![0, 1]);
        assert_eq!(tree.node(a2).unwrap().name, "a2");
        assert_eq!(controller.focal(), a2);
    }

    #[test]
    fn select_zoom_toggles_back_to_the_root() {
        let tree = tree();
        let mut controller = ZoomController::new();
        let a = tree.resolve_path(&[0]).unwrap();

        assert_eq!(controller.select_zoom(&tree, a), a);
        assert_eq!(controller.zoom_path().get(), &vec![0]);
        assert_eq!(controller.selected_path().get(), &Some(vec![0]));
        assert_eq!(tree.resolve_path(controller.zoom_path().get()), Ok(a));

        assert_eq!(controller.select_zoom(&tree, a), tree.root());
        assert!(controller.zoom_path().get().is_empty());
        assert_eq!(controller.selected(), Some(tree.root()));
    }

    #[test]
    fn invalid_selection_is_cleared() {
        let tree = tree();
        let mut controller = ZoomController::new();
        assert_eq!(controller.publish_selected_path(&tree, Some(vec![1, 0])), None);
        assert_eq!(controller.selected_path().get(), &None);
        let b = controller.publish_selected_path(&tree, Some(vec![1]));
        assert_eq!(b, tree.resolve_path(&[1]).ok());

        controller.hold(&tree, tree.resolve_path(&[0, 0]).unwrap());
        assert_eq!(controller.held_path().get(), &Some(vec![0, 0]));
        controller.release();
        assert_eq!(controller.held_path().get(), &None);
    }
}
