// Copyright 2025 the TreeViz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Stand-in for unknown visualization names.

extern crate alloc;

use alloc::string::String;

use kurbo::{Point, Size};
use treeviz_core::Scene;
use treeviz_hierarchy::{Hierarchy, NodeId};

use crate::visualization::Visualization;

/// Draws nothing and logs an error for every lifecycle call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BlankVisualization {
    name: String,
}

impl BlankVisualization {
    /// Creates a blank visualization standing in for `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    fn unsupported(&self, call: &str) {
        tracing::error!(visualization = %self.name, call, "unknown visualization type");
    }
}

impl Visualization for BlankVisualization {
    fn name(&self) -> &str {
        &self.name
    }

    fn init(&mut self, _tree: &Hierarchy, _focal: NodeId, _size: Size) {
        self.unsupported("init");
    }

    fn update(&mut self, _tree: &Hierarchy, _focal: NodeId) {
        self.unsupported("update");
    }

    fn zoom(&mut self, _tree: &Hierarchy, _focal: NodeId) {
        self.unsupported("zoom");
    }

    fn resize(&mut self, _tree: &Hierarchy, _focal: NodeId, _size: Size) {
        self.unsupported("resize");
    }

    fn remove(&mut self) {
        self.unsupported("remove");
    }

    fn tick(&mut self, _now: f64) {}

    fn is_animating(&self) -> bool {
        false
    }

    fn scene(&self) -> Option<&Scene> {
        None
    }

    fn node_at(&self, _pt: Point) -> Option<NodeId> {
        None
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use serde_json::json;
    use treeviz_hierarchy::{HierarchyConfig, normalize};

    use super::*;

    #[test]
    fn every_call_is_a_no_op() {
        let tree = normalize(&json!({ "name": "root" }), &HierarchyConfig::default());
        let mut blank = BlankVisualization::new("bogus");
        blank.init(&tree, tree.root(), Size::new(10.0, 10.0));
        blank.update(&tree, tree.root());
        blank.zoom(&tree, tree.root());
        blank.tick(16.0);
        assert_eq!(blank.name(), "bogus");
        assert!(blank.scene().is_none());
        assert!(!blank.is_animating());
        assert_eq!(blank.tap(&tree, Point::new(5.0, 5.0), 16.0), None);
        blank.remove();
    }
}
