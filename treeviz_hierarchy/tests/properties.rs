// Copyright 2025 the TreeViz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Property tests for the normalizer and path addressing.
//!
//! 1. Normalizing the same input twice yields identical trees
//! 2. Internal nodes without explicit values sum their children
//! 3. `children_reference[i].index == i` everywhere
//! 4. Index paths round-trip through `resolve_path`
//! 5. Partition spans of siblings tile their parent

use kurbo::Size;
use proptest::prelude::*;
use serde_json::{Map, Value, json};
use treeviz_core::Geometry;
use treeviz_hierarchy::{
    Hierarchy, HierarchyConfig, HierarchyLayout, NodeId, PartitionLayout, normalize,
};

// ── Strategies ──────────────────────────────────────────────────────────

fn record(name: String, area: Option<u32>, color: Option<u32>, kids: Option<Vec<Value>>) -> Value {
    let mut map = Map::new();
    map.insert("name".into(), Value::String(name));
    if let Some(area) = area {
        map.insert("area".into(), json!(area));
    }
    if let Some(color) = color {
        map.insert("color".into(), json!(color));
    }
    if let Some(kids) = kids {
        map.insert("children".into(), Value::Array(kids));
    }
    Value::Object(map)
}

/// Trees where any node may carry explicit values.
fn raw_tree() -> impl Strategy<Value = Value> {
    let leaf = ("[a-z]{0,3}", prop::option::of(0u32..100), prop::option::of(0u32..50))
        .prop_map(|(n, a, c)| record(n, a, c, None));
    leaf.prop_recursive(4, 64, 5, |inner| {
        (
            "[a-z]{0,3}",
            prop::option::of(0u32..100),
            prop::option::of(0u32..50),
            prop::collection::vec(inner, 0..5),
        )
            .prop_map(|(n, a, c, kids)| record(n, a, c, Some(kids)))
    })
}

/// Trees whose internal nodes never carry explicit values.
fn aggregating_tree() -> impl Strategy<Value = Value> {
    let leaf = ("[a-z]{1,3}", prop::option::of(0u32..100), prop::option::of(0u32..50))
        .prop_map(|(n, a, c)| record(n, a, c, None));
    leaf.prop_recursive(4, 64, 5, |inner| {
        ("[a-z]{1,3}", prop::collection::vec(inner, 1..5))
            .prop_map(|(n, kids)| record(n, None, None, Some(kids)))
    })
}

fn ids(tree: &Hierarchy) -> impl Iterator<Item = NodeId> + '_ {
    tree.iter().map(|(id, _)| id)
}

// ═══════════════════════════════════════════════════════════════════════
// 1. Determinism
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn normalizing_is_deterministic(raw in raw_tree()) {
        let config = HierarchyConfig::default();
        let a = normalize(&raw, &config);
        let b = normalize(&raw, &config);
        prop_assert_eq!(a, b);
    }
}

// ═══════════════════════════════════════════════════════════════════════
// 2. Aggregation
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn internal_nodes_sum_their_children(raw in aggregating_tree()) {
        let tree = normalize(&raw, &HierarchyConfig::default());
        for (_, node) in tree.iter().filter(|(_, n)| n.has_children()) {
            let kids: Vec<_> = node
                .children_reference
                .iter()
                .map(|id| tree.node(*id).unwrap())
                .collect();
            let size: f64 = kids.iter().map(|k| k.size).sum();
            let color: f64 = kids.iter().map(|k| k.color_size).sum();
            prop_assert!((node.size - size).abs() < 1e-9, "size {} != {}", node.size, size);
            prop_assert!(
                (node.color_size - color).abs() < 1e-9,
                "color size {} != {}",
                node.color_size,
                color
            );
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// 3. Source-order indexes
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn reference_indexes_match_positions(raw in raw_tree()) {
        let tree = normalize(&raw, &HierarchyConfig::default());
        for (id, node) in tree.iter() {
            prop_assert_eq!(node.children.len(), node.children_reference.len());
            for (i, child) in node.children_reference.iter().enumerate() {
                let child = tree.node(*child).unwrap();
                prop_assert_eq!(child.index, i);
                prop_assert_eq!(child.parent, Some(id));
                prop_assert_eq!(child.depth, node.depth + 1);
            }
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// 4. Path round trip
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn paths_round_trip(raw in raw_tree()) {
        let tree = normalize(&raw, &HierarchyConfig::default());
        for id in ids(&tree) {
            let path = tree.path_to(id);
            prop_assert_eq!(path.len(), tree.node(id).unwrap().depth);
            prop_assert_eq!(tree.resolve_path(&path), Ok(id));
        }
    }

    #[test]
    fn out_of_range_steps_never_resolve(raw in raw_tree(), extra in 0usize..3) {
        let tree = normalize(&raw, &HierarchyConfig::default());
        let root = tree.node(tree.root()).unwrap();
        let path = [root.children_reference.len() + extra];
        prop_assert!(tree.resolve_path(&path).is_err());
    }
}

// ═══════════════════════════════════════════════════════════════════════
// 5. Partition tiling
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn partition_children_tile_their_parent(raw in raw_tree()) {
        let tree = normalize(&raw, &HierarchyConfig::default());
        let nodes = PartitionLayout::new().layout(&tree, Size::ZERO, tree.root());
        prop_assert_eq!(nodes.len(), tree.len());
        let mut spans = vec![(0.0, 0.0); tree.len()];
        for n in &nodes {
            if let Geometry::Partition(p) = &n.geom {
                spans[n.id.0] = (p.x, p.dx);
            }
        }
        for (id, node) in tree.iter() {
            if node.value <= 0.0 || !node.has_children() {
                continue;
            }
            let (x, dx) = spans[id.0];
            let total: f64 = node.children.iter().map(|c| spans[c.0].1).sum();
            prop_assert!((total - dx).abs() < 1e-9, "children span {} of {}", total, dx);
            let first = node.children.first().map(|c| spans[c.0].0).unwrap_or(x);
            prop_assert!((first - x).abs() < 1e-12, "first child starts at its parent");
        }
    }
}
