// Copyright 2025 the TreeViz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Conversion of arbitrary JSON records into a [`Hierarchy`].

extern crate alloc;

use alloc::string::{String, ToString};
use alloc::vec::Vec;

use kurbo::Point;
use peniko::Color;
use serde_json::{Map, Value};
use treeviz_core::{ColorRamp, parse_css};

use crate::config::{HierarchyConfig, ResolvedLevel};
use crate::tree::{Hierarchy, Node, NodeId};

/// Builds a canonical tree from `raw`.
///
/// Depth `i` reads its field names from `config.levels[i]` and falls back to the global fields
/// beyond the configured levels. Children of a node at depth `i` take their colours from the
/// palette of depth `i + 1`.
///
/// Malformed input never fails: a non-object record is an unnamed leaf, a missing name is empty,
/// a missing size is 1 for leaves and the sum of the children for internal nodes, and a children
/// field that is not an array makes the node a leaf.
pub fn normalize(raw: &Value, config: &HierarchyConfig) -> Hierarchy {
    let (levels, global) = config.resolved_levels();
    let mut builder = Builder {
        levels: &levels,
        global: &global,
        region_path: &config.region_path,
        nodes: Vec::new(),
    };
    let root = builder.build(raw, 0, None, 0);
    builder.color_root(root);
    tracing::debug!(
        nodes = builder.nodes.len(),
        levels = levels.len(),
        "normalized hierarchy"
    );
    Hierarchy::from_nodes(builder.nodes)
}

struct Builder<'a> {
    levels: &'a [ResolvedLevel],
    global: &'a ResolvedLevel,
    region_path: &'a str,
    nodes: Vec<Node>,
}

impl Builder<'_> {
    fn level(&self, depth: usize) -> &ResolvedLevel {
        self.levels.get(depth).unwrap_or(self.global)
    }

    fn build(&mut self, raw: &Value, depth: usize, parent: Option<NodeId>, index: usize) -> NodeId {
        let empty = Map::new();
        let record = raw.as_object().unwrap_or_else(|| {
            tracing::debug!(depth, index, "node record is not an object");
            &empty
        });
        let level = self.level(depth);
        let explicit_size = record.get(&level.area_path).and_then(number);
        let explicit_color = record.get(&level.color_path);
        let color_value = explicit_color.and_then(number);
        let pinned = explicit_color.and_then(Value::as_str).and_then(|s| {
            let color = parse_css(s);
            if color.is_none() {
                tracing::warn!(color = %s, "ignoring unparseable node colour");
            }
            color
        });
        let children_raw = match record.get(&level.children_path) {
            Some(Value::Array(items)) => Some(items.as_slice()),
            Some(other) => {
                tracing::debug!(depth, index, kind = value_kind(other), "children field is not an array");
                None
            }
            None => None,
        };

        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            name: name_of(record),
            size: explicit_size.unwrap_or(1.0),
            color_size: color_value.unwrap_or(0.0),
            color: pinned.unwrap_or(Color::BLACK),
            pinned: pinned.is_some(),
            parent,
            index,
            depth,
            children: Vec::new(),
            children_reference: Vec::new(),
            value: 0.0,
            min_size: 0.0,
            max_size: 1.0,
            min_color: 0.0,
            max_color: 1.0,
            color_scale: None,
            region: record
                .get(self.region_path)
                .map(parse_region)
                .unwrap_or_default(),
        });

        let Some(children_raw) = children_raw else {
            let node = &mut self.nodes[id.0];
            node.value = node.size;
            return id;
        };

        let children: Vec<NodeId> = children_raw
            .iter()
            .enumerate()
            .map(|(i, child)| self.build(child, depth + 1, Some(id), i))
            .collect();

        let palette = self.level(depth + 1).palette.clone();
        let mut size = 0.0;
        let mut color_size = 0.0;
        let mut value = 0.0;
        let mut min_size = f64::INFINITY;
        let mut max_size = f64::NEG_INFINITY;
        let mut min_color = f64::INFINITY;
        let mut max_color = f64::NEG_INFINITY;
        for child in &children {
            let c = &self.nodes[child.0];
            size += c.size;
            color_size += c.color_size;
            value += c.value;
            min_size = min_size.min(c.size);
            max_size = max_size.max(c.size);
            min_color = min_color.min(c.color_size);
            max_color = max_color.max(c.color_size);
        }
        if children.is_empty() {
            (min_size, max_size, min_color, max_color) = (0.0, 1.0, 0.0, 1.0);
        }
        if min_size == max_size {
            max_size += 1.0;
        }
        if min_color == max_color {
            max_color += 1.0;
        }
        let ramp = ColorRamp::stepped(min_color, max_color, palette);

        for child in &children {
            let c = &mut self.nodes[child.0];
            if !c.pinned {
                c.color = ramp.map(c.color_size);
            }
        }

        let mut ordered = children.clone();
        ordered.sort_by(|a, b| {
            self.nodes[b.0]
                .value
                .total_cmp(&self.nodes[a.0].value)
        });

        let node = &mut self.nodes[id.0];
        node.size = explicit_size.unwrap_or(size);
        node.color_size = color_value.unwrap_or(color_size);
        node.value = value;
        node.min_size = min_size;
        node.max_size = max_size;
        node.min_color = min_color;
        node.max_color = max_color;
        node.color_scale = Some(ramp);
        node.children = ordered;
        node.children_reference = children;
        id
    }

    /// Colours the root from a window of one palette step centred on its own colour value.
    fn color_root(&mut self, root: NodeId) {
        let palette = self.level(0).palette.clone();
        let node = &mut self.nodes[root.0];
        if node.pinned {
            return;
        }
        let step = 2.0 / palette.len().saturating_sub(1).max(1) as f64;
        let cs = node.color_size;
        node.color = ColorRamp::new(alloc::vec![cs - step / 2.0, cs + step / 2.0], palette).map(cs);
    }
}

fn name_of(record: &Map<String, Value>) -> String {
    match record.get("name") {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}

/// Reads a non-negative finite number from a JSON number or numeric string.
fn number(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    n.is_finite().then_some(n.max(0.0))
}

/// Parses region points from `"x,y"` strings, `[x, y]` pairs or `{ "x": .., "y": .. }` objects.
fn parse_region(value: &Value) -> Vec<Point> {
    let Some(items) = value.as_array() else {
        return Vec::new();
    };
    items
        .iter()
        .filter_map(|item| {
            let pair = match item {
                Value::String(s) => {
                    let (x, y) = s.split_once(',')?;
                    (x.trim().parse().ok()?, y.trim().parse().ok()?)
                }
                Value::Array(xy) => (xy.first()?.as_f64()?, xy.get(1)?.as_f64()?),
                Value::Object(o) => (o.get("x")?.as_f64()?, o.get("y")?.as_f64()?),
                _ => return None,
            };
            Some(Point::new(pair.0, pair.1))
        })
        .collect()
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use alloc::vec;

    use serde_json::json;

    use super::*;
    use crate::config::{LevelFields, LevelSpec, PaletteSpec};
    use crate::palette::named_palette;
    use treeviz_core::to_hex;

    #[test]
    fn internal_nodes_aggregate_unless_explicit() {
        let tree = normalize(
            &json!({
                "name": "root",
                "children": [
                    { "name": "a", "children": [{ "area": 2, "color": 3 }, { "area": 4, "color": 5 }] },
                    { "name": "b", "area": 7, "color": 1, "children": [{ "area": 1 }] },
                    { "name": "c" }
                ]
            }),
            &HierarchyConfig::default(),
        );
        let root = tree.node(tree.root()).unwrap();
        let a = tree.node(root.children_reference[0]).unwrap();
        let b = tree.node(root.children_reference[1]).unwrap();
        let c = tree.node(root.children_reference[2]).unwrap();

        assert_eq!(a.size, 6.0);
        assert_eq!(a.color_size, 8.0);
        assert_eq!(b.size, 7.0, "explicit size is kept");
        assert_eq!(b.color_size, 1.0);
        assert_eq!(b.value, 1.0, "layout weight follows the leaves");
        assert_eq!(c.size, 1.0, "leaves default to 1");
        assert_eq!(c.color_size, 0.0);
        assert_eq!(root.size, 14.0);
        assert_eq!(root.value, 8.0);
        assert_eq!(a.name, "a");
        assert_eq!(tree.node(a.children_reference[0]).unwrap().name, "");
    }

    #[test]
    fn children_render_by_value_and_index_by_source() {
        let tree = normalize(
            &json!({ "children": [{ "name": "s", "area": 1 }, { "name": "l", "area": 9 }, { "name": "m", "area": 1 }] }),
            &HierarchyConfig::default(),
        );
        let root = tree.node(tree.root()).unwrap();
        let names = |ids: &[NodeId]| {
            ids.iter()
                .map(|id| tree.node(*id).unwrap().name.clone())
                .collect::<Vec<_>>()
        };
        assert_eq!(names(&root.children), vec!["l", "s", "m"]);
        assert_eq!(names(&root.children_reference), vec!["s", "l", "m"]);
        for (i, id) in root.children_reference.iter().enumerate() {
            assert_eq!(tree.node(*id).unwrap().index, i);
        }
    }

    #[test]
    fn malformed_records_degrade() {
        let tree = normalize(
            &json!({ "name": 42, "children": [7, { "name": "x", "area": "3.5", "children": "nope" }, { "area": -2 }] }),
            &HierarchyConfig::default(),
        );
        let root = tree.node(tree.root()).unwrap();
        assert_eq!(root.name, "42");
        let kids: Vec<_> = root
            .children_reference
            .iter()
            .map(|id| tree.node(*id).unwrap())
            .collect();
        assert_eq!(kids[0].name, "");
        assert_eq!(kids[0].size, 1.0);
        assert_eq!(kids[1].size, 3.5);
        assert!(!kids[1].is_internal());
        assert_eq!(kids[2].size, 0.0);

        let scalar = normalize(&json!("just a string"), &HierarchyConfig::default());
        assert_eq!(scalar.len(), 1);
        assert!(!scalar.node(scalar.root()).unwrap().is_internal());
    }

    #[test]
    fn empty_children_make_an_empty_internal_node() {
        let tree = normalize(&json!({ "name": "r", "children": [] }), &HierarchyConfig::default());
        let root = tree.node(tree.root()).unwrap();
        assert!(root.is_internal());
        assert!(!root.has_children());
        assert_eq!(root.size, 0.0);
    }

    #[test]
    fn child_colours_use_the_next_level_palette() {
        let greens = named_palette("Greens").unwrap();
        let config = HierarchyConfig::new().with_levels(vec![
            LevelSpec::Fields(LevelFields::default()),
            LevelSpec::Fields(LevelFields {
                color_palette: Some(PaletteSpec::Named("Greens".into())),
                ..LevelFields::default()
            }),
        ]);
        let tree = normalize(
            &json!({ "children": [{ "color": 0 }, { "color": 10 }, { "color": "#ff0000" }] }),
            &config,
        );
        let root = tree.node(tree.root()).unwrap();
        let kids: Vec<_> = root
            .children_reference
            .iter()
            .map(|id| tree.node(*id).unwrap())
            .collect();
        assert_eq!(to_hex(kids[0].color), to_hex(greens[0]));
        assert_eq!(to_hex(kids[1].color), to_hex(greens[2]));
        assert_eq!(kids[2].color, parse_css("#ff0000").unwrap(), "explicit colours are kept");
        assert_eq!(root.min_color, 0.0);
        assert_eq!(root.max_color, 10.0);
    }

    #[test]
    fn single_child_domain_is_widened() {
        let tree = normalize(&json!({ "children": [{ "color": 4 }] }), &HierarchyConfig::default());
        let root = tree.node(tree.root()).unwrap();
        assert_eq!((root.min_color, root.max_color), (4.0, 5.0));
        let domain = root.color_scale.as_ref().unwrap().domain();
        assert_eq!(domain.first(), Some(&4.0));
        assert_eq!(domain.last(), Some(&5.0));
    }

    #[test]
    fn level_field_names_apply_per_depth() {
        let config = HierarchyConfig::new().with_levels(vec![
            LevelSpec::ChildrenPath("groups".into()),
            LevelSpec::Fields(LevelFields {
                area_path: Some("count".into()),
                children_path: Some("items".into()),
                ..LevelFields::default()
            }),
        ]);
        let tree = normalize(
            &json!({ "groups": [{ "count": 5, "items": [{ "area": 2 }, { "area": 3, "children": [{}] }] }] }),
            &config,
        );
        let g = tree.resolve_path(&[0]).unwrap();
        assert_eq!(tree.node(g).unwrap().size, 5.0);
        assert_eq!(tree.node(g).unwrap().children.len(), 2);
        let deep = tree.resolve_path(&[0, 1, 0]).unwrap();
        assert_eq!(tree.node(deep).unwrap().depth, 3);
    }

    #[test]
    fn regions_parse_from_several_shapes() {
        let tree = normalize(
            &json!({ "coords": ["1.5,2", [3, 4], { "x": 5, "y": 6 }, "bad"] }),
            &HierarchyConfig::default(),
        );
        assert_eq!(
            tree.node(tree.root()).unwrap().region,
            vec![Point::new(1.5, 2.0), Point::new(3.0, 4.0), Point::new(5.0, 6.0)]
        );
    }
}
