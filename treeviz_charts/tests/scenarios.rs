// Copyright 2025 the TreeViz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! End-to-end scenarios driven through the host binding.

use std::sync::Arc;

use kurbo::Size;
use serde_json::{Value, json};
use treeviz_charts::{VisualizationHost, VisualizationOptions, ZoomController};
use treeviz_core::{HeuristicTextMeasurer, Lifecycle, ObjectId, Scene, SceneObject, Shape};
use treeviz_hierarchy::{HierarchyConfig, normalize};

fn host(name: &str, data: Value) -> VisualizationHost {
    let options = VisualizationOptions::new(name)
        .with_spacing(0.0)
        .with_data(data);
    VisualizationHost::new(options, Arc::new(HeuristicTextMeasurer))
}

/// Top-level groups for `key`, exiting ones included.
fn groups<'a>(scene: &'a Scene, key: &str) -> Vec<&'a SceneObject> {
    scene
        .iter()
        .filter(|o| o.parent.is_none() && o.key.as_ref().is_some_and(|k| k.as_str() == key))
        .collect()
}

fn body<'a>(scene: &'a Scene, key: &str) -> &'a Shape {
    let group = groups(scene, key)
        .into_iter()
        .find(|o| o.lifecycle != Lifecycle::Exiting)
        .expect("live group");
    let first = group.children[0];
    &scene.get(first).expect("body").shape
}

#[test]
fn invalid_zoom_path_resets_to_root() {
    let mut host = host(
        "treemap",
        json!({ "name": "root", "children": [{ "name": "a" }, { "name": "b" }] }),
    );
    host.init(Size::new(100.0, 100.0));
    let focal = host.publish_zoom_path(vec![5]);
    assert_eq!(focal, host.tree().root());
    assert!(host.controller().zoom_path().get().is_empty());
}

#[test]
fn unknown_visualization_type_is_a_no_op() {
    let mut host = host("bogus", json!({ "name": "root", "children": [{ "name": "a" }] }));
    host.init(Size::new(100.0, 100.0));
    host.update();
    let a = host.tree().resolve_path(&[0]).expect("a");
    host.zoom(a);
    host.tick(16.0);
    assert!(host.resize(Size::new(50.0, 50.0)));
    host.remove();
    assert!(host.scene().is_none());
    assert!(!host.is_animating());
}

#[test]
fn select_zoom_paths_resolve_back_to_their_node() {
    let tree = normalize(
        &json!({ "name": "root", "children": [
            { "name": "a", "area": 1, "children": [{ "name": "a1", "area": 5 }, { "name": "a2", "area": 9 }] },
            { "name": "b", "area": 7 },
            { "name": "c", "children": [] }
        ] }),
        &HierarchyConfig::default(),
    );
    for (id, _) in tree.iter().skip(1) {
        let mut controller = ZoomController::new();
        let focal = controller.select_zoom(&tree, id);
        assert_eq!(focal, id);
        assert_eq!(tree.resolve_path(controller.zoom_path().get()), Ok(id));
    }
}

#[test]
fn resizing_twice_to_the_same_size_changes_nothing() {
    let mut host = host(
        "sunburst",
        json!({ "name": "root", "children": [{ "name": "a", "area": 2 }, { "name": "b" }] }),
    );
    host.init(Size::new(100.0, 100.0));
    assert!(host.resize(Size::new(300.0, 200.0)));
    let before = host.scene().expect("scene").clone();
    assert!(!host.resize(Size::new(300.0, 200.0)));
    let after = host.scene().expect("scene");
    let ids: Vec<ObjectId> = before.iter().map(|o| o.id).collect();
    assert_eq!(ids.len(), after.len());
    for id in ids {
        assert_eq!(before.get(id).map(|o| &o.shape), after.get(id).map(|o| &o.shape));
    }
}

#[test]
fn sunburst_single_child_spans_the_full_circle() {
    let mut host = host(
        "sunburst",
        json!({ "name": "root", "children": [{ "name": "only", "area": 4 }] }),
    );
    host.init(Size::new(100.0, 100.0));
    let Shape::Arc(arc) = body(host.scene().expect("scene"), "root > only") else {
        panic!("expected an arc");
    };
    assert_eq!(arc.start_angle, 0.0);
    assert!((arc.end_angle - std::f64::consts::TAU).abs() < 1e-12);
}

#[test]
fn treemap_splits_three_to_one() {
    let mut host = host(
        "treemap",
        json!({ "name": "root", "children": [
            { "name": "big", "area": 3 },
            { "name": "small", "area": 1 }
        ] }),
    );
    host.init(Size::new(100.0, 100.0));
    let scene = host.scene().expect("scene");
    let area = |key: &str| match body(scene, key) {
        Shape::Rect(r) => r.width * r.height,
        other => panic!("expected a rect, got {other:?}"),
    };
    let (big, small) = (area("root > big"), area("root > small"));
    assert!((big + small - 10_000.0).abs() < 1e-6);
    assert!((big / small - 3.0).abs() < 1e-9);
}

#[test]
fn enter_update_exit_keeps_identity() {
    let mut host = host(
        "treemap",
        json!({ "name": "root", "children": [{ "name": "A" }, { "name": "B" }] }),
    );
    host.init(Size::new(100.0, 100.0));
    let b_before = groups(host.scene().expect("scene"), "root > B")[0].id;

    host.set_data(json!({ "name": "root", "children": [{ "name": "B" }, { "name": "C" }] }));
    let scene = host.scene().expect("scene");
    assert_eq!(groups(scene, "root > B")[0].id, b_before);
    assert_eq!(groups(scene, "root > C").len(), 1);
    let a = groups(scene, "root > A");
    assert_eq!(a.len(), 1);
    assert_eq!(a[0].lifecycle, Lifecycle::Exiting);

    host.tick(999.0);
    let scene = host.scene().expect("scene");
    assert_eq!(groups(scene, "root > A").len(), 1);
    assert_eq!(groups(scene, "root > B")[0].id, b_before);

    host.tick(1000.0);
    let scene = host.scene().expect("scene");
    assert!(groups(scene, "root > A").is_empty());
    assert_eq!(groups(scene, "root > B")[0].id, b_before);
    assert_eq!(groups(scene, "root > C").len(), 1);
    assert!(!host.is_animating());
}

#[test]
fn published_selection_zooms_to_the_selected_node() {
    let mut host = host(
        "treemap",
        json!({ "name": "root", "children": [
            { "name": "a", "children": [{ "name": "a1" }, { "name": "a2" }] },
            { "name": "b", "area": 3 }
        ] }),
    );
    host.init(Size::new(100.0, 100.0));
    let a = host.tree().resolve_path(&[0]).expect("a");

    assert_eq!(host.publish_selected_path(Some(vec![0])), Some(a));
    assert!(host.is_animating());
    assert_eq!(host.controller().focal(), a);
    assert_eq!(host.controller().zoom_path().get(), &vec![0]);
    host.tick(1000.0);
    assert!(!host.is_animating());
    let Shape::Rect(rect) = body(host.scene().expect("scene"), "root > a") else {
        panic!("expected a rect");
    };
    assert!((rect.width - 100.0).abs() < 1e-9);
    assert!((rect.height - 100.0).abs() < 1e-9);

    // Written straight to the observable, the selection renders on the next tick.
    host.controller_mut()
        .selected_path_mut()
        .set(Some(vec![1]));
    host.tick(1016.0);
    let b = host.tree().resolve_path(&[1]).expect("b");
    assert_eq!(host.controller().focal(), b);
    assert_eq!(host.controller().zoom_path().get(), &vec![1]);
    assert!(host.is_animating());

    // An invalid selection is cleared and the view stays put.
    host.tick(2016.0);
    assert!(!host.is_animating());
    assert_eq!(host.publish_selected_path(Some(vec![9])), None);
    host.tick(2032.0);
    assert!(!host.is_animating());
    assert_eq!(host.controller().focal(), b);
}
