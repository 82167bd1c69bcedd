// Copyright 2025 the TreeViz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drives each visualization through a few simulated frames and writes SVG snapshots.
//!
//! Run with `RUST_LOG=treeviz_core=debug` to watch reconcile and tween activity.

mod svg;

use std::path::Path;
use std::sync::Arc;

use kurbo::{Point, Size, Vec2};
use serde_json::{Value, json};
use tracing_subscriber::EnvFilter;
use treeviz_charts::{GestureEvent, VisualizationHost, VisualizationOptions};
use treeviz_core::HeuristicTextMeasurer;

const OUT_DIR: &str = "treeviz_demo_out";
const FRAME_MS: f64 = 1000.0 / 60.0;

fn main() -> std::io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let out = Path::new(OUT_DIR);
    std::fs::create_dir_all(out)?;
    let size = Size::new(640.0, 480.0);

    let mut host = VisualizationHost::new(
        VisualizationOptions::new("treemap")
            .with_data(portfolio())
            .with_max_visible_levels(Some(2)),
        Arc::new(HeuristicTextMeasurer),
    );
    host.init(size);
    write_frame(&host, &out.join("treemap.svg"))?;

    // Zoom into the first branch and capture the midpoint and the end state.
    let mut now = 0.0;
    if let Ok(branch) = host.tree().resolve_path(&[0]) {
        host.zoom(branch);
    }
    run_until(&mut host, &mut now, 500.0);
    write_frame(&host, &out.join("treemap_zooming.svg"))?;
    run_until(&mut host, &mut now, 1500.0);
    write_frame(&host, &out.join("treemap_zoomed.svg"))?;
    tracing::info!(path = ?host.controller().zoom_path().get(), "treemap zoomed");

    // Switching keeps the zoom path, so the sunburst opens on the same branch.
    host.set_visualization_type("sunburst");
    write_frame(&host, &out.join("sunburst.svg"))?;

    // A tap on the first ring zooms into whatever sits under the pointer.
    let center = Point::new(size.width / 2.0, size.height / 2.0);
    if let Some(node) = host.tap(center + Vec2::new(0.0, -size.height / 5.0))
        && let Some(tapped) = host.tree().node(node)
    {
        tracing::info!(node = %tapped.name, "tapped");
    }
    let until = now + 1500.0;
    run_until(&mut host, &mut now, until);
    write_frame(&host, &out.join("sunburst_tapped.svg"))?;

    let mut host = VisualizationHost::new(
        VisualizationOptions::new("sunburst")
            .with_data(portfolio())
            .with_gestures(true, true, true),
        Arc::new(HeuristicTextMeasurer),
    );
    host.init(size);
    host.gesture_event(&GestureEvent::start([
        Point::new(280.0, 240.0),
        Point::new(360.0, 240.0),
    ]));
    host.gesture_event(&GestureEvent::moved([
        Point::new(260.0, 220.0),
        Point::new(400.0, 260.0),
    ]));
    write_frame(&host, &out.join("sunburst_pinched.svg"))?;

    let mut host = VisualizationHost::new(
        VisualizationOptions::new("voronoi").with_data(regions()),
        Arc::new(HeuristicTextMeasurer),
    );
    host.init(Size::new(600.0, 600.0));
    write_frame(&host, &out.join("voronoi.svg"))?;

    Ok(())
}

/// Ticks `host` at 60 fps until `until` milliseconds.
fn run_until(host: &mut VisualizationHost, now: &mut f64, until: f64) {
    while *now < until {
        *now = (*now + FRAME_MS).min(until);
        host.tick(*now);
    }
}

fn write_frame(host: &VisualizationHost, path: &Path) -> std::io::Result<()> {
    let Some(scene) = host.scene() else {
        tracing::warn!(path = %path.display(), "nothing to draw");
        return Ok(());
    };
    let size = host.size();
    let svg = svg::to_svg_string(scene, size.width, size.height, host.gesture().affine());
    std::fs::write(path, svg)?;
    println!("wrote {}", path.display());
    Ok(())
}

fn portfolio() -> Value {
    json!({
        "name": "portfolio",
        "children": [
            { "name": "equities", "color": 4, "children": [
                { "name": "tech", "children": [
                    { "name": "chips", "area": 40 },
                    { "name": "software", "area": 55 },
                    { "name": "cloud", "area": 30 }
                ] },
                { "name": "energy", "area": 35 },
                { "name": "health", "children": [
                    { "name": "pharma", "area": 20 },
                    { "name": "devices", "area": 12 }
                ] }
            ] },
            { "name": "bonds", "color": 1, "children": [
                { "name": "government", "area": 60 },
                { "name": "corporate", "area": 25 }
            ] },
            { "name": "cash", "color": "#4e79a7", "area": 15 }
        ]
    })
}

fn regions() -> Value {
    json!({
        "name": "map",
        "children": [
            { "name": "west", "color": "#c0392b", "children": [
                { "name": "w1", "coords": ["0,0", "300,0", "300,300", "0,300"] },
                { "name": "w2", "coords": ["0,300", "300,300", "300,600", "0,600"] }
            ] },
            { "name": "east", "children": [
                { "name": "e1", "coords": [[300, 0], [600, 0], [600, 200], [300, 300]] },
                { "name": "e2", "coords": [
                    { "x": 300, "y": 300 }, { "x": 600, "y": 200 },
                    { "x": 600, "y": 600 }, { "x": 300, "y": 600 }
                ] }
            ] }
        ]
    })
}
