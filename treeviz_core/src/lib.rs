// Copyright 2025 the TreeViz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Retained scene and transition engine for hierarchical visualizations.
//!
//! This crate is the animated half of TreeViz:
//! - **Scales** map layout coordinates onto pixels ([`ScaleLinear`], [`ScaleStops`]).
//! - **Scene** holds tagged shapes with a fixed property table per kind, per-object event hooks,
//!   and hit testing.
//! - **Engine** diffs identity-keyed layout output against the scene (enter/update/exit) and
//!   drives every transition from a single per-frame [`Engine::tick`].
//!
//! Layout algorithms and data normalization live in `treeviz_hierarchy`; the visualizations
//! that tie the two together live in `treeviz_charts`.

#![no_std]

extern crate alloc;

mod color;
mod engine;
mod geometry;
mod measure;
mod scale;
mod scene;
mod shape;
mod tween;
pub mod z_order;

pub use color::{ColorRamp, Paint, lerp_color, parse_css, to_hex};
pub use engine::{Engine, LayoutItem, Placement, Projector, ReconcileStats, ViewScales};
pub use geometry::{Geometry, Partition, Visual, centroid};
pub use measure::{HeuristicTextMeasurer, TextMeasurer, TextStyle};
pub use scale::{ScaleLinear, ScaleStops, Stops, lerp, lerp_stops};
pub use scene::{
    EventKind, KEY_SEPARATOR, Lifecycle, NodeKey, ObjectId, Scene, SceneError, SceneObject,
};
pub use shape::{
    ArcShape, GroupShape, PolygonShape, Prop, PropError, PropValue, RectShape, Shape, ShapeKind,
    TextAnchor, TextBaseline, TextShape, polygon_path,
};
pub use tween::{
    Easing, EndAction, Finished, Sample, Timeline, Tween, TweenKind, TweenName, TweenTarget,
};
