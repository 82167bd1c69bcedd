// Copyright 2025 the TreeViz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Zoomable hierarchy visualizations for TreeViz.
//!
//! This crate sits between `treeviz_hierarchy` (data and layouts) and `treeviz_core` (scene and
//! transitions):
//! - **Visualizations** ([`Treemap`], [`Sunburst`], [`Voronoi`]) turn layout output into keyed
//!   scene items and own the view scales their zoom animates.
//! - **Interaction state** lives in a [`ZoomController`] (zoom, selection and held paths as
//!   [`Observable`]s) and a [`GestureTransform`] (transient pan/pinch/rotate feedback).
//! - **[`VisualizationHost`]** binds both to a runtime-swappable [`Visualization`]; unknown type
//!   names get a [`BlankVisualization`] that logs instead of failing.
//!
//! ```
//! use std::sync::Arc;
//!
//! use kurbo::Size;
//! use serde_json::json;
//! use treeviz_charts::{VisualizationHost, VisualizationOptions};
//! use treeviz_core::HeuristicTextMeasurer;
//!
//! let options = VisualizationOptions::new("treemap").with_data(json!({
//!     "name": "root",
//!     "children": [{ "name": "a", "area": 3 }, { "name": "b", "area": 1 }],
//! }));
//! let mut host = VisualizationHost::new(options, Arc::new(HeuristicTextMeasurer));
//! host.init(Size::new(400.0, 300.0));
//!
//! let a = host.tree().resolve_path(&[0]).unwrap();
//! host.zoom(a);
//! host.tick(500.0);
//! assert!(host.is_animating());
//! host.tick(1000.0);
//! assert_eq!(host.controller().zoom_path().get(), &vec![0]);
//! ```

#![no_std]

extern crate alloc;

mod blank;
mod controller;
mod gesture;
mod host;
mod observable;
mod options;
mod sunburst;
mod treemap;
mod visualization;
mod voronoi;

pub use blank::BlankVisualization;
pub use controller::ZoomController;
pub use gesture::{GestureEvent, GesturePhase, GestureTransform, Touches};
pub use host::VisualizationHost;
pub use observable::{Observable, SubscriptionId};
pub use options::{VisualizationKind, VisualizationOptions};
pub use sunburst::{Sunburst, SunburstProjector};
pub use treemap::{Treemap, TreemapProjector};
pub use visualization::{Visualization, create_visualization};
pub use voronoi::{DOUBLE_TAP_MS, Voronoi, VoronoiProjector};
