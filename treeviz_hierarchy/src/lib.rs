// Copyright 2025 the TreeViz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Hierarchical data for TreeViz: normalization, path addressing and layouts.
//!
//! [`normalize`] turns arbitrary JSON records into a [`Hierarchy`], an arena of canonical
//! nodes with aggregated sizes and resolved colours. Nodes are addressed from outside by index
//! paths through each parent's source-ordered children, see [`Hierarchy::resolve_path`].
//!
//! Three layouts implement [`HierarchyLayout`]:
//! - [`TreemapLayout`]: squarified rectangles in viewport pixels.
//! - [`PartitionLayout`]: normalized angular/radial bands, projected by the sunburst.
//! - [`VoronoiLayout`]: precomputed regions scaled into the viewport.
//!
//! ```
//! use kurbo::Size;
//! use serde_json::json;
//! use treeviz_hierarchy::{HierarchyConfig, HierarchyLayout, TreemapLayout, normalize};
//!
//! let tree = normalize(
//!     &json!({ "name": "root", "children": [{ "name": "a", "area": 3 }, { "name": "b" }] }),
//!     &HierarchyConfig::default(),
//! );
//! let nodes = TreemapLayout::new().layout(&tree, Size::new(100.0, 100.0), tree.root());
//! assert_eq!(nodes.len(), 3);
//! assert_eq!(tree.key(nodes[1].id).as_str(), "root > a");
//! ```

#![no_std]

extern crate alloc;

mod config;
mod layout;
mod normalize;
mod palette;
mod partition;
mod tree;
mod treemap;
mod voronoi;

pub use config::{HierarchyConfig, LevelFields, LevelSpec, PaletteSpec, ResolvedLevel};
pub use layout::{HierarchyLayout, LayoutNode, cur_max_level, visibility_mask, visible_nodes};
pub use normalize::normalize;
pub use palette::{DEFAULT_PALETTE, default_palette, named_palette};
pub use partition::{PartitionLayout, SortBy};
pub use tree::{Ancestors, Hierarchy, Node, NodeId, PathError};
pub use treemap::{GOLDEN_RATIO, TreemapLayout};
pub use voronoi::VoronoiLayout;
